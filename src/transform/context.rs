//! Caller-owned call statistics.
//!
//! Nothing in the engine keeps global counters. Callers that want to know
//! how often points were transformed, or how often the caches had to be
//! rebuilt, pass a [`TransformContext`] to the `*_with_context` methods of
//! [`TransformState`](super::TransformState). The plain methods use a
//! throwaway context.

/// Cumulative counters. All fields only ever grow.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TransformStats {
    /// Forward transform calls (a batch counts once).
    pub forward_calls: u64,
    /// Points moved by forward transforms.
    pub forward_points: u64,
    /// Inverse transform calls (a batch counts once).
    pub inverse_calls: u64,
    /// Points moved by inverse transforms.
    pub inverse_points: u64,
    /// Times the decomposition was normalized.
    pub normalizations: u64,
    /// Times a dense matrix was built from the decomposition.
    pub matrix_builds: u64,
    /// Times an inverse matrix was computed.
    pub inverse_builds: u64,
}

impl TransformStats {
    pub(crate) fn record_forward(&mut self, points: usize) {
        self.forward_calls = self.forward_calls.saturating_add(1);
        self.forward_points = self.forward_points.saturating_add(points as u64);
    }

    pub(crate) fn record_inverse(&mut self, points: usize) {
        self.inverse_calls = self.inverse_calls.saturating_add(1);
        self.inverse_points = self.inverse_points.saturating_add(points as u64);
    }

    /// Total transform calls in either direction.
    #[must_use]
    pub const fn total_calls(&self) -> u64 {
        self.forward_calls.saturating_add(self.inverse_calls)
    }

    /// Add another set of counters into this one.
    pub fn merge(&mut self, other: &Self) {
        self.forward_calls = self.forward_calls.saturating_add(other.forward_calls);
        self.forward_points = self.forward_points.saturating_add(other.forward_points);
        self.inverse_calls = self.inverse_calls.saturating_add(other.inverse_calls);
        self.inverse_points = self.inverse_points.saturating_add(other.inverse_points);
        self.normalizations = self.normalizations.saturating_add(other.normalizations);
        self.matrix_builds = self.matrix_builds.saturating_add(other.matrix_builds);
        self.inverse_builds = self.inverse_builds.saturating_add(other.inverse_builds);
    }
}

#[derive(Debug, Default)]
pub struct TransformContext {
    pub stats: TransformStats,
}

impl TransformContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all counters to zero.
    pub fn begin(&mut self) {
        self.stats = TransformStats::default();
    }
}
