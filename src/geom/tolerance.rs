// ─────────────────────────────────────────────────────────────────────────────
// Tolerance
// ─────────────────────────────────────────────────────────────────────────────

/// Tolerance thresholds used by the transform engine.
///
/// The thresholds are part of observable behavior: they decide which axes
/// count as active and therefore which code path a transform takes. Use the
/// named constants instead of scattering literals:
/// - `Tolerance::LINEAR` - scale, translation and matrix entries (1e-9)
/// - `Tolerance::ANGLE_DEGREES` - rotation angles in degrees (1e-4)
/// - `Tolerance::SINGULAR` - determinant below which a matrix is not inverted (1e-9)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub eps: f64,
}

impl Tolerance {
    /// Linear quantities: scale factors, offsets, matrix entries.
    pub const LINEAR: Self = Self { eps: 1e-9 };

    /// Rotation angles, measured in degrees.
    pub const ANGLE_DEGREES: Self = Self { eps: 1e-4 };

    /// Absolute determinant threshold for matrix inversion.
    pub const SINGULAR: Self = Self { eps: 1e-9 };

    #[must_use]
    pub const fn new(eps: f64) -> Self {
        Self { eps }
    }

    /// `|a| < eps`.
    #[must_use]
    pub fn is_zero(self, a: f64) -> bool {
        a.abs() < self.eps
    }

    /// `|a - 1| < eps`.
    #[must_use]
    pub fn is_one(self, a: f64) -> bool {
        (a - 1.0).abs() < self.eps
    }

    /// Snap `a` to exactly zero when it is negligible.
    #[must_use]
    pub fn snap_zero(self, a: f64) -> f64 {
        if self.is_zero(a) { 0.0 } else { a }
    }

    /// Snap `a` to exactly one when it is negligibly close.
    #[must_use]
    pub fn snap_one(self, a: f64) -> f64 {
        if self.is_one(a) { 1.0 } else { a }
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::LINEAR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tolerance_constants() {
        assert!(Tolerance::LINEAR.eps < Tolerance::ANGLE_DEGREES.eps);
        assert_eq!(Tolerance::default(), Tolerance::LINEAR);
    }

    #[test]
    fn test_thresholds_are_strict() {
        let tol = Tolerance::LINEAR;
        assert!(tol.is_zero(5e-10));
        assert!(!tol.is_zero(1e-9));
        assert!(tol.is_one(1.0 + 5e-10));
        assert!(!tol.is_one(1.0 + 2e-9));
    }

    #[test]
    fn test_snapping() {
        let tol = Tolerance::LINEAR;
        assert_eq!(tol.snap_zero(-3e-10), 0.0);
        assert_eq!(tol.snap_zero(0.25), 0.25);
        assert_eq!(tol.snap_one(1.0 - 1e-12), 1.0);
        assert_eq!(tol.snap_one(2.0), 2.0);
    }
}
