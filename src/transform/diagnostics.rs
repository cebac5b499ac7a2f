//! Human-readable dump of a [`TransformState`].
//!
//! Purely informational; nothing here affects how points are transformed.
//!
//! # Example
//!
//! ```ignore
//! use affine_engine::geom::Axis;
//! use affine_engine::transform::{PrintFlags, TransformState};
//!
//! fn dump() -> std::fmt::Result {
//!     let mut t = TransformState::new();
//!     t.set_axis_rotation(Axis::Z, 45.0, 0.0, None);
//!     let mut out = String::new();
//!     t.print(&mut out, 2, "\n", PrintFlags::NORMALIZED | PrintFlags::MATRIX)?;
//!     eprint!("{out}");
//!     Ok(())
//! }
//! ```

use std::fmt::{self, Write};
use std::ops::BitOr;

use crate::geom::{Axis, Mat34, Vec3};

use super::params::BaseParams;
use super::state::TransformState;

/// Selects the sections rendered by [`TransformState::print`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PrintFlags(u8);

impl PrintFlags {
    pub const NONE: Self = Self(0);
    /// Base parameters as set by the caller.
    pub const BASE: Self = Self(0x01);
    /// Normalized decomposition and activity masks.
    pub const NORMALIZED: Self = Self(0x02);
    /// Dense transform matrix.
    pub const MATRIX: Self = Self(0x04);
    /// Inverse matrix.
    pub const INVERSE: Self = Self(0x08);
    /// Also print vectors that hold their default value.
    pub const FORCE_DEFAULTS: Self = Self(0x10);
    pub const ALL: Self = Self(0x0f);

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for PrintFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

struct Printer<'a, W> {
    out: &'a mut W,
    indent: usize,
    eol: &'a str,
    force: bool,
}

impl<W: Write> Printer<'_, W> {
    fn line(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        write!(self.out, "{:indent$}{args}{}", "", self.eol, indent = self.indent)
    }

    /// Skipped when `v == default` unless defaults are forced.
    fn vector(&mut self, label: &str, v: Vec3, default: Vec3) -> fmt::Result {
        if v == default && !self.force {
            return Ok(());
        }
        self.line(format_args!("{label:<14}{v:.6}"))
    }

    fn matrix(&mut self, label: &str, m: &Mat34) -> fmt::Result {
        self.line(format_args!("{label}:"))?;
        let rendered = format!("{m:.6}");
        for row in rendered.lines() {
            self.line(format_args!("  {row}"))?;
        }
        Ok(())
    }

    fn base(&mut self, p: &BaseParams) -> fmt::Result {
        self.line(format_args!("base parameters:"))?;
        self.vector("  scale", p.scale, Vec3::one())?;
        self.vector("  scale pivot", p.scale_pivot, Vec3::zero())?;
        self.vector("  shift", p.shift, Vec3::zero())?;
        for axis in Axis::ALL {
            let r = &p.rotation[axis.index()];
            if r.is_none() && !self.force {
                continue;
            }
            self.line(format_args!(
                "  rotate {}      {:11.6} deg {:+.6} rad  pivot {:.6}",
                axis.name(),
                r.degrees,
                r.radians,
                r.pivot
            ))?;
        }
        self.vector("  translate", p.translation, Vec3::zero())
    }
}

impl TransformState {
    /// Render the sections selected by `flags` into `out`, each line
    /// prefixed by `indent` spaces and terminated by `eol`. Requested
    /// derived sections are computed if not yet cached.
    ///
    /// # Errors
    /// Propagates errors from the sink.
    pub fn print<W: Write>(&mut self, out: &mut W, indent: usize, eol: &str, flags: PrintFlags) -> fmt::Result {
        let mut pr = Printer {
            out,
            indent,
            eol,
            force: flags.contains(PrintFlags::FORCE_DEFAULTS),
        };

        pr.line(format_args!(
            "transform: generation {}, authority {}",
            self.generation(),
            self.matrix_authority().level()
        ))?;

        if flags.contains(PrintFlags::BASE) {
            pr.base(self.base_params())?;
        }

        if flags.contains(PrintFlags::NORMALIZED) {
            let n = *self.normalized();
            pr.line(format_args!("normalized:"))?;
            pr.vector("  scale", n.scale, Vec3::one())?;
            pr.vector("  rotate deg", n.rotation_degrees, Vec3::zero())?;
            pr.vector("  translate", n.translation, Vec3::zero())?;
            if n.rotate_enabled.count() > 1 || pr.force {
                pr.line(format_args!(
                    "  rot pivot     {:11.6} {:11.6}",
                    n.rotation_pivot[0], n.rotation_pivot[1]
                ))?;
            }
            pr.line(format_args!(
                "  enabled       scale={} rotate={} translate={} any={}",
                n.scale_enabled,
                n.rotate_enabled,
                n.translate_enabled,
                n.transform_enabled()
            ))?;
        }

        if flags.contains(PrintFlags::MATRIX) {
            let m = self.matrix();
            pr.matrix("matrix", &m)?;
        }

        if flags.contains(PrintFlags::INVERSE) {
            let m = self.inverse_matrix();
            pr.matrix("inverse", &m)?;
        }
        Ok(())
    }
}

/// Base parameters plus whatever derived data is already cached.
impl fmt::Display for TransformState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pr = Printer {
            out: f,
            indent: 0,
            eol: "\n",
            force: false,
        };
        pr.line(format_args!("transform: generation {}", self.generation()))?;
        pr.base(self.base_params())?;
        if let Some(m) = self.cached_matrix() {
            pr.matrix("matrix", m)?;
        }
        if let Some(m) = self.cached_inverse() {
            pr.matrix("inverse", m)?;
        }
        Ok(())
    }
}
