//! Reduction of base parameters to a canonical decomposition.
//!
//! The normalized form is `p' = Rz·Ry·Rx·S·p + T`: one diagonal scale, one
//! Euler rotation about the origin and one translation. All pivots are
//! folded into `T`. Each component carries a per-axis activity mask; an
//! axis whose value is within tolerance of identity is snapped to exactly
//! identity and left inactive.

use std::fmt;
use std::ops::BitOr;

use crate::geom::{Axis, Tolerance, Vec3};

use super::params::BaseParams;

/// Three bits, one per axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AxisMask(u8);

impl AxisMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(0b111);

    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0b111)
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn contains(self, axis: Axis) -> bool {
        self.0 & (1 << axis.index()) != 0
    }

    pub fn insert(&mut self, axis: Axis) {
        self.0 |= 1 << axis.index();
    }

    pub fn remove(&mut self, axis: Axis) {
        self.0 &= !(1 << axis.index());
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }
}

impl BitOr for AxisMask {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Renders as e.g. `x-z`.
impl fmt::Display for AxisMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for axis in Axis::ALL {
            let c = if self.contains(axis) { axis.name() } else { '-' };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

/// Canonical decomposition derived from [`BaseParams`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalized {
    pub scale: Vec3,
    /// Wrapped to (-180, 180].
    pub rotation_degrees: Vec3,
    pub rotation_radians: Vec3,
    pub translation: Vec3,
    /// Mean of the active rotation pivots, projected onto each axis'
    /// rotation plane. Display only.
    pub rotation_pivot: [f64; 2],
    pub scale_enabled: AxisMask,
    pub rotate_enabled: AxisMask,
    pub translate_enabled: AxisMask,
}

impl Normalized {
    pub const IDENTITY: Self = Self {
        scale: Vec3::new(1.0, 1.0, 1.0),
        rotation_degrees: Vec3::new(0.0, 0.0, 0.0),
        rotation_radians: Vec3::new(0.0, 0.0, 0.0),
        translation: Vec3::new(0.0, 0.0, 0.0),
        rotation_pivot: [0.0; 2],
        scale_enabled: AxisMask::NONE,
        rotate_enabled: AxisMask::NONE,
        translate_enabled: AxisMask::NONE,
    };

    /// Union of the three masks.
    #[must_use]
    pub fn transform_enabled(&self) -> AxisMask {
        self.scale_enabled | self.rotate_enabled | self.translate_enabled
    }

    /// Whether the per-axis formula cannot express this transform.
    #[must_use]
    pub fn needs_matrix(&self) -> bool {
        !self.rotate_enabled.is_empty()
    }

    /// Rebuild the scale and translation masks from the stored values,
    /// snapping negligible values to identity.
    pub(crate) fn refresh_linear_masks(&mut self) {
        let tol = Tolerance::LINEAR;
        self.scale_enabled = AxisMask::NONE;
        self.translate_enabled = AxisMask::NONE;
        for axis in Axis::ALL {
            let i = axis.index();
            self.scale[i] = tol.snap_one(self.scale[i]);
            if self.scale[i] != 1.0 {
                self.scale_enabled.insert(axis);
            }
            self.translation[i] = tol.snap_zero(self.translation[i]);
            if self.translation[i] != 0.0 {
                self.translate_enabled.insert(axis);
            }
        }
    }
}

impl Default for Normalized {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Wrap an angle in degrees into (-180, 180].
#[must_use]
pub fn wrap_degrees(degrees: f64) -> f64 {
    let mut d = degrees % 360.0;
    if d > 180.0 {
        d -= 360.0;
    } else if d <= -180.0 {
        d += 360.0;
    }
    d
}

/// Rotate the components `(a, b)` of `point` by `radians` around the same
/// components of `pivot`, via polar coordinates.
fn rotate_about_pivot(point: &mut Vec3, pivot: Vec3, a: usize, b: usize, radians: f64) {
    let da = point[a] - pivot[a];
    let db = point[b] - pivot[b];
    let radius = da.hypot(db);
    if radius == 0.0 {
        return;
    }
    let angle = db.atan2(da) + radians;
    point[a] = pivot[a] + radius * angle.cos();
    point[b] = pivot[b] + radius * angle.sin();
}

/// Derive the canonical decomposition. Pure: equal inputs give equal output.
#[must_use]
pub fn normalize(params: &BaseParams) -> Normalized {
    let lin = Tolerance::LINEAR;
    let ang = Tolerance::ANGLE_DEGREES;
    let mut out = Normalized::IDENTITY;
    let mut acc = Vec3::zero();

    for axis in Axis::ALL {
        let i = axis.index();
        let s = params.scale[i];
        if lin.is_one(s) {
            out.scale[i] = 1.0;
        } else {
            out.scale[i] = s;
            out.scale_enabled.insert(axis);
        }
        acc[i] += params.shift[i] + (1.0 - out.scale[i]) * params.scale_pivot[i];
    }

    // Each axis turns the running offset around its own pivot, in x, y, z
    // order, which a single linear map cannot reproduce.
    let mut pivot_sum = [0.0; 2];
    for axis in Axis::ALL {
        let i = axis.index();
        let rot = &params.rotation[i];
        let degrees = wrap_degrees(rot.total_degrees());
        if ang.is_zero(degrees) {
            continue;
        }
        let radians = degrees.to_radians();
        out.rotation_degrees[i] = degrees;
        out.rotation_radians[i] = radians;
        out.rotate_enabled.insert(axis);

        let (a, b) = axis.orthogonal();
        rotate_about_pivot(&mut acc, rot.pivot, a, b, radians);
        pivot_sum[0] += rot.pivot[a];
        pivot_sum[1] += rot.pivot[b];
    }
    let active = f64::from(out.rotate_enabled.count());
    if active > 0.0 {
        out.rotation_pivot = [pivot_sum[0] / active, pivot_sum[1] / active];
    }

    acc += params.translation;
    for axis in Axis::ALL {
        let i = axis.index();
        if lin.is_zero(acc[i]) {
            out.translation[i] = 0.0;
        } else {
            out.translation[i] = acc[i];
            out.translate_enabled.insert(axis);
        }
    }

    log::trace!(
        "normalized transform: scale={} rotate={} translate={}",
        out.scale_enabled,
        out.rotate_enabled,
        out.translate_enabled
    );
    out
}
