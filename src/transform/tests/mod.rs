mod test_normalize_basic;
mod test_state_basic;

use crate::geom::{Axis, Vec3};

/// Reference implementation of the decomposed transform, applying every
/// stage to the point directly.
pub(super) struct Reference {
    pub scale: Vec3,
    pub scale_pivot: Vec3,
    pub shift: Vec3,
    pub rotation: [(f64, Vec3); 3],
    pub translation: Vec3,
}

impl Reference {
    pub fn apply(&self, p: Vec3) -> Vec3 {
        let mut q = (p - self.scale_pivot).mul_elem(self.scale) + self.scale_pivot + self.shift;
        for axis in Axis::ALL {
            let (degrees, pivot) = self.rotation[axis.index()];
            q = rotate_about_axis(q, axis, degrees, pivot);
        }
        q + self.translation
    }

    pub fn install(&self, t: &mut crate::transform::TransformState) {
        t.set_scale(Some(self.scale), Some(self.scale_pivot));
        t.set_shift(Some(self.shift));
        for axis in Axis::ALL {
            let (degrees, pivot) = self.rotation[axis.index()];
            t.set_axis_rotation(axis, degrees, 0.0, Some(pivot));
        }
        t.set_translation(Some(self.translation));
    }
}

/// Right-handed rotation of `p` about the line parallel to `axis` through
/// `pivot`.
pub(super) fn rotate_about_axis(p: Vec3, axis: Axis, degrees: f64, pivot: Vec3) -> Vec3 {
    let (s, c) = degrees.to_radians().sin_cos();
    let d = p - pivot;
    let r = match axis {
        Axis::X => Vec3::new(d.x, c * d.y - s * d.z, s * d.y + c * d.z),
        Axis::Y => Vec3::new(c * d.x + s * d.z, d.y, -s * d.x + c * d.z),
        Axis::Z => Vec3::new(c * d.x - s * d.y, s * d.x + c * d.y, d.z),
    };
    r + pivot
}

pub(super) fn assert_close(actual: Vec3, expected: Vec3, tol: f64) {
    assert!(
        (actual - expected).length() <= tol,
        "expected {expected:?}, got {actual:?} (tolerance {tol})"
    );
}

pub(super) fn sample_points() -> Vec<Vec3> {
    vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(-2.5, 3.25, 7.0),
        Vec3::new(100.0, -40.0, 0.125),
    ]
}
