//! Decomposed base parameters: the human-editable form of a transform.
//!
//! Applied in this order: scale about `scale_pivot`, add `shift`, rotate
//! about x, y and z (each axis around its own pivot), add `translation`.

use crate::geom::{Axis, Mat34, Vec3};

/// Rotation about a single coordinate axis.
///
/// The angle is stored redundantly as degrees and radians; the effective
/// angle is their sum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRotation {
    pub degrees: f64,
    pub radians: f64,
    /// Point held fixed. Only the two components orthogonal to the axis matter.
    pub pivot: Vec3,
}

impl AxisRotation {
    pub const NONE: Self = Self {
        degrees: 0.0,
        radians: 0.0,
        pivot: Vec3::new(0.0, 0.0, 0.0),
    };

    #[must_use]
    pub const fn new(degrees: f64, radians: f64, pivot: Vec3) -> Self {
        Self {
            degrees,
            radians,
            pivot,
        }
    }

    /// Effective angle in degrees, not wrapped.
    #[must_use]
    pub fn total_degrees(&self) -> f64 {
        self.degrees + self.radians.to_degrees()
    }

    #[must_use]
    pub fn is_none(&self) -> bool {
        self.degrees == 0.0 && self.radians == 0.0
    }
}

impl Default for AxisRotation {
    fn default() -> Self {
        Self::NONE
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseParams {
    pub scale: Vec3,
    pub scale_pivot: Vec3,
    pub shift: Vec3,
    /// Indexed by [`Axis::index`].
    pub rotation: [AxisRotation; 3],
    pub translation: Vec3,
}

impl BaseParams {
    pub const IDENTITY: Self = Self {
        scale: Vec3::new(1.0, 1.0, 1.0),
        scale_pivot: Vec3::new(0.0, 0.0, 0.0),
        shift: Vec3::new(0.0, 0.0, 0.0),
        rotation: [AxisRotation::NONE; 3],
        translation: Vec3::new(0.0, 0.0, 0.0),
    };

    pub fn set_scale(&mut self, scale: Option<Vec3>, pivot: Option<Vec3>) {
        self.scale = scale.unwrap_or_else(Vec3::one);
        self.scale_pivot = pivot.unwrap_or_default();
    }

    pub fn set_shift(&mut self, shift: Option<Vec3>) {
        self.shift = shift.unwrap_or_default();
    }

    /// Sets all three axes; they share `pivot`.
    pub fn set_rotation(&mut self, degrees: Option<Vec3>, radians: Option<Vec3>, pivot: Option<Vec3>) {
        let degrees = degrees.unwrap_or_default();
        let radians = radians.unwrap_or_default();
        let pivot = pivot.unwrap_or_default();
        for axis in Axis::ALL {
            let i = axis.index();
            self.rotation[i] = AxisRotation::new(degrees[i], radians[i], pivot);
        }
    }

    /// Sets one axis, leaving the other two (and their pivots) alone.
    pub fn set_axis_rotation(&mut self, axis: Axis, degrees: f64, radians: f64, pivot: Option<Vec3>) {
        self.rotation[axis.index()] = AxisRotation::new(degrees, radians, pivot.unwrap_or_default());
    }

    pub fn set_translation(&mut self, translation: Option<Vec3>) {
        self.translation = translation.unwrap_or_default();
    }

    /// Best-effort summary of a dense matrix for display: the diagonal
    /// becomes the scale, the translation column the translation, rotation
    /// stays zero. Not a round trip.
    #[must_use]
    pub fn approximate_from_matrix(matrix: &Mat34) -> Self {
        Self {
            scale: matrix.diagonal(),
            translation: matrix.translation(),
            ..Self::IDENTITY
        }
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for BaseParams {
    fn default() -> Self {
        Self::IDENTITY
    }
}
