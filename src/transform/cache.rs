//! Lazily derived representations of a transform.
//!
//! A [`Representation`] moves forward through
//! `Stale -> Normalized -> Built` as readers need more, and is reset to
//! `Stale` by any base-parameter edit. `Supplied` holds a matrix that was
//! given directly (or produced by composition) and is its own ground truth.

use crate::geom::{Axis, Mat34, Tolerance, Vec3};

use super::context::TransformStats;
use super::normalize::{AxisMask, Normalized, normalize};
use super::params::BaseParams;

/// Which representation is the ground truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum MatrixAuthority {
    /// The per-axis decomposition is exact; no matrix is needed.
    Decomposition = 0,
    /// A matrix is needed but derivable from the decomposition.
    Derived = 1,
    /// The matrix was supplied directly; the decomposition is approximate.
    Supplied = 2,
}

impl MatrixAuthority {
    #[must_use]
    pub const fn level(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) enum Representation {
    /// Base parameters changed since the last normalization.
    #[default]
    Stale,
    Normalized(Normalized),
    Built {
        normalized: Normalized,
        matrix: Mat34,
        inverse: Option<Mat34>,
    },
    Supplied {
        approx: Normalized,
        matrix: Mat34,
        inverse: Option<Mat34>,
    },
}

impl Representation {
    /// Wrap a directly supplied matrix.
    pub(crate) fn supplied(matrix: Mat34) -> Self {
        Self::Supplied {
            approx: approximate_normalized(&matrix),
            matrix,
            inverse: None,
        }
    }

    /// `Stale -> Normalized`; other states are returned unchanged.
    pub(crate) fn normalized(self, params: &BaseParams, stats: &mut TransformStats) -> Self {
        match self {
            Self::Stale => {
                stats.normalizations += 1;
                Self::Normalized(normalize(params))
            }
            other => other,
        }
    }

    /// `Normalized -> Built`; other states are returned unchanged.
    pub(crate) fn built(self, stats: &mut TransformStats) -> Self {
        match self {
            Self::Normalized(normalized) => {
                stats.matrix_builds += 1;
                let (normalized, matrix) = build_matrix(&normalized);
                Self::Built {
                    normalized,
                    matrix,
                    inverse: None,
                }
            }
            other => other,
        }
    }

    /// Fill the inverse slot of a state that holds a matrix.
    pub(crate) fn inverted(self, stats: &mut TransformStats) -> Self {
        match self {
            Self::Built {
                normalized,
                matrix,
                inverse: None,
            } => {
                stats.inverse_builds += 1;
                Self::Built {
                    normalized,
                    matrix,
                    inverse: Some(matrix.invert()),
                }
            }
            Self::Supplied {
                approx,
                matrix,
                inverse: None,
            } => {
                stats.inverse_builds += 1;
                Self::Supplied {
                    approx,
                    matrix,
                    inverse: Some(matrix.invert()),
                }
            }
            other => other,
        }
    }

    pub(crate) fn normalized_params(&self) -> Option<&Normalized> {
        match self {
            Self::Stale => None,
            Self::Normalized(n) | Self::Built { normalized: n, .. } => Some(n),
            Self::Supplied { approx, .. } => Some(approx),
        }
    }

    pub(crate) fn matrix(&self) -> Option<&Mat34> {
        match self {
            Self::Built { matrix, .. } | Self::Supplied { matrix, .. } => Some(matrix),
            Self::Stale | Self::Normalized(_) => None,
        }
    }

    pub(crate) fn inverse(&self) -> Option<&Mat34> {
        match self {
            Self::Built { inverse, .. } | Self::Supplied { inverse, .. } => inverse.as_ref(),
            Self::Stale | Self::Normalized(_) => None,
        }
    }

    pub(crate) fn authority(&self) -> Option<MatrixAuthority> {
        match self {
            Self::Stale => None,
            Self::Normalized(n) | Self::Built { normalized: n, .. } => Some(if n.needs_matrix() {
                MatrixAuthority::Derived
            } else {
                MatrixAuthority::Decomposition
            }),
            Self::Supplied { .. } => Some(MatrixAuthority::Supplied),
        }
    }
}

/// Build the dense matrix for a normalized decomposition.
///
/// `L = Rz·Ry·Rx·diag(scale)`, translation column from the normalized
/// translation. Rotation entries within [`Tolerance::LINEAR`] of zero are
/// snapped to zero before scaling; if that leaves the linear part diagonal, the returned
/// decomposition is demoted to a rotation-free one that the per-axis path
/// can serve. Demotion never raises the authority.
#[must_use]
pub(crate) fn build_matrix(normalized: &Normalized) -> (Normalized, Mat34) {
    let (sx, cx) = normalized.rotation_radians.x.sin_cos();
    let (sy, cy) = normalized.rotation_radians.y.sin_cos();
    let (sz, cz) = normalized.rotation_radians.z.sin_cos();

    let rx = [[1.0, 0.0, 0.0], [0.0, cx, -sx], [0.0, sx, cx]];
    let ry = [[cy, 0.0, sy], [0.0, 1.0, 0.0], [-sy, 0.0, cy]];
    let rz = [[cz, -sz, 0.0], [sz, cz, 0.0], [0.0, 0.0, 1.0]];
    let r = mul3(&rz, &mul3(&ry, &rx));

    // Only the rotation factors are snapped; a tiny active scale must
    // survive into the matrix.
    let tol = Tolerance::LINEAR;
    let mut linear = [[0.0; 3]; 3];
    for (i, row) in linear.iter_mut().enumerate() {
        for (j, v) in row.iter_mut().enumerate() {
            *v = tol.snap_zero(r[i][j]) * normalized.scale[j];
        }
    }
    let matrix = Mat34::from_linear_translation(linear, normalized.translation);
    log::trace!("built transform matrix:\n{matrix:.6}");

    let mut out = *normalized;
    if out.needs_matrix() && is_diagonal(&matrix) {
        log::debug!(
            "rotation {} cancelled out, demoting to per-axis transform",
            out.rotate_enabled
        );
        out.rotation_degrees = Vec3::zero();
        out.rotation_radians = Vec3::zero();
        out.rotation_pivot = [0.0; 2];
        out.rotate_enabled = AxisMask::NONE;
        out.scale = matrix.diagonal();
        out.translation = matrix.translation();
        out.refresh_linear_masks();
    }
    (out, matrix)
}

fn mul3(a: &[[f64; 3]; 3], b: &[[f64; 3]; 3]) -> [[f64; 3]; 3] {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, v) in row.iter_mut().enumerate() {
            *v = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
        }
    }
    out
}

fn is_diagonal(matrix: &Mat34) -> bool {
    (0..3).all(|i| (0..3).all(|j| i == j || matrix.get(i, j) == 0.0))
}

/// Display-only decomposition of a dense matrix: diagonal as scale,
/// translation column as translation, rotation zero. An axis is marked as
/// rotating when the plane it turns has off-diagonal coupling.
#[must_use]
pub(crate) fn approximate_normalized(matrix: &Mat34) -> Normalized {
    let tol = Tolerance::LINEAR;
    let mut out = Normalized {
        scale: matrix.diagonal(),
        translation: matrix.translation(),
        ..Normalized::IDENTITY
    };
    out.refresh_linear_masks();
    for axis in Axis::ALL {
        let (a, b) = axis.orthogonal();
        if !tol.is_zero(matrix.get(a, b)) || !tol.is_zero(matrix.get(b, a)) {
            out.rotate_enabled.insert(axis);
        }
    }
    out
}

/// A resolved, cache-free way to move points in one direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Applier {
    /// `p * scale + translation`.
    PerAxis { scale: Vec3, translation: Vec3 },
    /// `(p - translation) / scale`. Zero scale yields ±inf or NaN.
    PerAxisInverse { scale: Vec3, translation: Vec3 },
    Dense(Mat34),
}

impl Applier {
    #[must_use]
    pub(crate) fn point(&self, p: Vec3) -> Vec3 {
        match self {
            Self::PerAxis { scale, translation } => Vec3::new(
                p.x * scale.x + translation.x,
                p.y * scale.y + translation.y,
                p.z * scale.z + translation.z,
            ),
            Self::PerAxisInverse { scale, translation } => Vec3::new(
                (p.x - translation.x) / scale.x,
                (p.y - translation.y) / scale.y,
                (p.z - translation.z) / scale.z,
            ),
            Self::Dense(m) => m.transform_point(p),
        }
    }

    #[must_use]
    pub(crate) fn vector(&self, v: Vec3) -> Vec3 {
        match self {
            Self::PerAxis { scale, .. } => v.mul_elem(*scale),
            Self::PerAxisInverse { scale, .. } => v.div_elem(*scale),
            Self::Dense(m) => m.transform_vector(v),
        }
    }
}
