//! The affine-transform engine.
//!
//! [`TransformState`] stores scale, shift, per-axis rotation (each with its
//! own pivot) and translation as editable parameters. Three derived
//! representations are kept in sync lazily:
//!
//! 1. the normalized decomposition (`p' = R·S·p + T` with activity masks),
//! 2. the dense 3×4 matrix, built only when a rotation is active or when it
//!    is forced,
//! 3. the inverse matrix, built only for inverse transforms that cannot use
//!    the per-axis formula.
//!
//! A matrix supplied directly ([`TransformState::set_from_matrix`], the
//! arbitrary-axis constructors, [`TransformState::compose`]) becomes the
//! ground truth; the decomposition is then only a display summary.
//!
//! # Example
//!
//! ```ignore
//! use affine_engine::geom::{Axis, Vec3};
//! use affine_engine::transform::TransformState;
//!
//! let mut t = TransformState::new();
//! t.set_axis_rotation(Axis::Y, 90.0, 0.0, None);
//! let p = t.transform_forward(Vec3::new(1.0, 0.0, 0.0)); // (0, 0, -1)
//! let back = t.transform_inverse(p);
//! ```

mod cache;
mod context;
mod diagnostics;
mod normalize;
mod params;
mod state;

pub use cache::MatrixAuthority;
pub use context::{TransformContext, TransformStats};
pub use diagnostics::PrintFlags;
pub use normalize::{AxisMask, Normalized, normalize, wrap_degrees};
pub use params::{AxisRotation, BaseParams};
pub use state::TransformState;

#[cfg(test)]
mod tests;
