#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::many_single_char_names)]

//! Affine-transform engine.
//!
//! A transform is kept as editable scale / rotation / translation
//! parameters. A dense 3×4 matrix and its inverse are derived lazily, only
//! when the per-axis decomposition cannot express the transform exactly,
//! and cached until the next edit.
//!
//! - [`geom`]: vector and matrix value types, tolerances.
//! - [`transform`]: [`TransformState`](transform::TransformState) and its
//!   normalizer, caches, composition and diagnostics.
//!
//! The engine logs through the `log` facade and installs no logger itself.

pub mod geom;
pub mod transform;

pub use geom::{AffineMatrix, Axis, Mat34, Mat34f, MatrixError, Tolerance, Vec3, Vec3f, Vector3};
pub use transform::{MatrixAuthority, PrintFlags, TransformContext, TransformState, TransformStats};
