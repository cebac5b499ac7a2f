mod matrix;
mod tolerance;
mod vector;

pub use matrix::{AffineMatrix, Mat34, Mat34f, MatrixError};
pub use tolerance::Tolerance;
pub use vector::{Axis, Vec3, Vec3f, Vector3};
