//! Dense 3×4 affine matrix.
//!
//! The matrix is stored row-major: three rows of `[linear | translation]`.
//!
//! ```text
//! | m00 m01 m02 | t0 |
//! | m10 m11 m12 | t1 |
//! | m20 m21 m22 | t2 |
//! ```
//!
//! Applying the matrix to a point computes `row_i · point + t_i`. Vectors
//! (directions) skip the translation column.

use std::fmt;
use std::ops::Mul;

use num_traits::Float;

use super::tolerance::Tolerance;
use super::vector::Vector3;

/// Errors reported by the fallible matrix operations.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum MatrixError {
    #[error("matrix is singular (determinant {determinant:e})")]
    Singular { determinant: f64 },
    #[error("matrix contains non-finite entries")]
    NonFinite,
}

/// Affine transform as a 3×4 row-major matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineMatrix<F> {
    m: [[F; 4]; 3],
}

/// Double-precision matrix, the engine's working type.
pub type Mat34 = AffineMatrix<f64>;

/// Single-precision matrix, used at the boundary only.
pub type Mat34f = AffineMatrix<f32>;

impl<F: Float> AffineMatrix<F> {
    #[must_use]
    pub const fn from_rows(m: [[F; 4]; 3]) -> Self {
        Self { m }
    }

    #[must_use]
    pub fn identity() -> Self {
        let o = F::one();
        let z = F::zero();
        Self {
            m: [[o, z, z, z], [z, o, z, z], [z, z, o, z]],
        }
    }

    /// All twelve entries zero.
    #[must_use]
    pub fn zero() -> Self {
        Self {
            m: [[F::zero(); 4]; 3],
        }
    }

    pub fn setup_identity(&mut self) {
        *self = Self::identity();
    }

    pub fn clear(&mut self) {
        *self = Self::zero();
    }

    /// Construct from a 3×3 linear part (rows) and a translation column.
    #[must_use]
    pub fn from_linear_translation(linear: [[F; 3]; 3], translation: Vector3<F>) -> Self {
        let mut m = [[F::zero(); 4]; 3];
        for (row, lin) in m.iter_mut().zip(linear.iter()) {
            row[..3].copy_from_slice(lin);
        }
        m[0][3] = translation.x;
        m[1][3] = translation.y;
        m[2][3] = translation.z;
        Self { m }
    }

    #[must_use]
    pub fn from_translation(translation: Vector3<F>) -> Self {
        let mut out = Self::identity();
        out.set_translation(translation);
        out
    }

    #[must_use]
    pub fn from_scale(scale: Vector3<F>) -> Self {
        let mut out = Self::identity();
        out.m[0][0] = scale.x;
        out.m[1][1] = scale.y;
        out.m[2][2] = scale.z;
        out
    }

    /// Access the raw row data.
    #[must_use]
    pub const fn rows(&self) -> &[[F; 4]; 3] {
        &self.m
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> F {
        self.m[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: F) {
        self.m[row][col] = value;
    }

    #[must_use]
    pub fn translation(&self) -> Vector3<F> {
        Vector3::new(self.m[0][3], self.m[1][3], self.m[2][3])
    }

    pub fn set_translation(&mut self, t: Vector3<F>) {
        self.m[0][3] = t.x;
        self.m[1][3] = t.y;
        self.m[2][3] = t.z;
    }

    /// Diagonal of the linear part.
    #[must_use]
    pub fn diagonal(&self) -> Vector3<F> {
        Vector3::new(self.m[0][0], self.m[1][1], self.m[2][2])
    }

    #[must_use]
    pub fn transform_point(&self, p: Vector3<F>) -> Vector3<F> {
        let m = &self.m;
        Vector3::new(
            m[0][0] * p.x + m[0][1] * p.y + m[0][2] * p.z + m[0][3],
            m[1][0] * p.x + m[1][1] * p.y + m[1][2] * p.z + m[1][3],
            m[2][0] * p.x + m[2][1] * p.y + m[2][2] * p.z + m[2][3],
        )
    }

    /// Apply the linear part only.
    #[must_use]
    pub fn transform_vector(&self, v: Vector3<F>) -> Vector3<F> {
        let m = &self.m;
        Vector3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }

    /// `a ∘ b`: applying the result equals applying `b`, then `a`.
    #[must_use]
    pub fn multiply(a: &Self, b: &Self) -> Self {
        let mut out = Self::zero();
        for i in 0..3 {
            for j in 0..3 {
                out.m[i][j] = a.m[i][0] * b.m[0][j] + a.m[i][1] * b.m[1][j] + a.m[i][2] * b.m[2][j];
            }
            out.m[i][3] =
                a.m[i][0] * b.m[0][3] + a.m[i][1] * b.m[1][3] + a.m[i][2] * b.m[2][3] + a.m[i][3];
        }
        out
    }

    /// Determinant of the 3×3 linear part.
    #[must_use]
    pub fn determinant(&self) -> F {
        let m = &self.m;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.m.iter().flatten().all(|v| v.is_finite())
    }

    /// Inverse via the adjugate of the linear part.
    ///
    /// # Errors
    /// [`MatrixError::NonFinite`] when an entry is NaN or infinite,
    /// [`MatrixError::Singular`] when `|det| < Tolerance::SINGULAR`.
    pub fn try_invert(&self) -> Result<Self, MatrixError> {
        if !self.is_finite() {
            return Err(MatrixError::NonFinite);
        }
        let det = self.determinant();
        let det_f64 = det.to_f64().unwrap_or(f64::NAN);
        if !det_f64.is_finite() || Tolerance::SINGULAR.is_zero(det_f64) {
            return Err(MatrixError::Singular {
                determinant: det_f64,
            });
        }

        let m = &self.m;
        let inv_det = F::one() / det;
        let linear = [
            [
                (m[1][1] * m[2][2] - m[1][2] * m[2][1]) * inv_det,
                (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv_det,
                (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv_det,
            ],
            [
                (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * inv_det,
                (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv_det,
                (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * inv_det,
            ],
            [
                (m[1][0] * m[2][1] - m[1][1] * m[2][0]) * inv_det,
                (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * inv_det,
                (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * inv_det,
            ],
        ];

        let mut out = Self::from_linear_translation(linear, Vector3::zero());
        let t = out.transform_vector(self.translation());
        out.set_translation(-t);
        Ok(out)
    }

    /// Legacy inversion: a singular or non-finite matrix yields the zero
    /// matrix instead of an error.
    #[must_use]
    pub fn invert(&self) -> Self {
        match self.try_invert() {
            Ok(inv) => inv,
            Err(err) => {
                log::warn!("affine inversion fell back to zero matrix: {err}");
                Self::zero()
            }
        }
    }

    /// Convert to another float width.
    #[must_use]
    pub fn cast<G: Float>(&self) -> AffineMatrix<G> {
        let mut out = AffineMatrix::<G>::zero();
        for (dst, src) in out.m.iter_mut().zip(self.m.iter()) {
            for (d, s) in dst.iter_mut().zip(src.iter()) {
                *d = G::from(*s).unwrap_or_else(G::nan);
            }
        }
        out
    }

    /// Largest absolute entry difference against `other`.
    #[must_use]
    pub fn max_abs_diff(&self, other: &Self) -> F {
        self.m
            .iter()
            .flatten()
            .zip(other.m.iter().flatten())
            .fold(F::zero(), |acc, (a, b)| acc.max((*a - *b).abs()))
    }
}

impl<F: Float> Default for AffineMatrix<F> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<F: Float> Mul for AffineMatrix<F> {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        Self::multiply(&self, &rhs)
    }
}

impl<F: Float + fmt::Display> fmt::Display for AffineMatrix<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = f.precision().unwrap_or(6);
        for (i, row) in self.m.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(
                f,
                "{:11.p$} {:11.p$} {:11.p$} | {:11.p$}",
                row[0], row[1], row[2], row[3]
            )?;
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
