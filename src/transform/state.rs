use std::mem;

use crate::geom::{Axis, Mat34, MatrixError, Vec3, Vec3f};

use super::cache::{Applier, MatrixAuthority, Representation};
use super::context::{TransformContext, TransformStats};
use super::normalize::Normalized;
use super::params::BaseParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Build {
    Never,
    IfNeeded,
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Inverse,
}

/// A 3D affine transform kept in decomposed, editable form.
///
/// Setters edit the base parameters. Readers derive the normalized
/// decomposition, the dense matrix and its inverse on demand and cache
/// them until the next edit. Points are moved with the per-axis formula
/// whenever the decomposition is exact, otherwise with the dense matrix.
///
/// Reads that may fill a cache take `&mut self`. The type has no internal
/// synchronization.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransformState {
    params: BaseParams,
    repr: Representation,
    generation: u64,
}

impl TransformState {
    /// Identity transform.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_matrix(matrix: Mat34) -> Self {
        let mut out = Self::new();
        out.set_from_matrix(matrix);
        out
    }

    // ─────────────────────────────────────────────────────────────────────
    // Setters
    // ─────────────────────────────────────────────────────────────────────

    fn touch(&mut self) {
        self.repr = Representation::Stale;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Scale about `pivot`. `None` resets to 1 and the origin respectively.
    pub fn set_scale(&mut self, scale: Option<Vec3>, pivot: Option<Vec3>) {
        self.params.set_scale(scale, pivot);
        self.touch();
    }

    pub fn set_shift(&mut self, shift: Option<Vec3>) {
        self.params.set_shift(shift);
        self.touch();
    }

    /// Rotation about all three axes, sharing one pivot. Each axis angle is
    /// `degrees + radians` (converted).
    pub fn set_rotation(&mut self, degrees: Option<Vec3>, radians: Option<Vec3>, pivot: Option<Vec3>) {
        self.params.set_rotation(degrees, radians, pivot);
        self.touch();
    }

    /// Rotation about one axis with its own pivot. The other axes keep
    /// their angles and pivots.
    pub fn set_axis_rotation(&mut self, axis: Axis, degrees: f64, radians: f64, pivot: Option<Vec3>) {
        self.params.set_axis_rotation(axis, degrees, radians, pivot);
        self.touch();
    }

    pub fn set_translation(&mut self, translation: Option<Vec3>) {
        self.params.set_translation(translation);
        self.touch();
    }

    /// Make `matrix` the ground truth.
    ///
    /// The base parameters are replaced by a display-only approximation
    /// (diagonal as scale, translation column as translation). A later
    /// decomposed setter starts from that approximation and drops whatever
    /// the matrix held beyond it.
    pub fn set_from_matrix(&mut self, matrix: Mat34) {
        self.params = BaseParams::approximate_from_matrix(&matrix);
        self.repr = Representation::supplied(matrix);
        self.generation = self.generation.wrapping_add(1);
    }

    /// Scale by `factor` along `direction` through the origin, leaving the
    /// orthogonal plane alone. A zero-length direction leaves the state
    /// unchanged.
    pub fn set_axis_scale(&mut self, factor: f64, direction: Vec3) {
        let Some(d) = direction.normalized() else {
            log::warn!("set_axis_scale: degenerate direction {direction}, ignored");
            return;
        };

        // Rotation taking +z onto d: tilt from z by `polar`, then turn
        // around z by `azimuth`.
        let azimuth = d.y.atan2(d.x);
        let polar = d.x.hypot(d.y).atan2(d.z);
        let (sa, ca) = azimuth.sin_cos();
        let (sp, cp) = polar.sin_cos();
        let rz = Mat34::from_linear_translation(
            [[ca, -sa, 0.0], [sa, ca, 0.0], [0.0, 0.0, 1.0]],
            Vec3::zero(),
        );
        let ry = Mat34::from_linear_translation(
            [[cp, 0.0, sp], [0.0, 1.0, 0.0], [-sp, 0.0, cp]],
            Vec3::zero(),
        );
        let rotate = Mat34::multiply(&rz, &ry);
        // Transpose of `rotate`: ry(-polar) then rz(-azimuth).
        let unrotate = Mat34::multiply(
            &Mat34::from_linear_translation([[cp, 0.0, -sp], [0.0, 1.0, 0.0], [sp, 0.0, cp]], Vec3::zero()),
            &Mat34::from_linear_translation([[ca, sa, 0.0], [-sa, ca, 0.0], [0.0, 0.0, 1.0]], Vec3::zero()),
        );
        let stretch = Mat34::from_scale(Vec3::new(1.0, 1.0, factor));

        let matrix = Mat34::multiply(&rotate, &Mat34::multiply(&stretch, &unrotate));
        self.set_from_matrix(matrix);
    }

    /// Rotate by `degrees + radians` around the line through `point1` and
    /// `point2` (right-handed about `point2 - point1`). Coincident points
    /// leave the state unchanged.
    pub fn set_rotation_around_line(&mut self, degrees: f64, radians: f64, point1: Vec3, point2: Vec3) {
        let Some(d) = (point2 - point1).normalized() else {
            log::warn!("set_rotation_around_line: degenerate line {point1} - {point2}, ignored");
            return;
        };
        let theta = (degrees + radians.to_degrees()).to_radians();
        let (s, c) = theta.sin_cos();
        let t = 1.0 - c;

        // Rodrigues: R = d·dᵗ(1 - cos) + I·cos + [d]× sin
        let linear = [
            [d.x * d.x * t + c, d.x * d.y * t - d.z * s, d.x * d.z * t + d.y * s],
            [d.y * d.x * t + d.z * s, d.y * d.y * t + c, d.y * d.z * t - d.x * s],
            [d.z * d.x * t - d.y * s, d.z * d.y * t + d.x * s, d.z * d.z * t + c],
        ];
        let mut matrix = Mat34::from_linear_translation(linear, Vec3::zero());
        let fixed = matrix.transform_vector(point1);
        matrix.set_translation(point1 - fixed);
        self.set_from_matrix(matrix);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────

    /// Bumped on every edit. Compare against a stored value to detect that
    /// externally cached results are stale.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub const fn base_params(&self) -> &BaseParams {
        &self.params
    }

    #[must_use]
    pub fn is_decomposition_valid(&self) -> bool {
        matches!(
            self.repr,
            Representation::Normalized(_) | Representation::Built { .. }
        )
    }

    #[must_use]
    pub fn is_matrix_valid(&self) -> bool {
        self.repr.matrix().is_some()
    }

    #[must_use]
    pub fn is_inverse_valid(&self) -> bool {
        self.repr.inverse().is_some()
    }

    /// The dense matrix if one is cached, without building it.
    #[must_use]
    pub fn cached_matrix(&self) -> Option<&Mat34> {
        self.repr.matrix()
    }

    #[must_use]
    pub fn cached_inverse(&self) -> Option<&Mat34> {
        self.repr.inverse()
    }

    /// Normalized decomposition. Approximate when the authority is
    /// [`MatrixAuthority::Supplied`].
    pub fn normalized(&mut self) -> &Normalized {
        self.prepare(&mut TransformStats::default(), Build::Never);
        self.repr.normalized_params().unwrap_or(&Normalized::IDENTITY)
    }

    /// Authority as decided by normalization, or lowered by a matrix build
    /// that found the rotation negligible. Does not build the matrix.
    pub fn matrix_authority(&mut self) -> MatrixAuthority {
        self.prepare(&mut TransformStats::default(), Build::Never);
        self.repr.authority().unwrap_or(MatrixAuthority::Decomposition)
    }

    /// The dense matrix, built if necessary.
    pub fn matrix(&mut self) -> Mat34 {
        self.matrix_with_context(&mut TransformContext::new())
    }

    pub fn matrix_with_context(&mut self, ctx: &mut TransformContext) -> Mat34 {
        self.prepare(&mut ctx.stats, Build::Always);
        self.repr.matrix().copied().unwrap_or_default()
    }

    /// The cached inverse. A singular matrix yields the zero matrix.
    pub fn inverse_matrix(&mut self) -> Mat34 {
        self.inverse_matrix_with_context(&mut TransformContext::new())
    }

    pub fn inverse_matrix_with_context(&mut self, ctx: &mut TransformContext) -> Mat34 {
        self.prepare_inverse(&mut ctx.stats);
        self.repr.inverse().copied().unwrap_or_else(Mat34::zero)
    }

    /// The inverse, or the reason it does not exist.
    ///
    /// # Errors
    /// [`MatrixError::Singular`] or [`MatrixError::NonFinite`] from
    /// [`Mat34::try_invert`].
    pub fn try_inverse_matrix(&mut self) -> Result<Mat34, MatrixError> {
        self.matrix().try_invert()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Cache preparation
    // ─────────────────────────────────────────────────────────────────────

    fn prepare(&mut self, stats: &mut TransformStats, build: Build) {
        let repr = mem::take(&mut self.repr).normalized(&self.params, stats);
        let build = match build {
            Build::Never => false,
            Build::IfNeeded => repr.normalized_params().is_some_and(Normalized::needs_matrix),
            Build::Always => true,
        };
        self.repr = if build { repr.built(stats) } else { repr };
    }

    fn prepare_inverse(&mut self, stats: &mut TransformStats) {
        self.prepare(stats, Build::Always);
        self.repr = mem::take(&mut self.repr).inverted(stats);
    }

    /// Resolve how points move in `direction`, filling caches as needed.
    fn applier(&mut self, direction: Direction, stats: &mut TransformStats) -> Applier {
        self.prepare(stats, Build::IfNeeded);
        let per_axis = match &self.repr {
            Representation::Normalized(n) | Representation::Built { normalized: n, .. }
                if !n.needs_matrix() =>
            {
                Some((n.scale, n.translation))
            }
            _ => None,
        };
        if let Some((scale, translation)) = per_axis {
            return match direction {
                Direction::Forward => Applier::PerAxis { scale, translation },
                Direction::Inverse => Applier::PerAxisInverse { scale, translation },
            };
        }
        match direction {
            Direction::Forward => Applier::Dense(self.repr.matrix().copied().unwrap_or_default()),
            Direction::Inverse => {
                self.prepare_inverse(stats);
                Applier::Dense(self.repr.inverse().copied().unwrap_or_else(Mat34::zero))
            }
        }
    }

    fn run<R>(
        &mut self,
        direction: Direction,
        points: usize,
        ctx: &mut TransformContext,
        f: impl FnOnce(&Applier) -> R,
    ) -> R {
        let applier = self.applier(direction, &mut ctx.stats);
        match direction {
            Direction::Forward => ctx.stats.record_forward(points),
            Direction::Inverse => ctx.stats.record_inverse(points),
        }
        f(&applier)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Point transforms
    // ─────────────────────────────────────────────────────────────────────

    #[must_use]
    pub fn transform_forward(&mut self, p: Vec3) -> Vec3 {
        self.transform_forward_with_context(p, &mut TransformContext::new())
    }

    #[must_use]
    pub fn transform_forward_with_context(&mut self, p: Vec3, ctx: &mut TransformContext) -> Vec3 {
        self.run(Direction::Forward, 1, ctx, |a| a.point(p))
    }

    /// Undo [`transform_forward`](Self::transform_forward). The per-axis
    /// path divides by the scale unguarded: a zero scale yields ±inf or NaN
    /// on that axis.
    #[must_use]
    pub fn transform_inverse(&mut self, p: Vec3) -> Vec3 {
        self.transform_inverse_with_context(p, &mut TransformContext::new())
    }

    #[must_use]
    pub fn transform_inverse_with_context(&mut self, p: Vec3, ctx: &mut TransformContext) -> Vec3 {
        self.run(Direction::Inverse, 1, ctx, |a| a.point(p))
    }

    /// Single-precision boundary; computes in `f64`.
    #[must_use]
    pub fn transform_forward_f32(&mut self, p: Vec3f) -> Vec3f {
        self.transform_forward(p.into()).cast()
    }

    #[must_use]
    pub fn transform_inverse_f32(&mut self, p: Vec3f) -> Vec3f {
        self.transform_inverse(p.into()).cast()
    }

    /// Apply the linear part only, for directions.
    #[must_use]
    pub fn transform_vector_forward(&mut self, v: Vec3) -> Vec3 {
        self.run(Direction::Forward, 1, &mut TransformContext::new(), |a| a.vector(v))
    }

    #[must_use]
    pub fn transform_vector_inverse(&mut self, v: Vec3) -> Vec3 {
        self.run(Direction::Inverse, 1, &mut TransformContext::new(), |a| a.vector(v))
    }

    pub fn transform_forward_slice(&mut self, points: &mut [Vec3]) {
        self.transform_forward_slice_with_context(points, &mut TransformContext::new());
    }

    pub fn transform_forward_slice_with_context(&mut self, points: &mut [Vec3], ctx: &mut TransformContext) {
        self.run(Direction::Forward, points.len(), ctx, |a| apply_slice(a, points));
    }

    pub fn transform_inverse_slice(&mut self, points: &mut [Vec3]) {
        self.transform_inverse_slice_with_context(points, &mut TransformContext::new());
    }

    pub fn transform_inverse_slice_with_context(&mut self, points: &mut [Vec3], ctx: &mut TransformContext) {
        self.run(Direction::Inverse, points.len(), ctx, |a| apply_slice(a, points));
    }

    /// Transform points packed in a flat buffer: each point is three
    /// consecutive values starting every `stride` elements. A trailing
    /// chunk shorter than three values is left alone. `stride < 3` is
    /// rejected with a warning and leaves the buffer untouched.
    pub fn transform_forward_strided(&mut self, data: &mut [f64], stride: usize) {
        self.transform_forward_strided_with_context(data, stride, &mut TransformContext::new());
    }

    pub fn transform_forward_strided_with_context(
        &mut self,
        data: &mut [f64],
        stride: usize,
        ctx: &mut TransformContext,
    ) {
        self.strided(Direction::Forward, data, stride, ctx);
    }

    pub fn transform_inverse_strided(&mut self, data: &mut [f64], stride: usize) {
        self.transform_inverse_strided_with_context(data, stride, &mut TransformContext::new());
    }

    pub fn transform_inverse_strided_with_context(
        &mut self,
        data: &mut [f64],
        stride: usize,
        ctx: &mut TransformContext,
    ) {
        self.strided(Direction::Inverse, data, stride, ctx);
    }

    fn strided(&mut self, direction: Direction, data: &mut [f64], stride: usize, ctx: &mut TransformContext) {
        if stride < 3 {
            log::warn!("strided transform: stride {stride} is smaller than a point, ignored");
            return;
        }
        let points = data.chunks(stride).filter(|c| c.len() >= 3).count();
        self.run(direction, points, ctx, |a| apply_strided(a, data, stride));
    }

    // ─────────────────────────────────────────────────────────────────────
    // Composition
    // ─────────────────────────────────────────────────────────────────────

    /// `op(a) ∘ op(b)`: the result applies `op(b)` first, then `op(a)`,
    /// where `op` is either the transform or its inverse. The result is
    /// always matrix-authoritative.
    #[must_use]
    pub fn compose(a: &mut Self, b: &mut Self, use_inverse_of_a: bool, use_inverse_of_b: bool) -> Self {
        let mut dest = Self::new();
        dest.compose_from(a, b, use_inverse_of_a, use_inverse_of_b, &mut TransformContext::new());
        dest
    }

    /// Overwrite `self` with the composition of `a` and `b`. Bumps the
    /// generation of `self`.
    pub fn compose_from(
        &mut self,
        a: &mut Self,
        b: &mut Self,
        use_inverse_of_a: bool,
        use_inverse_of_b: bool,
        ctx: &mut TransformContext,
    ) {
        let op_a = if use_inverse_of_a {
            a.inverse_matrix_with_context(ctx)
        } else {
            a.matrix_with_context(ctx)
        };
        let op_b = if use_inverse_of_b {
            b.inverse_matrix_with_context(ctx)
        } else {
            b.matrix_with_context(ctx)
        };
        log::debug!(
            "composing transforms (generations {} and {}, inverse {use_inverse_of_a}/{use_inverse_of_b})",
            a.generation,
            b.generation
        );
        self.set_from_matrix(Mat34::multiply(&op_a, &op_b));
    }

    /// The transform that applies `self` first, then `other`.
    #[must_use]
    pub fn then(&mut self, other: &mut Self) -> Self {
        Self::compose(other, self, false, false)
    }
}

fn apply_chunk(applier: &Applier, chunk: &mut [f64]) {
    if chunk.len() >= 3 {
        let q = applier.point(Vec3::new(chunk[0], chunk[1], chunk[2]));
        chunk[0] = q.x;
        chunk[1] = q.y;
        chunk[2] = q.z;
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "parallel")] {
        use rayon::prelude::*;

        fn apply_slice(applier: &Applier, points: &mut [Vec3]) {
            points.par_iter_mut().for_each(|p| *p = applier.point(*p));
        }

        fn apply_strided(applier: &Applier, data: &mut [f64], stride: usize) {
            data.par_chunks_mut(stride).for_each(|chunk| apply_chunk(applier, chunk));
        }
    } else {
        fn apply_slice(applier: &Applier, points: &mut [Vec3]) {
            for p in points.iter_mut() {
                *p = applier.point(*p);
            }
        }

        fn apply_strided(applier: &Applier, data: &mut [f64], stride: usize) {
            for chunk in data.chunks_mut(stride) {
                apply_chunk(applier, chunk);
            }
        }
    }
}
