//! Tests for setters, validity tracking and the generation counter.

use crate::geom::{Axis, Mat34, Vec3};
use crate::transform::{MatrixAuthority, TransformContext, TransformState};

use super::assert_close;

#[test]
fn test_new_state_is_identity_and_stale() {
    let mut t = TransformState::new();
    assert_eq!(t.generation(), 0);
    assert!(t.base_params().is_identity());
    assert!(!t.is_decomposition_valid());
    assert!(!t.is_matrix_valid());
    assert!(!t.is_inverse_valid());

    assert_eq!(t.matrix_authority(), MatrixAuthority::Decomposition);
    assert!(t.is_decomposition_valid());
    assert!(!t.is_matrix_valid());
}

#[test]
fn test_every_setter_bumps_generation() {
    let mut t = TransformState::new();
    t.set_scale(Some(Vec3::new(2.0, 2.0, 2.0)), None);
    assert_eq!(t.generation(), 1);
    t.set_shift(None);
    t.set_rotation(None, None, None);
    t.set_axis_rotation(Axis::X, 10.0, 0.0, None);
    t.set_translation(Some(Vec3::new(1.0, 0.0, 0.0)));
    t.set_from_matrix(Mat34::identity());
    assert_eq!(t.generation(), 6);
}

#[test]
fn test_setter_invalidates_caches() {
    let mut t = TransformState::new();
    t.set_axis_rotation(Axis::Z, 45.0, 0.0, None);
    let _ = t.transform_inverse(Vec3::new(1.0, 0.0, 0.0));
    assert!(t.is_matrix_valid());
    assert!(t.is_inverse_valid());

    t.set_translation(Some(Vec3::new(0.0, 0.0, 1.0)));
    assert!(!t.is_decomposition_valid());
    assert!(!t.is_matrix_valid());
    assert!(!t.is_inverse_valid());
}

#[test]
fn test_per_axis_transform_builds_no_matrix() {
    let mut t = TransformState::new();
    t.set_scale(Some(Vec3::new(2.0, 3.0, 4.0)), None);
    t.set_translation(Some(Vec3::new(1.0, 1.0, 1.0)));
    let _ = t.transform_forward(Vec3::new(1.0, 1.0, 1.0));
    let _ = t.transform_inverse(Vec3::new(1.0, 1.0, 1.0));
    assert_eq!(t.matrix_authority(), MatrixAuthority::Decomposition);
    assert!(!t.is_matrix_valid());
    assert!(!t.is_inverse_valid());
}

#[test]
fn test_rotation_requires_derived_matrix() {
    let mut t = TransformState::new();
    t.set_axis_rotation(Axis::X, 30.0, 0.0, None);
    assert_eq!(t.matrix_authority(), MatrixAuthority::Derived);
    assert!(!t.is_matrix_valid());

    let _ = t.transform_forward(Vec3::new(0.0, 1.0, 0.0));
    assert!(t.is_matrix_valid());
    assert!(!t.is_inverse_valid());
    let _ = t.transform_inverse(Vec3::new(0.0, 1.0, 0.0));
    assert!(t.is_inverse_valid());
}

#[test]
fn test_matrix_is_built_once_per_generation() {
    let mut t = TransformState::new();
    t.set_axis_rotation(Axis::Y, 20.0, 0.0, Some(Vec3::new(1.0, 0.0, 1.0)));
    let mut ctx = TransformContext::new();
    for i in 0..5 {
        let p = Vec3::new(f64::from(i), 0.0, 0.0);
        let _ = t.transform_forward_with_context(p, &mut ctx);
        let _ = t.transform_inverse_with_context(p, &mut ctx);
    }
    assert_eq!(ctx.stats.normalizations, 1);
    assert_eq!(ctx.stats.matrix_builds, 1);
    assert_eq!(ctx.stats.inverse_builds, 1);
    assert_eq!(ctx.stats.forward_calls, 5);
    assert_eq!(ctx.stats.inverse_calls, 5);

    t.set_axis_rotation(Axis::Y, 25.0, 0.0, None);
    let _ = t.transform_forward_with_context(Vec3::zero(), &mut ctx);
    assert_eq!(ctx.stats.matrix_builds, 2);
}

#[test]
fn test_half_turn_demotes_to_decomposition() {
    let mut t = TransformState::new();
    t.set_axis_rotation(Axis::Z, 180.0, 0.0, None);
    assert_eq!(t.matrix_authority(), MatrixAuthority::Derived);

    // Building the matrix shows the rotation is a pure axis flip.
    assert!(!t.is_matrix_valid());
    let _ = t.matrix();
    assert!(t.is_matrix_valid());
    let q = t.transform_forward(Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(q, Vec3::new(-1.0, -2.0, 3.0));
    assert_eq!(t.matrix_authority(), MatrixAuthority::Decomposition);
    assert!(t.normalized().rotate_enabled.is_empty());
    assert_eq!(t.normalized().scale, Vec3::new(-1.0, -1.0, 1.0));
}

#[test]
fn test_forced_build_keeps_decomposition_authority() {
    let mut t = TransformState::new();
    t.set_scale(Some(Vec3::new(2.0, 1.0, 1.0)), None);
    let m = t.matrix();
    assert_eq!(m, Mat34::from_scale(Vec3::new(2.0, 1.0, 1.0)));
    assert!(t.is_matrix_valid());
    assert_eq!(t.matrix_authority(), MatrixAuthority::Decomposition);
}

#[test]
fn test_set_from_matrix_is_authoritative() {
    let m = Mat34::from_rows([
        [0.0, -2.0, 0.0, 1.0],
        [2.0, 0.0, 0.0, 2.0],
        [0.0, 0.0, 2.0, 3.0],
    ]);
    let mut t = TransformState::from_matrix(m);
    assert_eq!(t.matrix_authority(), MatrixAuthority::Supplied);
    assert!(t.is_matrix_valid());
    assert!(!t.is_decomposition_valid());
    assert_eq!(t.matrix(), m);

    // Display-only summary.
    assert_eq!(t.base_params().scale, Vec3::new(0.0, 0.0, 2.0));
    assert_eq!(t.base_params().translation, Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(t.normalized().rotation_degrees, Vec3::zero());

    assert_eq!(t.transform_forward(Vec3::new(1.0, 0.0, 0.0)), Vec3::new(1.0, 4.0, 3.0));
    assert_close(t.transform_inverse(Vec3::new(1.0, 4.0, 3.0)), Vec3::new(1.0, 0.0, 0.0), 1e-12);
}

#[test]
fn test_setter_after_supplied_matrix_uses_approximation() {
    let mut m = Mat34::from_scale(Vec3::new(2.0, 2.0, 2.0));
    m.set_translation(Vec3::new(5.0, 0.0, 0.0));
    let mut t = TransformState::from_matrix(m);

    t.set_translation(None);
    assert_eq!(t.matrix_authority(), MatrixAuthority::Decomposition);
    assert_eq!(t.transform_forward(Vec3::new(1.0, 1.0, 1.0)), Vec3::new(2.0, 2.0, 2.0));
}

#[test]
fn test_try_inverse_reports_singular() {
    let mut t = TransformState::new();
    t.set_scale(Some(Vec3::new(1.0, 0.0, 1.0)), None);
    t.set_axis_rotation(Axis::Z, 30.0, 0.0, None);
    assert!(t.try_inverse_matrix().is_err());
    assert_eq!(t.inverse_matrix(), Mat34::zero());
}
