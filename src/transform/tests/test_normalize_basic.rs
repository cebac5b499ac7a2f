//! Tests for reducing base parameters to the normalized decomposition.

use crate::geom::{Axis, Vec3};
use crate::transform::{AxisMask, BaseParams, Normalized, normalize, wrap_degrees};
use std::f64::consts::FRAC_PI_2;

use super::assert_close;

#[test]
fn test_identity_normalizes_to_identity() {
    let n = normalize(&BaseParams::default());
    assert_eq!(n, Normalized::IDENTITY);
    assert!(n.transform_enabled().is_empty());
    assert!(!n.needs_matrix());
}

#[test]
fn test_scale_near_one_is_snapped() {
    let mut p = BaseParams::default();
    p.set_scale(Some(Vec3::new(1.0 + 1e-12, 1.0 - 1e-10, 2.0)), None);
    let n = normalize(&p);
    assert_eq!(n.scale, Vec3::new(1.0, 1.0, 2.0));
    assert_eq!(n.scale_enabled, AxisMask::from_bits(0b100));
}

#[test]
fn test_scale_pivot_folds_into_translation() {
    let mut p = BaseParams::default();
    p.set_scale(Some(Vec3::new(2.0, 2.0, 1.0)), Some(Vec3::new(1.0, 3.0, 5.0)));
    p.set_shift(Some(Vec3::new(0.0, 0.0, 3.0)));
    let n = normalize(&p);

    // (1 - s) * pivot + shift
    assert_eq!(n.translation, Vec3::new(-1.0, -3.0, 3.0));
    assert_eq!(n.scale_enabled, AxisMask::from_bits(0b011));
    assert_eq!(n.translate_enabled, AxisMask::ALL);
}

#[test]
fn test_negligible_translation_is_inactive() {
    let mut p = BaseParams::default();
    p.set_translation(Some(Vec3::new(5e-10, -5e-10, 1.0)));
    let n = normalize(&p);
    assert_eq!(n.translation, Vec3::new(0.0, 0.0, 1.0));
    assert_eq!(n.translate_enabled, AxisMask::from_bits(0b100));
}

#[test]
fn test_wrap_degrees_range() {
    assert_eq!(wrap_degrees(190.0), -170.0);
    assert_eq!(wrap_degrees(-190.0), 170.0);
    assert_eq!(wrap_degrees(180.0), 180.0);
    assert_eq!(wrap_degrees(-180.0), 180.0);
    assert_eq!(wrap_degrees(540.0), 180.0);
    assert_eq!(wrap_degrees(360.0), 0.0);
    assert_eq!(wrap_degrees(45.0), 45.0);
}

#[test]
fn test_tiny_angle_is_inactive() {
    let mut p = BaseParams::default();
    p.set_axis_rotation(Axis::X, 5e-5, 0.0, None);
    p.set_axis_rotation(Axis::Y, 360.0, 0.0, None);
    let n = normalize(&p);
    assert!(n.rotate_enabled.is_empty());
    assert_eq!(n.rotation_degrees, Vec3::zero());
}

#[test]
fn test_radians_fold_into_degrees() {
    let mut p = BaseParams::default();
    p.set_axis_rotation(Axis::Z, 0.0, FRAC_PI_2, None);
    let n = normalize(&p);
    assert!((n.rotation_degrees.z - 90.0).abs() < 1e-12);
    assert!((n.rotation_radians.z - FRAC_PI_2).abs() < 1e-12);
    assert_eq!(n.rotate_enabled, AxisMask::from_bits(0b100));
    assert!(n.needs_matrix());
}

#[test]
fn test_rotation_pivot_rotates_translation() {
    let mut p = BaseParams::default();
    p.set_axis_rotation(Axis::Z, 90.0, 0.0, Some(Vec3::new(1.0, 0.0, 0.0)));
    let n = normalize(&p);
    // The origin turned a quarter around (1, 0) lands on (1, -1).
    assert_close(n.translation, Vec3::new(1.0, -1.0, 0.0), 1e-12);
    assert_eq!(n.translate_enabled, AxisMask::from_bits(0b011));
}

#[test]
fn test_pivot_on_rotation_axis_has_no_effect() {
    let mut p = BaseParams::default();
    p.set_axis_rotation(Axis::Z, 30.0, 0.0, Some(Vec3::new(0.0, 0.0, 9.0)));
    let n = normalize(&p);
    assert_eq!(n.translation, Vec3::zero());
    assert!(n.translate_enabled.is_empty());
}

#[test]
fn test_synthetic_pivot_averages_active_axes() {
    let mut p = BaseParams::default();
    p.set_axis_rotation(Axis::X, 10.0, 0.0, Some(Vec3::new(0.0, 2.0, 4.0)));
    p.set_axis_rotation(Axis::Z, 20.0, 0.0, Some(Vec3::new(6.0, 8.0, 0.0)));
    let n = normalize(&p);
    assert_eq!(n.rotate_enabled, AxisMask::from_bits(0b101));
    assert_eq!(n.rotation_pivot, [4.0, 6.0]);
}

#[test]
fn test_normalize_is_pure() {
    let mut p = BaseParams::default();
    p.set_scale(Some(Vec3::new(0.5, 2.0, -1.0)), Some(Vec3::new(1.0, 2.0, 3.0)));
    p.set_axis_rotation(Axis::Y, 33.0, 0.1, Some(Vec3::new(-1.0, 0.0, 4.0)));
    p.set_translation(Some(Vec3::new(7.0, 8.0, 9.0)));
    assert_eq!(normalize(&p), normalize(&p));
}

#[test]
fn test_axis_mask_display() {
    assert_eq!(AxisMask::from_bits(0b101).to_string(), "x-z");
    assert_eq!(AxisMask::NONE.to_string(), "---");
    assert_eq!(AxisMask::ALL.count(), 3);
}
