use glam::{Mat4, Quat, Vec3};
use super::*;

fn assert_close(a: Vec3, b: Vec3) {
    assert!((a - b).length() < 1e-5, "{:?} != {:?}", a, b);
}

// ============================================================================
// Inverse conversions
// ============================================================================

#[test]
fn test_default_is_identity() {
    let transform = Transform::default();
    assert_eq!(transform.matrix(), Mat4::IDENTITY);
    assert_eq!(transform.inverse_transform(Vec3::new(1.0, 2.0, 3.0)), Vec3::new(1.0, 2.0, 3.0));
}

#[test]
fn test_inverse_transform_removes_translation_rotation_scale() {
    let transform = Transform::new(
        Vec3::new(10.0, 0.0, 0.0),
        Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        Vec3::splat(2.0),
    );
    let local = Vec3::new(1.0, 2.0, 3.0);
    let world = transform.matrix().transform_point3(local);

    assert_close(transform.inverse_transform(world), local);
}

#[test]
fn test_inverse_rot_ignores_translation() {
    let transform = Transform::new(
        Vec3::new(5.0, 5.0, 5.0),
        Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
        Vec3::ONE,
    );

    assert_close(transform.inverse_rot(Vec3::Y), Vec3::X);
}

#[test]
fn test_inverse_rot_quat() {
    let rotation = Quat::from_rotation_x(0.7);
    let transform = Transform::new(Vec3::ZERO, rotation, Vec3::ONE);

    let local = transform.inverse_rot_quat(rotation);
    assert!(local.dot(Quat::IDENTITY).abs() > 0.9999);
}

#[test]
fn test_zero_scale_axis_is_left_alone() {
    let transform = Transform::new(Vec3::ZERO, Quat::IDENTITY, Vec3::new(2.0, 0.0, 1.0));
    assert_eq!(transform.inverse_transform(Vec3::new(4.0, 3.0, 1.0)), Vec3::new(2.0, 3.0, 1.0));
}

// ============================================================================
// Setters
// ============================================================================

#[test]
fn test_setters() {
    let mut transform = Transform::default();
    transform.set_position(Vec3::X);
    transform.set_rotation(Quat::from_rotation_y(1.0));
    transform.set_scale(Vec3::splat(3.0));

    assert_eq!(transform.position(), Vec3::X);
    assert_eq!(transform.rotation(), Quat::from_rotation_y(1.0));
    assert_eq!(transform.scale(), Vec3::splat(3.0));
}
