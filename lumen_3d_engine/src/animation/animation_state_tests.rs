use std::sync::Arc;
use glam::{Quat, Vec3};
use super::*;

fn animation() -> Arc<Animation> {
    let mut anim = Animation::new();
    let hip = anim.add_bone("hip");
    let arm = anim.add_bone("arm");
    anim.add_bone_frame(hip, 0, Bone { pos: Vec3::ZERO, rot: Quat::IDENTITY });
    anim.add_bone_frame(hip, 100, Bone { pos: Vec3::new(10.0, 0.0, 0.0), rot: Quat::IDENTITY });
    anim.add_bone_frame(arm, 0, Bone::default());
    Arc::new(anim)
}

// ============================================================================
// Range and playback
// ============================================================================

#[test]
fn test_new_state_covers_full_range() {
    let state = AnimationState::new(animation());
    assert_eq!(state.range_from(), 0);
    assert_eq!(state.range_to(), 100);
    assert_eq!(state.speed(), 1.0);
    assert_eq!(state.weight(), 1.0);
    assert!(state.looped());
}

#[test]
fn test_set_range_clamps_to_duration() {
    let mut state = AnimationState::new(animation());
    state.set_range(20, 500);
    assert_eq!((state.range_from(), state.range_to()), (20, 100));
}

#[test]
fn test_set_range_orders_bounds() {
    let mut state = AnimationState::new(animation());
    state.set_range(80, 40);
    assert_eq!((state.range_from(), state.range_to()), (40, 40));
}

#[test]
fn test_animation_time_loops_inside_range() {
    let mut state = AnimationState::new(animation());
    state.set_range(20, 60);
    assert_eq!(state.animation_time(0), 20);
    assert_eq!(state.animation_time(50), 30);
}

#[test]
fn test_animation_time_clamps_without_loop() {
    let mut state = AnimationState::new(animation());
    state.set_looped(false);
    assert_eq!(state.animation_time(250), 100);
}

#[test]
fn test_speed_scales_time() {
    let mut state = AnimationState::new(animation());
    state.set_speed(2.0);
    assert_eq!(state.animation_time(25), 50);
    assert_eq!(state.bone(0, 25).pos, Vec3::new(5.0, 0.0, 0.0));
}

// ============================================================================
// Mask
// ============================================================================

#[test]
fn test_all_bones_enabled_by_default() {
    let state = AnimationState::new(animation());
    assert!(state.is_bone_enabled("hip"));
    assert!(state.is_bone_enabled("arm"));
}

#[test]
fn test_mask_all_disabled_then_enable_one() {
    let mut state = AnimationState::new(animation());
    state.mask_all(false);
    assert!(!state.is_bone_enabled("hip"));

    state.add_mask("hip", true);
    assert!(state.is_bone_enabled("hip"));
    assert!(!state.is_bone_enabled("arm"));
}

#[test]
fn test_disable_one_bone() {
    let mut state = AnimationState::new(animation());
    state.add_mask("arm", false);

    assert!(state.is_bone_enabled("hip"));
    assert!(!state.is_bone_enabled("arm"));

    state.mask_all(true);
    assert!(state.is_bone_enabled("arm"));
}

#[test]
fn test_enable_without_mask_is_noop() {
    let mut state = AnimationState::new(animation());
    let version = state.version();
    state.add_mask("hip", true);
    assert_eq!(state.version(), version);
}

#[test]
fn test_unknown_bone_mask_is_ignored() {
    let mut state = AnimationState::new(animation());
    let version = state.version();
    state.add_mask("tail", false);
    assert_eq!(state.version(), version);
    assert!(state.is_bone_enabled("hip"));
}

#[test]
fn test_version_changes_on_mask_change() {
    let mut state = AnimationState::new(animation());
    let v0 = state.version();
    state.mask_all(false);
    let v1 = state.version();
    state.mask_all(true);
    let v2 = state.version();

    assert_ne!(v0, v1);
    assert_ne!(v1, v2);
}
