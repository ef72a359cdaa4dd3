use glam::{Quat, Vec3};
use super::*;

// ============================================================================
// Helper Functions
// ============================================================================

struct FrameDesc<'a> {
    name: &'a [u8],
    frame: u32,
    pos: [f32; 3],
    rot: [f32; 4],
    curve: [i8; 4],
}

fn header(frames_count: u32) -> Vec<u8> {
    let mut data = VMD_MAGIC.to_vec();
    data.extend_from_slice(&[0u8; 5]);
    data.extend_from_slice(&[0u8; 20]);
    data.extend_from_slice(&frames_count.to_le_bytes());
    data
}

fn push_frame(data: &mut Vec<u8>, desc: &FrameDesc) {
    let mut name = [0u8; 15];
    name[..desc.name.len()].copy_from_slice(desc.name);
    data.extend_from_slice(&name);
    data.extend_from_slice(&desc.frame.to_le_bytes());
    for v in desc.pos.iter().chain(desc.rot.iter()) {
        data.extend_from_slice(&v.to_le_bytes());
    }
    for _ in 0..4 {
        let mut block = [0u8; 16];
        for (i, c) in desc.curve.iter().enumerate() {
            block[i * 4] = *c as u8;
        }
        data.extend_from_slice(&block);
    }
}

fn linear_frame(name: &[u8], frame: u32, x: f32) -> FrameDesc<'_> {
    FrameDesc { name, frame, pos: [x, 0.0, 0.0], rot: [0.0, 0.0, 0.0, 1.0], curve: [20, 20, 107, 107] }
}

// ============================================================================
// Header validation
// ============================================================================

#[test]
fn test_frame_size_constant() {
    assert_eq!(VMD_FRAME_SIZE, 111);
}

#[test]
fn test_rejects_bad_magic() {
    let mut data = header(0);
    data[0] = b'X';
    assert!(matches!(load_vmd(&data, &AnimationImportConfig::default()), Err(Error::InvalidFormat(_))));
}

#[test]
fn test_rejects_short_file() {
    assert!(load_vmd(b"Vocaloid", &AnimationImportConfig::default()).is_err());
    assert!(load_vmd(&[], &AnimationImportConfig::default()).is_err());
}

#[test]
fn test_rejects_truncated_frames_before_parsing() {
    let mut data = header(2);
    push_frame(&mut data, &linear_frame(b"arm", 0, 1.0));
    // Second frame is missing one byte
    let mut second = Vec::new();
    push_frame(&mut second, &linear_frame(b"arm", 10, 2.0));
    data.extend_from_slice(&second[..second.len() - 1]);

    assert!(matches!(load_vmd(&data, &AnimationImportConfig::default()), Err(Error::InvalidFormat(_))));
}

#[test]
fn test_rejects_huge_frame_count() {
    let data = header(u32::MAX);
    assert!(load_vmd(&data, &AnimationImportConfig::default()).is_err());
}

#[test]
fn test_empty_motion() {
    let anim = load_vmd(&header(0), &AnimationImportConfig::default()).unwrap();
    assert_eq!(anim.bones_count(), 0);
    assert_eq!(anim.duration(), 0);
}

// ============================================================================
// Frame decoding
// ============================================================================

#[test]
fn test_frame_time_uses_ticks_per_frame() {
    let mut data = header(2);
    push_frame(&mut data, &linear_frame(b"arm", 0, 0.0));
    push_frame(&mut data, &linear_frame(b"arm", 3, 1.0));

    let anim = load_vmd(&data, &AnimationImportConfig::default()).unwrap();
    assert_eq!(anim.duration(), 180);

    let anim = load_vmd(&data, &AnimationImportConfig { ticks_per_frame: 1 }).unwrap();
    assert_eq!(anim.duration(), 3);
}

#[test]
fn test_coordinate_conversion() {
    let mut data = header(1);
    push_frame(&mut data, &FrameDesc {
        name: b"hip",
        frame: 0,
        pos: [1.0, 2.0, 3.0],
        rot: [0.1, 0.2, 0.3, 0.9],
        curve: [20, 20, 107, 107],
    });

    let anim = load_vmd(&data, &AnimationImportConfig::default()).unwrap();
    let idx = anim.bone_idx("hip").unwrap();
    let bone = anim.bone(idx, 0, false);

    assert_eq!(bone.pos, Vec3::new(1.0, 2.0, -3.0));
    assert_eq!(bone.rot, Quat::from_xyzw(-0.1, -0.2, 0.3, 0.9));
}

#[test]
fn test_names_are_cut_at_nul_and_grouped() {
    let mut data = header(3);
    push_frame(&mut data, &linear_frame(b"arm", 0, 0.0));
    push_frame(&mut data, &linear_frame(b"leg", 0, 0.0));
    push_frame(&mut data, &linear_frame(b"arm", 10, 1.0));

    let anim = load_vmd(&data, &AnimationImportConfig::default()).unwrap();
    assert_eq!(anim.bones_count(), 2);
    assert_eq!(anim.frames_count(anim.bone_idx("arm").unwrap()), 2);
}

#[test]
fn test_full_width_name() {
    let mut data = header(1);
    push_frame(&mut data, &linear_frame(b"abcdefghijklmno", 0, 0.0));

    let anim = load_vmd(&data, &AnimationImportConfig::default()).unwrap();
    assert_eq!(anim.bone_name(0), Some("abcdefghijklmno"));
}

#[test]
fn test_empty_name_is_a_bone() {
    let mut data = header(2);
    push_frame(&mut data, &linear_frame(b"", 5, 0.0));
    push_frame(&mut data, &linear_frame(b"", 10, 1.0));

    let anim = load_vmd(&data, &AnimationImportConfig::default()).unwrap();
    assert_eq!(anim.bones_count(), 1);
    assert_eq!(anim.bone_idx(""), Some(0));
    assert_eq!(anim.frames_count(0), 2);
    assert_eq!(anim.duration(), 600);
}

#[test]
fn test_non_utf8_names_stay_distinct() {
    let mut data = header(2);
    push_frame(&mut data, &linear_frame(&[0x83, 0x41], 0, 0.0));
    push_frame(&mut data, &linear_frame(&[0x83, 0x42], 0, 0.0));

    let anim = load_vmd(&data, &AnimationImportConfig::default()).unwrap();
    assert_eq!(anim.bones_count(), 2);
}

#[test]
fn test_interpolation_curves_are_scaled() {
    let mut data = header(2);
    push_frame(&mut data, &linear_frame(b"arm", 0, 0.0));
    push_frame(&mut data, &FrameDesc {
        name: b"arm",
        frame: 1,
        pos: [128.0, 0.0, 0.0],
        rot: [0.0, 0.0, 0.0, 1.0],
        curve: [64, 0, 127, 64],
    });

    let anim = load_vmd(&data, &AnimationImportConfig { ticks_per_frame: 100 }).unwrap();
    let x = anim.bone(0, 25, false).pos.x;
    let expected = Bezier::new(0.5, 0.0, 127.0 / 128.0, 0.5).calculate(0.25) * 128.0;
    assert!((x - expected).abs() < 1e-3);
    assert!(x < 32.0);
}
