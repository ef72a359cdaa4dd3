/// Unit tests for texture.rs
///
/// Uses MockGraphicsDevice, no GPU required.

use super::*;
use crate::graphics_device::mock_graphics_device::{MockGraphicsDevice, DeviceCommand};

fn desc(width: u32, height: u32, kind: TextureKind, data: Option<Vec<u8>>) -> TextureDesc {
    TextureDesc {
        width,
        height,
        format: TextureFormat::R8G8B8A8_UNORM,
        kind,
        data,
    }
}

// ============================================================================
// Creation
// ============================================================================

#[test]
fn test_create_simple_texture() {
    let mut device = MockGraphicsDevice::new();
    let texture = Texture::create(&mut device, "diffuse", &desc(4, 2, TextureKind::Tex2D, Some(vec![0; 32]))).unwrap();

    assert_eq!(texture.name(), "diffuse");
    assert_eq!(texture.width(), 4);
    assert_eq!(texture.height(), 2);
    assert_eq!(texture.kind(), TextureKind::Tex2D);
    assert_eq!(texture.format(), TextureFormat::R8G8B8A8_UNORM);
    assert!(texture.is_valid());
}

#[test]
fn test_create_cube_texture() {
    let mut device = MockGraphicsDevice::new();
    let texture = Texture::create(&mut device, "env", &desc(2, 2, TextureKind::Cube, Some(vec![0; 2 * 2 * 4 * 6]))).unwrap();
    assert_eq!(texture.kind(), TextureKind::Cube);
}

#[test]
fn test_create_rejects_zero_size() {
    let mut device = MockGraphicsDevice::new();
    assert!(Texture::create(&mut device, "bad", &desc(0, 4, TextureKind::Tex2D, None)).is_err());
}

#[test]
fn test_create_rejects_non_square_cube() {
    let mut device = MockGraphicsDevice::new();
    assert!(Texture::create(&mut device, "bad", &desc(4, 2, TextureKind::Cube, None)).is_err());
}

#[test]
fn test_create_rejects_wrong_data_size() {
    let mut device = MockGraphicsDevice::new();
    let state = device.state();
    assert!(Texture::create(&mut device, "bad", &desc(4, 4, TextureKind::Tex2D, Some(vec![0; 10]))).is_err());
    assert!(state.lock().unwrap().textures.is_empty());
}

// ============================================================================
// Release
// ============================================================================

#[test]
fn test_release_is_idempotent() {
    let mut device = MockGraphicsDevice::new();
    let state = device.state();
    let mut texture = Texture::create(&mut device, "t", &desc(1, 1, TextureKind::Tex2D, None)).unwrap();

    texture.release(&mut device);
    texture.release(&mut device);

    assert!(!texture.is_valid());
    assert_eq!(texture.id(), None);
    let state = state.lock().unwrap();
    assert_eq!(state.count(|c| matches!(c, DeviceCommand::DestroyTexture(_))), 1);
    assert!(state.textures.is_empty());
}
