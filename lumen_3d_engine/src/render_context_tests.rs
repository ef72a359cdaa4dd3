use std::sync::{Arc, Mutex};
use glam::{Quat, Vec3};
use super::*;
use crate::graphics_device::mock_graphics_device::{DeviceCommand, MockDeviceState, MockGraphicsDevice};
use crate::graphics_device::{TextureDesc, TextureFormat, TextureKind};
use crate::render_object::{Framebuffer, VertexBuffer};
use crate::graphics_device::BufferUsage;
use crate::resource::Texture;

fn context() -> (RenderContext, Arc<Mutex<MockDeviceState>>) {
    let device = MockGraphicsDevice::new();
    let state = device.state();
    (RenderContext::new(Box::new(device), RenderContextConfig::default()), state)
}

fn color_texture(ctx: &mut RenderContext) -> Texture {
    Texture::create(ctx.device_mut(), "color", &TextureDesc {
        width: 32,
        height: 32,
        format: TextureFormat::R8G8B8A8_UNORM,
        kind: TextureKind::Tex2D,
        data: None,
    }).unwrap()
}

// ============================================================================
// State
// ============================================================================

#[test]
fn test_new_context_is_empty() {
    let (ctx, _state) = context();

    assert!(ctx.camera().is_none());
    assert!(ctx.skeleton().is_none());
    assert_eq!(*ctx.transform(), Transform::default());
    assert_eq!(ctx.frame_index(), 0);
    assert!(ctx.config().multisample);
    assert_eq!(ctx.objects().buffers_count(), 0);
    assert_eq!(ctx.objects().current_framebuffer(), None);
}

#[test]
fn test_setters() {
    let (mut ctx, _state) = context();
    let camera = Camera::new(Vec3::Z, Quat::IDENTITY, glam::Mat4::IDENTITY);
    let transform = Transform::new(Vec3::X, Quat::IDENTITY, Vec3::ONE);
    let skeleton = Arc::new(Skeleton::new());

    ctx.set_camera(Some(camera));
    ctx.set_transform(transform);
    ctx.set_skeleton(Some(skeleton.clone()));

    assert_eq!(ctx.camera(), Some(&camera));
    assert_eq!(*ctx.transform(), transform);
    assert!(Arc::ptr_eq(ctx.skeleton().unwrap(), &skeleton));

    ctx.set_skeleton(None);
    assert!(ctx.skeleton().is_none());
}

#[test]
fn test_begin_frame_advances_index() {
    let (mut ctx, _state) = context();
    ctx.begin_frame();
    ctx.begin_frame();
    assert_eq!(ctx.frame_index(), 2);
}

// ============================================================================
// Object tables
// ============================================================================

#[test]
fn test_release_all_objects() {
    let (mut ctx, state) = context();
    let texture = color_texture(&mut ctx);
    let mut vbo = VertexBuffer::new();
    vbo.gen_vertex_data(&[[0.0f32; 3]; 3], BufferUsage::Static, &mut ctx).unwrap();
    let mut fbo = Framebuffer::new();
    fbo.set_color_target(&texture, None, 0, 4, &mut ctx).unwrap();
    fbo.bind(&mut ctx).unwrap();

    assert_eq!(ctx.release_all_objects(), 2);

    assert!(!vbo.is_valid(&ctx));
    assert!(!fbo.is_valid(&ctx));
    assert_eq!(ctx.objects().current_framebuffer(), None);
    let state = state.lock().unwrap();
    assert!(state.buffers.is_empty());
    assert!(state.framebuffers.is_empty());
    assert!(state.surfaces.is_empty());
    assert_eq!(state.commands.last(), Some(&DeviceCommand::DestroyFramebuffer(
        *state.commands.iter().find_map(|c| match c {
            DeviceCommand::CreateFramebuffer(id) => Some(id),
            _ => None,
        }).unwrap()
    )));
}

#[test]
fn test_invalidate_all_objects_keeps_slots() {
    let (mut ctx, state) = context();
    let mut vbo = VertexBuffer::new();
    vbo.gen_vertex_data(&[[0.0f32; 3]; 3], BufferUsage::Static, &mut ctx).unwrap();

    assert_eq!(ctx.invalidate_all_objects(), 1);

    assert!(vbo.is_valid(&ctx));
    assert_eq!(vbo.vertex_count(&ctx), 3);
    let state = state.lock().unwrap();
    assert_eq!(state.count(|c| matches!(c, DeviceCommand::DestroyBuffer(_))), 0);
}
