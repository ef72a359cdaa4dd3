/// Unit tests for VertexBuffer
///
/// Draw ranges are checked against the exact `DrawCall` recorded by the mock
/// device.

use std::sync::{Arc, Mutex};
use super::*;
use crate::graphics_device::mock_graphics_device::{DeviceCommand, MockDeviceState, MockGraphicsDevice};
use crate::graphics_device::VertexLayout;
use crate::render_context::RenderContextConfig;

fn context() -> (RenderContext, Arc<Mutex<MockDeviceState>>) {
    let device = MockGraphicsDevice::new();
    let state = device.state();
    (RenderContext::new(Box::new(device), RenderContextConfig::default()), state)
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
    uv: [f32; 2],
}

fn vertices(count: usize) -> Vec<Vertex> {
    (0..count)
        .map(|i| Vertex { position: [i as f32, 0.0, 0.0], normal: [0.0, 1.0, 0.0], uv: [0.0, 0.0] })
        .collect()
}

fn last_draw(state: &Arc<Mutex<MockDeviceState>>) -> Option<DrawCall> {
    state.lock().unwrap().commands.iter().rev().find_map(|c| match c {
        DeviceCommand::Draw(call) => Some(*call),
        _ => None,
    })
}

fn draw_count(state: &Arc<Mutex<MockDeviceState>>) -> usize {
    state.lock().unwrap().count(|c| matches!(c, DeviceCommand::Draw(_)))
}

// ============================================================================
// Data upload
// ============================================================================

#[test]
fn test_new_buffer_is_invalid() {
    let (ctx, _state) = context();
    let vbo = VertexBuffer::new();

    assert!(!vbo.is_valid(&ctx));
    assert_eq!(vbo.vertex_count(&ctx), 0);
    assert_eq!(vbo.element_count(&ctx), 0);
    assert_eq!(vbo.key(), None);
}

#[test]
fn test_gen_vertex_data() {
    let (mut ctx, state) = context();
    let mut vbo = VertexBuffer::new();

    vbo.gen_vertex_data(&vertices(4), BufferUsage::Dynamic, &mut ctx).unwrap();

    assert!(vbo.is_valid(&ctx));
    assert_eq!(vbo.vertex_count(&ctx), 4);
    let state = state.lock().unwrap();
    assert_eq!(state.buffers.len(), 1);
    assert_eq!(state.buffers.values().next().unwrap().len(), 4 * std::mem::size_of::<Vertex>());
    assert_eq!(state.count(|c| matches!(c,
        DeviceCommand::UploadBuffer { usage: BufferUsage::Dynamic, .. }
    )), 1);
}

#[test]
fn test_gen_vertex_data_reuses_buffer() {
    let (mut ctx, state) = context();
    let mut vbo = VertexBuffer::new();

    vbo.gen_vertex_data(&vertices(4), BufferUsage::Static, &mut ctx).unwrap();
    vbo.gen_vertex_data(&vertices(6), BufferUsage::Static, &mut ctx).unwrap();

    assert_eq!(vbo.vertex_count(&ctx), 6);
    assert_eq!(state.lock().unwrap().count(|c| matches!(c, DeviceCommand::CreateBuffer { .. })), 1);
}

#[test]
fn test_gen_empty_vertex_data_fails() {
    let (mut ctx, _state) = context();
    let mut vbo = VertexBuffer::new();
    vbo.gen_vertex_data(&vertices(3), BufferUsage::Static, &mut ctx).unwrap();

    let result = vbo.gen_vertex_data::<Vertex>(&[], BufferUsage::Static, &mut ctx);

    assert!(result.is_err());
    assert_eq!(vbo.vertex_count(&ctx), 0);
    assert!(!vbo.is_valid(&ctx));
}

#[test]
fn test_gen_index_data_counts_faces() {
    let (mut ctx, state) = context();
    let mut vbo = VertexBuffer::new();

    vbo.gen_index_data(&[0u16, 1, 2, 2, 1, 3, 9], ElementType::Triangles, BufferUsage::Static, &mut ctx).unwrap();

    assert_eq!(vbo.element_count(&ctx), 2);
    assert_eq!(vbo.element_type(&ctx), Some(ElementType::Triangles));
    // trailing partial face dropped
    let state = state.lock().unwrap();
    assert!(state.buffers.values().any(|data| data.len() == 6 * 2));
}

#[test]
fn test_gen_index_data_without_whole_face_fails() {
    let (mut ctx, _state) = context();
    let mut vbo = VertexBuffer::new();

    assert!(vbo.gen_index_data(&[0u32, 1], ElementType::Triangles, BufferUsage::Static, &mut ctx).is_err());
    assert!(vbo.gen_index_data::<u32>(&[], ElementType::Quads, BufferUsage::Static, &mut ctx).is_err());
    assert_eq!(vbo.element_count(&ctx), 0);
}

// ============================================================================
// Binding
// ============================================================================

#[test]
fn test_bind_passes_layout() {
    let (mut ctx, state) = context();
    let mut vbo = VertexBuffer::new();
    vbo.gen_vertex_data(&vertices(3), BufferUsage::Static, &mut ctx).unwrap();
    vbo.set_normals(12, &mut ctx);
    vbo.set_tex_coord(0, 24, 2, &mut ctx);
    vbo.set_tex_coord(MAX_TEX_COORDS, 0, 2, &mut ctx);
    vbo.set_colors(0, 4, &mut ctx);

    vbo.bind(&mut ctx).unwrap();

    let object = &ctx.objects().buffers[vbo.key().unwrap()];
    let mut expected = VertexLayout {
        stride: 32,
        position_dimension: 3,
        normals: Some(VertexAttribute { offset: 12, dimension: 3 }),
        colors: Some(VertexAttribute { offset: 0, dimension: 4 }),
        ..VertexLayout::default()
    };
    expected.tex_coords[0] = Some(VertexAttribute { offset: 24, dimension: 2 });
    assert_eq!(object.layout, expected);
    assert_eq!(state.lock().unwrap().count(|c| matches!(c, DeviceCommand::BindVertexBuffer(Some(_)))), 1);
}

#[test]
fn test_unbind_clears_streams() {
    let (mut ctx, state) = context();
    let mut vbo = VertexBuffer::new();
    vbo.gen_vertex_data(&vertices(3), BufferUsage::Static, &mut ctx).unwrap();
    vbo.gen_index_data(&[0u16, 1, 2], ElementType::Triangles, BufferUsage::Static, &mut ctx).unwrap();

    vbo.bind(&mut ctx).unwrap();
    vbo.unbind(&mut ctx);
    vbo.unbind(&mut ctx);

    let state = state.lock().unwrap();
    assert_eq!(state.count(|c| *c == DeviceCommand::BindVertexBuffer(None)), 1);
    assert_eq!(state.count(|c| *c == DeviceCommand::BindIndexBuffer(None)), 1);
}

// ============================================================================
// Drawing
// ============================================================================

#[test]
fn test_draw_without_bind_is_noop() {
    let (mut ctx, state) = context();
    let mut vbo = VertexBuffer::new();
    vbo.gen_vertex_data(&vertices(3), BufferUsage::Static, &mut ctx).unwrap();

    vbo.draw(&mut ctx);

    assert_eq!(draw_count(&state), 0);
}

#[test]
fn test_draw_vertices() {
    let (mut ctx, state) = context();
    let mut vbo = VertexBuffer::new();
    vbo.gen_vertex_data(&vertices(6), BufferUsage::Static, &mut ctx).unwrap();
    vbo.bind(&mut ctx).unwrap();

    vbo.draw(&mut ctx);
    assert_eq!(last_draw(&state), Some(DrawCall {
        element_type: ElementType::Triangles,
        first: 0,
        count: 6,
        indexed: None,
    }));

    vbo.draw_range(3, 3, &mut ctx);
    assert_eq!(last_draw(&state).unwrap().first, 3);
}

#[test]
fn test_draw_indexed_faces() {
    let (mut ctx, state) = context();
    let mut vbo = VertexBuffer::new();
    vbo.gen_vertex_data(&vertices(4), BufferUsage::Static, &mut ctx).unwrap();
    vbo.gen_index_data(&[0u32, 1, 2, 3, 0, 2, 1, 3], ElementType::Quads, BufferUsage::Static, &mut ctx).unwrap();
    vbo.bind(&mut ctx).unwrap();

    vbo.draw_range(1, 1, &mut ctx);

    assert_eq!(last_draw(&state), Some(DrawCall {
        element_type: ElementType::Quads,
        first: 4,
        count: 4,
        indexed: Some(IndexSize::U32),
    }));
    assert_eq!(ctx.objects().buffers[vbo.key().unwrap()].layout.position_dimension, 4);
}

#[test]
fn test_draw_out_of_range_is_noop() {
    let (mut ctx, state) = context();
    let mut vbo = VertexBuffer::new();
    vbo.gen_vertex_data(&vertices(4), BufferUsage::Static, &mut ctx).unwrap();
    vbo.gen_index_data(&[0u16, 1, 2, 2, 1, 3], ElementType::Triangles, BufferUsage::Static, &mut ctx).unwrap();
    vbo.bind(&mut ctx).unwrap();

    vbo.draw_range(1, 2, &mut ctx);
    vbo.draw_range(u32::MAX, 2, &mut ctx);
    assert_eq!(draw_count(&state), 0);

    vbo.draw(&mut ctx);
    assert_eq!(last_draw(&state).unwrap().count, 6);
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_release_frees_slot_and_buffers() {
    let (mut ctx, state) = context();
    let mut vbo = VertexBuffer::new();
    vbo.gen_vertex_data(&vertices(3), BufferUsage::Static, &mut ctx).unwrap();
    vbo.gen_index_data(&[0u16, 1, 2], ElementType::Triangles, BufferUsage::Static, &mut ctx).unwrap();
    let copy = vbo;

    vbo.release(&mut ctx);
    vbo.release(&mut ctx);

    assert!(!vbo.is_valid(&ctx));
    assert!(!copy.is_valid(&ctx));
    assert_eq!(ctx.objects().buffers_count(), 0);
    assert!(state.lock().unwrap().buffers.is_empty());
}

#[test]
fn test_rebuilt_after_invalidate() {
    let (mut ctx, state) = context();
    let mut vbo = VertexBuffer::new();
    vbo.gen_vertex_data(&vertices(3), BufferUsage::Static, &mut ctx).unwrap();
    vbo.gen_index_data(&[0u16, 1, 2], ElementType::Triangles, BufferUsage::Static, &mut ctx).unwrap();

    ctx.invalidate_all_objects();
    state.lock().unwrap().buffers.clear();
    vbo.bind(&mut ctx).unwrap();
    vbo.draw(&mut ctx);

    let state_guard = state.lock().unwrap();
    assert_eq!(state_guard.buffers.len(), 2);
    assert_eq!(state_guard.count(|c| matches!(c, DeviceCommand::CreateBuffer { .. })), 4);
    drop(state_guard);
    assert_eq!(last_draw(&state).unwrap().count, 3);
}
