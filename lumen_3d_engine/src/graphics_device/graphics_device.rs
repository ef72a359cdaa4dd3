/// GraphicsDevice trait - the low-level graphics API seam
///
/// The engine core never talks to OpenGL/Direct3D/Vulkan directly. Every
/// program, buffer, texture and render target call goes through this trait,
/// so the shader/material binding logic runs unchanged against a real backend
/// or against `MockGraphicsDevice` in tests.

use glam::{Vec3, Vec4};
use crate::error::Result;
use crate::graphics_device::{
    TextureDesc, BufferKind, BufferUsage, VertexLayout, IndexSize, DrawCall,
    ProgramDesc, UniformLocation, RenderState, ColorTarget, Rect, CubemapSide,
};

// ============================================================================
// Device object ids
// ============================================================================

/// Linked GPU program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(pub u32);

/// GPU texture object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// GPU buffer object (vertex or index storage)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub u32);

/// GPU framebuffer object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FramebufferId(pub u32);

/// Offscreen multisampled color surface (renderbuffer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u32);

// ============================================================================
// GraphicsDevice trait
// ============================================================================

/// Graphics API capability surface
///
/// All calls are synchronous and mutate the device's global selection state
/// (bound program, bound framebuffer, bound textures). Callers must issue
/// them in a strict order.
pub trait GraphicsDevice: Send {
    // ===== PROGRAMS =====

    /// Compile and link a program from vertex and fragment source,
    /// binding each sampler name to its texture unit
    fn create_program(&mut self, desc: &ProgramDesc) -> Result<ProgramId>;

    /// Destroy a linked program
    fn destroy_program(&mut self, program: ProgramId);

    /// Resolve a uniform name to a location
    ///
    /// Returns `UniformLocation::INVALID` when the uniform does not exist or
    /// was optimized out by the compiler.
    fn uniform_location(&mut self, program: ProgramId, name: &str) -> UniformLocation;

    /// Make a program current
    fn bind_program(&mut self, program: ProgramId);

    /// Deactivate the current program
    fn unbind_program(&mut self);

    /// Upload a vec3 uniform
    fn set_uniform3(&mut self, location: UniformLocation, value: Vec3);

    /// Upload a vec4 uniform
    fn set_uniform4(&mut self, location: UniformLocation, value: Vec4);

    /// Upload a vec3 array uniform
    fn set_uniform3_array(&mut self, location: UniformLocation, values: &[Vec3]);

    /// Upload a vec4 array uniform
    fn set_uniform4_array(&mut self, location: UniformLocation, values: &[Vec4]);

    // ===== TEXTURES =====

    /// Create a texture, optionally uploading initial pixel data
    fn create_texture(&mut self, desc: &TextureDesc) -> Result<TextureId>;

    /// Destroy a texture
    fn destroy_texture(&mut self, texture: TextureId);

    /// Bind a texture to a texture unit
    fn bind_texture(&mut self, texture: TextureId, slot: u32);

    /// Clear a texture unit
    fn unbind_texture(&mut self, slot: u32);

    // ===== BUFFERS =====

    /// Create an empty buffer object
    fn create_buffer(&mut self, kind: BufferKind) -> Result<BufferId>;

    /// Replace the whole content of a buffer
    fn upload_buffer(&mut self, buffer: BufferId, data: &[u8], usage: BufferUsage) -> Result<()>;

    /// Destroy a buffer object
    fn destroy_buffer(&mut self, buffer: BufferId);

    /// Bind (or clear with `None`) the vertex stream with its attribute layout
    fn bind_vertex_buffer(&mut self, buffer: Option<BufferId>, layout: &VertexLayout);

    /// Bind (or clear with `None`) the index stream
    fn bind_index_buffer(&mut self, buffer: Option<BufferId>, index_size: IndexSize);

    /// Issue a draw call with the currently bound streams
    fn draw(&mut self, call: &DrawCall);

    // ===== FRAMEBUFFERS =====

    /// Create an empty framebuffer object
    fn create_framebuffer(&mut self) -> Result<FramebufferId>;

    /// Destroy a framebuffer object
    fn destroy_framebuffer(&mut self, framebuffer: FramebufferId);

    /// Bind a framebuffer (`None` = the default/backbuffer target)
    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferId>);

    /// Attach (or detach with `ColorTarget::None`) a color attachment
    fn attach_color(&mut self, framebuffer: FramebufferId, index: u32, target: ColorTarget);

    /// Attach (or detach with `None`) the depth attachment
    fn attach_depth(&mut self, framebuffer: FramebufferId, texture: Option<TextureId>);

    /// Create an offscreen multisampled color surface
    fn create_multisample_surface(&mut self, width: u32, height: u32, samples: u32) -> Result<SurfaceId>;

    /// Destroy a multisampled surface
    fn destroy_multisample_surface(&mut self, surface: SurfaceId);

    /// Blit a multisampled surface into a texture (or one cube side of it)
    fn resolve_multisample(
        &mut self,
        surface: SurfaceId,
        texture: TextureId,
        side: Option<CubemapSide>,
        width: u32,
        height: u32,
    );

    /// Maximum number of simultaneous color attachments
    fn max_color_attachments(&self) -> u32;

    // ===== STATE =====

    /// Apply blend/cull/depth-write/color-write state
    fn set_render_state(&mut self, state: &RenderState);

    /// Current viewport rectangle
    fn viewport(&self) -> Rect;
}
