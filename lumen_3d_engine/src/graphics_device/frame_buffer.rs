/// Render target attachment types

use crate::graphics_device::{TextureId, SurfaceId, CubemapSide};

/// What a framebuffer color attachment points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTarget {
    /// Detached
    None,
    /// A texture, or one face of a cube texture
    Texture {
        texture: TextureId,
        side: Option<CubemapSide>,
    },
    /// An offscreen multisampled surface, resolved into a texture on unbind
    Surface(SurfaceId),
}

/// Integer rectangle (viewport, scissor)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}
