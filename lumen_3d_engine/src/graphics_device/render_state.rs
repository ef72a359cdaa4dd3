/// Fixed-function pipeline state applied at material bind time

use bitflags::bitflags;

/// Blend factor for color blending equations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstColor,
    OneMinusDstColor,
    DstAlpha,
    OneMinusDstAlpha,
}

/// Winding order of front faces when culling is enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullOrder {
    /// Counter-clockwise vertices define the front face
    CounterClockwise,
    /// Clockwise vertices define the front face
    Clockwise,
}

bitflags! {
    /// Color channel write mask
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ColorWrites: u8 {
        const RED = 1 << 0;
        const GREEN = 1 << 1;
        const BLUE = 1 << 2;
        const ALPHA = 1 << 3;
        const COLOR = Self::RED.bits() | Self::GREEN.bits() | Self::BLUE.bits();
        const ALL = Self::COLOR.bits() | Self::ALPHA.bits();
    }
}

/// Blend/cull/depth/color state
///
/// Copied verbatim into `GraphicsDevice::set_render_state`; no validation
/// beyond what the device enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderState {
    /// Depth buffer writes
    pub zwrite: bool,
    /// Color channel writes
    pub color_write: ColorWrites,
    /// Blending enabled
    pub blend: bool,
    /// Source blend factor
    pub blend_src: BlendFactor,
    /// Destination blend factor
    pub blend_dst: BlendFactor,
    /// Face culling enabled
    pub cull_face: bool,
    /// Front face winding
    pub cull_order: CullOrder,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            zwrite: true,
            color_write: ColorWrites::ALL,
            blend: false,
            blend_src: BlendFactor::One,
            blend_dst: BlendFactor::Zero,
            cull_face: false,
            cull_order: CullOrder::CounterClockwise,
        }
    }
}
