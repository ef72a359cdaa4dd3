/// Texture descriptor types

/// Texture pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    R8G8B8_UNORM,
    R8G8B8A8_UNORM,
    R32G32B32A32_SFLOAT,
    D16_UNORM,
    D24_UNORM,
    D32_FLOAT,
}

impl TextureFormat {
    /// Size in bytes of one pixel
    pub fn bytes_per_pixel(&self) -> u32 {
        match self {
            TextureFormat::R8G8B8_UNORM => 3,
            TextureFormat::R8G8B8A8_UNORM => 4,
            TextureFormat::R32G32B32A32_SFLOAT => 16,
            TextureFormat::D16_UNORM => 2,
            TextureFormat::D24_UNORM | TextureFormat::D32_FLOAT => 4,
        }
    }

    /// Returns true for depth formats
    pub fn is_depth(&self) -> bool {
        matches!(self, TextureFormat::D16_UNORM | TextureFormat::D24_UNORM | TextureFormat::D32_FLOAT)
    }
}

/// Texture dimensionality
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureKind {
    /// Plain 2D texture
    Tex2D,
    /// Cube map (6 square faces)
    Cube,
}

/// One face of a cube map, used when rendering into a cube texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubemapSide {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

/// Descriptor for creating a texture
#[derive(Debug, Clone)]
pub struct TextureDesc {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel format
    pub format: TextureFormat,
    /// 2D or cube
    pub kind: TextureKind,
    /// Optional initial pixel data (all faces back to back for cube maps)
    pub data: Option<Vec<u8>>,
}
