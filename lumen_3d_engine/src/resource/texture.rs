/// Resource-level texture
///
/// Wraps a device texture with the metadata materials and framebuffers need
/// (size, 2D/cube kind). Shared between holders through `Proxy<Texture>`.

use crate::error::Result;
use crate::engine_bail;
use crate::graphics_device::{
    GraphicsDevice, TextureDesc, TextureFormat, TextureId, TextureKind,
};

/// Faces stored back to back in a cube map upload
const CUBE_FACES: usize = 6;

#[derive(Debug, Clone)]
pub struct Texture {
    name: String,
    id: Option<TextureId>,
    width: u32,
    height: u32,
    format: TextureFormat,
    kind: TextureKind,
}

impl Texture {
    /// Create the device texture and upload initial pixel data if any
    pub fn create(device: &mut dyn GraphicsDevice, name: &str, desc: &TextureDesc) -> Result<Self> {
        if desc.width == 0 || desc.height == 0 {
            engine_bail!("lumen3d::Texture",
                "Texture '{}': invalid size {}x{}", name, desc.width, desc.height);
        }
        if desc.kind == TextureKind::Cube && desc.width != desc.height {
            engine_bail!("lumen3d::Texture",
                "Texture '{}': cube faces must be square, got {}x{}", name, desc.width, desc.height);
        }

        if let Some(data) = &desc.data {
            let faces = match desc.kind {
                TextureKind::Tex2D => 1,
                TextureKind::Cube => CUBE_FACES,
            };
            let expected = desc.width as usize
                * desc.height as usize
                * desc.format.bytes_per_pixel() as usize
                * faces;
            if data.len() != expected {
                engine_bail!("lumen3d::Texture",
                    "Texture '{}': expected {} bytes of pixel data, got {}", name, expected, data.len());
            }
        }

        let id = device.create_texture(desc)?;
        crate::engine_debug!("lumen3d::Texture", "Created texture '{}' ({}x{})", name, desc.width, desc.height);

        Ok(Self {
            name: name.to_string(),
            id: Some(id),
            width: desc.width,
            height: desc.height,
            format: desc.format,
            kind: desc.kind,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Device texture, `None` once released
    pub fn id(&self) -> Option<TextureId> {
        self.id
    }

    pub fn is_valid(&self) -> bool {
        self.id.is_some()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> TextureFormat {
        self.format
    }

    pub fn kind(&self) -> TextureKind {
        self.kind
    }

    /// Destroy the device texture (idempotent)
    pub fn release(&mut self, device: &mut dyn GraphicsDevice) {
        if let Some(id) = self.id.take() {
            device.destroy_texture(id);
        }
    }
}

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
