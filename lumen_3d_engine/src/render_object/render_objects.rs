/// Slot tables for buffer and framebuffer objects

use slotmap::{new_key_type, SlotMap};
use crate::graphics_device::{
    BufferId, BufferUsage, CubemapSide, ElementType, FramebufferId, GraphicsDevice,
    IndexSize, SurfaceId, TextureId, VertexLayout,
};

// ===== SLOT MAP KEYS =====

new_key_type! {
    /// Slot of a vertex/index buffer pair
    pub struct BufferKey;

    /// Slot of a framebuffer object
    pub struct FramebufferKey;
}

// ===== BUFFER OBJECT =====

/// Backing state of a `VertexBuffer`
///
/// Uploaded bytes are kept so the device buffers can be recreated after
/// `invalidate_all`.
#[derive(Debug)]
pub(crate) struct BufferObject {
    pub vertex_buffer: Option<BufferId>,
    pub index_buffer: Option<BufferId>,
    pub layout: VertexLayout,
    pub vertex_count: u32,
    pub vertex_usage: BufferUsage,
    pub vertex_data: Vec<u8>,
    pub element_type: ElementType,
    pub index_size: IndexSize,
    /// Face count
    pub element_count: u32,
    pub index_usage: BufferUsage,
    pub index_data: Vec<u8>,
    pub vertex_bound: bool,
    pub index_bound: bool,
}

impl BufferObject {
    pub fn new() -> Self {
        Self {
            vertex_buffer: None,
            index_buffer: None,
            layout: VertexLayout::default(),
            vertex_count: 0,
            vertex_usage: BufferUsage::Static,
            vertex_data: Vec::new(),
            element_type: ElementType::Triangles,
            index_size: IndexSize::U16,
            element_count: 0,
            index_usage: BufferUsage::Static,
            index_data: Vec::new(),
            vertex_bound: false,
            index_bound: false,
        }
    }

    pub fn destroy(&mut self, device: &mut dyn GraphicsDevice) {
        if let Some(buffer) = self.vertex_buffer.take() {
            device.destroy_buffer(buffer);
        }
        if let Some(buffer) = self.index_buffer.take() {
            device.destroy_buffer(buffer);
        }
        self.vertex_bound = false;
        self.index_bound = false;
    }

    pub fn invalidate(&mut self) {
        self.vertex_buffer = None;
        self.index_buffer = None;
        self.vertex_bound = false;
        self.index_bound = false;
    }
}

// ===== FRAMEBUFFER OBJECT =====

/// One color attachment as configured by `set_color_target`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorAttachment {
    /// Target texture (`None` when the texture was never created)
    pub texture: Option<TextureId>,
    pub side: Option<CubemapSide>,
    pub width: u32,
    pub height: u32,
    /// Effective sample count (1 = no multisampling)
    pub samples: u32,
    /// Multisampled surface rendered into, resolved on unbind
    pub surface: Option<SurfaceId>,
}

#[derive(Debug, Default)]
pub(crate) struct FramebufferObject {
    pub framebuffer: Option<FramebufferId>,
    pub color_attachments: Vec<Option<ColorAttachment>>,
    pub depth: Option<TextureId>,
    /// Attachments changed since they were last pushed to the device
    pub dirty: bool,
}

impl FramebufferObject {
    pub fn destroy(&mut self, device: &mut dyn GraphicsDevice) {
        for attachment in self.color_attachments.iter_mut().flatten() {
            if let Some(surface) = attachment.surface.take() {
                device.destroy_multisample_surface(surface);
            }
        }
        if let Some(framebuffer) = self.framebuffer.take() {
            device.destroy_framebuffer(framebuffer);
        }
    }

    pub fn invalidate(&mut self) {
        for attachment in self.color_attachments.iter_mut().flatten() {
            attachment.surface = None;
        }
        self.framebuffer = None;
        self.dirty = true;
    }
}

// ===== SLOT TABLES =====

/// Process-side store of every buffer and framebuffer object
///
/// Also tracks the framebuffer currently bound, of which there is at most
/// one.
#[derive(Debug, Default)]
pub struct RenderObjects {
    pub(crate) buffers: SlotMap<BufferKey, BufferObject>,
    pub(crate) framebuffers: SlotMap<FramebufferKey, FramebufferObject>,
    pub(crate) current_framebuffer: Option<FramebufferKey>,
}

impl RenderObjects {
    pub fn new() -> Self {
        Self {
            buffers: SlotMap::with_key(),
            framebuffers: SlotMap::with_key(),
            current_framebuffer: None,
        }
    }

    pub fn buffers_count(&self) -> usize {
        self.buffers.len()
    }

    pub fn framebuffers_count(&self) -> usize {
        self.framebuffers.len()
    }

    /// Framebuffer bound by the last `Framebuffer::bind`
    pub fn current_framebuffer(&self) -> Option<FramebufferKey> {
        self.current_framebuffer
    }

    /// Destroy every device object and empty both tables
    pub(crate) fn release_all(&mut self, device: &mut dyn GraphicsDevice) -> usize {
        if self.current_framebuffer.take().is_some() {
            device.bind_framebuffer(None);
        }

        let count = self.buffers.len() + self.framebuffers.len();
        for (_, mut object) in self.buffers.drain() {
            object.destroy(device);
        }
        for (_, mut object) in self.framebuffers.drain() {
            object.destroy(device);
        }
        count
    }

    /// Drop every device id, keeping slots and cached contents
    pub(crate) fn invalidate_all(&mut self) -> usize {
        self.current_framebuffer = None;

        for object in self.buffers.values_mut() {
            object.invalidate();
        }
        for object in self.framebuffers.values_mut() {
            object.invalidate();
        }
        self.buffers.len() + self.framebuffers.len()
    }
}
