/// Framebuffer handle (render-to-texture target set)
///
/// At most one framebuffer is current per `RenderContext`. Binding a new
/// one unbinds the previous, and unbinding resolves every multisampled
/// color attachment into its texture.

use crate::error::Result;
use crate::graphics_device::{ColorTarget, CubemapSide, GraphicsDevice};
use crate::render_context::RenderContext;
use crate::render_object::{ColorAttachment, FramebufferKey, RenderObjects};
use crate::render_object::render_objects::FramebufferObject;
use crate::resource::Texture;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Framebuffer {
    key: Option<FramebufferKey>,
}

impl Framebuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(&self) -> Option<FramebufferKey> {
        self.key
    }

    fn object<'a>(&self, objects: &'a RenderObjects) -> Option<&'a FramebufferObject> {
        objects.framebuffers.get(self.key?)
    }

    fn ensure_key(&mut self, objects: &mut RenderObjects) -> FramebufferKey {
        match self.key.filter(|key| objects.framebuffers.contains_key(*key)) {
            Some(key) => key,
            None => {
                let key = objects.framebuffers.insert(FramebufferObject::default());
                self.key = Some(key);
                key
            }
        }
    }

    fn is_current(&self, ctx: &RenderContext) -> bool {
        self.key.is_some() && ctx.objects().current_framebuffer == self.key
    }

    // ===== TARGETS =====

    /// Render color attachment `idx` into `texture` (or one of its cube sides)
    ///
    /// Indices past `max_color_attachments` are ignored. A sample count
    /// above 1 renders into a multisampled surface resolved on unbind.
    pub fn set_color_target(
        &mut self,
        texture: &Texture,
        side: Option<CubemapSide>,
        idx: u32,
        samples: u32,
        ctx: &mut RenderContext,
    ) -> Result<()> {
        if idx >= ctx.device().max_color_attachments() {
            return Ok(());
        }

        let samples = if ctx.config().multisample { samples.max(1) } else { 1 };
        let (device, objects) = ctx.device_and_objects();
        let key = self.ensure_key(objects);
        let object = &mut objects.framebuffers[key];
        ensure_framebuffer(object, device)?;

        let idx = idx as usize;
        if idx >= object.color_attachments.len() {
            object.color_attachments.resize(idx + 1, None);
        }

        if let Some(surface) = object.color_attachments[idx].and_then(|a| a.surface) {
            device.destroy_multisample_surface(surface);
        }
        let surface = if samples > 1 {
            Some(device.create_multisample_surface(texture.width(), texture.height(), samples)?)
        } else {
            None
        };

        object.color_attachments[idx] = Some(ColorAttachment {
            texture: texture.id(),
            side,
            width: texture.width(),
            height: texture.height(),
            samples,
            surface,
        });
        object.dirty = true;

        if self.is_current(ctx) {
            self.bind(ctx)?;
        }
        Ok(())
    }

    /// Render depth into `texture`
    pub fn set_depth_target(&mut self, texture: &Texture, ctx: &mut RenderContext) -> Result<()> {
        let (device, objects) = ctx.device_and_objects();
        let key = self.ensure_key(objects);
        let object = &mut objects.framebuffers[key];
        ensure_framebuffer(object, device)?;

        object.depth = texture.id();
        object.dirty = true;

        if self.is_current(ctx) {
            self.bind(ctx)?;
        }
        Ok(())
    }

    // ===== BINDING =====

    /// Make this framebuffer current, unbinding the previous one
    pub fn bind(&self, ctx: &mut RenderContext) -> Result<()> {
        if ctx.objects().current_framebuffer.is_some() {
            Framebuffer::unbind(ctx);
        }

        let Some(key) = self.key else {
            return Ok(());
        };
        let (device, objects) = ctx.device_and_objects();
        let Some(object) = objects.framebuffers.get_mut(key) else {
            return Ok(());
        };

        rebuild(object, device)?;

        let Some(framebuffer) = object.framebuffer else {
            return Ok(());
        };
        device.bind_framebuffer(Some(framebuffer));
        objects.current_framebuffer = Some(key);

        if object.dirty {
            for (i, attachment) in object.color_attachments.iter().enumerate() {
                device.attach_color(framebuffer, i as u32, color_target(attachment));
            }
            device.attach_depth(framebuffer, object.depth);
            object.dirty = false;
        }
        Ok(())
    }

    /// Return to the default target, resolving multisampled attachments
    pub fn unbind(ctx: &mut RenderContext) {
        let (device, objects) = ctx.device_and_objects();
        device.bind_framebuffer(None);

        let Some(key) = objects.current_framebuffer.take() else {
            return;
        };
        let Some(object) = objects.framebuffers.get(key) else {
            return;
        };

        for attachment in object.color_attachments.iter().flatten() {
            if attachment.samples <= 1 {
                continue;
            }
            if let (Some(surface), Some(texture)) = (attachment.surface, attachment.texture) {
                device.resolve_multisample(
                    surface,
                    texture,
                    attachment.side,
                    attachment.width,
                    attachment.height,
                );
            }
        }
    }

    // ===== LIFECYCLE =====

    /// Destroy the device objects and free the slot
    pub fn release(&mut self, ctx: &mut RenderContext) {
        if self.is_current(ctx) {
            Framebuffer::unbind(ctx);
        }
        let Some(key) = self.key.take() else {
            return;
        };
        let (device, objects) = ctx.device_and_objects();
        if let Some(mut object) = objects.framebuffers.remove(key) {
            object.destroy(device);
        }
    }

    pub fn is_valid(&self, ctx: &RenderContext) -> bool {
        self.object(ctx.objects()).is_some()
    }

    pub fn max_color_attachments(ctx: &RenderContext) -> u32 {
        ctx.device().max_color_attachments()
    }

    /// Size of the attachment table (highest configured index + 1)
    pub fn color_attachment_count(&self, ctx: &RenderContext) -> usize {
        self.object(ctx.objects()).map_or(0, |o| o.color_attachments.len())
    }

    pub fn color_attachment(&self, idx: usize, ctx: &RenderContext) -> Option<ColorAttachment> {
        self.object(ctx.objects())?.color_attachments.get(idx).copied().flatten()
    }

    pub fn depth_target(&self, ctx: &RenderContext) -> Option<crate::graphics_device::TextureId> {
        self.object(ctx.objects())?.depth
    }
}

fn ensure_framebuffer(object: &mut FramebufferObject, device: &mut dyn GraphicsDevice) -> Result<()> {
    if object.framebuffer.is_none() {
        object.framebuffer = Some(device.create_framebuffer()?);
        object.dirty = true;
    }
    Ok(())
}

// Recreate what `invalidate_all` dropped
fn rebuild(object: &mut FramebufferObject, device: &mut dyn GraphicsDevice) -> Result<()> {
    if object.framebuffer.is_some() {
        return Ok(());
    }
    ensure_framebuffer(object, device)?;
    for attachment in object.color_attachments.iter_mut().flatten() {
        if attachment.samples > 1 && attachment.surface.is_none() {
            attachment.surface = Some(device.create_multisample_surface(
                attachment.width,
                attachment.height,
                attachment.samples,
            )?);
        }
    }
    Ok(())
}

fn color_target(attachment: &Option<ColorAttachment>) -> ColorTarget {
    match attachment {
        Some(ColorAttachment { surface: Some(surface), .. }) => ColorTarget::Surface(*surface),
        Some(ColorAttachment { texture: Some(texture), side, .. }) => {
            ColorTarget::Texture { texture: *texture, side: *side }
        }
        _ => ColorTarget::None,
    }
}

#[cfg(test)]
#[path = "frame_buffer_tests.rs"]
mod tests;
