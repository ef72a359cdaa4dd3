/// Render context - explicit per-draw state
///
/// Everything the binding code needs to know about "what is current"
/// (device, camera, model transform, skeleton, framebuffer, frame) lives
/// here and is passed by reference to every bind call. Nothing is a hidden
/// process global, so several contexts (or tests) can coexist.

use std::sync::Arc;
use crate::animation::Skeleton;
use crate::camera::Camera;
use crate::graphics_device::GraphicsDevice;
use crate::math::Transform;
use crate::render_object::RenderObjects;

/// Context creation options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContextConfig {
    /// Allow multisampled color targets; when false every sample count
    /// request is clamped to 1
    pub multisample: bool,
}

impl Default for RenderContextConfig {
    fn default() -> Self {
        Self { multisample: true }
    }
}

pub struct RenderContext {
    device: Box<dyn GraphicsDevice>,
    config: RenderContextConfig,
    camera: Option<Camera>,
    transform: Transform,
    skeleton: Option<Arc<Skeleton>>,
    frame_index: u64,
    objects: RenderObjects,
}

impl RenderContext {
    pub fn new(device: Box<dyn GraphicsDevice>, config: RenderContextConfig) -> Self {
        Self {
            device,
            config,
            camera: None,
            transform: Transform::default(),
            skeleton: None,
            frame_index: 0,
            objects: RenderObjects::new(),
        }
    }

    // ===== GETTERS =====

    pub fn device(&self) -> &dyn GraphicsDevice {
        self.device.as_ref()
    }

    pub fn device_mut(&mut self) -> &mut dyn GraphicsDevice {
        self.device.as_mut()
    }

    pub fn config(&self) -> &RenderContextConfig {
        &self.config
    }

    /// Active camera, if any
    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    /// Current model transform
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Active skeleton, if any
    pub fn skeleton(&self) -> Option<&Arc<Skeleton>> {
        self.skeleton.as_ref()
    }

    /// Frame counter advanced by `begin_frame`
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn objects(&self) -> &RenderObjects {
        &self.objects
    }

    // ===== SETTERS =====

    pub fn set_camera(&mut self, camera: Option<Camera>) {
        self.camera = camera;
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    pub fn set_skeleton(&mut self, skeleton: Option<Arc<Skeleton>>) {
        self.skeleton = skeleton;
    }

    /// Start a new frame
    ///
    /// Skeletons posed in place between frames are re-uploaded once the
    /// frame index moves on.
    pub fn begin_frame(&mut self) {
        self.frame_index += 1;
    }

    // ===== SLOT TABLES =====

    /// Device and slot tables borrowed together
    pub(crate) fn device_and_objects(&mut self) -> (&mut dyn GraphicsDevice, &mut RenderObjects) {
        (self.device.as_mut(), &mut self.objects)
    }

    /// Destroy every buffer and framebuffer object and free their slots
    ///
    /// Returns the number of objects released. Outstanding handles become
    /// invalid.
    pub fn release_all_objects(&mut self) -> usize {
        let count = self.objects.release_all(self.device.as_mut());
        crate::engine_debug!("lumen3d::RenderContext", "Released {} render objects", count);
        count
    }

    /// Forget every device object without destroying it (device lost)
    ///
    /// Slots and cached contents survive; backing objects are rebuilt on
    /// next use. Returns the number of objects invalidated.
    pub fn invalidate_all_objects(&mut self) -> usize {
        let count = self.objects.invalidate_all();
        crate::engine_debug!("lumen3d::RenderContext", "Invalidated {} render objects", count);
        count
    }
}

#[cfg(test)]
#[path = "render_context_tests.rs"]
mod tests;
