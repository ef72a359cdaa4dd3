/// Mock GraphicsDevice for tests (no GPU required)
///
/// Every call is appended to a shared command log so tests can assert on
/// the exact sequence the engine issued (program binds, uniform uploads,
/// framebuffer attachments, resolves). The log lives behind an
/// `Arc<Mutex<..>>` so it stays reachable after the device has been moved
/// into a `RenderContext`.

use std::sync::{Arc, Mutex, MutexGuard};
use glam::{Vec3, Vec4};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::Result;
use crate::engine_bail;
use crate::graphics_device::{
    GraphicsDevice, ProgramId, TextureId, BufferId, FramebufferId, SurfaceId,
    TextureDesc, BufferKind, BufferUsage, VertexLayout, IndexSize, DrawCall,
    ProgramDesc, UniformLocation, RenderState, ColorTarget, Rect, CubemapSide,
};

// ============================================================================
// Recorded commands
// ============================================================================

/// One recorded device call
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCommand {
    CreateProgram(ProgramId),
    DestroyProgram(ProgramId),
    BindProgram(ProgramId),
    UnbindProgram,
    Uniform3 { location: UniformLocation, value: Vec3 },
    Uniform4 { location: UniformLocation, value: Vec4 },
    Uniform3Array { location: UniformLocation, values: Vec<Vec3> },
    Uniform4Array { location: UniformLocation, values: Vec<Vec4> },
    CreateTexture(TextureId),
    DestroyTexture(TextureId),
    BindTexture { texture: TextureId, slot: u32 },
    UnbindTexture { slot: u32 },
    CreateBuffer { buffer: BufferId, kind: BufferKind },
    UploadBuffer { buffer: BufferId, size: usize, usage: BufferUsage },
    DestroyBuffer(BufferId),
    BindVertexBuffer(Option<BufferId>),
    BindIndexBuffer(Option<BufferId>),
    Draw(DrawCall),
    CreateFramebuffer(FramebufferId),
    DestroyFramebuffer(FramebufferId),
    BindFramebuffer(Option<FramebufferId>),
    AttachColor { framebuffer: FramebufferId, index: u32, target: ColorTarget },
    AttachDepth { framebuffer: FramebufferId, texture: Option<TextureId> },
    CreateSurface { surface: SurfaceId, width: u32, height: u32, samples: u32 },
    DestroySurface(SurfaceId),
    Resolve { surface: SurfaceId, texture: TextureId, side: Option<CubemapSide> },
    SetRenderState(RenderState),
}

// ============================================================================
// Shared mock state
// ============================================================================

/// Inspectable state of a `MockGraphicsDevice`
#[derive(Debug)]
pub struct MockDeviceState {
    /// Every device call, in issue order
    pub commands: Vec<DeviceCommand>,
    /// Uniform names that resolve to `UniformLocation::INVALID`
    pub missing_uniforms: FxHashSet<String>,
    /// Make the next `create_program` calls fail
    pub fail_compile: bool,
    /// Make the next `create_framebuffer` calls fail
    pub fail_framebuffers: bool,
    /// Reported by `max_color_attachments`
    pub max_color_attachments: u32,
    /// Reported by `viewport`
    pub viewport: Rect,
    /// Linked programs and the descriptor they were built from
    pub programs: FxHashMap<ProgramId, ProgramDesc>,
    /// Live buffers with their last uploaded content
    pub buffers: FxHashMap<BufferId, Vec<u8>>,
    /// Live textures
    pub textures: FxHashSet<TextureId>,
    /// Live framebuffers
    pub framebuffers: FxHashSet<FramebufferId>,
    /// Live multisampled surfaces
    pub surfaces: FxHashSet<SurfaceId>,
    locations: FxHashMap<(ProgramId, String), UniformLocation>,
    location_names: FxHashMap<UniformLocation, String>,
    next_id: u32,
    next_location: i32,
}

impl MockDeviceState {
    fn new() -> Self {
        Self {
            commands: Vec::new(),
            missing_uniforms: FxHashSet::default(),
            fail_compile: false,
            fail_framebuffers: false,
            max_color_attachments: 4,
            viewport: Rect { x: 0, y: 0, width: 640, height: 480 },
            programs: FxHashMap::default(),
            buffers: FxHashMap::default(),
            textures: FxHashSet::default(),
            framebuffers: FxHashSet::default(),
            surfaces: FxHashSet::default(),
            locations: FxHashMap::default(),
            location_names: FxHashMap::default(),
            next_id: 1,
            next_location: 0,
        }
    }

    fn alloc_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Drop all recorded commands
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Count recorded commands matching a predicate
    pub fn count(&self, predicate: impl Fn(&DeviceCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| predicate(c)).count()
    }

    /// Uniform name a location was handed out for
    pub fn uniform_name(&self, location: UniformLocation) -> Option<&str> {
        self.location_names.get(&location).map(String::as_str)
    }

    /// All vec3 values uploaded to a uniform name, in order
    pub fn uniform3_uploads(&self, name: &str) -> Vec<Vec3> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DeviceCommand::Uniform3 { location, value }
                    if self.uniform_name(*location) == Some(name) => Some(*value),
                _ => None,
            })
            .collect()
    }

    /// All vec4 values uploaded to a uniform name, in order
    pub fn uniform4_uploads(&self, name: &str) -> Vec<Vec4> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DeviceCommand::Uniform4 { location, value }
                    if self.uniform_name(*location) == Some(name) => Some(*value),
                _ => None,
            })
            .collect()
    }

    /// Number of array uploads (vec3 or vec4) to a uniform name
    pub fn array_upload_count(&self, name: &str) -> usize {
        self.count(|c| match c {
            DeviceCommand::Uniform3Array { location, .. }
            | DeviceCommand::Uniform4Array { location, .. } => self.uniform_name(*location) == Some(name),
            _ => false,
        })
    }
}

// ============================================================================
// MockGraphicsDevice
// ============================================================================

/// Recording graphics device
pub struct MockGraphicsDevice {
    state: Arc<Mutex<MockDeviceState>>,
}

impl MockGraphicsDevice {
    /// Create a new mock device
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockDeviceState::new())),
        }
    }

    /// Shared handle on the recorded state
    pub fn state(&self) -> Arc<Mutex<MockDeviceState>> {
        Arc::clone(&self.state)
    }

    fn lock(&self) -> MutexGuard<'_, MockDeviceState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, command: DeviceCommand) {
        self.lock().commands.push(command);
    }
}

impl Default for MockGraphicsDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    // ===== PROGRAMS =====

    fn create_program(&mut self, desc: &ProgramDesc) -> Result<ProgramId> {
        let mut state = self.lock();
        if state.fail_compile {
            engine_bail!("lumen3d::MockGraphicsDevice", "Program failed to compile");
        }
        let id = ProgramId(state.alloc_id());
        state.programs.insert(id, desc.clone());
        state.commands.push(DeviceCommand::CreateProgram(id));
        Ok(id)
    }

    fn destroy_program(&mut self, program: ProgramId) {
        let mut state = self.lock();
        state.programs.remove(&program);
        state.commands.push(DeviceCommand::DestroyProgram(program));
    }

    fn uniform_location(&mut self, program: ProgramId, name: &str) -> UniformLocation {
        let mut state = self.lock();
        if state.missing_uniforms.contains(name) || !state.programs.contains_key(&program) {
            return UniformLocation::INVALID;
        }
        let key = (program, name.to_string());
        if let Some(location) = state.locations.get(&key) {
            return *location;
        }
        let location = UniformLocation(state.next_location);
        state.next_location += 1;
        state.locations.insert(key, location);
        state.location_names.insert(location, name.to_string());
        location
    }

    fn bind_program(&mut self, program: ProgramId) {
        self.record(DeviceCommand::BindProgram(program));
    }

    fn unbind_program(&mut self) {
        self.record(DeviceCommand::UnbindProgram);
    }

    fn set_uniform3(&mut self, location: UniformLocation, value: Vec3) {
        self.record(DeviceCommand::Uniform3 { location, value });
    }

    fn set_uniform4(&mut self, location: UniformLocation, value: Vec4) {
        self.record(DeviceCommand::Uniform4 { location, value });
    }

    fn set_uniform3_array(&mut self, location: UniformLocation, values: &[Vec3]) {
        self.record(DeviceCommand::Uniform3Array { location, values: values.to_vec() });
    }

    fn set_uniform4_array(&mut self, location: UniformLocation, values: &[Vec4]) {
        self.record(DeviceCommand::Uniform4Array { location, values: values.to_vec() });
    }

    // ===== TEXTURES =====

    fn create_texture(&mut self, _desc: &TextureDesc) -> Result<TextureId> {
        let mut state = self.lock();
        let id = TextureId(state.alloc_id());
        state.textures.insert(id);
        state.commands.push(DeviceCommand::CreateTexture(id));
        Ok(id)
    }

    fn destroy_texture(&mut self, texture: TextureId) {
        let mut state = self.lock();
        state.textures.remove(&texture);
        state.commands.push(DeviceCommand::DestroyTexture(texture));
    }

    fn bind_texture(&mut self, texture: TextureId, slot: u32) {
        self.record(DeviceCommand::BindTexture { texture, slot });
    }

    fn unbind_texture(&mut self, slot: u32) {
        self.record(DeviceCommand::UnbindTexture { slot });
    }

    // ===== BUFFERS =====

    fn create_buffer(&mut self, kind: BufferKind) -> Result<BufferId> {
        let mut state = self.lock();
        let id = BufferId(state.alloc_id());
        state.buffers.insert(id, Vec::new());
        state.commands.push(DeviceCommand::CreateBuffer { buffer: id, kind });
        Ok(id)
    }

    fn upload_buffer(&mut self, buffer: BufferId, data: &[u8], usage: BufferUsage) -> Result<()> {
        let mut state = self.lock();
        match state.buffers.get_mut(&buffer) {
            Some(content) => {
                content.clear();
                content.extend_from_slice(data);
            }
            None => engine_bail!("lumen3d::MockGraphicsDevice", "Upload to unknown buffer {:?}", buffer),
        }
        state.commands.push(DeviceCommand::UploadBuffer { buffer, size: data.len(), usage });
        Ok(())
    }

    fn destroy_buffer(&mut self, buffer: BufferId) {
        let mut state = self.lock();
        state.buffers.remove(&buffer);
        state.commands.push(DeviceCommand::DestroyBuffer(buffer));
    }

    fn bind_vertex_buffer(&mut self, buffer: Option<BufferId>, _layout: &VertexLayout) {
        self.record(DeviceCommand::BindVertexBuffer(buffer));
    }

    fn bind_index_buffer(&mut self, buffer: Option<BufferId>, _index_size: IndexSize) {
        self.record(DeviceCommand::BindIndexBuffer(buffer));
    }

    fn draw(&mut self, call: &DrawCall) {
        self.record(DeviceCommand::Draw(*call));
    }

    // ===== FRAMEBUFFERS =====

    fn create_framebuffer(&mut self) -> Result<FramebufferId> {
        let mut state = self.lock();
        if state.fail_framebuffers {
            engine_bail!("lumen3d::MockGraphicsDevice", "Framebuffer creation failed");
        }
        let id = FramebufferId(state.alloc_id());
        state.framebuffers.insert(id);
        state.commands.push(DeviceCommand::CreateFramebuffer(id));
        Ok(id)
    }

    fn destroy_framebuffer(&mut self, framebuffer: FramebufferId) {
        let mut state = self.lock();
        state.framebuffers.remove(&framebuffer);
        state.commands.push(DeviceCommand::DestroyFramebuffer(framebuffer));
    }

    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferId>) {
        self.record(DeviceCommand::BindFramebuffer(framebuffer));
    }

    fn attach_color(&mut self, framebuffer: FramebufferId, index: u32, target: ColorTarget) {
        self.record(DeviceCommand::AttachColor { framebuffer, index, target });
    }

    fn attach_depth(&mut self, framebuffer: FramebufferId, texture: Option<TextureId>) {
        self.record(DeviceCommand::AttachDepth { framebuffer, texture });
    }

    fn create_multisample_surface(&mut self, width: u32, height: u32, samples: u32) -> Result<SurfaceId> {
        let mut state = self.lock();
        let id = SurfaceId(state.alloc_id());
        state.surfaces.insert(id);
        state.commands.push(DeviceCommand::CreateSurface { surface: id, width, height, samples });
        Ok(id)
    }

    fn destroy_multisample_surface(&mut self, surface: SurfaceId) {
        let mut state = self.lock();
        state.surfaces.remove(&surface);
        state.commands.push(DeviceCommand::DestroySurface(surface));
    }

    fn resolve_multisample(
        &mut self,
        surface: SurfaceId,
        texture: TextureId,
        side: Option<CubemapSide>,
        _width: u32,
        _height: u32,
    ) {
        self.record(DeviceCommand::Resolve { surface, texture, side });
    }

    fn max_color_attachments(&self) -> u32 {
        self.lock().max_color_attachments
    }

    // ===== STATE =====

    fn set_render_state(&mut self, state: &RenderState) {
        self.record(DeviceCommand::SetRenderState(*state));
    }

    fn viewport(&self) -> Rect {
        self.lock().viewport
    }
}

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
