/// Compiled shaders and their per-draw binding
///
/// A `CompiledShader` is the linked program plus every resolved uniform
/// location. It is shared (`Arc`) between every `Shader` loaded from the
/// same asset, so its skeleton upload cache also spans every material
/// using it.
///
/// Binding reads the render context:
/// - camera position/rotation, optionally brought into model space
/// - bone positions/rotations, uploaded once per skeleton per frame
/// - viewport rectangle
/// - model position/rotation/scale

use std::sync::{Arc, Mutex};
use glam::{Vec3, Vec4};
use crate::error::Result;
use crate::graphics_device::{
    GraphicsDevice, ProgramDesc, ProgramId, SamplerBinding, UniformLocation,
};
use crate::math::Transform;
use crate::render_context::RenderContext;
use crate::resource::ResourceProvider;
use crate::shader::{
    parse_shader, PredefinedKind, SamplerDecl, ShaderSource, TransformTag,
};

// ============================================================================
// CompiledShader
// ============================================================================

/// Predefined bound to a live uniform location
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompiledPredefined {
    pub kind: PredefinedKind,
    pub transform: TransformTag,
    pub location: UniformLocation,
}

/// User uniform with its resolved location
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledUniform {
    pub semantics: String,
    pub name: String,
    pub transform: TransformTag,
    pub default_value: Vec4,
    /// `UniformLocation::INVALID` when optimized out
    pub location: UniformLocation,
}

// Last (skeleton id, frame) pushed for each bone buffer
#[derive(Debug, Default)]
struct SkeletonUploadCache {
    positions: Option<(u64, u64)>,
    rotations: Option<(u64, u64)>,
}

#[derive(Debug)]
pub struct CompiledShader {
    program: ProgramId,
    samplers: Vec<SamplerDecl>,
    predefines: Vec<CompiledPredefined>,
    uniforms: Vec<CompiledUniform>,
    skeleton_cache: Mutex<SkeletonUploadCache>,
}

impl CompiledShader {
    /// Link a parsed description and resolve every uniform location
    ///
    /// Missing locations are kept as `UniformLocation::INVALID`.
    pub fn compile(source: &ShaderSource, device: &mut dyn GraphicsDevice) -> Result<Self> {
        let desc = ProgramDesc {
            vertex_source: source.vertex.clone(),
            fragment_source: source.fragment.clone(),
            samplers: source
                .samplers
                .iter()
                .map(|s| SamplerBinding { name: s.name.clone(), slot: s.slot })
                .collect(),
        };
        let program = device.create_program(&desc)?;

        let predefines = PredefinedKind::ALL
            .iter()
            .filter_map(|&kind| {
                source.predefined(kind).map(|decl| CompiledPredefined {
                    kind,
                    transform: decl.transform,
                    location: device.uniform_location(program, &decl.name),
                })
            })
            .collect();

        let uniforms = source
            .uniforms
            .iter()
            .map(|u| CompiledUniform {
                semantics: u.semantics.clone(),
                name: u.name.clone(),
                transform: u.transform,
                default_value: u.default_value,
                location: device.uniform_location(program, &u.name),
            })
            .collect();

        Ok(Self {
            program,
            samplers: source.samplers.clone(),
            predefines,
            uniforms,
            skeleton_cache: Mutex::new(SkeletonUploadCache::default()),
        })
    }

    pub fn program(&self) -> ProgramId {
        self.program
    }

    pub fn samplers(&self) -> &[SamplerDecl] {
        &self.samplers
    }

    pub fn predefines(&self) -> &[CompiledPredefined] {
        &self.predefines
    }

    pub fn uniforms(&self) -> &[CompiledUniform] {
        &self.uniforms
    }

    /// Destroy the program
    pub fn release(self, device: &mut dyn GraphicsDevice) {
        device.destroy_program(self.program);
    }

    /// Forget which skeletons were uploaded (after a program rebuild)
    pub fn reset_skeleton_cache(&self) {
        *self.cache() = SkeletonUploadCache::default();
    }

    fn cache(&self) -> std::sync::MutexGuard<'_, SkeletonUploadCache> {
        self.skeleton_cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn bind(&self, ctx: &mut RenderContext) {
        let transform = *ctx.transform();
        let camera = ctx.camera().copied();
        let skeleton = ctx.skeleton().cloned();
        let frame = ctx.frame_index();
        let device = ctx.device_mut();

        device.bind_program(self.program);

        for p in &self.predefines {
            if !p.location.is_valid() {
                continue;
            }

            match p.kind {
                PredefinedKind::CameraPosition => {
                    let value = match &camera {
                        Some(camera) => apply_transform(p.transform, &transform, camera.position()),
                        None => Vec3::ZERO,
                    };
                    device.set_uniform3(p.location, value);
                }
                PredefinedKind::CameraRotation => {
                    let value = match &camera {
                        Some(camera) => {
                            let rot = match p.transform {
                                TransformTag::None => camera.rotation(),
                                TransformTag::Local | TransformTag::LocalRot => {
                                    transform.inverse_rot_quat(camera.rotation())
                                }
                            };
                            Vec4::from(rot)
                        }
                        None => Vec4::ZERO,
                    };
                    device.set_uniform4(p.location, value);
                }
                PredefinedKind::BonesPosition => {
                    let Some(skeleton) = &skeleton else { continue };
                    let key = (skeleton.id(), frame);
                    let mut cache = self.cache();
                    if cache.positions != Some(key) {
                        device.set_uniform3_array(p.location, skeleton.positions());
                        cache.positions = Some(key);
                    }
                }
                PredefinedKind::BonesRotation => {
                    let Some(skeleton) = &skeleton else { continue };
                    let key = (skeleton.id(), frame);
                    let mut cache = self.cache();
                    if cache.rotations != Some(key) {
                        device.set_uniform4_array(p.location, skeleton.rotations_vec4());
                        cache.rotations = Some(key);
                    }
                }
                PredefinedKind::Viewport => {
                    let r = device.viewport();
                    device.set_uniform4(
                        p.location,
                        Vec4::new(r.x as f32, r.y as f32, r.width as f32, r.height as f32),
                    );
                }
                PredefinedKind::ModelPosition => device.set_uniform3(p.location, transform.position()),
                PredefinedKind::ModelRotation => device.set_uniform4(p.location, Vec4::from(transform.rotation())),
                PredefinedKind::ModelScale => device.set_uniform3(p.location, transform.scale()),
            }
        }
    }
}

fn apply_transform(tag: TransformTag, transform: &Transform, value: Vec3) -> Vec3 {
    match tag {
        TransformTag::None => value,
        TransformTag::Local => transform.inverse_transform(value),
        TransformTag::LocalRot => transform.inverse_rot(value),
    }
}

// ============================================================================
// Shader
// ============================================================================

/// Shader asset handle
///
/// Every query and bind on an unloaded shader is a silent no-op, as is
/// any out-of-range uniform index.
///
/// Dropping a handle never touches the device. The last holder must call
/// `unload` (or let `ResourceManager::release_unused` see the program
/// unused) or the program leaks.
#[derive(Debug, Clone, Default)]
pub struct Shader {
    name: String,
    shared: Option<Arc<CompiledShader>>,
}

impl Shader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already compiled (typically cached) program
    pub fn from_compiled(name: &str, compiled: Arc<CompiledShader>) -> Self {
        Self { name: name.to_string(), shared: Some(compiled) }
    }

    /// Load and compile the shader at `path`
    ///
    /// On failure the previously loaded program (if any) stays in place.
    pub fn load(&mut self, path: &str, provider: &dyn ResourceProvider, ctx: &mut RenderContext) -> Result<()> {
        let data = provider.read(path)?;
        self.load_from_bytes(path, &data, provider, ctx)
    }

    /// Compile shader text; `name` anchors relative `@include` paths
    pub fn load_from_source(
        &mut self,
        name: &str,
        text: &str,
        provider: &dyn ResourceProvider,
        ctx: &mut RenderContext,
    ) -> Result<()> {
        self.load_from_bytes(name, text.as_bytes(), provider, ctx)
    }

    fn load_from_bytes(
        &mut self,
        name: &str,
        data: &[u8],
        provider: &dyn ResourceProvider,
        ctx: &mut RenderContext,
    ) -> Result<()> {
        let source = parse_shader(data, name, provider)?;
        let compiled = CompiledShader::compile(&source, ctx.device_mut())?;

        self.unload(ctx);
        self.name = name.to_string();
        self.shared = Some(Arc::new(compiled));
        crate::engine_debug!("lumen3d::Shader", "Loaded shader '{}'", name);
        Ok(())
    }

    /// Drop the program; destroyed when this was the last holder
    pub fn unload(&mut self, ctx: &mut RenderContext) {
        if let Some(shared) = self.shared.take() {
            if let Ok(compiled) = Arc::try_unwrap(shared) {
                compiled.release(ctx.device_mut());
            }
        }
        self.name.clear();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_valid(&self) -> bool {
        self.shared.is_some()
    }

    pub fn compiled(&self) -> Option<&Arc<CompiledShader>> {
        self.shared.as_ref()
    }

    /// Activate the program and push every predefined value
    pub fn bind(&self, ctx: &mut RenderContext) {
        if let Some(shared) = &self.shared {
            shared.bind(ctx);
        }
    }

    pub fn unbind(&self, ctx: &mut RenderContext) {
        if self.shared.is_some() {
            ctx.device_mut().unbind_program();
        }
    }

    // ===== SAMPLERS =====

    /// Texture unit of a sampler semantics
    pub fn texture_slot(&self, semantics: &str) -> Option<u32> {
        self.shared
            .as_ref()?
            .samplers
            .iter()
            .find(|s| s.semantics == semantics)
            .map(|s| s.slot)
    }

    pub fn texture_slots_count(&self) -> usize {
        self.shared.as_ref().map_or(0, |s| s.samplers.len())
    }

    // ===== UNIFORMS =====

    pub fn uniform(&self, idx: usize) -> Option<&CompiledUniform> {
        self.shared.as_ref()?.uniforms.get(idx)
    }

    pub fn uniforms_count(&self) -> usize {
        self.shared.as_ref().map_or(0, |s| s.uniforms.len())
    }

    pub fn uniform_idx(&self, semantics: &str) -> Option<usize> {
        self.shared.as_ref()?.uniforms.iter().position(|u| u.semantics == semantics)
    }

    /// Upload a uniform value, applying its transform tag to xyz
    pub fn set_uniform_value(&self, idx: usize, value: Vec4, ctx: &mut RenderContext) {
        let Some(uniform) = self.uniform(idx) else {
            return;
        };
        if !uniform.location.is_valid() {
            return;
        }

        let xyz = apply_transform(uniform.transform, ctx.transform(), value.truncate());
        ctx.device_mut().set_uniform4(uniform.location, xyz.extend(value.w));
    }

    /// Upload an array uniform as is
    pub fn set_uniform4_array(&self, idx: usize, values: &[Vec4], ctx: &mut RenderContext) {
        let Some(uniform) = self.uniform(idx) else {
            return;
        };
        if !uniform.location.is_valid() {
            return;
        }

        ctx.device_mut().set_uniform4_array(uniform.location, values);
    }
}

#[cfg(test)]
#[path = "shader_tests.rs"]
mod tests;
