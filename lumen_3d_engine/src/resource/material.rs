/// Resource-level material type.
///
/// A Material bundles a shader with the textures, uniform parameters and
/// fixed-function state used to draw a surface.
///
/// Architecture:
/// - Shader: shared compiled program (uniform list defines the param slots)
/// - Textures: one texture per sampler semantics, bound to the shader's slot
/// - Parameters: one holder per shader uniform, resolved lazily at bind time
///   from a literal, a shared proxy, or a product of proxies
/// - Render state: blend/cull/depth-write/color-write flags

use glam::Vec4;
use crate::graphics_device::{BlendFactor, ColorWrites, CullOrder, RenderState};
use crate::render_context::RenderContext;
use crate::resource::{Proxy, Texture};
use crate::shader::Shader;

// ===== PARAMETER ARRAYS =====

/// Ordered list of vec4 values uploaded as one array uniform
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamArray {
    params: Vec<Vec4>,
}

impl ParamArray {
    pub fn new(count: usize) -> Self {
        Self { params: vec![Vec4::ZERO; count] }
    }

    /// Resize, truncating or zero-filling
    pub fn set_count(&mut self, count: usize) {
        self.params.resize(count, Vec4::ZERO);
    }

    pub fn count(&self) -> usize {
        self.params.len()
    }

    /// Out-of-range indices are ignored
    pub fn set(&mut self, idx: usize, value: Vec4) {
        if let Some(param) = self.params.get_mut(idx) {
            *param = value;
        }
    }

    pub fn get(&self, idx: usize) -> Option<Vec4> {
        self.params.get(idx).copied()
    }

    pub fn as_slice(&self) -> &[Vec4] {
        &self.params
    }
}

// ===== PARAMETER HOLDER =====

/// How one uniform slot gets its value
///
/// `None` means "not set"; a present but freed proxy means the owner
/// released it and the slot is skipped at bind time.
#[derive(Debug, Clone, Default)]
struct ParamHolder {
    value: Option<Proxy<Vec4>>,
    multiplier: Option<Proxy<Vec4>>,
    array: Option<Proxy<ParamArray>>,
}

impl ParamHolder {
    fn literal(value: Vec4) -> Self {
        Self { value: Some(Proxy::new(value)), ..Self::default() }
    }

    fn resolve(&self) -> Option<Vec4> {
        let value = self.value.as_ref()?.get()?;
        match &self.multiplier {
            Some(multiplier) => Some(value * multiplier.get()?),
            None => Some(value),
        }
    }
}

// ===== MATERIAL TEXTURE SLOT =====

#[derive(Debug, Clone)]
struct MaterialTexture {
    semantics: String,
    slot: u32,
    texture: Proxy<Texture>,
}

// ===== MATERIAL =====

/// Shader + textures + parameters + render state
///
/// The device lives in the `RenderContext`, so dropping a material cannot
/// free GPU objects. Call `release` before dropping it, otherwise a program
/// held only by this material stays alive on the device.
#[derive(Debug, Clone, Default)]
pub struct Material {
    name: String,
    shader: Shader,
    textures: Vec<MaterialTexture>,
    params: Vec<ParamHolder>,
    render_state: RenderState,
}

impl Material {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), ..Self::default() }
    }

    // ===== NAME =====

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    // ===== SHADER =====

    /// Assign the shader
    ///
    /// Every parameter is reset to the shader's declared default, and
    /// textures whose semantics the shader lacks are dropped. The previous
    /// shader is unloaded, destroying its program if this was the last holder.
    pub fn set_shader(&mut self, shader: &Shader, ctx: &mut RenderContext) {
        let shader = shader.clone();
        self.shader.unload(ctx);
        self.shader = shader;

        let shader = &self.shader;
        self.params = (0..shader.uniforms_count())
            .map(|idx| {
                let default = shader.uniform(idx).map_or(Vec4::ZERO, |u| u.default_value);
                ParamHolder::literal(default)
            })
            .collect();

        let textures = std::mem::take(&mut self.textures);
        self.textures = textures
            .into_iter()
            .filter_map(|mut t| {
                t.slot = shader.texture_slot(&t.semantics)?;
                Some(t)
            })
            .collect();
    }

    pub fn shader(&self) -> &Shader {
        &self.shader
    }

    // ===== TEXTURES =====

    pub fn textures_count(&self) -> usize {
        self.textures.len()
    }

    /// Name of the texture at `idx`, if the texture is still alive
    pub fn texture_name(&self, idx: usize) -> Option<String> {
        self.textures.get(idx)?.texture.with(|t| t.name().to_string())
    }

    pub fn texture_semantics(&self, idx: usize) -> Option<&str> {
        self.textures.get(idx).map(|t| t.semantics.as_str())
    }

    pub fn texture(&self, idx: usize) -> Option<&Proxy<Texture>> {
        self.textures.get(idx).map(|t| &t.texture)
    }

    /// Bind a texture to a sampler semantics (material-owned copy)
    pub fn set_texture(&mut self, semantics: &str, texture: Texture) {
        self.set_texture_proxy(semantics, &Proxy::new(texture));
    }

    /// Bind a shared texture to a sampler semantics
    ///
    /// No-op when the shader declares no such sampler. Setting the same
    /// semantics again replaces the texture.
    pub fn set_texture_proxy(&mut self, semantics: &str, texture: &Proxy<Texture>) {
        let Some(slot) = self.shader.texture_slot(semantics) else {
            return;
        };

        match self.textures.iter_mut().find(|t| t.semantics == semantics) {
            Some(entry) => {
                entry.slot = slot;
                entry.texture = texture.clone();
            }
            None => self.textures.push(MaterialTexture {
                semantics: semantics.to_string(),
                slot,
                texture: texture.clone(),
            }),
        }
    }

    // ===== PARAMETERS =====

    /// One slot per shader uniform
    pub fn params_count(&self) -> usize {
        self.params.len()
    }

    /// Uniform semantics of the slot
    pub fn param_name(&self, idx: usize) -> Option<&str> {
        if idx >= self.params.len() {
            return None;
        }
        self.shader.uniform(idx).map(|u| u.semantics.as_str())
    }

    pub fn param_idx(&self, semantics: &str) -> Option<usize> {
        self.shader.uniform_idx(semantics).filter(|idx| *idx < self.params.len())
    }

    fn holder(&mut self, idx: usize) -> Option<&mut ParamHolder> {
        self.params.get_mut(idx)
    }

    /// Literal value
    pub fn set_param(&mut self, idx: usize, value: Vec4) {
        if let Some(holder) = self.holder(idx) {
            *holder = ParamHolder::literal(value);
        }
    }

    /// Shared value read at bind time
    pub fn set_param_proxy(&mut self, idx: usize, value: &Proxy<Vec4>) {
        if let Some(holder) = self.holder(idx) {
            *holder = ParamHolder { value: Some(value.clone()), ..ParamHolder::default() };
        }
    }

    /// Shared value times a literal multiplier
    pub fn set_param_proxy_scaled(&mut self, idx: usize, value: &Proxy<Vec4>, multiplier: Vec4) {
        if let Some(holder) = self.holder(idx) {
            *holder = ParamHolder {
                value: Some(value.clone()),
                multiplier: Some(Proxy::new(multiplier)),
                array: None,
            };
        }
    }

    /// Product of two shared values
    pub fn set_param_proxy_product(&mut self, idx: usize, value: &Proxy<Vec4>, multiplier: &Proxy<Vec4>) {
        if let Some(holder) = self.holder(idx) {
            *holder = ParamHolder {
                value: Some(value.clone()),
                multiplier: Some(multiplier.clone()),
                array: None,
            };
        }
    }

    pub fn set_param_array(&mut self, idx: usize, array: ParamArray) {
        self.set_param_array_proxy(idx, &Proxy::new(array));
    }

    pub fn set_param_array_proxy(&mut self, idx: usize, array: &Proxy<ParamArray>) {
        if let Some(holder) = self.holder(idx) {
            *holder = ParamHolder { array: Some(array.clone()), ..ParamHolder::default() };
        }
    }

    pub fn param(&self, idx: usize) -> Option<&Proxy<Vec4>> {
        self.params.get(idx)?.value.as_ref()
    }

    pub fn param_multiplier(&self, idx: usize) -> Option<&Proxy<Vec4>> {
        self.params.get(idx)?.multiplier.as_ref()
    }

    pub fn param_array(&self, idx: usize) -> Option<&Proxy<ParamArray>> {
        self.params.get(idx)?.array.as_ref()
    }

    /// Value uploaded at bind time
    ///
    /// `None` for array slots and when a referenced proxy was freed.
    pub fn resolve_param(&self, idx: usize) -> Option<Vec4> {
        self.params.get(idx)?.resolve()
    }

    // ===== RENDER STATE =====

    pub fn zwrite(&self) -> bool {
        self.render_state.zwrite
    }

    pub fn set_zwrite(&mut self, enabled: bool) {
        self.render_state.zwrite = enabled;
    }

    pub fn color_write(&self) -> bool {
        !self.render_state.color_write.is_empty()
    }

    pub fn set_color_write(&mut self, enabled: bool) {
        self.render_state.color_write = if enabled { ColorWrites::ALL } else { ColorWrites::empty() };
    }

    pub fn blend(&self) -> bool {
        self.render_state.blend
    }

    /// Source and destination blend factors
    pub fn blend_factors(&self) -> (BlendFactor, BlendFactor) {
        (self.render_state.blend_src, self.render_state.blend_dst)
    }

    pub fn set_blend(&mut self, enabled: bool, src: BlendFactor, dst: BlendFactor) {
        self.render_state.blend = enabled;
        self.render_state.blend_src = src;
        self.render_state.blend_dst = dst;
    }

    pub fn set_blend_enabled(&mut self, enabled: bool) {
        self.render_state.blend = enabled;
    }

    pub fn cull_face(&self) -> bool {
        self.render_state.cull_face
    }

    pub fn cull_order(&self) -> CullOrder {
        self.render_state.cull_order
    }

    pub fn set_cull_face(&mut self, enabled: bool, order: CullOrder) {
        self.render_state.cull_face = enabled;
        self.render_state.cull_order = order;
    }

    pub fn set_cull_face_enabled(&mut self, enabled: bool) {
        self.render_state.cull_face = enabled;
    }

    pub fn render_state(&self) -> &RenderState {
        &self.render_state
    }

    // ===== BINDING =====

    /// Apply render state, bind the shader, push params, bind textures
    pub fn bind(&self, ctx: &mut RenderContext) {
        if !self.shader.is_valid() {
            return;
        }

        ctx.device_mut().set_render_state(&self.render_state);
        self.shader.bind(ctx);

        for (idx, holder) in self.params.iter().enumerate() {
            if let Some(array) = &holder.array {
                array.with(|a| self.shader.set_uniform4_array(idx, a.as_slice(), ctx));
            } else if let Some(value) = holder.resolve() {
                self.shader.set_uniform_value(idx, value, ctx);
            }
        }

        for entry in &self.textures {
            if let Some(id) = entry.texture.with(|t| t.id()).flatten() {
                ctx.device_mut().bind_texture(id, entry.slot);
            }
        }
    }

    pub fn unbind(&self, ctx: &mut RenderContext) {
        if !self.shader.is_valid() {
            return;
        }

        for entry in &self.textures {
            if entry.texture.with(|t| t.is_valid()).unwrap_or(false) {
                ctx.device_mut().unbind_texture(entry.slot);
            }
        }
        self.shader.unbind(ctx);
    }

    // ===== LIFECYCLE =====

    /// Drop the shader, textures and params; safe to call repeatedly
    pub fn release(&mut self, ctx: &mut RenderContext) {
        self.shader.unload(ctx);
        self.textures.clear();
        self.params.clear();
        self.render_state = RenderState::default();
    }
}

#[cfg(test)]
#[path = "material_tests.rs"]
mod tests;
