/// Central resource manager for the engine.
///
/// Caches compiled shaders and imported animations by path, so every
/// material loading the same shader shares one program (and one skeleton
/// upload cache), and every animation state shares one set of tracks.

use std::sync::Arc;
use rustc_hash::FxHashMap;
use crate::animation::{load_vmd, Animation, AnimationImportConfig};
use crate::error::Result;
use crate::render_context::RenderContext;
use crate::resource::ResourceProvider;
use crate::shader::{parse_shader, CompiledShader, Shader};

pub struct ResourceManager {
    provider: Box<dyn ResourceProvider>,
    import_config: AnimationImportConfig,
    shaders: FxHashMap<String, Arc<CompiledShader>>,
    animations: FxHashMap<String, Arc<Animation>>,
}

impl ResourceManager {
    /// Create an empty manager reading assets from `provider`
    pub fn new<P: ResourceProvider + 'static>(provider: P) -> Self {
        Self {
            provider: Box::new(provider),
            import_config: AnimationImportConfig::default(),
            shaders: FxHashMap::default(),
            animations: FxHashMap::default(),
        }
    }

    pub fn provider(&self) -> &dyn ResourceProvider {
        self.provider.as_ref()
    }

    pub fn animation_import_config(&self) -> &AnimationImportConfig {
        &self.import_config
    }

    /// Applies to animations loaded afterwards
    pub fn set_animation_import_config(&mut self, config: AnimationImportConfig) {
        self.import_config = config;
    }

    // ===== SHADERS =====

    /// Load (or reuse) the shader at `path`
    pub fn load_shader(&mut self, path: &str, ctx: &mut RenderContext) -> Result<Shader> {
        if let Some(compiled) = self.shaders.get(path) {
            return Ok(Shader::from_compiled(path, compiled.clone()));
        }

        let data = self.provider.read(path)?;
        let source = parse_shader(&data, path, self.provider.as_ref())?;
        let compiled = Arc::new(CompiledShader::compile(&source, ctx.device_mut())?);
        self.shaders.insert(path.to_string(), compiled.clone());

        crate::engine_info!("lumen3d::ResourceManager", "Shader '{}' loaded", path);
        Ok(Shader::from_compiled(path, compiled))
    }

    pub fn has_shader(&self, path: &str) -> bool {
        self.shaders.contains_key(path)
    }

    pub fn shaders_count(&self) -> usize {
        self.shaders.len()
    }

    // ===== ANIMATIONS =====

    /// Load (or reuse) the motion file at `path`
    pub fn load_animation(&mut self, path: &str) -> Result<Arc<Animation>> {
        if let Some(animation) = self.animations.get(path) {
            return Ok(animation.clone());
        }

        let data = self.provider.read(path)?;
        let animation = Arc::new(load_vmd(&data, &self.import_config)?);
        self.animations.insert(path.to_string(), animation.clone());

        crate::engine_info!("lumen3d::ResourceManager",
            "Animation '{}' loaded ({} bones, duration {})",
            path, animation.bones_count(), animation.duration());
        Ok(animation)
    }

    pub fn has_animation(&self, path: &str) -> bool {
        self.animations.contains_key(path)
    }

    pub fn animations_count(&self) -> usize {
        self.animations.len()
    }

    // ===== CLEANUP =====

    /// Drop every cached resource no longer held elsewhere
    ///
    /// Programs of dropped shaders are destroyed. Returns the number of
    /// resources removed.
    pub fn release_unused(&mut self, ctx: &mut RenderContext) -> usize {
        let unused_shaders: Vec<String> = self.shaders
            .iter()
            .filter(|(_, compiled)| Arc::strong_count(compiled) == 1)
            .map(|(path, _)| path.clone())
            .collect();

        for path in &unused_shaders {
            if let Some(compiled) = self.shaders.remove(path) {
                if let Ok(compiled) = Arc::try_unwrap(compiled) {
                    compiled.release(ctx.device_mut());
                }
            }
        }

        let animations_before = self.animations.len();
        self.animations.retain(|_, animation| Arc::strong_count(animation) > 1);
        let count = unused_shaders.len() + animations_before - self.animations.len();

        if count > 0 {
            crate::engine_debug!("lumen3d::ResourceManager", "Released {} unused resources", count);
        }
        count
    }

    /// Empty both caches
    ///
    /// Shaders still held elsewhere keep their program until their last
    /// holder unloads them.
    pub fn clear(&mut self, ctx: &mut RenderContext) {
        for (_, compiled) in self.shaders.drain() {
            if let Ok(compiled) = Arc::try_unwrap(compiled) {
                compiled.release(ctx.device_mut());
            }
        }
        self.animations.clear();
    }
}

#[cfg(test)]
#[path = "resource_manager_tests.rs"]
mod tests;
