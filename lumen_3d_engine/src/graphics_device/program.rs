/// Program descriptor and uniform location types

/// Uniform binding location inside a linked program
///
/// Negative means "not found / optimized out". Uploads to an invalid
/// location are skipped by the engine before they reach the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub i32);

impl UniformLocation {
    /// Location of a missing or optimized-out uniform
    pub const INVALID: Self = Self(-1);

    /// Returns true if the location refers to a live uniform
    pub fn is_valid(&self) -> bool {
        self.0 >= 0
    }
}

impl Default for UniformLocation {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Sampler name bound to a texture unit at link time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplerBinding {
    /// Sampler variable name in the shader source
    pub name: String,
    /// Texture unit
    pub slot: u32,
}

/// Descriptor for compiling and linking a program
#[derive(Debug, Clone)]
pub struct ProgramDesc {
    /// Vertex stage source
    pub vertex_source: String,
    /// Fragment stage source
    pub fragment_source: String,
    /// Sampler unit assignments
    pub samplers: Vec<SamplerBinding>,
}
