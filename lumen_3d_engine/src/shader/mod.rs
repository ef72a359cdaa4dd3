//! Shader assets
//!
//! - `shader_description`: the annotated shader text format (`@vertex`,
//!   `@sampler`, `@predefined`, `@uniform`, `@include`, ...)
//! - `shader`: compiled programs and their per-draw binding against the
//!   render context (camera, model transform, skeleton, viewport)

pub mod shader_description;
mod shader;

pub use shader_description::{
    parse_shader, ShaderSource, SamplerDecl, PredefinedDecl, UniformDecl,
    PredefinedKind, TransformTag, PREDEFINED_COUNT,
};
pub use shader::{Shader, CompiledShader, CompiledPredefined, CompiledUniform};
