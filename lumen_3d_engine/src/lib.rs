/*!
# Lumen 3D Engine

Resource layer of a small real-time 3D engine: shaders, materials,
skeletal animation and GPU buffer/framebuffer handles.

The crate never talks to a graphics API directly. Every GPU call goes
through the `GraphicsDevice` trait, so the binding logic runs unchanged
against a real backend or the recording `MockGraphicsDevice`.

## Architecture

- **Shader**: annotated shader text (`@vertex`, `@sampler`, `@predefined`,
  `@uniform`, `@include`) compiled into a shared program whose engine-supplied
  uniforms are pushed from the `RenderContext` at bind time
- **Material**: shader + textures + lazily resolved parameters + render state
- **Animation**: keyframed bone tracks, playback state and skeleton posing
- **VertexBuffer / Framebuffer**: copyable handles into slot tables with
  device-loss recovery
- **RenderContext**: explicit "current" state (camera, model transform,
  skeleton, framebuffer) threaded through every bind call
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod math;
pub mod camera;
pub mod graphics_device;
pub mod resource;
pub mod shader;
pub mod animation;
pub mod render_context;
pub mod render_object;

// Main lumen3d namespace module
pub mod lumen3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton
    pub use crate::engine::Engine;

    // Per-draw state
    pub use crate::render_context::{RenderContext, RenderContextConfig};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger, MemoryLogger};
    }

    // Graphics device seam
    pub mod device {
        pub use crate::graphics_device::*;
    }

    pub mod math {
        pub use crate::math::*;
    }

    pub mod camera {
        pub use crate::camera::*;
    }

    pub mod resource {
        pub use crate::resource::*;
    }

    pub mod shader {
        pub use crate::shader::*;
    }

    pub mod animation {
        pub use crate::animation::*;
    }

    pub mod render {
        pub use crate::render_object::*;
    }
}

// Re-export math library at crate root
pub use glam;
