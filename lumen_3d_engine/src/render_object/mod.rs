//! GPU resource handles
//!
//! `VertexBuffer` and `Framebuffer` are lightweight copyable keys into the
//! slot tables owned by the `RenderContext`. The backing device objects are
//! created on first use and can be rebuilt after a device loss.

mod render_objects;
mod vertex_buffer;
mod frame_buffer;

pub use render_objects::{RenderObjects, BufferKey, FramebufferKey, ColorAttachment};
pub use vertex_buffer::{VertexBuffer, IndexElement};
pub use frame_buffer::Framebuffer;
