/// Graphics device module - the external graphics capability consumed by the core

// Module declarations
pub mod graphics_device;
pub mod texture;
pub mod buffer;
pub mod program;
pub mod render_state;
pub mod frame_buffer;

// Recording device used by tests and headless tools (no GPU required)
pub mod mock_graphics_device;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Re-export from other modules
pub use texture::*;
pub use buffer::*;
pub use program::*;
pub use render_state::*;
pub use frame_buffer::*;
