//! Resource management module
//!
//! Asset byte providers, shared references, and the resource types built
//! on top of them (textures, materials), plus the caching manager.

mod resource_manager;
pub mod provider;
pub mod proxy;
pub mod texture;
pub mod material;

pub use resource_manager::ResourceManager;
pub use provider::{ResourceProvider, MemoryResourceProvider, FileResourceProvider};
pub use proxy::Proxy;
pub use texture::Texture;
pub use material::{Material, ParamArray};
