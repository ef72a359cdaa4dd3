//! Camera module - the active viewpoint read by shader predefines.
//!
//! The engine does NOT own cameras. The caller drives them and hands the
//! active one to the `RenderContext` before binding materials.

mod camera;

pub use camera::Camera;
