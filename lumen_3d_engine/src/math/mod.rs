//! Math helpers on top of glam
//!
//! glam provides the vector/quaternion/matrix value types; this module adds
//! the easing curve used by animation keyframes and the model transform
//! used by shader predefines.

mod bezier;
mod transform;

pub use bezier::Bezier;
pub use transform::Transform;
