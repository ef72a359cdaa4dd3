//! Skeletal animation
//!
//! - `Animation`: keyframed bone tracks, sampled by time
//! - `AnimationState`: playback view (range, speed, weight, bone mask)
//! - `Skeleton`: posed bone buffers uploaded by shader predefines
//! - `load_vmd`: motion-capture importer

mod animation;
mod animation_state;
mod skeleton;
mod vmd;

pub use animation::{Animation, Bone, BoneInterpolation};
pub use animation_state::AnimationState;
pub use skeleton::{Skeleton, SkeletonBone};
pub use vmd::{load_vmd, AnimationImportConfig, VMD_MAGIC, VMD_FRAME_SIZE};
