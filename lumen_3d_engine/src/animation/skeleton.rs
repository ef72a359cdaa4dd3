/// Posed bone hierarchy
///
/// Holds world-space bone positions and rotations laid out the way the
/// `"nya bones pos"` / `"nya bones rot"` predefines upload them. Every
/// skeleton carries a process-unique id used by the shader upload cache.

use std::sync::atomic::{AtomicU64, Ordering};
use glam::{Quat, Vec3, Vec4};
use crate::error::Result;
use crate::engine_bail;
use crate::animation::{AnimationState, Bone};

static NEXT_SKELETON_ID: AtomicU64 = AtomicU64::new(1);

/// Bone definition (rest pose)
#[derive(Debug, Clone, PartialEq)]
pub struct SkeletonBone {
    pub name: String,
    /// Parent index, always lower than the bone's own index
    pub parent: Option<usize>,
    /// Rest offset from the parent (or from the origin for roots)
    pub offset: Vec3,
}

#[derive(Debug)]
pub struct Skeleton {
    id: u64,
    bones: Vec<SkeletonBone>,
    positions: Vec<Vec3>,
    rotations: Vec<Quat>,
}

impl Skeleton {
    pub fn new() -> Self {
        Self {
            id: NEXT_SKELETON_ID.fetch_add(1, Ordering::Relaxed),
            bones: Vec::new(),
            positions: Vec::new(),
            rotations: Vec::new(),
        }
    }

    /// Process-unique identity
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Append a bone; parents must be added before their children
    pub fn add_bone(&mut self, name: &str, parent: Option<usize>, offset: Vec3) -> Result<usize> {
        let idx = self.bones.len();
        if let Some(p) = parent {
            if p >= idx {
                engine_bail!("lumen3d::Skeleton",
                    "Bone '{}': parent {} must be added before the bone (index {})", name, p, idx);
            }
        }

        let (parent_pos, parent_rot) = match parent {
            Some(p) => (self.positions[p], self.rotations[p]),
            None => (Vec3::ZERO, Quat::IDENTITY),
        };

        self.bones.push(SkeletonBone { name: name.to_string(), parent, offset });
        self.positions.push(parent_pos + parent_rot * offset);
        self.rotations.push(parent_rot);
        Ok(idx)
    }

    pub fn bones_count(&self) -> usize {
        self.bones.len()
    }

    pub fn bone(&self, idx: usize) -> Option<&SkeletonBone> {
        self.bones.get(idx)
    }

    pub fn bone_idx(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|b| b.name == name)
    }

    /// World-space bone positions
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// World-space bone rotations
    pub fn rotations(&self) -> &[Quat] {
        &self.rotations
    }

    /// Rotations as (x, y, z, w) for vec4 array uploads
    pub fn rotations_vec4(&self) -> &[Vec4] {
        bytemuck::cast_slice(&self.rotations)
    }

    /// Pose every bone from `state` at playback `time`
    ///
    /// Bones missing from the animation, or masked out, keep their rest pose.
    /// The state's weight blends between rest and animated pose.
    pub fn update(&mut self, state: &AnimationState, time: u32) {
        let animation = state.animation();
        let weight = state.weight().clamp(0.0, 1.0);

        for idx in 0..self.bones.len() {
            let bone = &self.bones[idx];
            let local = match animation.bone_idx(&bone.name) {
                Some(anim_idx) if state.is_bone_enabled(&bone.name) => {
                    let posed = state.bone(anim_idx, time);
                    Bone {
                        pos: posed.pos * weight,
                        rot: Quat::IDENTITY.slerp(posed.rot, weight),
                    }
                }
                _ => Bone::default(),
            };

            let (parent_pos, parent_rot) = match bone.parent {
                Some(p) => (self.positions[p], self.rotations[p]),
                None => (Vec3::ZERO, Quat::IDENTITY),
            };

            self.positions[idx] = parent_pos + parent_rot * (bone.offset + local.pos);
            self.rotations[idx] = parent_rot * local.rot;
        }
    }

    /// Return every bone to its rest pose
    pub fn reset(&mut self) {
        for idx in 0..self.bones.len() {
            let bone = &self.bones[idx];
            let (parent_pos, parent_rot) = match bone.parent {
                Some(p) => (self.positions[p], self.rotations[p]),
                None => (Vec3::ZERO, Quat::IDENTITY),
            };
            self.positions[idx] = parent_pos + parent_rot * bone.offset;
            self.rotations[idx] = parent_rot;
        }
    }
}

impl Default for Skeleton {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "skeleton_tests.rs"]
mod tests;
