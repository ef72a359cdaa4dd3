/// Keyframed bone tracks
///
/// Each bone owns a time-sorted list of keyframes. Sampling interpolates
/// between the two keyframes surrounding the query time, easing progress
/// with the destination keyframe's curves.

use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;
use crate::math::Bezier;

/// Bone pose relative to its rest position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bone {
    pub pos: Vec3,
    pub rot: Quat,
}

impl Default for Bone {
    fn default() -> Self {
        Self { pos: Vec3::ZERO, rot: Quat::IDENTITY }
    }
}

/// Easing curves used when interpolating towards a keyframe
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoneInterpolation {
    pub pos_x: Bezier,
    pub pos_y: Bezier,
    pub pos_z: Bezier,
    pub rot: Bezier,
}

#[derive(Debug, Clone)]
struct Keyframe {
    time: u32,
    bone: Bone,
    interpolation: BoneInterpolation,
}

#[derive(Debug, Clone, Default)]
struct BoneTrack {
    name: String,
    frames: Vec<Keyframe>,
}

/// Bone animation
#[derive(Debug, Clone, Default)]
pub struct Animation {
    bones_map: FxHashMap<String, usize>,
    tracks: Vec<BoneTrack>,
    duration: u32,
}

impl Animation {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== BUILD =====

    /// Index of the bone named `name`, creating an empty track if needed
    pub fn add_bone(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.bones_map.get(name) {
            return idx;
        }

        let idx = self.tracks.len();
        self.tracks.push(BoneTrack { name: name.to_string(), frames: Vec::new() });
        self.bones_map.insert(name.to_string(), idx);
        idx
    }

    /// Add a linearly interpolated keyframe
    pub fn add_bone_frame(&mut self, idx: usize, time: u32, bone: Bone) {
        self.add_bone_frame_with_interpolation(idx, time, bone, BoneInterpolation::default());
    }

    /// Add a keyframe eased by `interpolation`
    ///
    /// Frames stay sorted by time; a frame at an existing time lands after
    /// it. Unknown bone indices are ignored.
    pub fn add_bone_frame_with_interpolation(
        &mut self,
        idx: usize,
        time: u32,
        bone: Bone,
        interpolation: BoneInterpolation,
    ) {
        let Some(track) = self.tracks.get_mut(idx) else {
            return;
        };

        let at = track.frames.partition_point(|f| f.time <= time);
        track.frames.insert(at, Keyframe { time, bone, interpolation });
        self.duration = self.duration.max(time);
    }

    // ===== QUERY =====

    /// Last keyframe time over every bone
    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn bones_count(&self) -> usize {
        self.tracks.len()
    }

    pub fn bone_idx(&self, name: &str) -> Option<usize> {
        self.bones_map.get(name).copied()
    }

    pub fn bone_name(&self, idx: usize) -> Option<&str> {
        self.tracks.get(idx).map(|t| t.name.as_str())
    }

    /// Number of keyframes on a bone
    pub fn frames_count(&self, idx: usize) -> usize {
        self.tracks.get(idx).map_or(0, |t| t.frames.len())
    }

    /// Sample a bone pose at `time`
    ///
    /// With `looped`, the time wraps modulo the duration. Before the first
    /// keyframe the first pose is held, after the last the last pose is held.
    /// Unknown bones and empty tracks give the rest pose.
    pub fn bone(&self, idx: usize, time: u32, looped: bool) -> Bone {
        let Some(track) = self.tracks.get(idx) else {
            return Bone::default();
        };
        let frames = &track.frames;
        let (Some(first), Some(last)) = (frames.first(), frames.last()) else {
            return Bone::default();
        };

        let time = if looped && self.duration > 0 {
            time % self.duration
        } else {
            time
        };

        let next = frames.partition_point(|f| f.time <= time);
        if next == 0 {
            return first.bone;
        }
        if next == frames.len() {
            return last.bone;
        }

        let from = &frames[next - 1];
        let to = &frames[next];
        let span = (to.time - from.time) as f32;
        let k = (time - from.time) as f32 / span;

        let curves = &to.interpolation;
        let pos = Vec3::new(
            lerp(from.bone.pos.x, to.bone.pos.x, curves.pos_x.calculate(k)),
            lerp(from.bone.pos.y, to.bone.pos.y, curves.pos_y.calculate(k)),
            lerp(from.bone.pos.z, to.bone.pos.z, curves.pos_z.calculate(k)),
        );
        let rot = from.bone.rot.slerp(to.bone.rot, curves.rot.calculate(k));

        Bone { pos, rot }
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
#[path = "animation_tests.rs"]
mod tests;
