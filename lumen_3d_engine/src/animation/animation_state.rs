/// Playback view over a shared animation
///
/// Several states can share one `Animation`; each keeps its own range,
/// speed, blend weight and bone mask. The version changes whenever the
/// mask changes so posed skeletons know to rebuild their bone lists.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use rustc_hash::FxHashSet;
use crate::animation::{Animation, Bone};

static NEXT_VERSION: AtomicU32 = AtomicU32::new(1);

fn next_version() -> u32 {
    NEXT_VERSION.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone)]
pub struct AnimationState {
    animation: Arc<Animation>,
    range_from: u32,
    range_to: u32,
    speed: f32,
    weight: f32,
    looped: bool,
    // None = every bone enabled
    mask: Option<FxHashSet<String>>,
    version: u32,
}

impl AnimationState {
    /// Full-range, unmasked playback at speed and weight 1
    pub fn new(animation: Arc<Animation>) -> Self {
        let range_to = animation.duration();
        Self {
            animation,
            range_from: 0,
            range_to,
            speed: 1.0,
            weight: 1.0,
            looped: true,
            mask: None,
            version: next_version(),
        }
    }

    pub fn animation(&self) -> &Arc<Animation> {
        &self.animation
    }

    pub fn duration(&self) -> u32 {
        self.animation.duration()
    }

    // ===== RANGE =====

    /// Restrict playback to `[from, to]`, clamped to the duration
    pub fn set_range(&mut self, from: u32, to: u32) {
        let duration = self.animation.duration();
        self.range_to = to.min(duration);
        self.range_from = from.min(duration).min(self.range_to);
    }

    pub fn range_from(&self) -> u32 {
        self.range_from
    }

    pub fn range_to(&self) -> u32 {
        self.range_to
    }

    // ===== PLAYBACK =====

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Blend weight applied when posing a skeleton (0 = rest, 1 = full)
    pub fn set_weight(&mut self, weight: f32) {
        self.weight = weight;
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn set_looped(&mut self, looped: bool) {
        self.looped = looped;
    }

    pub fn looped(&self) -> bool {
        self.looped
    }

    /// Map playback time to animation time inside the range
    pub fn animation_time(&self, time: u32) -> u32 {
        let scaled = (time as f32 * self.speed).max(0.0) as u32;
        let length = self.range_to - self.range_from;
        if length == 0 {
            return self.range_from;
        }

        if self.looped {
            self.range_from + scaled % length
        } else {
            self.range_from + scaled.min(length)
        }
    }

    /// Pose of a bone at playback `time`
    pub fn bone(&self, idx: usize, time: u32) -> Bone {
        self.animation.bone(idx, self.animation_time(time), false)
    }

    // ===== MASK =====

    /// Enable every bone (`true`) or disable every bone (`false`)
    pub fn mask_all(&mut self, enabled: bool) {
        if enabled {
            if self.mask.take().is_some() {
                self.version = next_version();
            }
        } else {
            match &mut self.mask {
                Some(mask) => mask.clear(),
                None => self.mask = Some(FxHashSet::default()),
            }
            self.version = next_version();
        }
    }

    /// Enable or disable one bone; unknown bones are ignored
    ///
    /// Enabling only matters once something has been masked out.
    pub fn add_mask(&mut self, name: &str, enabled: bool) {
        if self.animation.bone_idx(name).is_none() {
            return;
        }

        if enabled {
            let Some(mask) = &mut self.mask else {
                return;
            };
            mask.insert(name.to_string());
        } else {
            let animation = &self.animation;
            let mask = self.mask.get_or_insert_with(|| {
                (0..animation.bones_count())
                    .filter_map(|i| animation.bone_name(i).map(str::to_string))
                    .collect()
            });
            mask.remove(name);
        }
        self.version = next_version();
    }

    pub fn is_bone_enabled(&self, name: &str) -> bool {
        self.mask.as_ref().map_or(true, |mask| mask.contains(name))
    }

    /// Changes on every mask change
    pub fn version(&self) -> u32 {
        self.version
    }
}

#[cfg(test)]
#[path = "animation_state_tests.rs"]
mod tests;
