/// Model transform (position, rotation, non-uniform scale)
///
/// Shader predefines read it directly for `"nya model *"` semantics and use
/// its inverse to bring world-space camera values into model space.

use glam::{Mat4, Quat, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    position: Vec3,
    rotation: Quat,
    scale: Vec3,
}

impl Transform {
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self { position, rotation, scale }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
    }

    /// World matrix (translation * rotation * scale)
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// World-space point to model space
    ///
    /// Zero scale components leave that axis unscaled.
    pub fn inverse_transform(&self, point: Vec3) -> Vec3 {
        let local = self.rotation.inverse() * (point - self.position);
        let scale = Vec3::select(self.scale.cmpeq(Vec3::ZERO), Vec3::ONE, self.scale);
        local / scale
    }

    /// World-space direction to model space (rotation only)
    pub fn inverse_rot(&self, direction: Vec3) -> Vec3 {
        self.rotation.inverse() * direction
    }

    /// World-space orientation to model space
    pub fn inverse_rot_quat(&self, rotation: Quat) -> Quat {
        self.rotation.inverse() * rotation
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Quat::IDENTITY, Vec3::ONE)
    }
}

#[cfg(test)]
#[path = "transform_tests.rs"]
mod tests;
