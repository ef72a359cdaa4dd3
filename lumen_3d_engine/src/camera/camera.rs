/// Camera - low-level passive data container.
///
/// The caller sets the world-space position and orientation plus a
/// projection matrix. Shaders read position/rotation through the
/// `"nya camera position"` and `"nya camera rotation"` predefines.

use glam::{Mat4, Quat, Vec3};

/// Low-level camera. Stores state, derives only the view matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    position: Vec3,
    rotation: Quat,
    projection_matrix: Mat4,
}

impl Camera {
    /// Create a new camera at `position` facing along `rotation`.
    pub fn new(position: Vec3, rotation: Quat, projection: Mat4) -> Self {
        Self {
            position,
            rotation,
            projection_matrix: projection,
        }
    }

    // ===== GETTERS =====

    /// World-space position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// World-space orientation.
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Projection matrix (perspective or orthographic).
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    /// View matrix (inverse of the camera's world transform).
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position).inverse()
    }

    /// Combined view-projection matrix (projection * view).
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix()
    }

    // ===== SETTERS =====

    /// Set the world-space position.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Set the world-space orientation.
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }

    /// Set the projection matrix.
    pub fn set_projection(&mut self, matrix: Mat4) {
        self.projection_matrix = matrix;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Quat::IDENTITY, Mat4::IDENTITY)
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
