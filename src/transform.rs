//! Position, rotation, and scale for placing objects in the scene.

use glam::{Mat4, Vec3};

/// A spatial transform with cached model and normal matrices.
///
/// `position` is in world units, `rotation` is XYZ Euler angles in degrees,
/// and `scale` is per-axis. The two matrix fields are caches derived from the
/// other three: they hold whatever [`Transform::calculate_matrix`] last
/// produced and must be recomputed before use each frame. There is no dirty
/// tracking; recomputation is unconditional and idempotent.
///
/// # Composition order
///
/// The model matrix composes translate, then rotate about X, then Y, then Z,
/// then scale. Rotations do not commute, so this exact order is part of the
/// contract.
#[derive(Clone, Debug)]
pub struct Transform {
    /// World-space position.
    pub position: Vec3,
    /// XYZ Euler rotation in degrees.
    pub rotation: Vec3,
    /// Per-axis scale factors.
    pub scale: Vec3,
    /// Cached local-to-world matrix; valid after `calculate_matrix`.
    pub model_matrix: Mat4,
    /// Cached inverse-transpose of the model matrix, for transforming normals.
    pub normal_matrix: Mat4,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            model_matrix: Mat4::IDENTITY,
            normal_matrix: Mat4::IDENTITY,
        }
    }
}

impl Transform {
    /// Creates an identity transform at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds `model_matrix` and `normal_matrix` from the current
    /// position, rotation, and scale.
    ///
    /// Always succeeds; calling it twice with unchanged inputs yields
    /// bit-identical matrices.
    pub fn calculate_matrix(&mut self) {
        let rot = self.rotation * std::f32::consts::PI / 180.0;

        self.model_matrix = Mat4::from_translation(self.position)
            * Mat4::from_rotation_x(rot.x)
            * Mat4::from_rotation_y(rot.y)
            * Mat4::from_rotation_z(rot.z)
            * Mat4::from_scale(self.scale);

        self.normal_matrix = self.model_matrix.inverse().transpose();
    }
}
