//! The scene camera: view and projection matrices from a position/orientation.

use glam::{Mat4, Vec3};

/// A perspective camera described by a world position and Euler rotation.
///
/// The view matrix is the inverse of the camera's own placement transform
/// (translate, then rotate about Y, X, Z — note the order differs from
/// [`Transform`](crate::Transform), which object rendering depends on). The
/// projection is a standard perspective matrix for wgpu's 0..1 clip depth.
///
/// Both matrices are caches: call [`Camera::calculate_view_projection`]
/// before reading them each frame.
#[derive(Clone, Debug)]
pub struct Camera {
    /// World-space position.
    pub position: Vec3,
    /// XYZ Euler rotation in degrees.
    pub rotation: Vec3,
    /// Cached world-to-view matrix.
    pub view_matrix: Mat4,
    /// Cached view-to-clip matrix.
    pub projection_matrix: Mat4,
    /// Viewport width / height.
    pub aspect: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
}

impl Camera {
    /// Creates a camera at `position` with the given rotation and viewport
    /// aspect ratio, with matrices computed immediately.
    pub fn new(position: Vec3, rotation: Vec3, aspect: f32) -> Self {
        let mut camera = Self {
            position,
            rotation,
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            aspect,
            near: 0.01,
            far: 1000.0,
            fov: 50.0,
        };
        camera.calculate_view_projection();
        camera
    }

    /// Rebuilds the view and projection matrices from the current state.
    pub fn calculate_view_projection(&mut self) {
        let rot = self.rotation * std::f32::consts::PI / 180.0;

        // The camera's own placement in the world; the view matrix moves the
        // world the opposite way.
        let world = Mat4::from_translation(self.position)
            * Mat4::from_rotation_y(rot.y)
            * Mat4::from_rotation_x(rot.x)
            * Mat4::from_rotation_z(rot.z);

        self.view_matrix = world.inverse();
        self.projection_matrix =
            Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far);
    }

    /// Accepts a new viewport aspect ratio and recomputes the matrices.
    ///
    /// Call this from the resize path whenever the surface dimensions change.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.calculate_view_projection();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn own_position_maps_to_view_origin() {
        let mut camera = Camera::new(Vec3::new(0.0, 3.0, 45.0), Vec3::ZERO, 16.0 / 9.0);
        camera.calculate_view_projection();

        let p = camera.view_matrix * Vec4::new(0.0, 3.0, 45.0, 1.0);
        assert!(p.x.abs() < 1e-4);
        assert!(p.y.abs() < 1e-4);
        assert!(p.z.abs() < 1e-4);
        assert!((p.w - 1.0).abs() < 1e-4);
    }

    #[test]
    fn view_is_inverse_of_placement() {
        let mut camera = Camera::new(
            Vec3::new(-4.0, 12.5, 3.0),
            Vec3::new(25.0, -160.0, 10.0),
            1.5,
        );
        camera.calculate_view_projection();

        let rot = camera.rotation * std::f32::consts::PI / 180.0;
        let world = Mat4::from_translation(camera.position)
            * Mat4::from_rotation_y(rot.y)
            * Mat4::from_rotation_x(rot.x)
            * Mat4::from_rotation_z(rot.z);

        let id = camera.view_matrix * world;
        let want = Mat4::IDENTITY.to_cols_array();
        for (g, w) in id.to_cols_array().iter().zip(want.iter()) {
            assert!((g - w).abs() < 1e-4);
        }
    }

    #[test]
    fn set_aspect_recomputes_projection() {
        let mut camera = Camera::new(Vec3::ZERO, Vec3::ZERO, 1.0);
        let before = camera.projection_matrix;
        camera.set_aspect(2.0);
        assert_ne!(camera.projection_matrix, before);
        // Horizontal focal length halves when the aspect doubles.
        assert!((camera.projection_matrix.x_axis.x - before.x_axis.x / 2.0).abs() < 1e-6);
    }

    #[test]
    fn recompute_is_idempotent() {
        let mut camera = Camera::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(10.0, 20.0, 0.0), 1.25);
        camera.calculate_view_projection();
        let view = camera.view_matrix;
        let proj = camera.projection_matrix;
        camera.calculate_view_projection();
        assert_eq!(camera.view_matrix, view);
        assert_eq!(camera.projection_matrix, proj);
    }
}
