//! Free-look camera controls: keyboard movement, drag-to-look, scroll zoom.
//!
//! Rotation is smoothed: mouse drags update a target orientation, and each
//! frame the camera's actual rotation moves a fixed fraction toward it, so a
//! released drag eases to a stop over a handful of frames instead of snapping.

use glam::{Vec2, Vec3};
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

use crate::camera::Camera;
use crate::input::Input;

/// Fraction of the previous rotation kept each frame.
const ROTATION_SMOOTHING: f32 = 0.8;

/// Drives a [`Camera`] from per-frame [`Input`] state.
///
/// - **WASD / arrows** move along the camera's forward and right vectors,
///   **Q/E** move straight down/up; **Shift** switches to the fast speed.
/// - **Left drag** turns the camera; sensitivity is in normalized device
///   units so a drag across the window turns the same amount at any size.
/// - **Scroll** dollies along the forward vector.
pub struct Controls {
    target_rotation: Vec3,
    move_speed: f32,
    fast_move_speed: f32,
    mouse_sensitivity: f32,
    zoom_speed: f32,
}

impl Controls {
    /// Creates controls easing toward `target_rotation` (degrees), normally
    /// the camera's starting rotation.
    pub fn new(target_rotation: Vec3) -> Self {
        Self {
            target_rotation,
            move_speed: 0.5,
            fast_move_speed: 1.5,
            mouse_sensitivity: 50.0,
            zoom_speed: 2.0,
        }
    }

    /// Applies one frame of input to the camera and recomputes its matrices.
    ///
    /// `width` and `height` are the current viewport dimensions in pixels,
    /// used to normalize the mouse drag.
    pub fn update(&mut self, input: &Input, camera: &mut Camera, width: f32, height: f32) {
        self.handle_movement(input, camera);

        if input.mouse_down(MouseButton::Left) {
            let ndc = pixels_to_ndc(input.mouse_delta(), width, height);
            self.target_rotation.x -= ndc.y * self.mouse_sensitivity;
            self.target_rotation.y += ndc.x * self.mouse_sensitivity;
        }

        let scroll = input.scroll_delta();
        if scroll != 0.0 {
            camera.position += forward_vector(camera.rotation) * self.zoom_speed * scroll;
        }

        // ease toward the target; roll stays locked at zero
        camera.rotation.x = ROTATION_SMOOTHING * camera.rotation.x
            + (1.0 - ROTATION_SMOOTHING) * self.target_rotation.x;
        camera.rotation.y = ROTATION_SMOOTHING * camera.rotation.y
            + (1.0 - ROTATION_SMOOTHING) * self.target_rotation.y;
        camera.rotation.z = 0.0;

        camera.calculate_view_projection();
    }

    fn handle_movement(&self, input: &Input, camera: &mut Camera) {
        let speed = if input.key_down(KeyCode::ShiftLeft) || input.key_down(KeyCode::ShiftRight) {
            self.fast_move_speed
        } else {
            self.move_speed
        };

        let forward = forward_vector(camera.rotation);
        let right = right_vector(camera.rotation);

        let mut movement = Vec3::ZERO;

        if input.key_down(KeyCode::KeyW) || input.key_down(KeyCode::ArrowUp) {
            movement += forward * speed;
        }
        if input.key_down(KeyCode::KeyS) || input.key_down(KeyCode::ArrowDown) {
            movement -= forward * speed;
        }
        if input.key_down(KeyCode::KeyA) || input.key_down(KeyCode::ArrowLeft) {
            movement -= right * speed;
        }
        if input.key_down(KeyCode::KeyD) || input.key_down(KeyCode::ArrowRight) {
            movement += right * speed;
        }
        if input.key_down(KeyCode::KeyQ) {
            movement.y -= speed;
        }
        if input.key_down(KeyCode::KeyE) {
            movement.y += speed;
        }

        camera.position += movement;
    }
}

/// Converts a pixel-space mouse delta to normalized device coordinates
/// (x right, y up, each spanning 2 units across the viewport).
fn pixels_to_ndc(delta: Vec2, width: f32, height: f32) -> Vec2 {
    Vec2::new(delta.x / width * 2.0, -delta.y / height * 2.0)
}

/// Where the camera looks, from its XYZ Euler rotation in degrees. At zero
/// rotation the camera faces -Z.
fn forward_vector(rotation: Vec3) -> Vec3 {
    let rx = rotation.x.to_radians();
    let ry = rotation.y.to_radians();
    Vec3::new(-ry.sin() * rx.cos(), rx.sin(), -ry.cos() * rx.cos())
}

/// The camera's right direction, yaw only: strafing stays horizontal even
/// while looking up or down.
fn right_vector(rotation: Vec3) -> Vec3 {
    let ry = rotation.y.to_radians();
    Vec3::new(ry.cos(), 0.0, ry.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(Vec3::new(0.0, 3.0, 45.0), Vec3::ZERO, 16.0 / 9.0)
    }

    fn assert_vec3_close(got: Vec3, want: Vec3) {
        assert!(
            (got - want).length() < 1e-5,
            "got {:?}, want {:?}",
            got,
            want
        );
    }

    #[test]
    fn forward_is_negative_z_at_rest() {
        assert_vec3_close(forward_vector(Vec3::ZERO), Vec3::new(0.0, 0.0, -1.0));
        assert_vec3_close(right_vector(Vec3::ZERO), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn yaw_right_angle_swings_forward_to_an_axis() {
        let rot = Vec3::new(0.0, 90.0, 0.0);
        assert_vec3_close(forward_vector(rot), Vec3::new(-1.0, 0.0, 0.0));
        assert_vec3_close(right_vector(rot), Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn strafe_ignores_pitch() {
        let rot = Vec3::new(-45.0, 0.0, 0.0);
        let right = right_vector(rot);
        assert_eq!(right.y, 0.0);
        assert_vec3_close(right, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn w_moves_forward_at_base_speed() {
        let mut cam = camera();
        let mut controls = Controls::new(Vec3::ZERO);
        let mut input = Input::new();
        input.press(KeyCode::KeyW);

        controls.update(&input, &mut cam, 800.0, 600.0);
        assert_vec3_close(cam.position, Vec3::new(0.0, 3.0, 44.5));
    }

    #[test]
    fn shift_moves_at_fast_speed() {
        let mut cam = camera();
        let mut controls = Controls::new(Vec3::ZERO);
        let mut input = Input::new();
        input.press(KeyCode::KeyW);
        input.press(KeyCode::ShiftLeft);

        controls.update(&input, &mut cam, 800.0, 600.0);
        assert_vec3_close(cam.position, Vec3::new(0.0, 3.0, 43.5));
    }

    #[test]
    fn opposing_keys_cancel() {
        let mut cam = camera();
        let mut controls = Controls::new(Vec3::ZERO);
        let mut input = Input::new();
        input.press(KeyCode::KeyA);
        input.press(KeyCode::KeyD);

        controls.update(&input, &mut cam, 800.0, 600.0);
        assert_vec3_close(cam.position, Vec3::new(0.0, 3.0, 45.0));
    }

    #[test]
    fn drag_turns_toward_the_drag_direction() {
        let mut cam = camera();
        let mut controls = Controls::new(Vec3::ZERO);
        let mut input = Input::new();
        input.hold_mouse(MouseButton::Left);
        // full-width drag to the right
        input.add_mouse_delta(Vec2::new(800.0, 0.0));

        controls.update(&input, &mut cam, 800.0, 600.0);
        // target yaw moved by 2 NDC units * sensitivity; one smoothing step
        // applies a fifth of it
        assert!((cam.rotation.y - 20.0).abs() < 1e-4);
        assert_eq!(cam.rotation.x, 0.0);
    }

    #[test]
    fn drag_without_button_does_nothing() {
        let mut cam = camera();
        let mut controls = Controls::new(Vec3::ZERO);
        let mut input = Input::new();
        input.add_mouse_delta(Vec2::new(800.0, 0.0));

        controls.update(&input, &mut cam, 800.0, 600.0);
        assert_eq!(cam.rotation, Vec3::ZERO);
    }

    #[test]
    fn scroll_dollies_along_forward() {
        let mut cam = camera();
        let mut controls = Controls::new(Vec3::ZERO);
        let mut input = Input::new();
        input.add_scroll(1.0);

        controls.update(&input, &mut cam, 800.0, 600.0);
        // forward is -Z at rest, zoom speed 2.0
        assert_vec3_close(cam.position, Vec3::new(0.0, 3.0, 43.0));
    }

    #[test]
    fn rotation_eases_toward_the_target() {
        let mut cam = camera();
        cam.rotation.y = 100.0;
        let mut controls = Controls::new(Vec3::ZERO);
        let input = Input::new();

        controls.update(&input, &mut cam, 800.0, 600.0);
        assert!((cam.rotation.y - 80.0).abs() < 1e-4);

        // each further frame keeps 80% of the remaining gap; about 21 frames
        // close a 100 degree gap to under one degree
        for _ in 0..20 {
            controls.update(&input, &mut cam, 800.0, 600.0);
        }
        assert!(cam.rotation.y.abs() < 1.0);
    }

    #[test]
    fn roll_stays_locked_at_zero() {
        let mut cam = camera();
        cam.rotation.z = 15.0;
        let mut controls = Controls::new(Vec3::new(10.0, -30.0, 5.0));
        let input = Input::new();

        controls.update(&input, &mut cam, 800.0, 600.0);
        assert_eq!(cam.rotation.z, 0.0);
    }
}
