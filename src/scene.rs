//! Scene-wide state and the stock scene objects.
//!
//! [`SceneContext`] carries the per-frame values every shader can read
//! (elapsed time, day/night, wind). The free functions build the three
//! stock renderables: the animated ocean plane, the sky dome, and the ship.

use glam::Vec3;

use crate::geometry::{plane, sphere};
use crate::renderable::Renderable;
use crate::ship::ship_hull;

/// Wind presets selectable at runtime, from calm to storm.
pub const WIND_PRESETS: [f32; 4] = [0.2, 0.8, 1.5, 2.2];

/// Per-frame scene state, uploaded to every renderable's scene uniforms.
#[derive(Clone, Copy, Debug)]
pub struct SceneContext {
    /// Seconds since the scene started.
    pub time: f32,
    /// Daytime when true, night otherwise.
    pub is_day: bool,
    /// Wind intensity driving the ocean animation. Never negative.
    pub wind_speed: f32,
}

impl Default for SceneContext {
    fn default() -> Self {
        Self {
            time: 0.0,
            is_day: true,
            wind_speed: WIND_PRESETS[1],
        }
    }
}

impl SceneContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances scene time by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.time += dt;
    }

    /// Flips between day and night.
    pub fn toggle_day(&mut self) {
        self.set_day(!self.is_day);
    }

    pub fn set_day(&mut self, is_day: bool) {
        self.is_day = is_day;
        log::info!("time of day: {}", if self.is_day { "day" } else { "night" });
    }

    /// Sets the wind intensity, clamped to non-negative.
    pub fn set_wind(&mut self, wind_speed: f32) {
        self.wind_speed = wind_speed.max(0.0);
        log::info!("wind speed: {}", self.wind_speed);
    }
}

/// The ocean: a finely subdivided plane laid flat and scaled out to the
/// horizon. The vertex shader displaces it with wind-driven waves.
pub fn ocean() -> Renderable {
    let mut ocean = Renderable::with_shaders(
        "ocean",
        plane(30, 30),
        include_str!("shaders/ocean.vert.wgsl"),
        include_str!("shaders/ocean.frag.wgsl"),
    );
    // the plane is generated on XY; lay it flat on XZ
    ocean.transform.rotation.x = -90.0;
    ocean.transform.scale = Vec3::splat(100.0);
    ocean
}

/// The sky: a large sphere around the scene, shaded from the inside with a
/// day/night gradient, sun, moon, and stars.
pub fn sky() -> Renderable {
    Renderable::with_shaders(
        "sky",
        sphere(50.0, 20, 20),
        include_str!("shaders/sky.vert.wgsl"),
        include_str!("shaders/sky.frag.wgsl"),
    )
}

/// The ship, floating at the water line. Its vertex shader rocks the hull
/// with the waves.
pub fn ship() -> Renderable {
    let mut ship = Renderable::with_shaders(
        "ship",
        ship_hull(),
        include_str!("shaders/ship.vert.wgsl"),
        include_str!("shaders/ship.frag.wgsl"),
    );
    ship.transform.position = Vec3::new(0.0, 0.9, 0.0);
    ship
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_calm_daytime() {
        let scene = SceneContext::new();
        assert_eq!(scene.time, 0.0);
        assert!(scene.is_day);
        assert_eq!(scene.wind_speed, 0.8);
    }

    #[test]
    fn toggle_day_flips_both_ways() {
        let mut scene = SceneContext::new();
        scene.toggle_day();
        assert!(!scene.is_day);
        scene.toggle_day();
        assert!(scene.is_day);
    }

    #[test]
    fn set_day_overrides_either_way() {
        let mut scene = SceneContext::new();
        scene.set_day(false);
        assert!(!scene.is_day);
        scene.set_day(true);
        assert!(scene.is_day);
    }

    #[test]
    fn wind_never_goes_negative() {
        let mut scene = SceneContext::new();
        scene.set_wind(-1.0);
        assert_eq!(scene.wind_speed, 0.0);
        scene.set_wind(WIND_PRESETS[3]);
        assert_eq!(scene.wind_speed, 2.2);
    }

    #[test]
    fn advance_accumulates_time() {
        let mut scene = SceneContext::new();
        scene.advance(1.0 / 60.0);
        scene.advance(1.0 / 60.0);
        assert!((scene.time - 2.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn stock_objects_are_placed_for_the_scene() {
        let ocean = ocean();
        assert_eq!(ocean.transform.rotation.x, -90.0);
        assert_eq!(ocean.transform.scale, Vec3::splat(100.0));

        let ship = ship();
        assert_eq!(ship.transform.position, Vec3::new(0.0, 0.9, 0.0));

        let sky = sky();
        assert_eq!(sky.transform.position, Vec3::ZERO);
    }
}
