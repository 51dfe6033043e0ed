//! Icebound: a ship on an animated icy ocean, rendered with wgpu.
//!
//! The scene is three procedurally generated objects — an ocean plane
//! displaced by wind-driven waves, a sky dome with a day/night cycle, and a
//! ship built from boxes — drawn by [`Renderable`]s that manage their own
//! GPU resources lazily. A free-look [`Camera`] driven by [`Controls`] flies
//! through it.
//!
//! Run the whole scene with [`run`], or assemble the pieces yourself:
//! generate meshes with [`plane`], [`sphere`], or [`ship_hull`], wrap them in
//! a [`Renderable`] with your own WGSL shaders, and render them against a
//! [`Camera`] and a [`SceneContext`].

pub mod app;
pub mod camera;
pub mod controls;
pub mod geometry;
pub mod gpu;
pub mod input;
pub mod renderable;
pub mod scene;
pub mod ship;
pub mod transform;

pub use app::run;
pub use camera::Camera;
pub use controls::Controls;
pub use geometry::{MeshData, plane, sphere};
pub use gpu::GpuContext;
pub use input::Input;
pub use renderable::Renderable;
pub use scene::{SceneContext, WIND_PRESETS, ocean, ship, sky};
pub use ship::ship_hull;
pub use transform::Transform;

// Re-export the math types used throughout the public API.
pub use glam::{Mat4, Vec2, Vec3};
