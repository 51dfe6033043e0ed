//! Application driver: window, event loop, and the per-frame render path.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context as _;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::KeyCode;
use winit::window::{Window, WindowAttributes, WindowId};

use glam::Vec3;

use crate::camera::Camera;
use crate::controls::Controls;
use crate::gpu::GpuContext;
use crate::input::Input;
use crate::renderable::Renderable;
use crate::scene::{self, SceneContext, WIND_PRESETS};

/// Background color behind the sky dome.
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.2,
    g: 0.2,
    b: 0.25,
    a: 1.0,
};

/// Builds the window and runs the event loop until the window closes.
pub fn run() -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::Pending;
    event_loop.run_app(&mut app).context("event loop error")?;
    Ok(())
}

enum App {
    Pending,
    Running(Scene),
}

struct Scene {
    window: Arc<Window>,
    gpu: GpuContext,
    camera: Camera,
    controls: Controls,
    input: Input,
    context: SceneContext,
    ocean: Renderable,
    sky: Renderable,
    ship: Renderable,
    last_frame: Instant,
}

impl Scene {
    fn new(event_loop: &ActiveEventLoop) -> anyhow::Result<Self> {
        let window_attrs = WindowAttributes::default()
            .with_title("Icebound")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));
        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .context("failed to create window")?,
        );

        let gpu = GpuContext::new(window.clone())?;

        let start_rotation = Vec3::new(0.0, 1.0, 0.0);
        let camera = Camera::new(Vec3::new(0.0, 3.0, 45.0), start_rotation, gpu.aspect());
        let controls = Controls::new(start_rotation);

        Ok(Self {
            window,
            gpu,
            camera,
            controls,
            input: Input::new(),
            context: SceneContext::new(),
            ocean: scene::ocean(),
            sky: scene::sky(),
            ship: scene::ship(),
            last_frame: Instant::now(),
        })
    }

    fn handle_hotkeys(&mut self) {
        if self.input.key_pressed(KeyCode::Space) || self.input.key_pressed(KeyCode::Enter) {
            self.context.toggle_day();
        }
        if self.input.key_pressed(KeyCode::Digit1) {
            self.context.set_day(true);
        }
        if self.input.key_pressed(KeyCode::Digit2) {
            self.context.set_day(false);
        }
        for (i, key) in [
            KeyCode::Digit3,
            KeyCode::Digit4,
            KeyCode::Digit5,
            KeyCode::Digit6,
        ]
        .into_iter()
        .enumerate()
        {
            if self.input.key_pressed(key) {
                self.context.set_wind(WIND_PRESETS[i]);
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.context.advance(dt);
        self.handle_hotkeys();
        self.controls.update(
            &self.input,
            &mut self.camera,
            self.gpu.width() as f32,
            self.gpu.height() as f32,
        );

        // Input is consumed and the next frame is scheduled before surface
        // acquisition: a lost or skipped frame must neither stall the loop
        // nor replay this frame's key presses.
        self.input.begin_frame();
        self.window.request_redraw();

        let output = match self.gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                // reconfigure and try again next frame
                self.gpu.resize(self.gpu.width(), self.gpu.height());
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("surface out of memory, exiting");
                event_loop.exit();
                return;
            }
            Err(e) => {
                log::warn!("skipping frame: {e}");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("scene encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.gpu.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.ocean
                .render(&self.gpu, &mut pass, &mut self.camera, &self.context);
            self.sky
                .render(&self.gpu, &mut pass, &mut self.camera, &self.context);
            self.ship
                .render(&self.gpu, &mut pass, &mut self.camera, &self.context);
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if matches!(self, App::Pending) {
            match Scene::new(event_loop) {
                Ok(scene) => *self = App::Running(scene),
                Err(e) => {
                    log::error!("failed to start: {e:#}");
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let App::Running(scene) = self else {
            return;
        };

        scene.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                scene.gpu.resize(size.width, size.height);
                scene.camera.set_aspect(scene.gpu.aspect());
            }
            WindowEvent::RedrawRequested => {
                scene.redraw(event_loop);
            }
            _ => {}
        }
    }
}
