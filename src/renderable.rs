//! A renderable scene object: mesh + shaders + transform + GPU resources.
//!
//! [`Renderable`] couples generated geometry, a vertex/fragment WGSL source
//! pair, and a [`Transform`], and manages its own GPU resources lazily. The
//! shader program lives in a small lifecycle:
//!
//! - **Uncompiled** — initial, and again after [`Renderable::set_shaders`].
//!   The first render call attempts compilation.
//! - **Ready** — pipeline built; geometry buffers exist and are re-uploaded
//!   in full every frame before one indexed draw call.
//! - **Failed** — compilation or pipeline validation failed. The error is
//!   logged and render calls become no-ops (no buffer allocation either)
//!   until the shaders are reassigned.
//!
//! Failures never cross the render-call boundary; a broken shader disables
//! one object, not the scene.

use crate::camera::Camera;
use crate::geometry::MeshData;
use crate::gpu::{DEPTH_FORMAT, GpuContext};
use crate::scene::SceneContext;
use crate::transform::Transform;

const DEFAULT_VERTEX_SHADER: &str = include_str!("shaders/normal.vert.wgsl");
const DEFAULT_FRAGMENT_SHADER: &str = include_str!("shaders/normal.frag.wgsl");

/// Per-object uniforms, bound at group 0. Always written, every frame.
///
/// Matrices are column-major, matching both glam's storage and WGSL's
/// `mat4x4<f32>`.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniforms {
    /// Local-to-world transform.
    pub model: [[f32; 4]; 4],
    /// Inverse-transpose of the model matrix.
    pub normal: [[f32; 4]; 4],
    /// World-to-view transform.
    pub view: [[f32; 4]; 4],
    /// View-to-clip transform.
    pub projection: [[f32; 4]; 4],
}

/// Scene-global uniforms, bound at group 1. Always written; shaders that
/// declare no group-1 bindings simply never read them, which is how a shader
/// opts out of the optional uniforms without any error path.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniforms {
    /// Camera world position, for fog and view-dependent effects.
    pub camera_pos: [f32; 3],
    /// Seconds since scene start.
    pub time: f32,
    /// 1.0 for day, 0.0 for night.
    pub is_day: f32,
    /// Non-negative wind intensity.
    pub wind_speed: f32,
    pub _pad: [f32; 2],
}

/// Shader program lifecycle. See the module docs.
enum ProgramState {
    Uncompiled,
    Ready(wgpu::RenderPipeline),
    Failed,
}

/// Vertex attribute layouts: one buffer per attribute, matching the
/// `position` / `uv` / `normal` attribute contract.
const POSITION_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: 12,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &[wgpu::VertexAttribute {
        offset: 0,
        shader_location: 0,
        format: wgpu::VertexFormat::Float32x3,
    }],
};

const UV_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: 8,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &[wgpu::VertexAttribute {
        offset: 0,
        shader_location: 1,
        format: wgpu::VertexFormat::Float32x2,
    }],
};

const NORMAL_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: 12,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &[wgpu::VertexAttribute {
        offset: 0,
        shader_location: 2,
        format: wgpu::VertexFormat::Float32x3,
    }],
};

/// Pads u16 index data to wgpu's 4-byte copy alignment.
///
/// The draw call still uses the true index count; the trailing pad entry is
/// never addressed.
fn index_bytes(indices: &[u16]) -> Vec<u8> {
    let mut bytes = bytemuck::cast_slice(indices).to_vec();
    if bytes.len() % 4 != 0 {
        bytes.extend_from_slice(&[0, 0]);
    }
    bytes
}

/// GPU-side buffers and bind groups for one renderable.
///
/// Created exactly once, on the first successful program compile, and kept
/// for the renderable's lifetime. Shader reassignment rebuilds the pipeline
/// but reuses these buffers untouched.
struct GpuBuffers {
    position: wgpu::Buffer,
    uv: wgpu::Buffer,
    normal: wgpu::Buffer,
    index: wgpu::Buffer,
    index_count: u32,
    object_uniforms: wgpu::Buffer,
    scene_uniforms: wgpu::Buffer,
    object_bind_group: wgpu::BindGroup,
    scene_bind_group: wgpu::BindGroup,
    object_layout: wgpu::BindGroupLayout,
    scene_layout: wgpu::BindGroupLayout,
}

impl GpuBuffers {
    fn new(gpu: &GpuContext, mesh: &MeshData, label: &str) -> Self {
        let device = &gpu.device;

        let attribute_buffer = |name: &str, len: usize| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&format!("{label} {name} buffer")),
                size: (len * 4) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };

        let position = attribute_buffer("position", mesh.positions.len());
        let uv = attribute_buffer("uv", mesh.uvs.len());
        let normal = attribute_buffer("normal", mesh.normals.len());

        let index = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{label} index buffer")),
            size: index_bytes(&mesh.indices).len() as u64,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_buffer = |name: &str, size: u64| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&format!("{label} {name} uniforms")),
                size,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };

        let object_uniforms =
            uniform_buffer("object", std::mem::size_of::<ObjectUniforms>() as u64);
        let scene_uniforms = uniform_buffer("scene", std::mem::size_of::<SceneUniforms>() as u64);

        let uniform_layout = |name: &str| {
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(&format!("{label} {name} bind group layout")),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            })
        };

        let object_layout = uniform_layout("object");
        let scene_layout = uniform_layout("scene");

        let object_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label} object bind group")),
            layout: &object_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: object_uniforms.as_entire_binding(),
            }],
        });

        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label} scene bind group")),
            layout: &scene_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_uniforms.as_entire_binding(),
            }],
        });

        Self {
            position,
            uv,
            normal,
            index,
            index_count: mesh.indices.len() as u32,
            object_uniforms,
            scene_uniforms,
            object_bind_group,
            scene_bind_group,
            object_layout,
            scene_layout,
        }
    }

    /// Re-uploads the full geometry into the existing buffers.
    ///
    /// Intentionally unconditional: the observed contract is a full upload
    /// every frame, with no dirty tracking. Dirty tracking could be added
    /// here without touching the rest of the render path.
    fn upload_geometry(&self, gpu: &GpuContext, mesh: &MeshData) {
        let queue = &gpu.queue;
        queue.write_buffer(&self.position, 0, bytemuck::cast_slice(&mesh.positions));
        queue.write_buffer(&self.uv, 0, bytemuck::cast_slice(&mesh.uvs));
        queue.write_buffer(&self.normal, 0, bytemuck::cast_slice(&mesh.normals));
        queue.write_buffer(&self.index, 0, &index_bytes(&mesh.indices));
    }
}

/// A scene object that owns its geometry, shaders, transform, and GPU state.
pub struct Renderable {
    label: String,
    mesh: MeshData,
    /// Position / rotation / scale; mutate freely between frames.
    pub transform: Transform,
    vertex_shader: String,
    fragment_shader: String,
    program: ProgramState,
    buffers: Option<GpuBuffers>,
}

impl Renderable {
    /// Creates a renderable from generated geometry with the default shader
    /// pair (a pass-through that visualizes surface normals).
    ///
    /// `label` names the object in logs and GPU debug captures.
    pub fn new(label: impl Into<String>, mesh: MeshData) -> Self {
        Self {
            label: label.into(),
            mesh,
            transform: Transform::new(),
            vertex_shader: DEFAULT_VERTEX_SHADER.to_string(),
            fragment_shader: DEFAULT_FRAGMENT_SHADER.to_string(),
            program: ProgramState::Uncompiled,
            buffers: None,
        }
    }

    /// Creates a renderable with an explicit vertex/fragment source pair.
    pub fn with_shaders(
        label: impl Into<String>,
        mesh: MeshData,
        vertex_shader: impl Into<String>,
        fragment_shader: impl Into<String>,
    ) -> Self {
        let mut renderable = Self::new(label, mesh);
        renderable.vertex_shader = vertex_shader.into();
        renderable.fragment_shader = fragment_shader.into();
        renderable
    }

    /// Replaces the shader sources and invalidates the compiled program.
    ///
    /// The next render call recompiles. Geometry buffers are kept; a
    /// renderable that previously failed to compile becomes eligible to
    /// draw again.
    pub fn set_shaders(
        &mut self,
        vertex_shader: impl Into<String>,
        fragment_shader: impl Into<String>,
    ) {
        self.vertex_shader = vertex_shader.into();
        self.fragment_shader = fragment_shader.into();
        self.program = ProgramState::Uncompiled;
    }

    /// The geometry this renderable draws.
    pub fn mesh(&self) -> &MeshData {
        &self.mesh
    }

    /// Renders this object with the given camera and per-frame scene context.
    ///
    /// Per-frame contract: ensure the program is compiled (see the module
    /// docs for the lifecycle), recompute this object's matrices, ask the
    /// camera for fresh view/projection matrices, upload uniforms and all
    /// geometry buffers, then issue one indexed draw call. A renderable in
    /// the failed state returns without touching the pass.
    pub fn render(
        &mut self,
        gpu: &GpuContext,
        pass: &mut wgpu::RenderPass<'_>,
        camera: &mut Camera,
        scene: &SceneContext,
    ) {
        self.ensure_program(gpu);

        let (ProgramState::Ready(pipeline), Some(buffers)) = (&self.program, &self.buffers) else {
            return;
        };

        self.transform.calculate_matrix();
        camera.calculate_view_projection();

        let object = ObjectUniforms {
            model: self.transform.model_matrix.to_cols_array_2d(),
            normal: self.transform.normal_matrix.to_cols_array_2d(),
            view: camera.view_matrix.to_cols_array_2d(),
            projection: camera.projection_matrix.to_cols_array_2d(),
        };
        gpu.queue
            .write_buffer(&buffers.object_uniforms, 0, bytemuck::bytes_of(&object));

        let scene_uniforms = SceneUniforms {
            camera_pos: camera.position.to_array(),
            time: scene.time,
            is_day: if scene.is_day { 1.0 } else { 0.0 },
            wind_speed: scene.wind_speed,
            _pad: [0.0; 2],
        };
        gpu.queue.write_buffer(
            &buffers.scene_uniforms,
            0,
            bytemuck::bytes_of(&scene_uniforms),
        );

        buffers.upload_geometry(gpu, &self.mesh);

        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, &buffers.object_bind_group, &[]);
        pass.set_bind_group(1, &buffers.scene_bind_group, &[]);
        pass.set_vertex_buffer(0, buffers.position.slice(..));
        pass.set_vertex_buffer(1, buffers.uv.slice(..));
        pass.set_vertex_buffer(2, buffers.normal.slice(..));
        pass.set_index_buffer(buffers.index.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..buffers.index_count, 0, 0..1);
    }

    /// Drives the Uncompiled -> Ready / Failed transition.
    ///
    /// Shader modules are compiled first; only after they validate are the
    /// geometry buffers allocated (once), so a renderable that never compiles
    /// never allocates.
    fn ensure_program(&mut self, gpu: &GpuContext) {
        if !matches!(self.program, ProgramState::Uncompiled) {
            return;
        }

        let device = &gpu.device;

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let vertex_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{} vertex shader", self.label)),
            source: wgpu::ShaderSource::Wgsl(self.vertex_shader.as_str().into()),
        });
        let fragment_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{} fragment shader", self.label)),
            source: wgpu::ShaderSource::Wgsl(self.fragment_shader.as_str().into()),
        });
        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            log::error!("{}: shader compilation failed: {error}", self.label);
            self.program = ProgramState::Failed;
            return;
        }

        if self.buffers.is_none() {
            self.buffers = Some(GpuBuffers::new(gpu, &self.mesh, &self.label));
        }
        let Some(buffers) = &self.buffers else {
            return;
        };

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{} pipeline layout", self.label)),
            bind_group_layouts: &[&buffers.object_layout, &buffers.scene_layout],
            push_constant_ranges: &[],
        });

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("{} pipeline", self.label)),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some("vs_main"),
                buffers: &[POSITION_LAYOUT, UV_LAYOUT, NORMAL_LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                // the reference scene draws double-sided
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });
        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            log::error!("{}: pipeline creation failed: {error}", self.label);
            self.program = ProgramState::Failed;
            return;
        }

        log::debug!("{}: shader program compiled", self.label);
        self.program = ProgramState::Ready(pipeline);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::plane;

    #[test]
    fn starts_uncompiled_with_no_buffers() {
        let renderable = Renderable::new("test", plane(1, 1));
        assert!(matches!(renderable.program, ProgramState::Uncompiled));
        assert!(renderable.buffers.is_none());
    }

    #[test]
    fn set_shaders_resets_failed_state() {
        let mut renderable = Renderable::new("test", plane(1, 1));
        renderable.program = ProgramState::Failed;

        renderable.set_shaders("@vertex fn vs_main() {}", "@fragment fn fs_main() {}");
        assert!(matches!(renderable.program, ProgramState::Uncompiled));
    }

    #[test]
    fn default_shaders_are_the_normal_visualizer() {
        let renderable = Renderable::new("test", plane(1, 1));
        assert_eq!(renderable.vertex_shader, DEFAULT_VERTEX_SHADER);
        assert_eq!(renderable.fragment_shader, DEFAULT_FRAGMENT_SHADER);
    }

    #[test]
    fn index_bytes_are_copy_aligned() {
        // odd index count: 2 bytes of padding
        let odd = index_bytes(&[0, 1, 2]);
        assert_eq!(odd.len(), 8);
        // even index count: no padding
        let even = index_bytes(&[0, 1, 2, 2, 3, 0]);
        assert_eq!(even.len(), 12);
        assert_eq!(even, bytemuck::cast_slice::<u16, u8>(&[0, 1, 2, 2, 3, 0]));
    }

    #[test]
    fn uniform_structs_match_wgsl_layout() {
        assert_eq!(std::mem::size_of::<ObjectUniforms>(), 256);
        assert_eq!(std::mem::size_of::<SceneUniforms>(), 32);
    }
}
