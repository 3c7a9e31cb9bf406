//! Lit mesh pipeline: ambient, key and rim lighting over a GGX specular lobe.
//!
//! Per-frame data (camera and lights) is bound at `@group(0)`, per-object
//! data (model and normal matrices, material) at `@group(1)`.

use std::num::NonZeroU64;

use glam::{Mat4, Vec3};
use orrery_scene::{CameraState, LightRig, Material};

use crate::buffer::{MeshBuffer, VertexPositionNormalUv};
use crate::target::RenderTargets;

/// Camera and light data shared by every draw in a frame.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniform {
    pub view_proj: [[f32; 4]; 4],
    pub camera_position: [f32; 4],
    /// rgb = colour × intensity.
    pub ambient: [f32; 4],
    /// xyz = unit vector towards the light.
    pub key_direction: [f32; 4],
    pub key_color: [f32; 4],
    pub rim_direction: [f32; 4],
    pub rim_color: [f32; 4],
}

fn scaled(color: [f32; 3], intensity: f32) -> [f32; 4] {
    [
        color[0] * intensity,
        color[1] * intensity,
        color[2] * intensity,
        0.0,
    ]
}

fn towards(direction: Vec3) -> [f32; 4] {
    (-direction.normalize_or_zero()).extend(0.0).to_array()
}

impl FrameUniform {
    pub fn new(camera: &CameraState, lights: &LightRig) -> Self {
        Self {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
            camera_position: camera.position.extend(1.0).to_array(),
            ambient: scaled(lights.ambient.color, lights.ambient.intensity),
            key_direction: towards(lights.key.direction),
            key_color: scaled(lights.key.color, lights.key.intensity),
            rim_direction: towards(lights.rim.direction),
            rim_color: scaled(lights.rim.color, lights.rim.intensity),
        }
    }
}

/// Per-object transform and material.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    /// Inverse transpose of `model`.
    pub normal_matrix: [[f32; 4]; 4],
    /// rgb = linear base colour, a = roughness.
    pub base_color_roughness: [f32; 4],
    /// x = emissive fraction, y = 1.0 for double-sided surfaces.
    pub emissive_flags: [f32; 4],
}

impl ObjectUniform {
    pub fn new(model: Mat4, material: &Material, double_sided: bool) -> Self {
        let [r, g, b] = material.base_color;
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: model.inverse().transpose().to_cols_array_2d(),
            base_color_roughness: [r, g, b, material.roughness.clamp(0.04, 1.0)],
            emissive_flags: [
                material.emissive,
                if double_sided { 1.0 } else { 0.0 },
                0.0,
                0.0,
            ],
        }
    }
}

fn uniform_layout(
    device: &wgpu::Device,
    label: &str,
    size: usize,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(size as u64),
            },
            count: None,
        }],
    })
}

/// The lit pipeline and its two bind group layouts.
pub struct LitPipeline {
    pub pipeline: wgpu::RenderPipeline,
    /// `@group(0)`: [`FrameUniform`].
    pub frame_bind_group_layout: wgpu::BindGroupLayout,
    /// `@group(1)`: [`ObjectUniform`].
    pub object_bind_group_layout: wgpu::BindGroupLayout,
}

impl LitPipeline {
    /// Build the pipeline targeting [`RenderTargets`]' colour and depth
    /// formats. Back faces are not culled; the ring is seen from both sides.
    pub fn new(device: &wgpu::Device) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lit-shader"),
            source: wgpu::ShaderSource::Wgsl(LIT_SHADER_SOURCE.into()),
        });

        let frame_bind_group_layout = uniform_layout(
            device,
            "lit-frame-bgl",
            std::mem::size_of::<FrameUniform>(),
            wgpu::ShaderStages::VERTEX_FRAGMENT,
        );
        let object_bind_group_layout = uniform_layout(
            device,
            "lit-object-bgl",
            std::mem::size_of::<ObjectUniform>(),
            wgpu::ShaderStages::VERTEX_FRAGMENT,
        );

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lit-pipeline-layout"),
            bind_group_layouts: &[&frame_bind_group_layout, &object_bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("lit-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[VertexPositionNormalUv::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: RenderTargets::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: RenderTargets::DEPTH_COMPARE,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: RenderTargets::COLOR_FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        Self {
            pipeline,
            frame_bind_group_layout,
            object_bind_group_layout,
        }
    }
}

/// Draw one mesh with its frame and object bind groups.
pub fn draw_lit(
    render_pass: &mut wgpu::RenderPass<'_>,
    pipeline: &LitPipeline,
    frame_bind_group: &wgpu::BindGroup,
    object_bind_group: &wgpu::BindGroup,
    mesh: &MeshBuffer,
) {
    render_pass.set_pipeline(&pipeline.pipeline);
    render_pass.set_bind_group(0, frame_bind_group, &[]);
    render_pass.set_bind_group(1, object_bind_group, &[]);
    mesh.bind(render_pass);
    mesh.draw(render_pass);
}

pub const LIT_SHADER_SOURCE: &str = r#"
const PI: f32 = 3.14159265359;

struct FrameUniform {
    view_proj: mat4x4<f32>,
    camera_position: vec4<f32>,
    ambient: vec4<f32>,
    key_direction: vec4<f32>,
    key_color: vec4<f32>,
    rim_direction: vec4<f32>,
    rim_color: vec4<f32>,
};

struct ObjectUniform {
    model: mat4x4<f32>,
    normal_matrix: mat4x4<f32>,
    base_color_roughness: vec4<f32>,
    emissive_flags: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> frame: FrameUniform;

@group(1) @binding(0)
var<uniform> object_data: ObjectUniform;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
};

fn distribution_ggx(n_dot_h: f32, roughness: f32) -> f32 {
    let a = roughness * roughness;
    let a2 = a * a;
    let denom = n_dot_h * n_dot_h * (a2 - 1.0) + 1.0;
    return a2 / (PI * denom * denom);
}

fn geometry_schlick_ggx(n_dot: f32, roughness: f32) -> f32 {
    let r = roughness + 1.0;
    let k = (r * r) / 8.0;
    return n_dot / (n_dot * (1.0 - k) + k);
}

fn fresnel_schlick(cos_theta: f32, f0: vec3<f32>) -> vec3<f32> {
    return f0 + (1.0 - f0) * pow(clamp(1.0 - cos_theta, 0.0, 1.0), 5.0);
}

fn directional(
    light_dir: vec3<f32>,
    radiance: vec3<f32>,
    view_dir: vec3<f32>,
    normal: vec3<f32>,
    albedo: vec3<f32>,
    roughness: f32,
) -> vec3<f32> {
    let half_vec = normalize(view_dir + light_dir);
    let n_dot_l = max(dot(normal, light_dir), 0.0);
    let n_dot_v = max(dot(normal, view_dir), 0.0);
    let n_dot_h = max(dot(normal, half_vec), 0.0);

    let f = fresnel_schlick(max(dot(half_vec, view_dir), 0.0), vec3<f32>(0.04));
    let d = distribution_ggx(n_dot_h, roughness);
    let g = geometry_schlick_ggx(n_dot_v, roughness) * geometry_schlick_ggx(n_dot_l, roughness);
    let specular = d * g * f / (4.0 * n_dot_v * n_dot_l + 0.0001);
    let diffuse = (vec3<f32>(1.0) - f) * albedo / PI;

    return (diffuse + specular) * radiance * n_dot_l * PI;
}

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let world = object_data.model * vec4<f32>(in.position, 1.0);
    out.clip_position = frame.view_proj * world;
    out.world_position = world.xyz;
    out.world_normal = (object_data.normal_matrix * vec4<f32>(in.normal, 0.0)).xyz;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let view_dir = normalize(frame.camera_position.xyz - in.world_position);
    var normal = normalize(in.world_normal);
    if object_data.emissive_flags.y > 0.5 && dot(normal, view_dir) < 0.0 {
        normal = -normal;
    }

    let albedo = object_data.base_color_roughness.rgb;
    let roughness = object_data.base_color_roughness.a;

    var color = albedo * frame.ambient.rgb;
    color += directional(
        frame.key_direction.xyz, frame.key_color.rgb, view_dir, normal, albedo, roughness,
    );
    color += directional(
        frame.rim_direction.xyz, frame.rim_color.rgb, view_dir, normal, albedo, roughness,
    );
    color += albedo * object_data.emissive_flags.x;

    return vec4<f32>(color, 1.0);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_scene::SceneBuilder;

    #[test]
    fn test_uniform_sizes_are_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<FrameUniform>(), 160);
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 160);
    }

    #[test]
    fn test_frame_uniform_points_towards_lights() {
        let lights = LightRig::default();
        let uniform = FrameUniform::new(&CameraState::default(), &lights);
        let key = Vec3::from_slice(&uniform.key_direction[..3]);
        assert!((key + lights.key.direction).length() < 1e-5);
        assert_eq!(uniform.key_direction[3], 0.0);
        assert!((uniform.ambient[0] - 0.6 * 0.18).abs() < 1e-6);
    }

    #[test]
    fn test_frame_uniform_carries_camera() {
        let camera = CameraState::default();
        let uniform = FrameUniform::new(&camera, &LightRig::default());
        assert_eq!(
            uniform.view_proj,
            camera.view_projection_matrix().to_cols_array_2d()
        );
        assert_eq!(uniform.camera_position, [0.0, 0.0, 5.0, 1.0]);
    }

    #[test]
    fn test_object_uniform_normal_matrix_undoes_scale() {
        let model = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        let material = Material {
            base_color: [0.5, 0.4, 0.3],
            roughness: 0.7,
            emissive: 0.05,
        };
        let uniform = ObjectUniform::new(model, &material, true);
        let normal = Mat4::from_cols_array_2d(&uniform.normal_matrix);
        assert!((normal.x_axis.x - 0.5).abs() < 1e-6);
        assert_eq!(uniform.base_color_roughness, [0.5, 0.4, 0.3, 0.7]);
        assert_eq!(uniform.emissive_flags[..2], [0.05, 1.0]);
    }

    #[test]
    fn test_roughness_clamped_away_from_zero() {
        let material = Material {
            base_color: [1.0; 3],
            roughness: 0.0,
            emissive: 0.0,
        };
        let uniform = ObjectUniform::new(Mat4::IDENTITY, &material, false);
        assert!(uniform.base_color_roughness[3] > 0.0);
        assert_eq!(uniform.emissive_flags[1], 0.0);
    }

    #[test]
    fn test_lit_shader_declares_entry_points() {
        assert!(LIT_SHADER_SOURCE.contains("fn vs_main"));
        assert!(LIT_SHADER_SOURCE.contains("fn fs_main"));
        assert!(LIT_SHADER_SOURCE.contains("@group(1) @binding(0)"));
    }

    #[test]
    fn test_lit_pipeline_creation() {
        let Some((device, _queue)) = crate::create_test_device() else {
            return;
        };
        let pipeline = LitPipeline::new(&device);
        let setup = SceneBuilder::default().build(orrery_scene::ViewportSize::new(64, 64), 1.0);
        let uniform = FrameUniform::new(&setup.camera, &setup.lights);
        let buffer = wgpu::util::DeviceExt::create_buffer_init(
            &device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("test-frame-uniform"),
                contents: bytemuck::bytes_of(&uniform),
                usage: wgpu::BufferUsages::UNIFORM,
            },
        );
        let _bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("test-frame-bg"),
            layout: &pipeline.frame_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
    }
}
