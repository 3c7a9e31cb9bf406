//! The scene renderer: uploads the three bodies once, then per frame writes
//! uniforms, draws into the offscreen target and blits to the surface.

use orrery_panel::RenderBackend;
use orrery_scene::{
    CameraState, LightRig, MeshShape, NodeId, Rgba, SceneGraph, SceneSetup, ViewportSize,
};
use wgpu::util::DeviceExt;

use crate::blit::BlitPipeline;
use crate::buffer::MeshBuffer;
use crate::gpu::{RenderContext, SurfaceError};
use crate::pipeline::{FrameUniform, LitPipeline, ObjectUniform, draw_lit};
use crate::target::RenderTargets;

struct DrawObject {
    node: NodeId,
    double_sided: bool,
    mesh: MeshBuffer,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

fn clear_color(color: Rgba) -> wgpu::Color {
    let [r, g, b, a] = color.to_linear();
    wgpu::Color {
        r: f64::from(r),
        g: f64::from(g),
        b: f64::from(b),
        a: f64::from(a),
    }
}

/// Device-side resources and command encoding, independent of any surface.
pub struct ScenePasses {
    lit: LitPipeline,
    blit: BlitPipeline,
    targets: RenderTargets,
    blit_bind_group: wgpu::BindGroup,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    objects: Vec<DrawObject>,
    lights: LightRig,
    clear_color: wgpu::Color,
}

impl ScenePasses {
    /// Upload every body of `setup.graph` and allocate targets at
    /// `setup.render_size`. `output_format` is the format blitted into.
    pub fn new(
        device: &wgpu::Device,
        output_format: wgpu::TextureFormat,
        setup: &SceneSetup,
    ) -> Self {
        let lit = LitPipeline::new(device);
        let blit = BlitPipeline::new(device, output_format);
        let targets = RenderTargets::new(device, setup.render_size);
        let blit_bind_group = blit.bind_group(device, &targets.color_view);

        let frame_uniform = FrameUniform::new(&setup.camera, &setup.lights);
        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("frame-uniform"),
            contents: bytemuck::bytes_of(&frame_uniform),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame-bg"),
            layout: &lit.frame_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let objects = setup
            .graph
            .bodies()
            .map(|(node, body, world)| {
                let label = format!("{node:?}").to_lowercase();
                let double_sided = matches!(body.shape, MeshShape::Ring { .. });
                let mesh = MeshBuffer::from_mesh(device, &label, &body.shape.mesh());
                let uniform = ObjectUniform::new(world, &body.material, double_sided);
                let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{label}-uniform")),
                    contents: bytemuck::bytes_of(&uniform),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                });
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("{label}-bg")),
                    layout: &lit.object_bind_group_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: uniform_buffer.as_entire_binding(),
                    }],
                });
                DrawObject {
                    node,
                    double_sided,
                    mesh,
                    uniform_buffer,
                    bind_group,
                }
            })
            .collect();

        Self {
            lit,
            blit,
            targets,
            blit_bind_group,
            frame_buffer,
            frame_bind_group,
            objects,
            lights: setup.lights,
            clear_color: clear_color(setup.clear_color),
        }
    }

    pub fn render_size(&self) -> ViewportSize {
        self.targets.size()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Reallocate the offscreen targets for a new render resolution.
    pub fn resize(&mut self, device: &wgpu::Device, render_size: ViewportSize) {
        if self.targets.resize(device, render_size) {
            self.blit_bind_group = self.blit.bind_group(device, &self.targets.color_view);
        }
    }

    /// Write this frame's uniforms and encode the scene and blit passes, the
    /// latter onto `output`.
    pub fn encode(
        &self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        output: &wgpu::TextureView,
        graph: &SceneGraph,
        camera: &CameraState,
    ) {
        let frame_uniform = FrameUniform::new(camera, &self.lights);
        queue.write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&frame_uniform));

        for object in &self.objects {
            let body = graph.node(object.node).body.as_ref();
            if let Some(body) = body {
                let uniform = ObjectUniform::new(
                    graph.world_matrix(object.node),
                    &body.material,
                    object.double_sided,
                );
                queue.write_buffer(&object.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
            }
        }

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.targets.color_view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(RenderTargets::DEPTH_CLEAR_VALUE),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            for object in &self.objects {
                draw_lit(
                    &mut render_pass,
                    &self.lit,
                    &self.frame_bind_group,
                    &object.bind_group,
                    &object.mesh,
                );
            }
        }

        self.blit.encode(encoder, output, &self.blit_bind_group);
    }

    /// Free every buffer and texture.
    pub fn destroy(&self) {
        for object in &self.objects {
            object.mesh.destroy();
            object.uniform_buffer.destroy();
        }
        self.frame_buffer.destroy();
        self.targets.destroy();
    }
}

/// [`RenderBackend`] presenting to a window surface.
pub struct SceneRenderer {
    context: RenderContext,
    passes: ScenePasses,
}

impl SceneRenderer {
    pub fn new(context: RenderContext, setup: &SceneSetup) -> Self {
        let passes = ScenePasses::new(&context.device, context.surface_format(), setup);
        log::info!(
            "Scene renderer ready: surface {}x{}, render target {}x{}, {} bodies",
            setup.size.width,
            setup.size.height,
            passes.render_size().width,
            passes.render_size().height,
            passes.object_count()
        );
        Self { context, passes }
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    pub fn passes(&self) -> &ScenePasses {
        &self.passes
    }
}

impl RenderBackend for SceneRenderer {
    type Error = SurfaceError;

    fn render(&mut self, graph: &SceneGraph, camera: &CameraState) -> Result<(), SurfaceError> {
        let frame = self.context.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });

        self.passes
            .encode(&self.context.queue, &mut encoder, &view, graph, camera);
        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn resize(&mut self, size: ViewportSize, render_size: ViewportSize) {
        self.context.resize(size);
        self.passes.resize(&self.context.device, render_size);
        log::debug!(
            "Renderer resized: surface {}x{}, render target {}x{}",
            size.width,
            size.height,
            render_size.width,
            render_size.height
        );
    }

    fn dispose(self) {
        self.passes.destroy();
        log::info!("Scene renderer disposed");
    }
}
