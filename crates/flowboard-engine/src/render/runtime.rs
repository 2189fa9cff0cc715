use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use winit::window::Window;

use crate::coords::HostRect;
use crate::device::{Gpu, SurfaceErrorAction};
use crate::graph::SceneSnapshot;

use super::buffers::DynamicVertexBuffer;
use super::mesh::{EdgeVertex, NodeVertex};
use super::scene::tessellate_scene;
use super::slot::Teardown;

/// Resolution uniform shared by both pipelines (16 bytes).
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ResolutionUniform {
    resolution: [f32; 2],
    _pad: [f32; 2],
}

/// The GPU render runtime: device, surface, both pipelines, the shared
/// resolution uniform, and the two dynamic vertex buffers.
///
/// One instance exists per mounted GPU backend. Created asynchronously by
/// [`initialize`]; released through [`Teardown`] on unmount, backend switch,
/// or when a superseded initialization resolves late.
///
/// [`initialize`]: GpuRenderer::initialize
pub struct GpuRenderer<'w> {
    gpu: Gpu<'w>,
    edge_pipeline: wgpu::RenderPipeline,
    node_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    edge_buffer: DynamicVertexBuffer,
    node_buffer: DynamicVertexBuffer,
}

impl<'w> GpuRenderer<'w> {
    /// Builds the full runtime against a window surface.
    ///
    /// Suspends while the adapter and device are acquired. Every failure is
    /// converted to an error at this boundary; a partially constructed
    /// runtime is never returned.
    pub async fn initialize(window: &'w Window) -> Result<GpuRenderer<'w>> {
        let gpu = Gpu::new(window).await?;

        let device = gpu.device();
        let format = gpu.surface_format();

        let edge_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("flowboard edge shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/edge.wgsl").into()),
        });
        let node_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("flowboard node shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/node.wgsl").into()),
        });

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("flowboard uniforms bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: Some(
                            std::num::NonZeroU64::new(
                                std::mem::size_of::<ResolutionUniform>() as u64
                            )
                            .unwrap(),
                        ),
                    },
                    count: None,
                }],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("flowboard pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let edge_pipeline = build_pipeline(
            device,
            "flowboard edge pipeline",
            &pipeline_layout,
            &edge_shader,
            EdgeVertex::layout(),
            format,
        );
        let node_pipeline = build_pipeline(
            device,
            "flowboard node pipeline",
            &pipeline_layout,
            &node_shader,
            NodeVertex::layout(),
            format,
        );

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("flowboard resolution ubo"),
            size: std::mem::size_of::<ResolutionUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("flowboard bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Ok(GpuRenderer {
            gpu,
            edge_pipeline,
            node_pipeline,
            uniform_buffer,
            bind_group,
            edge_buffer: DynamicVertexBuffer::new(),
            node_buffer: DynamicVertexBuffer::new(),
        })
    }

    /// Resynchronizes the drawable size with the host element.
    ///
    /// Must run before the next draw pass after any host resize, or geometry
    /// is mis-scaled for one frame. Reconfigures the surface only when the
    /// physical dimensions changed; the resolution uniform is rewritten
    /// either way.
    pub fn sync_canvas_size(&mut self, host: HostRect, dpr: f64) {
        let (width, height) = host.physical_size(dpr);
        self.gpu.resize(width, height);

        self.gpu.queue().write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&ResolutionUniform {
                resolution: [width as f32, height as f32],
                _pad: [0.0; 2],
            }),
        );
    }

    /// Tessellates, uploads, and draws one frame.
    ///
    /// No-op when the canvas has zero area. Exactly one command submission;
    /// edges draw before nodes so nodes sit above the edge glow. Returns
    /// `Some(action)` when the frame could not be presented.
    pub fn render(&mut self, scene: &SceneSnapshot<'_>, dpr: f64) -> Option<SurfaceErrorAction> {
        let (width, height) = self.gpu.size();
        if width == 0 || height == 0 {
            return Some(SurfaceErrorAction::SkipFrame);
        }

        let vertices = tessellate_scene(scene, dpr);
        self.edge_buffer.upload(
            self.gpu.device(),
            self.gpu.queue(),
            "flowboard edge vbo",
            &vertices.edge_vertices,
        );
        self.node_buffer.upload(
            self.gpu.device(),
            self.gpu.queue(),
            "flowboard node vbo",
            &vertices.node_vertices,
        );

        self.draw_pass()
    }

    fn draw_pass(&mut self) -> Option<SurfaceErrorAction> {
        let mut frame = match self.gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                let action = self.gpu.handle_surface_error(err);
                log::debug!("surface frame unavailable: {action:?}");
                return Some(action);
            }
        };

        {
            let mut pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("flowboard board pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            pass.set_bind_group(0, &self.bind_group, &[]);

            if self.edge_buffer.vertex_count() > 0 {
                if let Some(buffer) = self.edge_buffer.buffer() {
                    pass.set_pipeline(&self.edge_pipeline);
                    pass.set_vertex_buffer(0, buffer.slice(..));
                    pass.draw(0..self.edge_buffer.vertex_count(), 0..1);
                }
            }

            if self.node_buffer.vertex_count() > 0 {
                if let Some(buffer) = self.node_buffer.buffer() {
                    pass.set_pipeline(&self.node_pipeline);
                    pass.set_vertex_buffer(0, buffer.slice(..));
                    pass.draw(0..self.node_buffer.vertex_count(), 0..1);
                }
            }
        }

        self.gpu.submit(frame);
        None
    }
}

impl Teardown for GpuRenderer<'_> {
    fn teardown(&mut self) {
        self.edge_buffer.release();
        self.node_buffer.release();
        self.uniform_buffer.destroy();
        // Pipelines, bind group, and device release when the runtime drops.
    }
}

fn build_pipeline(
    device: &wgpu::Device,
    label: &'static str,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    vertex_layout: wgpu::VertexBufferLayout<'static>,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[vertex_layout],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(alpha_blend()),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

fn alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}
