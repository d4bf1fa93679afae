use crate::helpers::{create_depth_texture, pick_alpha_mode, pick_surface_format, DEPTH_FORMAT};
use crate::instances::{basket_instances, lantern_instances, InstanceRaw};
use glam::Vec3;
use lantern_core::color::from_hex_srgb;
use lantern_core::{MeshVertex, Simulation};
use wgpu::util::DeviceExt;

const LIGHT_POSITION: Vec3 = Vec3::new(6.0, 12.0, 8.0);
const LIGHT_INTENSITY: f32 = 0.9;
const AMBIENT_INTENSITY: f32 = 0.7;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    light_dir: [f32; 4],
    ambient: [f32; 4],
}

/// Draws a [`Simulation`] into any wgpu surface target (a canvas on the web,
/// a window natively).
///
/// The body and basket meshes are uploaded once. Every lantern owns a slice
/// of one large vertex-colour buffer; a slice is rewritten only after that
/// lantern was recolored.
pub struct LanternRenderer<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    _depth_tex: wgpu::Texture,
    depth_view: wgpu::TextureView,

    body_vb: wgpu::Buffer,
    body_vertex_count: u32,
    basket_vb: wgpu::Buffer,
    basket_color_vb: wgpu::Buffer,
    basket_vertex_count: u32,
    basket_offset_y: f32,

    color_vb: wgpu::Buffer,
    color_stride: u64,
    lantern_instance_vb: wgpu::Buffer,
    basket_instance_vb: wgpu::Buffer,
    lantern_count: u32,
    instance_scratch: Vec<InstanceRaw>,

    emissive_color: Vec3,
    opacity: f32,
    clear_color: wgpu::Color,
    width: u32,
    height: u32,
}

impl<'a> LanternRenderer<'a> {
    /// `width`/`height` are the backing size in physical pixels.
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'a>>,
        width: u32,
        height: u32,
        sim: &Simulation,
    ) -> anyhow::Result<Self> {
        let width = width.max(1);
        let height = height.max(1);
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(target)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Default limits keep older WebGPU implementations happy
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!("request_device error: {e:?}"))?;

        let caps = surface.get_capabilities(&adapter);
        let format = pick_surface_format(&caps)
            .ok_or_else(|| anyhow::anyhow!("Surface reports no texture formats"))?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: pick_alpha_mode(&caps),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!(
            "[gpu] {} via {:?}, {:?} {}x{}",
            adapter.get_info().name,
            adapter.get_info().backend,
            format,
            width,
            height
        );

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lantern_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::LANTERN_WGSL.into()),
        });
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uniforms"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let vertex_buffers = [
            // slot 0: shared mesh
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<MeshVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3],
            },
            // slot 1: per-vertex colour, one region per lantern
            wgpu::VertexBufferLayout {
                array_stride: (std::mem::size_of::<f32>() * 3) as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &wgpu::vertex_attr_array![2 => Float32x3],
            },
            // slot 2: transforms + emissive
            InstanceRaw::layout(),
        ];
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("lantern_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &vertex_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            // double-sided, the shader flips back-face normals
            primitive: wgpu::PrimitiveState {
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
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });
        let (depth_tex, depth_view) = create_depth_texture(&device, width, height);

        let geometry = sim.geometry();
        let look = &sim.params().look;
        let body_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("body_vb"),
            contents: bytemuck::cast_slice(&geometry.body),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let basket_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("basket_vb"),
            contents: bytemuck::cast_slice(&geometry.basket),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let basket_rgb = from_hex_srgb(look.basket_hex).to_array();
        let basket_colors: Vec<f32> = geometry
            .basket
            .iter()
            .flat_map(|_| basket_rgb)
            .collect();
        let basket_color_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("basket_color_vb"),
            contents: bytemuck::cast_slice(&basket_colors),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let lantern_count = sim.lanterns().len() as u32;
        let color_stride = (geometry.vertex_count() * 3 * std::mem::size_of::<f32>()) as u64;
        let color_vb = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lantern_color_vb"),
            size: (color_stride * lantern_count as u64).max(4),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let instance_bytes =
            (std::mem::size_of::<InstanceRaw>() as u64 * lantern_count as u64).max(4);
        let lantern_instance_vb = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lantern_instance_vb"),
            size: instance_bytes,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let basket_instance_vb = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("basket_instance_vb"),
            size: instance_bytes,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            uniform_buffer,
            bind_group,
            _depth_tex: depth_tex,
            depth_view,
            body_vb,
            body_vertex_count: geometry.vertex_count() as u32,
            basket_vb,
            basket_color_vb,
            basket_vertex_count: geometry.basket.len() as u32,
            basket_offset_y: geometry.basket_offset_y,
            color_vb,
            color_stride,
            lantern_instance_vb,
            basket_instance_vb,
            lantern_count,
            instance_scratch: Vec::with_capacity(lantern_count as usize),
            emissive_color: from_hex_srgb(look.emissive_hex),
            opacity: look.opacity,
            clear_color: wgpu::Color::TRANSPARENT,
            width,
            height,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        self.reconfigure();
    }

    /// Reapply the surface configuration, e.g. after `Lost`/`Outdated`.
    pub fn reconfigure(&mut self) {
        self.config.width = self.width;
        self.config.height = self.height;
        self.surface.configure(&self.device, &self.config);
        let (tex, view) = create_depth_texture(&self.device, self.width, self.height);
        self._depth_tex = tex;
        self.depth_view = view;
    }

    /// Copy every recolored lantern's vertex colours to the GPU.
    pub fn upload_dirty_colors(&mut self, sim: &mut Simulation) -> usize {
        let queue = &self.queue;
        let buffer = &self.color_vb;
        let stride = self.color_stride;
        let count = self.lantern_count as usize;
        sim.drain_dirty_colors(|i, colors| {
            if i < count {
                queue.write_buffer(buffer, stride * i as u64, bytemuck::cast_slice(colors));
            }
        })
    }

    pub fn render(&mut self, sim: &mut Simulation) -> Result<(), wgpu::SurfaceError> {
        self.upload_dirty_colors(sim);

        let uniforms = Uniforms {
            view_proj: sim.camera().view_proj().to_cols_array_2d(),
            light_dir: LIGHT_POSITION.normalize().extend(LIGHT_INTENSITY).to_array(),
            ambient: [AMBIENT_INTENSITY, AMBIENT_INTENSITY, AMBIENT_INTENSITY, 1.0],
        };
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        let count = (sim.lanterns().len() as u32).min(self.lantern_count);
        let lanterns = &sim.lanterns()[..count as usize];
        basket_instances(lanterns, self.basket_offset_y, &mut self.instance_scratch);
        self.queue.write_buffer(
            &self.basket_instance_vb,
            0,
            bytemuck::cast_slice(&self.instance_scratch),
        );
        lantern_instances(
            lanterns,
            self.emissive_color,
            self.opacity,
            &mut self.instance_scratch,
        );
        self.queue.write_buffer(
            &self.lantern_instance_vb,
            0,
            bytemuck::cast_slice(&self.instance_scratch),
        );

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("lantern_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &self.bind_group, &[]);

            // Opaque baskets first, all in one instanced draw
            rpass.set_vertex_buffer(0, self.basket_vb.slice(..));
            rpass.set_vertex_buffer(1, self.basket_color_vb.slice(..));
            rpass.set_vertex_buffer(2, self.basket_instance_vb.slice(..));
            rpass.draw(0..self.basket_vertex_count, 0..count);

            // Lanterns: shared mesh, own colour region each
            rpass.set_vertex_buffer(0, self.body_vb.slice(..));
            rpass.set_vertex_buffer(2, self.lantern_instance_vb.slice(..));
            for i in 0..count {
                let start = self.color_stride * i as u64;
                rpass.set_vertex_buffer(1, self.color_vb.slice(start..start + self.color_stride));
                rpass.draw(0..self.body_vertex_count, i..i + 1);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
