use crate::constants::{CLEAR_COLOR, FLOOR_OPACITY, SPARKLE_OPACITY, TREE_OPACITY};
use crate::state::{DrawRanges, ScenePoints};
use glam::Mat4;
use std::ops::Range;
use tree_core::{
    floor_transform, ColorBuffer, OrbitCamera, SPARKLE_DRIFT_AMPLITUDE, SPARKLE_DRIFT_SPEED,
    STARFIELD_TWINKLE_DEPTH, STARFIELD_TWINKLE_SPEED,
};
use web_sys as web;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct PointUniforms {
    proj: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    opacity: f32,
    time: f32,
    drift_speed: f32,
    drift_amplitude: f32,
    twinkle_speed: f32,
    twinkle_depth: f32,
    _pad: [f32; 2],
}

/// Per-group look: blend weight plus optional time-driven motion.
#[derive(Clone, Copy, Default)]
struct GroupStyle {
    opacity: f32,
    drift: (f32, f32),
    twinkle: (f32, f32),
}

impl GroupStyle {
    fn plain(opacity: f32) -> Self {
        Self {
            opacity,
            ..Self::default()
        }
    }
}

/// Uniform buffer plus bind group for one draw range.
struct DrawGroup {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    style: GroupStyle,
}

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    floor_pipeline: wgpu::RenderPipeline,

    instance_buffer: wgpu::Buffer,
    color_buffer: wgpu::Buffer,
    ranges: DrawRanges,
    total_count: u32,

    // Tree particles spin and pulse; everything else is fixed in world space
    tree: DrawGroup,
    star: DrawGroup,
    sparkles: DrawGroup,
    starfield: DrawGroup,
    floor: DrawGroup,

    width: u32,
    height: u32,
    clear_color: wgpu::Color,
}

fn create_draw_group(
    device: &wgpu::Device,
    bgl: &wgpu::BindGroupLayout,
    label: &str,
    style: GroupStyle,
) -> DrawGroup {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: std::mem::size_of::<PointUniforms>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout: bgl,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    });
    DrawGroup {
        buffer,
        bind_group,
        style,
    }
}

fn create_instance_buffers(device: &wgpu::Device, points: &ScenePoints) -> (wgpu::Buffer, wgpu::Buffer) {
    let instances = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("point_instances"),
        contents: bytemuck::cast_slice(&points.position_size),
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
    });
    let colors = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("point_colors"),
        contents: bytemuck::cast_slice(&points.colors),
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
    });
    (instances, colors)
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement, points: &ScenePoints) -> anyhow::Result<Self> {
        let width = canvas.width();
        let height = canvas.height();

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Use default limits on web to avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no texture formats"))?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("points_shader"),
            source: wgpu::ShaderSource::Wgsl(tree_core::POINTS_WGSL.into()),
        });
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("points_bgl"),
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
        let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("points_pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let additive = wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent::OVER,
        };
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("points_pipeline"),
            layout: Some(&pl),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_points"),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<[f32; 4]>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![0 => Float32x4],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<[f32; 3]>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![1 => Float32x3],
                    },
                ],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_points"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(additive),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });
        let floor_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("floor_pipeline"),
            layout: Some(&pl),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_floor"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_floor"),
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

        let (instance_buffer, color_buffer) = create_instance_buffers(&device, points);
        let tree = create_draw_group(
            &device,
            &bgl,
            "tree_uniforms",
            GroupStyle::plain(TREE_OPACITY),
        );
        let star = create_draw_group(&device, &bgl, "star_uniforms", GroupStyle::plain(1.0));
        let sparkles = create_draw_group(
            &device,
            &bgl,
            "sparkle_uniforms",
            GroupStyle {
                opacity: SPARKLE_OPACITY,
                drift: (SPARKLE_DRIFT_SPEED, SPARKLE_DRIFT_AMPLITUDE),
                ..GroupStyle::default()
            },
        );
        let starfield = create_draw_group(
            &device,
            &bgl,
            "starfield_uniforms",
            GroupStyle {
                opacity: 1.0,
                twinkle: (STARFIELD_TWINKLE_SPEED, STARFIELD_TWINKLE_DEPTH),
                ..GroupStyle::default()
            },
        );
        let floor = create_draw_group(
            &device,
            &bgl,
            "floor_uniforms",
            GroupStyle::plain(FLOOR_OPACITY),
        );

        let [r, g, b] = CLEAR_COLOR;
        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            floor_pipeline,
            instance_buffer,
            color_buffer,
            ranges: points.ranges.clone(),
            total_count: points.len() as u32,
            tree,
            star,
            sparkles,
            starfield,
            floor,
            width: width.max(1),
            height: height.max(1),
            clear_color: wgpu::Color { r, g, b, a: 1.0 },
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Reconfigure after the surface was lost or went stale.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Replace every instance, e.g. after the tree was regenerated.
    pub fn upload_points(&mut self, points: &ScenePoints) {
        if points.len() as u32 == self.total_count {
            self.queue.write_buffer(
                &self.instance_buffer,
                0,
                bytemuck::cast_slice(&points.position_size),
            );
            self.queue
                .write_buffer(&self.color_buffer, 0, bytemuck::cast_slice(&points.colors));
        } else {
            let (instances, colors) = create_instance_buffers(&self.device, points);
            self.instance_buffer = instances;
            self.color_buffer = colors;
            self.total_count = points.len() as u32;
        }
        self.ranges = points.ranges.clone();
    }

    /// Overwrite the tree segment of the color buffer with the active colors.
    pub fn upload_tree_colors(&mut self, colors: &ColorBuffer) {
        if colors.len() != self.ranges.tree.len() {
            log::warn!(
                "[render] color buffer has {} entries, tree has {}",
                colors.len(),
                self.ranges.tree.len()
            );
            return;
        }
        self.queue
            .write_buffer(&self.color_buffer, 0, bytemuck::cast_slice(colors.as_flat()));
    }

    fn write_uniforms(&self, group: &DrawGroup, camera: &OrbitCamera, model: Mat4, time: f32) {
        let aspect = self.width as f32 / self.height.max(1) as f32;
        let style = group.style;
        let u = PointUniforms {
            proj: camera.projection_matrix(aspect).to_cols_array_2d(),
            view: camera.view_matrix().to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            opacity: style.opacity,
            time,
            drift_speed: style.drift.0,
            drift_amplitude: style.drift.1,
            twinkle_speed: style.twinkle.0,
            twinkle_depth: style.twinkle.1,
            _pad: [0.0; 2],
        };
        self.queue
            .write_buffer(&group.buffer, 0, bytemuck::bytes_of(&u));
    }

    /// Draw one frame. `time` is seconds since start and drives the backdrop
    /// motion; `tree_model` carries the tree's spin and pulse.
    pub fn render(
        &mut self,
        camera: &OrbitCamera,
        tree_model: Mat4,
        time: f32,
    ) -> Result<(), wgpu::SurfaceError> {
        self.write_uniforms(&self.starfield, camera, Mat4::IDENTITY, time);
        self.write_uniforms(&self.floor, camera, floor_transform(), time);
        self.write_uniforms(&self.tree, camera, tree_model, time);
        self.write_uniforms(&self.star, camera, Mat4::IDENTITY, time);
        self.write_uniforms(&self.sparkles, camera, Mat4::IDENTITY, time);

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
                label: Some("points_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            // Back to front: the floor darkens the starfield behind it but
            // not the tree drawn over it.
            rpass.set_pipeline(&self.pipeline);
            rpass.set_vertex_buffer(0, self.instance_buffer.slice(..));
            rpass.set_vertex_buffer(1, self.color_buffer.slice(..));
            draw_range(&mut rpass, &self.starfield, &self.ranges.starfield);

            rpass.set_pipeline(&self.floor_pipeline);
            rpass.set_bind_group(0, &self.floor.bind_group, &[]);
            rpass.draw(0..6, 0..1);

            rpass.set_pipeline(&self.pipeline);
            draw_range(&mut rpass, &self.tree, &self.ranges.tree);
            draw_range(&mut rpass, &self.star, &self.ranges.star);
            draw_range(&mut rpass, &self.sparkles, &self.ranges.sparkles);
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn draw_range(rpass: &mut wgpu::RenderPass<'_>, group: &DrawGroup, range: &Range<u32>) {
    if range.is_empty() {
        return;
    }
    rpass.set_bind_group(0, &group.bind_group, &[]);
    rpass.draw(0..6, range.clone());
}
