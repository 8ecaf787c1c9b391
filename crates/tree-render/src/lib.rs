//! wgpu renderer for the tree, shared by the web and native frontends.
//!
//! The host creates the surface target (canvas or window); everything else,
//! from adapter selection to the instanced quad pipeline, lives here.

use tree_core::render_data::{glow_instance_count, pack_frame, InstanceData, SceneUniforms};
use tree_core::{Camera, FrameOutput, SceneRenderer};
use wgpu::util::DeviceExt;

mod pipeline;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.02,
    b: 0.02,
    a: 1.0,
};
const INITIAL_INSTANCE_CAPACITY: usize = 4096;

pub struct GpuState<'w> {
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    glow_pipeline: wgpu::RenderPipeline,
    solid_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    quad_vb: wgpu::Buffer,
    instance_vb: wgpu::Buffer,
    instance_capacity: usize,
    bind_group: wgpu::BindGroup,
    instances: Vec<InstanceData>,
    width: u32,
    height: u32,
}

impl<'w> GpuState<'w> {
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'w>>,
        width: u32,
        height: u32,
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
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene_uniforms"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        // Two triangles spanning -0.5..0.5
        let quad_vertices: [f32; 12] = [
            -0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, -0.5, 0.5, 0.5, -0.5, 0.5,
        ];
        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vb"),
            contents: bytemuck::cast_slice(&quad_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let instance_vb = pipeline::create_instance_buffer(&device, INITIAL_INSTANCE_CAPACITY);
        let scene = pipeline::create_scene_pipeline(&device, format, &uniform_buffer);
        log::info!("[gpu] surface {width}x{height} format {format:?}");

        Ok(Self {
            surface,
            device,
            queue,
            config,
            glow_pipeline: scene.glow,
            solid_pipeline: scene.solid,
            uniform_buffer,
            quad_vb,
            instance_vb,
            instance_capacity: INITIAL_INSTANCE_CAPACITY,
            bind_group: scene.bind_group,
            instances: Vec::with_capacity(INITIAL_INSTANCE_CAPACITY),
            width,
            height,
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

    /// Reconfigure with the current size, e.g. after `SurfaceError::Lost`.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn ensure_instance_capacity(&mut self, needed: usize) {
        if needed <= self.instance_capacity {
            return;
        }
        let capacity = needed.next_power_of_two();
        self.instance_vb = pipeline::create_instance_buffer(&self.device, capacity);
        self.instance_capacity = capacity;
        log::debug!("[gpu] instance buffer grown to {capacity}");
    }

    pub fn render(&mut self, frame: &FrameOutput<'_>) -> Result<(), wgpu::SurfaceError> {
        let aspect = self.width as f32 / self.height.max(1) as f32;
        let camera = Camera::from_pose(frame.camera, aspect);
        self.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&SceneUniforms::from_camera(&camera)),
        );

        let mut instances = std::mem::take(&mut self.instances);
        pack_frame(frame, &mut instances);
        self.ensure_instance_capacity(instances.len());
        self.queue
            .write_buffer(&self.instance_vb, 0, bytemuck::cast_slice(&instances));
        let count = instances.len() as u32;
        let glow_count = glow_instance_count(frame) as u32;
        self.instances = instances;

        let surface_tex = self.surface.get_current_texture()?;
        let view = surface_tex
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_bind_group(0, &self.bind_group, &[]);
            rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
            rpass.set_vertex_buffer(1, self.instance_vb.slice(..));
            // Particles first, then decorations drawn over the cloud
            rpass.set_pipeline(&self.glow_pipeline);
            rpass.draw(0..6, 0..glow_count);
            rpass.set_pipeline(&self.solid_pipeline);
            rpass.draw(0..6, glow_count..count);
        }
        self.queue.submit(Some(encoder.finish()));
        surface_tex.present();
        Ok(())
    }
}

impl<'w> SceneRenderer for GpuState<'w> {
    type Error = wgpu::SurfaceError;

    fn submit(&mut self, frame: &FrameOutput<'_>) -> Result<(), Self::Error> {
        self.render(frame)
    }
}
