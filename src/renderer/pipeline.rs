//! Flat-color triangle pipeline for the maze scene

use super::vertex::{CLEAR, Vertex};
use crate::sim::Arena;

/// Vertices the buffer holds before its first grow (a 16x16 level of walls)
const INITIAL_VERTEX_CAPACITY: usize = 2048;

/// Map canvas pixels (origin top-left, y down) to normalized device
/// coordinates, letterboxed so the arena keeps its aspect ratio.
pub fn canvas_to_ndc(x: f32, y: f32, arena: &Arena, size: (u32, u32)) -> (f32, f32) {
    let (vw, vh) = (size.0 as f32, size.1 as f32);
    let scale = (vw / arena.width).min(vh / arena.height);

    let px = (x - arena.width / 2.0) * scale;
    let py = (y - arena.height / 2.0) * scale;
    (px / (vw / 2.0), -py / (vh / 2.0))
}

/// Buffer capacity (in vertices) able to hold `needed`, doubling from `current`
fn grown_capacity(current: usize, needed: usize) -> usize {
    let mut capacity = current.max(1);
    while capacity < needed {
        capacity *= 2;
    }
    capacity
}

fn vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("maze_vertices"),
        size: (capacity * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn maze_pipeline(device: &wgpu::Device, format: wgpu::TextureFormat) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("maze_shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("maze_layout"),
        bind_group_layouts: &[],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("maze_pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::desc()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

/// GPU side of the renderer: one pipeline, one reusable vertex buffer
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    vertices: wgpu::Buffer,
    /// Vertices `vertices` can hold
    vertex_capacity: usize,
    vertex_count: u32,
    /// Viewport size in pixels
    pub size: (u32, u32),
    /// Canvas extent the level is laid out in
    pub arena: Arena,
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        arena: Arena,
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("shift-maze-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let caps = surface.get_capabilities(adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or(caps.formats.first())
            .copied()
            .unwrap_or(wgpu::TextureFormat::Bgra8UnormSrgb);
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
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let pipeline = maze_pipeline(&device, format);
        let vertices = vertex_buffer(&device, INITIAL_VERTEX_CAPACITY);
        log::info!("Renderer ready: {:?}, {}x{}", format, width, height);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            vertices,
            vertex_capacity: INITIAL_VERTEX_CAPACITY,
            vertex_count: 0,
            size: (width, height),
            arena,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.size = (width, height);
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Copy the scene (canvas pixels) into the vertex buffer as NDC
    fn upload(&mut self, scene: &[Vertex]) {
        let ndc: Vec<Vertex> = scene
            .iter()
            .map(|v| {
                let (x, y) = canvas_to_ndc(v.position[0], v.position[1], &self.arena, self.size);
                Vertex::new(x, y, v.color)
            })
            .collect();

        if ndc.len() > self.vertex_capacity {
            self.vertex_capacity = grown_capacity(self.vertex_capacity, ndc.len());
            self.vertices = vertex_buffer(&self.device, self.vertex_capacity);
            log::debug!("Vertex buffer grown to {}", self.vertex_capacity);
        }

        self.queue
            .write_buffer(&self.vertices, 0, bytemuck::cast_slice(&ndc));
        self.vertex_count = ndc.len() as u32;
    }

    /// Draw one frame of the scene
    pub fn render(&mut self, scene: &[Vertex]) -> Result<(), wgpu::SurfaceError> {
        self.upload(scene);

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let [r, g, b, a] = CLEAR.map(f64::from);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("maze_frame"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("maze_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if self.vertex_count > 0 {
                pass.set_pipeline(&self.pipeline);
                pass.set_vertex_buffer(0, self.vertices.slice(..));
                pass.draw(0..self.vertex_count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_to_ndc_square() {
        let arena = Arena::new(320.0, 320.0);
        assert_eq!(canvas_to_ndc(160.0, 160.0, &arena, (640, 640)), (0.0, 0.0));
        assert_eq!(canvas_to_ndc(0.0, 0.0, &arena, (640, 640)), (-1.0, 1.0));
        assert_eq!(canvas_to_ndc(320.0, 320.0, &arena, (640, 640)), (1.0, -1.0));
    }

    #[test]
    fn test_canvas_to_ndc_letterboxed() {
        // Wide viewport: arena fills the height, centered horizontally
        let arena = Arena::new(320.0, 320.0);
        let (x, y) = canvas_to_ndc(0.0, 0.0, &arena, (1280, 640));
        assert_eq!(y, 1.0);
        assert_eq!(x, -0.5);
    }

    #[test]
    fn test_grown_capacity() {
        assert_eq!(grown_capacity(2048, 100), 2048);
        assert_eq!(grown_capacity(2048, 2049), 4096);
        assert_eq!(grown_capacity(2048, 9000), 16384);
        assert_eq!(grown_capacity(0, 3), 4);
    }
}
