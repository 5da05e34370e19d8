//! Colored 2D line and triangle pipelines over one shared shader
//!
//! Everything the viewer draws is `(position, color)` vertices: grid
//! edges and the gizmo as line lists, the sky gradient as a triangle
//! list. One uniform selects the coordinate space (camera view or window
//! pixels).

use bytemuck::{Pod, Zeroable};
use scarp_core::Vec2;
use scarp_engine::LineVertex;
use wgpu::util::DeviceExt;

/// GPU-side vertex: 2D position plus RGBA color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct GpuVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl GpuVertex {
    pub fn from_line_vertex(v: &LineVertex) -> Self {
        Self {
            position: [v.position.x, v.position.y],
            color: v.color.to_array(),
        }
    }

    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GpuVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// The view mapping uniform: geometry is transformed as
/// `(position - center) / half_extent` into clip space
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct ViewUniform {
    center: [f32; 2],
    half_extent: [f32; 2],
}

/// A uniform buffer + bind group holding one view mapping
pub struct ViewBinding {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl ViewBinding {
    /// Update the mapping; call once per frame before drawing
    pub fn write(&self, queue: &wgpu::Queue, center: Vec2, half_extent: Vec2) {
        let uniform = ViewUniform {
            center: [center.x, center.y],
            half_extent: [half_extent.x, half_extent.y],
        };
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&uniform));
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

/// A growable vertex buffer rewritten per upload
pub struct VertexBuffer {
    buffer: wgpu::Buffer,
    capacity: usize,
    len: u32,
}

impl VertexBuffer {
    pub fn new(device: &wgpu::Device, capacity: usize) -> Self {
        Self {
            buffer: Self::allocate(device, capacity),
            capacity,
            len: 0,
        }
    }

    /// Replace the buffer contents, growing the allocation if needed
    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, data: &[GpuVertex]) {
        if data.len() > self.capacity {
            self.capacity = data.len();
            self.buffer = Self::allocate(device, self.capacity);
        }
        if !data.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(data));
        }
        self.len = data.len() as u32;
    }

    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer.slice(..)
    }

    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn allocate(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scarp Vertex Buffer"),
            size: (capacity.max(1) * std::mem::size_of::<GpuVertex>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }
}

/// Line-list and triangle-list pipelines sharing the view uniform layout
pub struct LinePipeline {
    pub lines: wgpu::RenderPipeline,
    pub triangles: wgpu::RenderPipeline,
    view_layout: wgpu::BindGroupLayout,
}

impl LinePipeline {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scarp Line Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("line_shader.wgsl").into()),
        });

        let view_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scarp View Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scarp Line Pipeline Layout"),
            bind_group_layouts: &[&view_layout],
            push_constant_ranges: &[],
        });

        let lines = Self::build_pipeline(
            device,
            &pipeline_layout,
            &shader,
            format,
            wgpu::PrimitiveTopology::LineList,
            "Scarp Line Pipeline",
        );
        let triangles = Self::build_pipeline(
            device,
            &pipeline_layout,
            &shader,
            format,
            wgpu::PrimitiveTopology::TriangleList,
            "Scarp Triangle Pipeline",
        );

        Self {
            lines,
            triangles,
            view_layout,
        }
    }

    /// Create a uniform buffer + bind group for one view mapping
    pub fn create_view_binding(&self, device: &wgpu::Device) -> ViewBinding {
        let uniform = ViewUniform {
            center: [0.0, 0.0],
            half_extent: [1.0, 1.0],
        };
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scarp View Uniform"),
            contents: bytemuck::bytes_of(&uniform),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scarp View Bind Group"),
            layout: &self.view_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        ViewBinding { buffer, bind_group }
    }

    fn build_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        format: wgpu::TextureFormat,
        topology: wgpu::PrimitiveTopology,
        label: &str,
    ) -> wgpu::RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[GpuVertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }
}
