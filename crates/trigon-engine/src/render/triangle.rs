use anyhow::{anyhow, Context, Result};
use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::shader;

use super::{RenderCtx, RenderTarget};

/// One vertex: position only, tightly packed.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Draws a fixed vertex list as filled triangles.
///
/// All GPU resources are created up front in [`new`](Self::new) and released
/// when the renderer is dropped; there is no partially-constructed state.
pub struct TriangleRenderer {
    vertex_buffer: wgpu::Buffer,
    pipeline: wgpu::RenderPipeline,
    vertex_count: u32,
}

impl TriangleRenderer {
    /// Builds the vertex buffer and render pipeline from WGSL sources.
    ///
    /// The two shader modules are intermediates: once the pipeline holds
    /// them, they are dropped at the end of this function.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        vertices: &[Vertex],
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<Self> {
        let vs = shader::create_module(device, "triangle vs", vertex_src)
            .context("vertex stage")?;
        let fs = shader::create_module(device, "triangle fs", fragment_src)
            .context("fragment stage")?;

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("triangle vbo"),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        // Pipeline creation validates stage interfaces (the link step);
        // capture those errors too instead of panicking.
        let error_scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("triangle pipeline layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("triangle pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vs,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &fs,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
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
        });

        if let Some(err) = pollster::block_on(error_scope.pop()) {
            return Err(anyhow!("triangle pipeline failed to link: {err}"));
        }

        Ok(Self {
            vertex_buffer,
            pipeline,
            vertex_count: vertices.len() as u32,
        })
    }

    /// Issues the one draw call over the surface cleared by the caller.
    ///
    /// Skipped entirely while the viewport has zero area (minimized).
    pub fn render(&self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        if !ctx.viewport.is_valid() {
            return;
        }

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("triangle pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        let (x, y, w, h) = ctx.viewport.rect();
        rpass.set_viewport(x, y, w, h, 0.0, 1.0);
        rpass.set_pipeline(&self.pipeline);
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.draw(0..self.vertex_count, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_three_floats_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 12);

        let layout = Vertex::layout();
        assert_eq!(layout.array_stride, 12);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Vertex);
    }

    #[test]
    fn single_attribute_at_slot_zero_offset_zero() {
        let layout = Vertex::layout();
        assert_eq!(layout.attributes.len(), 1);

        let attr = &layout.attributes[0];
        assert_eq!(attr.format, wgpu::VertexFormat::Float32x3);
        assert_eq!(attr.offset, 0);
        assert_eq!(attr.shader_location, 0);
    }
}
