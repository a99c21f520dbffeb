use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};

use crate::coords::Vec2;
use crate::geometry::TriangleFan;
use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget};

use super::painter::PolygonPainter;
use super::program::{ShaderError, ShaderProgram, ShaderSources};

/// Vertex attribute slot the program must read pixel positions from.
pub const POSITION_LOCATION: u32 = 0;

/// Renderer for flat-colored polygons given as triangle fans.
///
/// `draw_polygon` records a polygon; `render` uploads everything recorded since
/// the last flush and issues one draw call per polygon, in recording order. Each
/// draw binds its own uniform slot (resolution + color) through a dynamic offset,
/// so later polygons blend over earlier ones exactly as if drawn one at a time.
pub struct PolygonRenderer {
    sources: ShaderSources,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    uniform_ubo: Option<wgpu::Buffer>,
    uniform_capacity: usize,
    uniform_stride: u64,

    vertex_vbo: Option<wgpu::Buffer>,
    vertex_capacity: usize,

    batch: DrawBatch,
}

impl Default for PolygonRenderer {
    fn default() -> Self {
        Self::new(ShaderSources::default())
    }
}

impl PolygonRenderer {
    pub fn new(sources: ShaderSources) -> Self {
        Self {
            sources,
            pipeline_format: None,
            pipeline: None,
            bind_group_layout: None,
            bind_group: None,
            uniform_ubo: None,
            uniform_capacity: 0,
            uniform_stride: POLYGON_UNIFORM_SIZE,
            vertex_vbo: None,
            vertex_capacity: 0,
            batch: DrawBatch::default(),
        }
    }

    /// Flushes recorded polygons into `target`.
    ///
    /// The pass loads existing contents, so the caller clears the frame first.
    /// Returns the number of draw calls issued.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
    ) -> Result<usize, ShaderError> {
        self.ensure_pipeline(ctx)?;

        if self.batch.is_empty() {
            return Ok(0);
        }
        if !ctx.viewport.is_valid() {
            log::trace!("skipping {} polygons on a zero-area viewport", self.batch.len());
            self.batch.clear();
            return Ok(0);
        }

        self.ensure_uniform_capacity(ctx, self.batch.len());
        self.ensure_vertex_capacity(ctx, self.batch.vertex_count());

        let Some(pipeline) = self.pipeline.as_ref() else { return Ok(0) };
        let Some(bind_group) = self.bind_group.as_ref() else { return Ok(0) };
        let Some(uniform_ubo) = self.uniform_ubo.as_ref() else { return Ok(0) };
        let Some(vertex_vbo) = self.vertex_vbo.as_ref() else { return Ok(0) };

        let uniforms = self
            .batch
            .uniform_bytes(ctx.viewport.resolution(), self.uniform_stride);
        ctx.queue.write_buffer(uniform_ubo, 0, &uniforms);
        ctx.queue
            .write_buffer(vertex_vbo, 0, bytemuck::cast_slice(self.batch.vertices()));

        let draws = {
            let mut rpass = target.begin_pass("polyfract polygon pass", wgpu::LoadOp::Load);

            rpass.set_viewport(0.0, 0.0, ctx.viewport.width, ctx.viewport.height, 0.0, 1.0);
            rpass.set_pipeline(pipeline);
            rpass.set_vertex_buffer(0, vertex_vbo.slice(..));

            for (slot, draw) in self.batch.draws().iter().enumerate() {
                let offset = slot as u64 * self.uniform_stride;
                rpass.set_bind_group(0, bind_group, &[offset as u32]);
                rpass.draw(draw.vertex_range(), 0..1);
            }

            self.batch.len()
        };

        self.batch.clear();
        Ok(draws)
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) -> Result<(), ShaderError> {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return Ok(());
        }

        let program = ShaderProgram::build(ctx.device, &self.sources)?;
        if !program.interface().attributes.contains(&POSITION_LOCATION) {
            return Err(ShaderError::MissingAttribute {
                location: POSITION_LOCATION,
            });
        }

        let bind_group_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("polyfract polygon bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: Some(polygon_uniform_binding_size()),
                    },
                    count: None,
                }],
            });

        let pipeline_layout =
            ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("polyfract polygon pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("polyfract polygon pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: program.vertex_module(),
                entry_point: Some(program.vertex_entry()),
                compilation_options: Default::default(),
                buffers: &[position_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: program.fragment_module(),
                entry_point: Some(program.fragment_entry()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(source_over_blend()),
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

        log::debug!("polygon pipeline created for {:?}", ctx.surface_format);

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);
        self.bind_group = None;
        self.uniform_ubo = None;
        self.uniform_capacity = 0;
        Ok(())
    }

    fn ensure_uniform_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.uniform_capacity && self.uniform_ubo.is_some() && self.bind_group.is_some()
        {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let stride = uniform_stride(ctx.uniform_offset_alignment());
        let new_cap = required.next_power_of_two().max(8);

        let uniform_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("polyfract polygon uniform ubo"),
            size: stride * new_cap as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("polyfract polygon bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &uniform_ubo,
                    offset: 0,
                    size: Some(polygon_uniform_binding_size()),
                }),
            }],
        });

        self.uniform_ubo = Some(uniform_ubo);
        self.bind_group = Some(bind_group);
        self.uniform_capacity = new_cap;
        self.uniform_stride = stride;
    }

    fn ensure_vertex_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.vertex_capacity && self.vertex_vbo.is_some() {
            return;
        }
        let new_cap = required.next_power_of_two().max(64);
        self.vertex_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("polyfract polygon vbo"),
            size: (new_cap * std::mem::size_of::<Vec2>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.vertex_capacity = new_cap;
    }
}

impl PolygonPainter for PolygonRenderer {
    fn draw_polygon(&mut self, fan: &TriangleFan, color: Color) {
        self.batch.push(fan, color);
    }
}

// ── CPU-side batch ────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, PartialEq)]
struct PendingDraw {
    first_vertex: u32,
    vertex_count: u32,
    color: Color,
}

impl PendingDraw {
    fn vertex_range(&self) -> std::ops::Range<u32> {
        self.first_vertex..self.first_vertex + self.vertex_count
    }
}

/// Vertices of all recorded polygons back to back, plus one entry per draw.
#[derive(Debug, Default)]
struct DrawBatch {
    vertices: Vec<Vec2>,
    draws: Vec<PendingDraw>,
}

impl DrawBatch {
    fn push(&mut self, fan: &TriangleFan, color: Color) {
        if fan.is_empty() {
            log::trace!("ignoring empty triangle fan");
            return;
        }
        let first_vertex = self.vertices.len() as u32;
        self.vertices.extend_from_slice(fan.vertices());
        self.draws.push(PendingDraw {
            first_vertex,
            vertex_count: fan.vertex_count() as u32,
            color,
        });
    }

    fn len(&self) -> usize {
        self.draws.len()
    }

    fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    fn draws(&self) -> &[PendingDraw] {
        &self.draws
    }

    fn clear(&mut self) {
        self.vertices.clear();
        self.draws.clear();
    }

    /// Packs one uniform per draw at `stride` bytes apart.
    fn uniform_bytes(&self, resolution: [f32; 2], stride: u64) -> Vec<u8> {
        let stride = stride as usize;
        let mut bytes = vec![0u8; stride * self.draws.len()];
        for (slot, draw) in self.draws.iter().enumerate() {
            let uniform = PolygonUniform {
                resolution,
                _pad: [0.0; 2],
                color: draw.color.to_array(),
            };
            let start = slot * stride;
            bytes[start..start + POLYGON_UNIFORM_SIZE as usize]
                .copy_from_slice(bytemuck::bytes_of(&uniform));
        }
        bytes
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Uniform layout shared by both stages (32 bytes):
///
///  offset  0  resolution  [f32; 2]
///  offset  8  _pad        [f32; 2]
///  offset 16  color       [f32; 4]
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct PolygonUniform {
    resolution: [f32; 2],
    _pad: [f32; 2],
    color: [f32; 4],
}

const POLYGON_UNIFORM_SIZE: u64 = std::mem::size_of::<PolygonUniform>() as u64;

fn polygon_uniform_binding_size() -> NonZeroU64 {
    NonZeroU64::new(POLYGON_UNIFORM_SIZE).expect("PolygonUniform has non-zero size by construction")
}

/// Distance between uniform slots, rounded up to the device's dynamic offset alignment.
fn uniform_stride(alignment: u32) -> u64 {
    let alignment = u64::from(alignment.max(1));
    POLYGON_UNIFORM_SIZE.div_ceil(alignment) * alignment
}

fn position_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRS: [wgpu::VertexAttribute; 1] =
        wgpu::vertex_attr_array![POSITION_LOCATION => Float32x2];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vec2>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRS,
    }
}

/// Straight-alpha source-over, applied to color and alpha alike.
fn source_over_blend() -> wgpu::BlendState {
    let component = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState {
        color: component,
        alpha: component,
    }
}
