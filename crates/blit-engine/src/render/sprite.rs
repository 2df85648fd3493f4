use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::coords::Rect;
use crate::render::{RenderCtx, RenderTarget, Texture};

/// Textured-quad renderer.
///
/// `draw` renders one rectangle in logical pixels, sampling the given texture
/// across the full rectangle (no tiling or cropping). Geometry is converted to
/// NDC in the vertex shader using the viewport uniform, so a resized window
/// only reissues that constant.
///
/// The pipeline, sampler, and viewport uniform are created lazily and cached
/// per surface format. The vertex buffer is transient: six vertices are built
/// and uploaded per call, and the buffer is dropped with the frame's command
/// stream.
#[derive(Default)]
pub struct SpriteRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    viewport_bgl: Option<wgpu::BindGroupLayout>,
    texture_bgl: Option<wgpu::BindGroupLayout>,

    viewport_ubo: Option<wgpu::Buffer>,
    viewport_bind_group: Option<wgpu::BindGroup>,
    sampler: Option<wgpu::Sampler>,
}

impl SpriteRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders `texture` into `rect`.
    ///
    /// Degenerate rectangles (zero or negative extent after normalization)
    /// record no draw call; this is not an error.
    pub fn draw(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        texture: &Texture,
        rect: Rect,
    ) {
        let r = rect.normalized();
        if r.is_empty() || !r.is_finite() {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_bindings(ctx);
        self.write_viewport_uniform(ctx);

        let vertices = quad_vertices(r);

        // Transient per-draw buffer; wgpu keeps it alive until the submitted
        // commands complete.
        let vbo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("blit sprite vbo"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(viewport_bind_group) = self.viewport_bind_group.as_ref() else { return };
        let Some(texture_bgl) = self.texture_bgl.as_ref() else { return };
        let Some(sampler) = self.sampler.as_ref() else { return };

        let texture_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("blit sprite texture bind group"),
            layout: texture_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(texture.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("blit sprite pass"),
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

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, viewport_bind_group, &[]);
        rpass.set_bind_group(1, &texture_bind_group, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.draw(0..6, 0..1);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader_src = include_str!("shaders/sprite.wgsl");
        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("blit sprite shader"),
            source: wgpu::ShaderSource::Wgsl(shader_src.into()),
        });

        let viewport_bgl = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("blit sprite viewport bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: Some(viewport_ubo_min_binding_size()),
                    },
                    count: None,
                }],
            });

        let texture_bgl = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("blit sprite texture bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("blit sprite pipeline layout"),
                bind_group_layouts: &[&viewport_bgl, &texture_bgl],
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("blit sprite pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[SpriteVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Winding is consistent, but culling stays off regardless.
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

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.viewport_bgl = Some(viewport_bgl);
        self.texture_bgl = Some(texture_bgl);

        self.viewport_bind_group = None;
        self.viewport_ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.sampler.is_none() {
            self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some("blit sprite sampler"),
                address_mode_u: wgpu::AddressMode::ClampToEdge,
                address_mode_v: wgpu::AddressMode::ClampToEdge,
                address_mode_w: wgpu::AddressMode::ClampToEdge,
                mag_filter: wgpu::FilterMode::Linear,
                min_filter: wgpu::FilterMode::Linear,
                ..Default::default()
            }));
        }

        if self.viewport_bind_group.is_some() && self.viewport_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.viewport_bgl.as_ref() else { return };

        let viewport_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("blit sprite viewport ubo"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("blit sprite viewport bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        self.viewport_ubo = Some(viewport_ubo);
        self.viewport_bind_group = Some(bind_group);
    }

    fn write_viewport_uniform(&mut self, ctx: &RenderCtx<'_>) {
        let Some(ubo) = self.viewport_ubo.as_ref() else { return };
        let u = ViewportUniform {
            viewport: [ctx.viewport.width.max(1.0), ctx.viewport.height.max(1.0)],
            _pad: [0.0; 2],
        };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct SpriteVertex {
    pos: [f32; 2],
    uv: [f32; 2],
}

impl SpriteVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos (logical px)
        1 => Float32x2  // uv
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ViewportUniform {
    viewport: [f32; 2],
    _pad: [f32; 2], // 16-byte alignment
}

fn viewport_ubo_min_binding_size() -> std::num::NonZeroU64 {
    std::num::NonZeroU64::new(std::mem::size_of::<ViewportUniform>() as u64)
        .expect("ViewportUniform has non-zero size by construction")
}

/// Builds the six vertices of a textured quad covering `r`.
///
/// Two triangles, {TL, BL, TR} and {BL, BR, TR}, with UVs mapping the texture
/// corners straight onto the quad corners. Winding is uniform across both
/// triangles.
fn quad_vertices(r: Rect) -> [SpriteVertex; 6] {
    let min = r.min();
    let max = r.max();

    let tl = SpriteVertex { pos: [min.x, min.y], uv: [0.0, 0.0] };
    let bl = SpriteVertex { pos: [min.x, max.y], uv: [0.0, 1.0] };
    let tr = SpriteVertex { pos: [max.x, min.y], uv: [1.0, 0.0] };
    let br = SpriteVertex { pos: [max.x, max.y], uv: [1.0, 1.0] };

    [tl, bl, tr, bl, br, tr]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertices_span_exactly_the_rect() {
        let r = Rect::new(50.0, 100.0, 512.0, 512.0);
        let verts = quad_vertices(r);

        let xs: Vec<f32> = verts.iter().map(|v| v.pos[0]).collect();
        let ys: Vec<f32> = verts.iter().map(|v| v.pos[1]).collect();

        assert!(xs.iter().all(|&x| x == 50.0 || x == 562.0));
        assert!(ys.iter().all(|&y| y == 100.0 || y == 612.0));
        assert!(xs.contains(&50.0) && xs.contains(&562.0));
        assert!(ys.contains(&100.0) && ys.contains(&612.0));
    }

    #[test]
    fn uvs_map_texture_corners_onto_quad_corners() {
        let verts = quad_vertices(Rect::new(10.0, 20.0, 30.0, 40.0));

        for v in verts {
            let u_expected = if v.pos[0] == 10.0 { 0.0 } else { 1.0 };
            let v_expected = if v.pos[1] == 20.0 { 0.0 } else { 1.0 };
            assert_eq!(v.uv, [u_expected, v_expected]);
        }
    }

    #[test]
    fn two_triangles_share_the_diagonal() {
        let verts = quad_vertices(Rect::new(0.0, 0.0, 1.0, 1.0));

        // Triangle A = verts[0..3], triangle B = verts[3..6]; BL and TR are shared.
        assert_eq!(verts[1], verts[3]); // BL
        assert_eq!(verts[2], verts[5]); // TR
    }

    #[test]
    fn winding_is_uniform() {
        fn signed_area(a: [f32; 2], b: [f32; 2], c: [f32; 2]) -> f32 {
            (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
        }

        let v = quad_vertices(Rect::new(5.0, 7.0, 11.0, 13.0));
        let area_a = signed_area(v[0].pos, v[1].pos, v[2].pos);
        let area_b = signed_area(v[3].pos, v[4].pos, v[5].pos);

        assert!(area_a != 0.0 && area_b != 0.0);
        assert_eq!(area_a.signum(), area_b.signum());
    }

    #[test]
    fn degenerate_rect_collapses_to_a_line() {
        let verts = quad_vertices(Rect::new(3.0, 4.0, 0.0, 10.0));
        // Zero width: every vertex sits on x = 3, so no fragment can rasterize.
        assert!(verts.iter().all(|v| v.pos[0] == 3.0));
    }
}
