//! The per-layer render pipeline set.
//!
//! Every layer shares `assets/shaders/scene.wgsl` and the three bind-group
//! layouts; layers differ only in fixed-function state:
//!
//! | Layer        | Blend     | Cull | Depth               | Fragment        |
//! |--------------|-----------|------|---------------------|-----------------|
//! | Opaque       | replace   | back | write, less         | `fs_main`       |
//! | Wireframe    | replace   | none | write, less (lines) | `fs_main`       |
//! | AlphaTested  | replace   | none | write, less         | `fs_alpha_test` |
//! | Sprites      | replace   | none | write, less         | `fs_alpha_test` |
//! | Transparent  | alpha     | none | read-only, less     | `fs_main`       |
//! | Highlight    | alpha     | none | read-only, less-eq  | `fs_main`       |

use std::sync::Arc;

use crate::geometry::Vertex;
use crate::pipeline::PipelineLayouts;
use crate::scene::RenderLayer;

#[derive(Clone)]
pub struct ScenePipelines {
    pub opaque: Arc<wgpu::RenderPipeline>,
    pub opaque_wireframe: Arc<wgpu::RenderPipeline>,
    pub alpha_tested: Arc<wgpu::RenderPipeline>,
    pub sprites: Arc<wgpu::RenderPipeline>,
    pub transparent: Arc<wgpu::RenderPipeline>,
    pub highlight: Arc<wgpu::RenderPipeline>,
    pub layouts: PipelineLayouts,
}

struct Variant {
    label: &'static str,
    fragment_entry: &'static str,
    blend: wgpu::BlendState,
    cull_mode: Option<wgpu::Face>,
    polygon_mode: wgpu::PolygonMode,
    depth_write: bool,
    depth_compare: wgpu::CompareFunction,
}

impl ScenePipelines {
    /// Compiles the whole set for the given target format and sample
    /// count.
    pub fn new(
        device: &wgpu::Device,
        target_format: wgpu::TextureFormat,
        sample_count: u32,
        layouts: PipelineLayouts,
    ) -> Self {
        let shader =
            device.create_shader_module(wgpu::include_wgsl!("../../assets/shaders/scene.wgsl"));

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&layouts.pass, &layouts.object, &layouts.material],
            push_constant_ranges: &[],
        });

        let build = |v: Variant| -> Arc<wgpu::RenderPipeline> {
            Arc::new(
                device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some(v.label),
                    layout: Some(&pipeline_layout),
                    vertex: wgpu::VertexState {
                        module: &shader,
                        entry_point: Some("vs_main"),
                        buffers: &[Vertex::layout()],
                        compilation_options: wgpu::PipelineCompilationOptions::default(),
                    },
                    fragment: Some(wgpu::FragmentState {
                        module: &shader,
                        entry_point: Some(v.fragment_entry),
                        targets: &[Some(wgpu::ColorTargetState {
                            format: target_format,
                            blend: Some(v.blend),
                            write_mask: wgpu::ColorWrites::ALL,
                        })],
                        compilation_options: wgpu::PipelineCompilationOptions::default(),
                    }),
                    primitive: wgpu::PrimitiveState {
                        topology: wgpu::PrimitiveTopology::TriangleList,
                        front_face: wgpu::FrontFace::Ccw,
                        cull_mode: v.cull_mode,
                        polygon_mode: v.polygon_mode,
                        ..Default::default()
                    },
                    depth_stencil: Some(wgpu::DepthStencilState {
                        format: wgpu::TextureFormat::Depth32Float,
                        depth_write_enabled: v.depth_write,
                        depth_compare: v.depth_compare,
                        stencil: wgpu::StencilState::default(),
                        bias: wgpu::DepthBiasState::default(),
                    }),
                    multisample: wgpu::MultisampleState {
                        count: sample_count,
                        mask: !0,
                        alpha_to_coverage_enabled: false,
                    },
                    multiview: None,
                    cache: None,
                }),
            )
        };

        let opaque = build(Variant {
            label: "Pipeline: Opaque",
            fragment_entry: "fs_main",
            blend: wgpu::BlendState::REPLACE,
            cull_mode: Some(wgpu::Face::Back),
            polygon_mode: wgpu::PolygonMode::Fill,
            depth_write: true,
            depth_compare: wgpu::CompareFunction::Less,
        });
        let opaque_wireframe = build(Variant {
            label: "Pipeline: Opaque Wireframe",
            fragment_entry: "fs_main",
            blend: wgpu::BlendState::REPLACE,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Line,
            depth_write: true,
            depth_compare: wgpu::CompareFunction::Less,
        });
        let alpha_tested = build(Variant {
            label: "Pipeline: AlphaTested",
            fragment_entry: "fs_alpha_test",
            blend: wgpu::BlendState::REPLACE,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            depth_write: true,
            depth_compare: wgpu::CompareFunction::Less,
        });
        let sprites = build(Variant {
            label: "Pipeline: Sprites",
            fragment_entry: "fs_alpha_test",
            blend: wgpu::BlendState::REPLACE,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            depth_write: true,
            depth_compare: wgpu::CompareFunction::Less,
        });
        let transparent = build(Variant {
            label: "Pipeline: Transparent",
            fragment_entry: "fs_main",
            blend: wgpu::BlendState::ALPHA_BLENDING,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            depth_write: false,
            depth_compare: wgpu::CompareFunction::Less,
        });
        let highlight = build(Variant {
            label: "Pipeline: Highlight",
            fragment_entry: "fs_main",
            blend: wgpu::BlendState::ALPHA_BLENDING,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            depth_write: false,
            depth_compare: wgpu::CompareFunction::LessEqual,
        });

        Self {
            opaque,
            opaque_wireframe,
            alpha_tested,
            sprites,
            transparent,
            highlight,
            layouts,
        }
    }

    /// Pipeline to bind for `layer`, honoring the wireframe toggle for the
    /// opaque layer.
    pub fn for_layer(&self, layer: RenderLayer, wireframe: bool) -> &Arc<wgpu::RenderPipeline> {
        match layer {
            RenderLayer::Opaque if wireframe => &self.opaque_wireframe,
            RenderLayer::Opaque => &self.opaque,
            RenderLayer::AlphaTested => &self.alpha_tested,
            RenderLayer::Sprites => &self.sprites,
            RenderLayer::Transparent => &self.transparent,
            RenderLayer::Highlight => &self.highlight,
        }
    }
}
