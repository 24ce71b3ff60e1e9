/// The 3-D scene pass.
///
/// Clears color + depth, binds the current slot's pass constants once, and
/// walks the layers in [`RenderLayer::DRAW_ORDER`], switching pipelines
/// per layer and dynamic offsets per draw.
use wgpu::{
    Color, CommandEncoder, Device, LoadOp, Operations, Queue, RenderPassColorAttachment,
    RenderPassDepthStencilAttachment, RenderPassDescriptor, StoreOp, TextureView,
};

use crate::graph::{FramePacket, RenderPass};
use crate::pipeline::ScenePipelines;
use crate::scene::RenderLayer;

pub struct ScenePass {
    pipelines: ScenePipelines,
    /// Sky / clear color.
    pub clear_color: Color,
}

impl ScenePass {
    pub fn new(pipelines: ScenePipelines) -> Self {
        Self {
            pipelines,
            clear_color: Color {
                r: 0.0,
                g: 0.0,
                b: 0.0,
                a: 1.0,
            },
        }
    }
}

impl RenderPass for ScenePass {
    fn name(&self) -> &str {
        "Scene Pass"
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }

    fn prepare(&mut self, _device: &Device, _queue: &Queue, _packet: &FramePacket) {}

    fn execute(
        &mut self,
        _device: &Device,
        _queue: &Queue,
        encoder: &mut CommandEncoder,
        color_view: &TextureView,
        resolve_target: Option<&TextureView>,
        depth_view: &TextureView,
        packet: &FramePacket,
    ) {
        let mut rpass = encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some(self.name()),
            color_attachments: &[Some(RenderPassColorAttachment {
                view: color_view,
                resolve_target,
                ops: Operations {
                    load: LoadOp::Clear(self.clear_color),
                    store: StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(Operations {
                    load: LoadOp::Clear(1.0),
                    store: StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        rpass.set_bind_group(0, &*packet.bindings.pass, &[]);

        for layer in RenderLayer::DRAW_ORDER {
            let commands = &packet.layers[layer.index()];
            if commands.is_empty() {
                continue;
            }

            rpass.set_pipeline(self.pipelines.for_layer(layer, packet.wireframe));

            for cmd in commands {
                rpass.set_bind_group(1, &*packet.bindings.object, &[cmd.object_offset]);
                rpass.set_bind_group(2, &*packet.bindings.material, &[cmd.material_offset]);
                rpass.set_vertex_buffer(0, cmd.vertex_buffer.slice(..));
                rpass.set_index_buffer(cmd.index_buffer.slice(..), cmd.index_format);
                rpass.draw_indexed(
                    cmd.start_index..cmd.start_index + cmd.index_count,
                    cmd.base_vertex,
                    0..1,
                );
            }
        }
    }
}
