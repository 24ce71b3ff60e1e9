/// Data bundle assembled once per frame and passed immutably to the render
/// pass.
///
/// Building a `FramePacket` on the CPU side decouples the scene registries
/// from command recording: the pass sees fully resolved GPU handles and
/// offsets, not how the scene is structured. Because the packet snapshots
/// the *current* frame slot's bind groups, it also serves as the explicit
/// "current frame resource" context — there is no ambient global.
use std::sync::Arc;

use crate::scene::RenderLayer;

/// A single indexed draw, fully resolved.
pub struct DrawCommand {
    pub vertex_buffer: Arc<wgpu::Buffer>,
    pub index_buffer: Arc<wgpu::Buffer>,
    pub index_format: wgpu::IndexFormat,
    pub index_count: u32,
    pub start_index: u32,
    pub base_vertex: i32,
    /// Dynamic offset into the slot's object upload buffer.
    pub object_offset: u32,
    /// Dynamic offset into the slot's material upload buffer.
    pub material_offset: u32,
}

/// The current frame slot's bind groups (group 0..2).
#[derive(Clone)]
pub struct SlotBindings {
    pub pass: Arc<wgpu::BindGroup>,
    pub object: Arc<wgpu::BindGroup>,
    pub material: Arc<wgpu::BindGroup>,
}

/// All data the scene pass needs for one frame.
pub struct FramePacket {
    pub bindings: SlotBindings,
    /// Draw lists indexed by `RenderLayer::index()`.
    pub layers: [Vec<DrawCommand>; RenderLayer::COUNT],
    pub wireframe: bool,
}
