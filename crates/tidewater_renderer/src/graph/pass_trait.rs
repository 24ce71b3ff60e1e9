/// The `RenderPass` trait — a stage in the per-frame recording sequence.
///
/// ## Two-phase design
/// `prepare` → `execute` lets a pass upload GPU data **before** a
/// `wgpu::RenderPass` opens, since `write_buffer` is not allowed while the
/// encoder is recording one.
use wgpu::{CommandEncoder, Device, Queue, TextureView};

use crate::graph::FramePacket;

pub trait RenderPass: Send + Sync + 'static {
    /// Short human-readable label used as the wgpu debug label.
    fn name(&self) -> &str;

    /// Downcast support so the renderer can reach pass-specific settings
    /// (e.g. the scene pass's clear color) without widening this trait.
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;

    /// Upload GPU data. Called before `execute` each frame.
    fn prepare(&mut self, device: &Device, queue: &Queue, packet: &FramePacket);

    /// Record draw commands into `encoder`.
    ///
    /// - `color_view`     — color attachment (the MSAA texture when active)
    /// - `resolve_target` — single-sample resolve target, or `None`
    /// - `depth_view`     — depth attachment
    fn execute(
        &mut self,
        device: &Device,
        queue: &Queue,
        encoder: &mut CommandEncoder,
        color_view: &TextureView,
        resolve_target: Option<&TextureView>,
        depth_view: &TextureView,
        packet: &FramePacket,
    );
}
