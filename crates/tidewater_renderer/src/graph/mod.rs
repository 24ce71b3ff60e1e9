//! Frame packet + render pass abstraction.

pub mod frame_packet;
pub mod pass_trait;

pub use frame_packet::{DrawCommand, FramePacket, SlotBindings};
pub use pass_trait::RenderPass;
