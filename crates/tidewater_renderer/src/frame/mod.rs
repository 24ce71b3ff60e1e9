//! Multi-buffered frame resources and GPU/CPU synchronization.

pub mod constants;
pub mod ring;
pub mod timeline;
pub mod upload;

pub use constants::{Light, MaterialConstants, ObjectConstants, PassConstants, MAX_LIGHTS};
pub use ring::{FrameError, FrameRing, FrameSlot, DEFAULT_RING_SIZE};
pub use timeline::GpuTimeline;
pub use upload::UploadBuffer;
