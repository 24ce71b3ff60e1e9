//! `tidewater_renderer` — wgpu scene renderer with multi-buffered frame
//! resources, a height-field water simulation, and ray picking.
//!
//! # Module layout
//!
//! | Module          | Responsibility                                        |
//! |-----------------|-------------------------------------------------------|
//! | `context`       | wgpu instance/adapter/device/queue container          |
//! | `resources`     | Low-level buffer allocation helpers                   |
//! | `geometry`      | `Vertex`, CPU mesh data, primitives, skull loader     |
//! | `intersect`     | `Aabb`, `Ray`, ray/box and ray/triangle tests         |
//! | `waves`         | CPU height-field wave simulation                      |
//! | `frame`         | Frame-resource ring, upload buffers, GPU timeline     |
//! | `scene`         | Material and render-item registries (+ layers)        |
//! | `picking`       | Screen ray → nearest triangle, movement gating        |
//! | `pipeline`      | Shared bind-group layouts + per-layer pipelines       |
//! | `graph`         | `FramePacket` + `RenderPass` trait                    |
//! | `passes`        | Built-in `ScenePass`                                  |
//! | `render_target` | MSAA color + depth attachments                        |
//! | `renderer`      | The orchestrating `Renderer` / frame scheduler        |

pub mod context;
pub mod frame;
pub mod geometry;
pub mod graph;
pub mod intersect;
pub mod passes;
pub mod picking;
pub mod pipeline;
pub mod render_target;
pub mod renderer;
pub mod resources;
pub mod scene;
pub mod waves;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use glam;

pub use context::{ContextError, RenderContext};
pub use frame::{FrameError, FrameRing, GpuTimeline, Light, DEFAULT_RING_SIZE};
pub use geometry::{MeshData, Submesh, Vertex};
pub use intersect::{Aabb, Ray};
pub use picking::{PickHit, PickOutcome, STOP_DISTANCE};
pub use renderer::Renderer;
pub use scene::{MaterialDesc, RenderItemDesc, RenderLayer};
pub use waves::Waves;
