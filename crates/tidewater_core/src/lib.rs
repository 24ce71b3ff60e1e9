//! `tidewater_core` — leaf types shared by the renderer and the app.
//!
//! | Module   | Responsibility                                   |
//! |----------|--------------------------------------------------|
//! | `time`   | Frame clock and per-frame `Time` snapshots       |
//! | `input`  | Keyboard / mouse state fed from winit events     |
//! | `camera` | First-person camera + key-binding `Controller`   |

pub mod camera;
pub mod input;
pub mod time;

pub use camera::{Camera, Controller};
pub use input::{InputState, KeyCode, MouseButton};
pub use time::{Time, TimeClock};

// glam is the workspace math crate; re-export so downstream crates agree
// on the version without naming it in every Cargo.toml.
pub use glam;
