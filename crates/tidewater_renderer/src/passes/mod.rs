pub mod scene_pass;

pub use scene_pass::ScenePass;
