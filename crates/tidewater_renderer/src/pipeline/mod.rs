pub mod layout;
pub mod scene;

pub use layout::PipelineLayouts;
pub use scene::ScenePipelines;
