pub mod camera;
pub mod gpu_context;
pub mod scene_pipeline;
pub mod texture;
pub mod vertex;

pub use camera::{CameraUniform, FollowCamera};
pub use gpu_context::GpuContext;
pub use scene_pipeline::ScenePipeline;
pub use texture::Texture;
pub use vertex::MeshVertex;
