pub mod error;
pub mod service;
pub mod stage;
pub mod workspace;

pub use error::PipelineError;
pub use service::{GeneratedVideo, GenerationRequest, PipelineOrchestrator, PipelineOrchestratorApi};
pub use stage::PipelineStage;
pub use workspace::Workspace;
