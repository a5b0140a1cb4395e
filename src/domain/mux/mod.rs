pub mod error;
pub mod model;
pub mod muxer;

pub use error::MuxError;
pub use model::{PipelineArtifact, MP4_CONTENT_TYPE};
pub use muxer::{MuxProcess, Muxer};
