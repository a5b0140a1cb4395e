use std::path::PathBuf;

pub const MP4_CONTENT_TYPE: &str = "video/mp4";

/// Final deliverable file inside an invocation workspace.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineArtifact {
    pub path: PathBuf,
    pub content_type: &'static str,
    pub has_audio: bool,
}
