use super::error::MuxError;
use super::model::{PipelineArtifact, MP4_CONTENT_TYPE};
use crate::domain::video::SilentVideo;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// External process that combines a video stream and an audio stream.
///
/// Implementations copy the video stream unchanged, encode the audio to AAC
/// and overwrite `output`.
#[async_trait]
pub trait MuxProcess: Send + Sync {
    async fn combine(&self, video: &Path, audio: &Path, output: &Path) -> Result<(), MuxError>;
}

pub struct Muxer {
    process: Arc<dyn MuxProcess>,
}

impl Muxer {
    pub fn new(process: Arc<dyn MuxProcess>) -> Self {
        Self { process }
    }

    /// Produce the final artifact.
    ///
    /// Without audio the silent video is the artifact and no process runs.
    pub async fn mux(
        &self,
        silent: &SilentVideo,
        audio: Option<&Path>,
        output: &Path,
    ) -> Result<PipelineArtifact, MuxError> {
        let Some(audio) = audio else {
            tracing::info!(
                video = %silent.path.display(),
                "No audio track, delivering silent video as final artifact"
            );
            return Ok(PipelineArtifact {
                path: silent.path.clone(),
                content_type: MP4_CONTENT_TYPE,
                has_audio: false,
            });
        };

        let start_time = std::time::Instant::now();
        self.process.combine(&silent.path, audio, output).await?;

        tracing::info!(
            output = %output.display(),
            latency_ms = start_time.elapsed().as_millis(),
            "Audio muxed onto video"
        );

        Ok(PipelineArtifact {
            path: output.to_path_buf(),
            content_type: MP4_CONTENT_TYPE,
            has_audio: true,
        })
    }
}
