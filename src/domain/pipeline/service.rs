use super::error::PipelineError;
use super::stage::PipelineStage;
use super::workspace::Workspace;
use crate::domain::history::{GenerationRecord, HistoryRepository};
use crate::domain::mux::Muxer;
use crate::domain::shared::InputError;
use crate::domain::synthesis::{
    SpeechOptions, SynthesisRequest, SynthesisService, SynthesisServiceApi,
};
use crate::domain::video::{FrameTranscoder, StreamMetadata};
use async_trait::async_trait;
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

const DEFAULT_AVATAR_FILENAME: &str = "avatar.mp4";

/// Input for one generation, as extracted from the inbound request.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    /// Identity established by the auth gate
    pub user: String,
    pub avatar: Option<Vec<u8>>,
    pub avatar_filename: Option<String>,
    pub text: Option<String>,
    pub options: SpeechOptions,
}

/// A finished, fully written video. The invocation workspace is already gone.
#[derive(Debug, Clone)]
pub struct GeneratedVideo {
    pub invocation_id: Uuid,
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub metadata: StreamMetadata,
    pub frame_count: u64,
    pub has_audio: bool,
}

pub struct PipelineOrchestrator {
    synthesis: Arc<SynthesisService>,
    transcoder: FrameTranscoder,
    muxer: Muxer,
    history: Arc<dyn HistoryRepository>,
    workspace_root: PathBuf,
}

impl PipelineOrchestrator {
    pub fn new(
        synthesis: Arc<SynthesisService>,
        transcoder: FrameTranscoder,
        muxer: Muxer,
        history: Arc<dyn HistoryRepository>,
        workspace_root: PathBuf,
    ) -> Self {
        Self {
            synthesis,
            transcoder,
            muxer,
            history,
            workspace_root,
        }
    }
}

#[async_trait]
pub trait PipelineOrchestratorApi: Send + Sync {
    /// Run one generation end to end
    ///
    /// This operation:
    /// - Validates the avatar payload and, when text is present, the text and
    ///   provider credentials
    /// - Checks the avatar is decodable before any provider call
    /// - Synthesizes speech (skipped without text)
    /// - Re-encodes the avatar frames into a silent video
    /// - Muxes the audio onto the video (skipped without audio)
    ///
    /// Either the complete video is returned or a single error; intermediate
    /// files never leave the invocation workspace.
    async fn generate(&self, request: GenerationRequest) -> Result<GeneratedVideo, PipelineError>;
}

#[async_trait]
impl PipelineOrchestratorApi for PipelineOrchestrator {
    async fn generate(&self, request: GenerationRequest) -> Result<GeneratedVideo, PipelineError> {
        let start_time = Instant::now();
        let mut stage = PipelineStage::Received;

        tracing::info!(
            user = %request.user,
            avatar_size = request.avatar.as_ref().map(|a| a.len()).unwrap_or(0),
            text_length = request.text.as_ref().map(|t| t.len()).unwrap_or(0),
            "Video generation request"
        );

        let result = self.run(request, &mut stage).await;

        match &result {
            Ok(video) => tracing::info!(
                invocation_id = %video.invocation_id,
                frame_count = video.frame_count,
                has_audio = video.has_audio,
                output_size = video.bytes.len(),
                latency_ms = start_time.elapsed().as_millis(),
                "Video generation delivered"
            ),
            Err(e) => tracing::error!(
                stage = %stage,
                error = %e,
                latency_ms = start_time.elapsed().as_millis(),
                "Video generation failed"
            ),
        }

        result
    }
}

impl PipelineOrchestrator {
    async fn run(
        &self,
        request: GenerationRequest,
        stage: &mut PipelineStage,
    ) -> Result<GeneratedVideo, PipelineError> {
        // Received
        let avatar = request
            .avatar
            .filter(|bytes| !bytes.is_empty())
            .ok_or(InputError::MissingAvatar)?;

        let text = request
            .text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string);

        let speech = match &text {
            Some(text) => {
                let synthesis_request = self.synthesis.build_request(text, &request.options)?;
                self.synthesis.ensure_ready()?;
                Some(synthesis_request)
            }
            None => None,
        };

        let workspace = Workspace::create(self.workspace_root.clone())
            .await
            .map_err(|e| PipelineError::Workspace(format!("failed to create workspace: {}", e)))?;

        tracing::debug!(
            invocation_id = %workspace.id(),
            workspace = %workspace.path().display(),
            "Workspace allocated"
        );

        let avatar_filename = request
            .avatar_filename
            .unwrap_or_else(|| DEFAULT_AVATAR_FILENAME.to_string());
        let outcome = self
            .run_in(&workspace, &avatar, speech, stage)
            .await
            .map(|(video, output_path)| {
                self.emit_history(GenerationRecord {
                    invocation_id: video.invocation_id,
                    user: request.user,
                    text,
                    avatar_filename,
                    output_path,
                    timestamp: Utc::now(),
                });
                video
            });

        workspace.close().await;
        outcome
    }

    /// Stages that touch the workspace. Returns the video and the path it
    /// was read from.
    async fn run_in(
        &self,
        workspace: &Workspace,
        avatar: &[u8],
        speech: Option<SynthesisRequest>,
        stage: &mut PipelineStage,
    ) -> Result<(GeneratedVideo, String), PipelineError> {
        let invocation_id = workspace.id();
        let mut stage_started = Instant::now();

        let avatar_path = workspace.avatar_path();
        tokio::fs::write(&avatar_path, avatar)
            .await
            .map_err(|e| PipelineError::Workspace(format!("failed to store avatar: {}", e)))?;

        // Reject undecodable avatars before spending a provider call
        self.transcoder.probe(&avatar_path).await?;

        advance(stage, PipelineStage::AudioStage, invocation_id, &mut stage_started);
        let audio_path = match speech {
            Some(synthesis_request) => {
                let audio = self.synthesis.synthesize(&synthesis_request).await?;
                let path = workspace.audio_path(audio.format);
                tokio::fs::write(&path, &audio.bytes).await.map_err(|e| {
                    PipelineError::Workspace(format!("failed to store audio: {}", e))
                })?;

                tracing::info!(
                    invocation_id = %invocation_id,
                    voice_id = %synthesis_request.voice_id,
                    audio_size = audio.bytes.len(),
                    "Speech synthesized"
                );
                Some(path)
            }
            None => {
                tracing::info!(invocation_id = %invocation_id, "No text supplied, skipping speech synthesis");
                None
            }
        };

        advance(stage, PipelineStage::VideoStage, invocation_id, &mut stage_started);
        let silent = self
            .transcoder
            .transcode(&avatar_path, &workspace.silent_video_path())
            .await?;

        advance(stage, PipelineStage::MuxStage, invocation_id, &mut stage_started);
        let artifact = self
            .muxer
            .mux(&silent, audio_path.as_deref(), &workspace.final_video_path())
            .await?;

        let bytes = tokio::fs::read(&artifact.path)
            .await
            .map_err(|e| PipelineError::Workspace(format!("failed to read final video: {}", e)))?;

        advance(stage, PipelineStage::Delivered, invocation_id, &mut stage_started);

        let video = GeneratedVideo {
            invocation_id,
            bytes,
            content_type: artifact.content_type,
            metadata: silent.metadata,
            frame_count: silent.frame_count,
            has_audio: artifact.has_audio,
        };
        Ok((video, artifact.path.display().to_string()))
    }

    /// Hand the record to the history store without waiting on it.
    fn emit_history(&self, record: GenerationRecord) {
        let history = self.history.clone();
        tokio::spawn(async move {
            if let Err(e) = history.record(&record).await {
                tracing::warn!(
                    error = %e,
                    user = %record.user,
                    "Failed to persist generation history"
                );
            }
        });
    }
}

fn advance(stage: &mut PipelineStage, next: PipelineStage, invocation_id: Uuid, started: &mut Instant) {
    tracing::debug!(
        invocation_id = %invocation_id,
        stage = %stage,
        next_stage = %next,
        stage_ms = started.elapsed().as_millis(),
        "Pipeline stage completed"
    );
    *stage = next;
    *started = Instant::now();
}
