use crate::domain::mux::MuxError;
use crate::domain::shared::InputError;
use crate::domain::synthesis::TtsError;
use crate::domain::video::VideoError;
use crate::error::AppError;

/// Single outcome type for a failed invocation.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Tts(#[from] TtsError),
    #[error(transparent)]
    Video(#[from] VideoError),
    #[error(transparent)]
    Mux(#[from] MuxError),
    #[error("workspace error: {0}")]
    Workspace(String),
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Input(e) => AppError::from(e),
            PipelineError::Tts(e) => AppError::from(e),
            PipelineError::Video(e) => AppError::from(e),
            PipelineError::Mux(e) => AppError::from(e),
            PipelineError::Workspace(msg) => AppError::Internal(msg),
        }
    }
}
