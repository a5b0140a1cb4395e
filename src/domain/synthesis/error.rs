use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TtsError {
    #[error("TTS provider API key is not configured")]
    MissingCredential,
    #[error("TTS provider rejected the request (status {status}): {reason}")]
    ProviderRejected { status: u16, reason: String },
    #[error("TTS provider unreachable: {0}")]
    Transport(String),
}

impl From<TtsError> for AppError {
    fn from(err: TtsError) -> Self {
        match err {
            TtsError::ProviderRejected { status: 429, .. } => {
                AppError::RateLimitExceeded(err.to_string())
            }
            TtsError::MissingCredential => AppError::Internal(err.to_string()),
            TtsError::ProviderRejected { .. } | TtsError::Transport(_) => {
                AppError::ExternalService(err.to_string())
            }
        }
    }
}
