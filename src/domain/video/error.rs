use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VideoError {
    #[error("avatar video is unreadable: {0}")]
    UnreadableSource(String),
    #[error("video encoder could not be initialized: {0}")]
    EncodeFailure(String),
    #[error("video decoding failed: {0}")]
    DecodeFailure(String),
    #[error("frame {index} has {actual} bytes, expected {expected}")]
    InvalidFrame {
        index: u64,
        expected: usize,
        actual: usize,
    },
}

impl From<VideoError> for AppError {
    fn from(err: VideoError) -> Self {
        AppError::Media(err.to_string())
    }
}
