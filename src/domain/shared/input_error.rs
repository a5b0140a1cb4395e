use crate::error::AppError;

/// Caller-supplied data that is missing or malformed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("avatar video is required")]
    MissingAvatar,
    #[error("text cannot be empty")]
    EmptyText,
    #[error("text must be {max} characters or less (got {actual})")]
    TextTooLong { max: usize, actual: usize },
    #[error("invalid {field}: {reason}")]
    InvalidField { field: String, reason: String },
}

impl From<InputError> for AppError {
    fn from(err: InputError) -> Self {
        match err {
            InputError::TextTooLong { .. } => AppError::PayloadTooLarge(err.to_string()),
            _ => AppError::BadRequest(err.to_string()),
        }
    }
}
