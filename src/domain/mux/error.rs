use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MuxError {
    #[error("muxing process could not be started: {0}")]
    ProcessUnavailable(String),
    #[error("muxing process failed with {}: {stderr}", exit_label(.code))]
    ProcessFailed { code: Option<i32>, stderr: String },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

impl From<MuxError> for AppError {
    fn from(err: MuxError) -> Self {
        AppError::Media(err.to_string())
    }
}
