use crate::domain::mux::{MuxError, MuxProcess};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Keep error output short enough for logs and error messages.
const MAX_STDERR_CHARS: usize = 2000;

/// Runs `ffmpeg` to put an audio track onto a video without re-encoding the video.
pub struct FfmpegMuxer {
    ffmpeg: PathBuf,
}

impl FfmpegMuxer {
    pub fn new(ffmpeg: PathBuf) -> Self {
        Self { ffmpeg }
    }
}

/// Copy the video stream, encode audio as AAC, overwrite the output.
pub fn mux_args(video: &Path, audio: &Path, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-y", "-v", "error", "-nostdin", "-i"]
        .iter()
        .map(OsString::from)
        .collect();
    args.push(video.into());
    args.push("-i".into());
    args.push(audio.into());
    args.extend(
        ["-map", "0:v:0", "-map", "1:a:0", "-c:v", "copy", "-c:a", "aac"]
            .iter()
            .map(OsString::from),
    );
    args.push(output.into());
    args
}

#[async_trait]
impl MuxProcess for FfmpegMuxer {
    async fn combine(&self, video: &Path, audio: &Path, output: &Path) -> Result<(), MuxError> {
        let result = Command::new(&self.ffmpeg)
            .args(mux_args(video, audio, output))
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                tracing::error!(
                    ffmpeg = %self.ffmpeg.display(),
                    error = %e,
                    "Failed to launch muxing process"
                );
                MuxError::ProcessUnavailable(format!("{}: {}", self.ffmpeg.display(), e))
            })?;

        if !result.status.success() {
            let stderr: String = String::from_utf8_lossy(&result.stderr)
                .trim()
                .chars()
                .take(MAX_STDERR_CHARS)
                .collect();
            tracing::error!(
                exit_code = ?result.status.code(),
                stderr = %stderr,
                "Muxing process failed"
            );
            return Err(MuxError::ProcessFailed {
                code: result.status.code(),
                stderr,
            });
        }

        Ok(())
    }
}
