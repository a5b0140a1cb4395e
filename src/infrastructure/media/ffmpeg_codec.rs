use crate::domain::video::{
    Frame, FrameRate, FrameReader, FrameWriter, Resolution, StreamMetadata, VideoCodec,
    VideoError,
};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::task::JoinHandle;

/// Raw pixel layout exchanged with ffmpeg over pipes.
const PIXEL_FORMAT: &str = "bgr24";

/// Frame codec backed by the `ffprobe` and `ffmpeg` executables.
///
/// Decoding streams raw frames out of an `ffmpeg` child's stdout; encoding
/// streams them into another child's stdin.
pub struct FfmpegCodec {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
    video_codec: String,
}

impl FfmpegCodec {
    pub fn new(ffmpeg: PathBuf, ffprobe: PathBuf, video_codec: String) -> Self {
        Self {
            ffmpeg,
            ffprobe,
            video_codec,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    nb_frames: Option<String>,
    #[serde(default)]
    tags: ProbeTags,
    #[serde(default)]
    side_data_list: Vec<ProbeSideData>,
}

#[derive(Debug, Default, Deserialize)]
struct ProbeTags {
    rotate: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ProbeSideData {
    rotation: Option<serde_json::Value>,
}

impl ProbeStream {
    /// Display rotation in degrees. Newer ffprobe reports it in the display
    /// matrix side data, older builds in the `rotate` tag.
    fn rotation(&self) -> i64 {
        self.side_data_list
            .iter()
            .filter_map(|side_data| side_data.rotation.as_ref())
            .chain(self.tags.rotate.as_ref())
            .find_map(degrees)
            .unwrap_or(0)
    }
}

fn degrees(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64().map(|d| d.round() as i64),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok().map(|d| d.round() as i64),
        _ => None,
    }
}

/// Parse `ffprobe -of json` output for the first video stream.
///
/// The decoder autorotates, so a stream tagged with a quarter-turn rotation
/// is reported with width and height swapped.
pub fn parse_probe_output(stdout: &[u8]) -> Result<StreamMetadata, VideoError> {
    let output: ProbeOutput = serde_json::from_slice(stdout)
        .map_err(|e| VideoError::UnreadableSource(format!("unexpected ffprobe output: {}", e)))?;

    let stream = output
        .streams
        .into_iter()
        .next()
        .ok_or_else(|| VideoError::UnreadableSource("no video stream found".to_string()))?;

    let (width, height) = match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => match stream.rotation().rem_euclid(180) {
            90 => (h, w),
            _ => (w, h),
        },
        _ => {
            return Err(VideoError::UnreadableSource(
                "video stream has no dimensions".to_string(),
            ))
        }
    };

    let frame_rate = stream
        .r_frame_rate
        .as_deref()
        .and_then(FrameRate::parse)
        .or_else(|| stream.avg_frame_rate.as_deref().and_then(FrameRate::parse))
        .ok_or_else(|| VideoError::UnreadableSource("video stream has no frame rate".to_string()))?;

    Ok(StreamMetadata {
        resolution: Resolution { width, height },
        frame_rate,
        frame_count_hint: stream.nb_frames.and_then(|n| n.parse().ok()),
    })
}

fn capture_stderr(child: &mut Child) -> JoinHandle<String> {
    let stderr = child.stderr.take();
    tokio::spawn(async move {
        let mut buf = String::new();
        if let Some(mut stderr) = stderr {
            let _ = stderr.read_to_string(&mut buf).await;
        }
        buf.trim().to_string()
    })
}

async fn collect_stderr(handle: JoinHandle<String>) -> String {
    handle.await.unwrap_or_default()
}

#[async_trait]
impl VideoCodec for FfmpegCodec {
    async fn probe(&self, path: &Path) -> Result<StreamMetadata, VideoError> {
        let output = Command::new(&self.ffprobe)
            .args([
                "-v",
                "error",
                "-select_streams",
                "v:0",
                "-show_streams",
                "-of",
                "json",
            ])
            .arg(path)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                VideoError::UnreadableSource(format!(
                    "failed to run {}: {}",
                    self.ffprobe.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VideoError::UnreadableSource(stderr.trim().to_string()));
        }

        parse_probe_output(&output.stdout)
    }

    async fn open_reader(&self, path: &Path) -> Result<Box<dyn FrameReader>, VideoError> {
        let metadata = self.probe(path).await?;

        let mut child = Command::new(&self.ffmpeg)
            .args(["-v", "error", "-nostdin", "-i"])
            .arg(path)
            .args([
                "-map",
                "0:v:0",
                "-f",
                "rawvideo",
                "-pix_fmt",
                PIXEL_FORMAT,
                "-vsync",
                "passthrough",
                "pipe:1",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                VideoError::UnreadableSource(format!(
                    "failed to start decoder {}: {}",
                    self.ffmpeg.display(),
                    e
                ))
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| VideoError::UnreadableSource("decoder stdout unavailable".to_string()))?;
        let stderr = capture_stderr(&mut child);

        Ok(Box::new(FfmpegFrameReader {
            child,
            stdout,
            stderr,
            metadata,
            next_index: 0,
            exhausted: false,
        }))
    }

    async fn open_writer(
        &self,
        path: &Path,
        metadata: &StreamMetadata,
    ) -> Result<Box<dyn FrameWriter>, VideoError> {
        let mut child = Command::new(&self.ffmpeg)
            .args(["-y", "-v", "error", "-f", "rawvideo", "-pix_fmt", PIXEL_FORMAT])
            .arg("-s")
            .arg(metadata.resolution.to_string())
            .arg("-framerate")
            .arg(metadata.frame_rate.to_string())
            .args(["-i", "pipe:0", "-an", "-c:v"])
            .arg(&self.video_codec)
            .arg(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                VideoError::EncodeFailure(format!(
                    "failed to start encoder {}: {}",
                    self.ffmpeg.display(),
                    e
                ))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| VideoError::EncodeFailure("encoder stdin unavailable".to_string()))?;
        let stderr = capture_stderr(&mut child);

        Ok(Box::new(FfmpegFrameWriter {
            child,
            stdin: Some(stdin),
            stderr,
            frame_size: metadata.frame_size(),
        }))
    }
}

struct FfmpegFrameReader {
    child: Child,
    stdout: ChildStdout,
    stderr: JoinHandle<String>,
    metadata: StreamMetadata,
    next_index: u64,
    exhausted: bool,
}

#[async_trait]
impl FrameReader for FfmpegFrameReader {
    fn metadata(&self) -> &StreamMetadata {
        &self.metadata
    }

    async fn next_frame(&mut self) -> Result<Option<Frame>, VideoError> {
        if self.exhausted {
            return Ok(None);
        }

        let frame_size = self.metadata.frame_size();
        let mut data = vec![0u8; frame_size];
        let mut filled = 0;

        while filled < frame_size {
            let read = self
                .stdout
                .read(&mut data[filled..])
                .await
                .map_err(|e| VideoError::DecodeFailure(e.to_string()))?;
            if read == 0 {
                break;
            }
            filled += read;
        }

        if filled == 0 {
            self.exhausted = true;
            return Ok(None);
        }
        if filled < frame_size {
            return Err(VideoError::DecodeFailure(format!(
                "truncated frame {}: got {} of {} bytes",
                self.next_index, filled, frame_size
            )));
        }

        let frame = Frame {
            index: self.next_index,
            data,
        };
        self.next_index += 1;
        Ok(Some(frame))
    }

    async fn close(self: Box<Self>) -> Result<(), VideoError> {
        let FfmpegFrameReader {
            mut child,
            stdout,
            stderr,
            exhausted,
            ..
        } = *self;
        drop(stdout);

        if !exhausted {
            let _ = child.start_kill();
        }
        let status = child
            .wait()
            .await
            .map_err(|e| VideoError::DecodeFailure(e.to_string()))?;
        let stderr = collect_stderr(stderr).await;

        if exhausted && !status.success() {
            return Err(VideoError::DecodeFailure(if stderr.is_empty() {
                format!("decoder exited with {}", status)
            } else {
                stderr
            }));
        }

        Ok(())
    }
}

struct FfmpegFrameWriter {
    child: Child,
    stdin: Option<ChildStdin>,
    stderr: JoinHandle<String>,
    frame_size: usize,
}

#[async_trait]
impl FrameWriter for FfmpegFrameWriter {
    async fn write_frame(&mut self, frame: &Frame) -> Result<(), VideoError> {
        if frame.data.len() != self.frame_size {
            return Err(VideoError::InvalidFrame {
                index: frame.index,
                expected: self.frame_size,
                actual: frame.data.len(),
            });
        }

        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| VideoError::EncodeFailure("encoder input already closed".to_string()))?;

        stdin.write_all(&frame.data).await.map_err(|e| {
            VideoError::EncodeFailure(format!(
                "encoder stopped accepting frames at frame {}: {}",
                frame.index, e
            ))
        })
    }

    async fn finish(self: Box<Self>) -> Result<(), VideoError> {
        let FfmpegFrameWriter {
            mut child,
            stdin,
            stderr,
            ..
        } = *self;

        if let Some(mut stdin) = stdin {
            stdin
                .shutdown()
                .await
                .map_err(|e| VideoError::EncodeFailure(e.to_string()))?;
        }

        let status = child
            .wait()
            .await
            .map_err(|e| VideoError::EncodeFailure(e.to_string()))?;
        let stderr = collect_stderr(stderr).await;

        if !status.success() {
            return Err(VideoError::EncodeFailure(if stderr.is_empty() {
                format!("encoder exited with {}", status)
            } else {
                stderr
            }));
        }

        Ok(())
    }

    async fn abort(self: Box<Self>) {
        let FfmpegFrameWriter {
            mut child, stdin, ..
        } = *self;
        drop(stdin);

        if let Err(e) = child.start_kill() {
            tracing::debug!(error = %e, "Encoder already exited");
        }
        let _ = child.wait().await;
    }
}
