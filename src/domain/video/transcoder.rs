use super::codec::{FrameReader, FrameWriter, VideoCodec};
use super::error::VideoError;
use super::model::{SilentVideo, StreamMetadata};
use std::path::Path;
use std::sync::Arc;

/// Frame re-encoder: copies every source frame, unchanged and in order, into a
/// new video-only container with the source's resolution and frame rate.
///
/// No pixel is altered and nothing is inferred from the audio.
pub struct FrameTranscoder {
    codec: Arc<dyn VideoCodec>,
}

impl FrameTranscoder {
    pub fn new(codec: Arc<dyn VideoCodec>) -> Self {
        Self { codec }
    }

    pub async fn probe(&self, source: &Path) -> Result<StreamMetadata, VideoError> {
        self.codec.probe(source).await
    }

    /// Re-encode `source` into `output`.
    ///
    /// Reader and writer are always released, whichever step fails.
    pub async fn transcode(&self, source: &Path, output: &Path) -> Result<SilentVideo, VideoError> {
        let start_time = std::time::Instant::now();
        let mut reader = self.codec.open_reader(source).await?;
        let metadata = reader.metadata().clone();

        tracing::info!(
            source = %source.display(),
            resolution = %metadata.resolution,
            frame_rate = %metadata.frame_rate,
            frame_count_hint = ?metadata.frame_count_hint,
            "Opened avatar video"
        );

        let mut writer = match self.codec.open_writer(output, &metadata).await {
            Ok(writer) => writer,
            Err(e) => {
                if let Err(close_err) = reader.close().await {
                    tracing::warn!(error = %close_err, "Failed to close frame reader");
                }
                return Err(e);
            }
        };

        let copied = copy_frames(reader.as_mut(), writer.as_mut(), metadata.frame_size()).await;
        let reader_closed = reader.close().await;

        let frame_count = match copied {
            Ok(count) => count,
            Err(e) => {
                writer.abort().await;
                if let Err(close_err) = reader_closed {
                    tracing::warn!(error = %close_err, "Failed to close frame reader");
                }
                return Err(e);
            }
        };

        if let Err(e) = reader_closed {
            writer.abort().await;
            return Err(e);
        }
        writer.finish().await?;

        tracing::info!(
            output = %output.display(),
            frame_count,
            latency_ms = start_time.elapsed().as_millis(),
            "Frames re-encoded"
        );

        Ok(SilentVideo {
            path: output.to_path_buf(),
            metadata,
            frame_count,
        })
    }
}

async fn copy_frames(
    reader: &mut dyn FrameReader,
    writer: &mut dyn FrameWriter,
    frame_size: usize,
) -> Result<u64, VideoError> {
    let mut count = 0u64;

    while let Some(frame) = reader.next_frame().await? {
        if frame.data.len() != frame_size {
            return Err(VideoError::InvalidFrame {
                index: frame.index,
                expected: frame_size,
                actual: frame.data.len(),
            });
        }
        writer.write_frame(&frame).await?;
        count += 1;
    }

    Ok(count)
}
