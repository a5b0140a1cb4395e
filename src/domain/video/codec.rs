use super::error::VideoError;
use super::model::{Frame, StreamMetadata};
use async_trait::async_trait;
use std::path::Path;

/// Sequential, non-restartable frame source.
#[async_trait]
pub trait FrameReader: Send {
    fn metadata(&self) -> &StreamMetadata;

    /// Next frame in presentation order, `None` once the source is exhausted.
    async fn next_frame(&mut self) -> Result<Option<Frame>, VideoError>;

    /// Release the underlying decoder.
    async fn close(self: Box<Self>) -> Result<(), VideoError>;
}

#[async_trait]
pub trait FrameWriter: Send {
    async fn write_frame(&mut self, frame: &Frame) -> Result<(), VideoError>;

    /// Flush and finalize the container.
    async fn finish(self: Box<Self>) -> Result<(), VideoError>;

    /// Release the encoder without finalizing. The output must not be used.
    async fn abort(self: Box<Self>);
}

/// Opens decoders and encoders for container files.
#[async_trait]
pub trait VideoCodec: Send + Sync {
    /// Read stream metadata without decoding frames.
    async fn probe(&self, path: &Path) -> Result<StreamMetadata, VideoError>;

    async fn open_reader(&self, path: &Path) -> Result<Box<dyn FrameReader>, VideoError>;

    /// Open an encoder producing a video-only container.
    async fn open_writer(
        &self,
        path: &Path,
        metadata: &StreamMetadata,
    ) -> Result<Box<dyn FrameWriter>, VideoError>;
}
