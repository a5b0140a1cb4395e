pub mod codec;
pub mod error;
pub mod model;
pub mod transcoder;

pub use codec::{FrameReader, FrameWriter, VideoCodec};
pub use error::VideoError;
pub use model::{Frame, FrameRate, Resolution, SilentVideo, StreamMetadata};
pub use transcoder::FrameTranscoder;
