pub mod ffmpeg_codec;
pub mod ffmpeg_muxer;

pub use ffmpeg_codec::FfmpegCodec;
pub use ffmpeg_muxer::FfmpegMuxer;
