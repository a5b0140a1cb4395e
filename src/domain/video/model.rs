use std::fmt;
use std::path::PathBuf;

/// Exact frame rate as a rational, e.g. `30000/1001`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRate {
    pub numerator: u32,
    pub denominator: u32,
}

impl FrameRate {
    pub fn new(numerator: u32, denominator: u32) -> Option<Self> {
        if numerator == 0 || denominator == 0 {
            return None;
        }
        Some(Self {
            numerator,
            denominator,
        })
    }

    /// Parse `"30/1"` or `"25"`.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        match value.split_once('/') {
            Some((num, den)) => Self::new(num.trim().parse().ok()?, den.trim().parse().ok()?),
            None => Self::new(value.parse().ok()?, 1),
        }
    }

    pub fn as_f64(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Packed BGR, 3 bytes per pixel.
pub const BYTES_PER_PIXEL: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct StreamMetadata {
    pub resolution: Resolution,
    pub frame_rate: FrameRate,
    /// Frame count reported by the container, if any
    pub frame_count_hint: Option<u64>,
}

impl StreamMetadata {
    pub fn frame_size(&self) -> usize {
        self.resolution.width as usize * self.resolution.height as usize * BYTES_PER_PIXEL
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub index: u64,
    pub data: Vec<u8>,
}

/// Re-encoded video with no audio track.
#[derive(Debug, Clone, PartialEq)]
pub struct SilentVideo {
    pub path: PathBuf,
    pub metadata: StreamMetadata,
    pub frame_count: u64,
}
