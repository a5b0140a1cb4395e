use std::fmt;

/// Position of an invocation in the generation state machine.
///
/// `Received → AudioStage → VideoStage → MuxStage → Delivered`; a failure in
/// any stage ends the invocation there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Received,
    AudioStage,
    VideoStage,
    MuxStage,
    Delivered,
}

impl PipelineStage {
    pub fn label(self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::AudioStage => "audio",
            Self::VideoStage => "video",
            Self::MuxStage => "mux",
            Self::Delivered => "delivered",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
