pub mod error;
pub mod model;
pub mod service;
pub mod voices;

pub use error::TtsError;
pub use model::{AudioArtifact, AudioFormat, SynthesisRequest, VoiceSettings};
pub use service::{SpeechOptions, SynthesisDefaults, SynthesisService, SynthesisServiceApi};
