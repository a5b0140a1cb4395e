use serde::{Deserialize, Serialize};

/// Provider tuning knobs. Both values live in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
}

impl VoiceSettings {
    /// Build settings, clamping each value into `[0, 1]`.
    pub fn clamped(stability: f32, similarity_boost: f32) -> Self {
        Self {
            stability: clamp_unit(stability),
            similarity_boost: clamp_unit(similarity_boost),
        }
    }
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.5,
        }
    }
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// One synthesis call. Built per invocation and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice_id: String,
    pub voice_settings: VoiceSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
}

impl AudioFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "audio/mpeg",
        }
    }
}

/// Encoded audio returned by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioArtifact {
    pub bytes: Vec<u8>,
    pub format: AudioFormat,
}

impl AudioArtifact {
    pub fn mp3(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            format: AudioFormat::Mp3,
        }
    }
}
