use super::error::TtsError;
use super::model::{AudioArtifact, SynthesisRequest, VoiceSettings};
use super::voices;
use crate::domain::shared::InputError;
use crate::infrastructure::config::Config;
use crate::infrastructure::repositories::SpeechSynthesizer;
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

/// Synthesis parameters resolved once at startup.
#[derive(Debug, Clone)]
pub struct SynthesisDefaults {
    /// Voice as configured (catalog name or raw id), reported to clients
    pub voice: String,
    pub voice_id: String,
    pub voice_settings: VoiceSettings,
    pub max_text_length: usize,
}

impl SynthesisDefaults {
    pub fn from_config(config: &Config) -> Result<Self, String> {
        let voice_id = voices::resolve_voice(&config.elevenlabs_voice).ok_or_else(|| {
            format!(
                "ELEVENLABS_VOICE '{}' is neither a known voice name nor a voice id",
                config.elevenlabs_voice
            )
        })?;

        Ok(Self {
            voice: config.elevenlabs_voice.clone(),
            voice_id,
            voice_settings: VoiceSettings {
                stability: config.elevenlabs_stability,
                similarity_boost: config.elevenlabs_similarity_boost,
            },
            max_text_length: config.max_text_length,
        })
    }
}

/// Per-request overrides. Anything left `None` uses the defaults.
#[derive(Debug, Clone, Default)]
pub struct SpeechOptions {
    pub voice: Option<String>,
    pub stability: Option<f32>,
    pub similarity_boost: Option<f32>,
}

pub struct SynthesisService {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    defaults: SynthesisDefaults,
    cache: Option<Cache<String, AudioArtifact>>,
}

impl SynthesisService {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        defaults: SynthesisDefaults,
        cache_enabled: bool,
    ) -> Self {
        let cache = if cache_enabled {
            Some(
                Cache::builder()
                    .max_capacity(100)
                    .time_to_idle(Duration::from_secs(30 * 60))
                    .build(),
            )
        } else {
            None
        };

        Self {
            synthesizer,
            defaults,
            cache,
        }
    }

    pub fn defaults(&self) -> &SynthesisDefaults {
        &self.defaults
    }

    /// Validate text and merge per-request options over the defaults.
    pub fn build_request(
        &self,
        text: &str,
        options: &SpeechOptions,
    ) -> Result<SynthesisRequest, InputError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(InputError::EmptyText);
        }

        let char_count = text.chars().count();
        if char_count > self.defaults.max_text_length {
            return Err(InputError::TextTooLong {
                max: self.defaults.max_text_length,
                actual: char_count,
            });
        }

        let voice_id = match options.voice.as_deref().filter(|v| !v.trim().is_empty()) {
            Some(requested) => voices::resolve_voice(requested).unwrap_or_else(|| {
                tracing::warn!(
                    requested_voice = requested,
                    fallback_voice = %self.defaults.voice,
                    "Unknown voice requested, using default"
                );
                self.defaults.voice_id.clone()
            }),
            None => self.defaults.voice_id.clone(),
        };

        let voice_settings = VoiceSettings::clamped(
            options
                .stability
                .unwrap_or(self.defaults.voice_settings.stability),
            options
                .similarity_boost
                .unwrap_or(self.defaults.voice_settings.similarity_boost),
        );

        Ok(SynthesisRequest {
            text: text.to_string(),
            voice_id,
            voice_settings,
        })
    }

    fn cache_key(request: &SynthesisRequest) -> String {
        format!(
            "{}|{:.3}|{:.3}|{}",
            request.voice_id,
            request.voice_settings.stability,
            request.voice_settings.similarity_boost,
            request.text
        )
    }
}

#[async_trait]
pub trait SynthesisServiceApi: Send + Sync {
    /// Fail fast when the provider cannot be called at all (no network I/O)
    fn ensure_ready(&self) -> Result<(), TtsError>;

    /// Synthesize speech for an already validated request.
    ///
    /// Performs at most one provider call and never retries.
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<AudioArtifact, TtsError>;
}

#[async_trait]
impl SynthesisServiceApi for SynthesisService {
    fn ensure_ready(&self) -> Result<(), TtsError> {
        self.synthesizer.ensure_credentials()
    }

    async fn synthesize(&self, request: &SynthesisRequest) -> Result<AudioArtifact, TtsError> {
        let key = Self::cache_key(request);

        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get(&key).await {
                tracing::info!(
                    voice_id = %request.voice_id,
                    audio_size = cached.bytes.len(),
                    "TTS cache hit - returning cached audio"
                );
                return Ok(cached);
            }
        }

        self.ensure_ready()?;

        let audio = self.synthesizer.synthesize(request).await?;

        if let Some(cache) = &self.cache {
            cache.insert(key, audio.clone()).await;
        }

        Ok(audio)
    }
}
