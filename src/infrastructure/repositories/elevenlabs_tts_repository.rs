use super::speech_synthesizer::SpeechSynthesizer;
use crate::domain::synthesis::{AudioArtifact, SynthesisRequest, TtsError, VoiceSettings};
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::Serialize;
use std::time::Duration;

const API_KEY_HEADER: &str = "xi-api-key";

#[derive(Debug, Serialize)]
struct SpeechBody<'a> {
    text: &'a str,
    voice_settings: &'a VoiceSettings,
}

/// ElevenLabs text-to-speech over HTTPS
pub struct ElevenLabsTtsRepository {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl ElevenLabsTtsRepository {
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn speech_url(&self, voice_id: &str) -> String {
        format!(
            "{}/v1/text-to-speech/{}",
            self.base_url,
            urlencoding::encode(voice_id)
        )
    }
}

/// Pull a human-readable reason out of a provider error body.
///
/// The provider answers with `{"message": ...}`, `{"detail": {"message": ...}}`
/// or `{"detail": "..."}`; anything else is passed through as text.
pub fn provider_reason(status: StatusCode, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        let message = json
            .get("message")
            .and_then(|m| m.as_str())
            .or_else(|| {
                json.get("detail")
                    .and_then(|d| d.get("message").or(Some(d)))
                    .and_then(|m| m.as_str())
            });
        if let Some(message) = message {
            return message.to_string();
        }
    }

    let body = body.trim();
    if !body.is_empty() {
        return body.chars().take(500).collect();
    }

    status
        .canonical_reason()
        .unwrap_or("unknown provider error")
        .to_string()
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsTtsRepository {
    fn ensure_credentials(&self) -> Result<(), TtsError> {
        match &self.api_key {
            Some(_) => Ok(()),
            None => Err(TtsError::MissingCredential),
        }
    }

    async fn synthesize(&self, request: &SynthesisRequest) -> Result<AudioArtifact, TtsError> {
        let api_key = self.api_key.as_deref().ok_or(TtsError::MissingCredential)?;
        let start_time = std::time::Instant::now();

        tracing::info!(
            voice_id = %request.voice_id,
            stability = request.voice_settings.stability,
            similarity_boost = request.voice_settings.similarity_boost,
            text_length = request.text.len(),
            "Calling ElevenLabs TTS API"
        );

        let response = self
            .client
            .post(self.speech_url(&request.voice_id))
            .header(API_KEY_HEADER, api_key)
            .header(header::ACCEPT, "audio/mpeg")
            .json(&SpeechBody {
                text: &request.text,
                voice_settings: &request.voice_settings,
            })
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    voice_id = %request.voice_id,
                    "ElevenLabs TTS API call failed"
                );
                TtsError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let reason = provider_reason(status, &body);
            tracing::error!(
                status = status.as_u16(),
                reason = %reason,
                voice_id = %request.voice_id,
                "ElevenLabs rejected TTS request"
            );
            return Err(TtsError::ProviderRejected {
                status: status.as_u16(),
                reason,
            });
        }

        let audio_bytes = response
            .bytes()
            .await
            .map_err(|e| TtsError::Transport(e.to_string()))?
            .to_vec();

        tracing::info!(
            provider = "elevenlabs",
            voice_id = %request.voice_id,
            latency_ms = start_time.elapsed().as_millis(),
            characters_count = request.text.chars().count(),
            audio_size_bytes = audio_bytes.len(),
            "TTS synthesis completed"
        );

        Ok(AudioArtifact::mp3(audio_bytes))
    }
}
