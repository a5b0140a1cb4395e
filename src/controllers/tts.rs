use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    domain::synthesis::{voices, SpeechOptions, SynthesisService, SynthesisServiceApi},
    error::{AppError, AppResult},
    infrastructure::auth::AuthUser,
};

/// Request for POST /api/tts/synthesize
#[derive(Debug, Serialize, Deserialize)]
pub struct SynthesizeRequest {
    pub text: String,
    #[serde(default)]
    pub voice: Option<String>,
    #[serde(default)]
    pub stability: Option<f32>,
    #[serde(default)]
    pub similarity_boost: Option<f32>,
}

/// Response for GET /api/voices
#[derive(Debug, Serialize, Deserialize)]
pub struct VoicesResponse {
    pub voices: Vec<String>,
    pub default_voice: String,
    pub max_text_length: usize,
}

pub struct TtsController {
    synthesis: Arc<SynthesisService>,
}

impl TtsController {
    pub fn new(synthesis: Arc<SynthesisService>) -> Self {
        Self { synthesis }
    }

    /// POST /api/tts/synthesize - Convert text to speech
    pub async fn synthesize(
        State(controller): State<Arc<TtsController>>,
        Extension(auth_user): Extension<AuthUser>,
        Json(request): Json<SynthesizeRequest>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let options = SpeechOptions {
            voice: request.voice,
            stability: request.stability,
            similarity_boost: request.similarity_boost,
        };

        let synthesis_request = controller.synthesis.build_request(&request.text, &options)?;

        tracing::info!(
            user_id = %auth_user.user_id,
            voice_id = %synthesis_request.voice_id,
            text_length = synthesis_request.text.chars().count(),
            "TTS synthesis request"
        );

        let audio = controller.synthesis.synthesize(&synthesis_request).await?;

        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(audio.format.content_type()),
        );
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(audio.bytes.len()));
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=3600"),
        );
        headers.insert(
            "X-Voice-Id",
            HeaderValue::from_str(&synthesis_request.voice_id)
                .map_err(|e| AppError::Internal(format!("Invalid voice id header: {}", e)))?,
        );

        Ok((StatusCode::OK, headers, Body::from(audio.bytes)))
    }

    /// GET /api/voices - List the named voices callers may request
    pub async fn list_voices(
        State(controller): State<Arc<TtsController>>,
    ) -> Json<VoicesResponse> {
        let defaults = controller.synthesis.defaults();

        Json(VoicesResponse {
            voices: voices::voice_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
            default_voice: defaults.voice.clone(),
            max_text_length: defaults.max_text_length,
        })
    }
}
