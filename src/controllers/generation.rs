use axum::{
    body::Body,
    extract::{multipart::MultipartError, Multipart, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Extension,
};
use std::sync::Arc;

use crate::{
    domain::{
        pipeline::{GenerationRequest, PipelineOrchestratorApi},
        shared::InputError,
        synthesis::SpeechOptions,
    },
    error::{AppError, AppResult},
    infrastructure::auth::AuthUser,
};

pub struct GenerationController {
    orchestrator: Arc<dyn PipelineOrchestratorApi>,
}

impl GenerationController {
    pub fn new(orchestrator: Arc<dyn PipelineOrchestratorApi>) -> Self {
        Self { orchestrator }
    }

    /// POST /api/videos/generate - Voice an avatar clip
    ///
    /// Multipart fields: `avatar` (file, required), `text`, `voice`,
    /// `stability`, `similarity_boost`. Responds with the MP4 bytes.
    pub async fn generate(
        State(controller): State<Arc<GenerationController>>,
        Extension(auth_user): Extension<AuthUser>,
        multipart: Multipart,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let mut request = parse_generation_form(multipart).await?;
        request.user = auth_user.user_id.to_string();

        let video = controller.orchestrator.generate(request).await?;

        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(video.content_type),
        );
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(video.bytes.len()));
        headers.insert(
            header::CONTENT_DISPOSITION,
            HeaderValue::from_str(&format!(
                "inline; filename=\"{}.mp4\"",
                video.invocation_id
            ))
            .map_err(|e| AppError::Internal(format!("Invalid disposition header: {}", e)))?,
        );
        headers.insert("X-Frame-Count", HeaderValue::from(video.frame_count));
        headers.insert(
            "X-Has-Audio",
            HeaderValue::from_static(if video.has_audio { "true" } else { "false" }),
        );

        Ok((StatusCode::OK, headers, Body::from(video.bytes)))
    }
}

async fn parse_generation_form(mut multipart: Multipart) -> AppResult<GenerationRequest> {
    let mut request = GenerationRequest::default();
    let mut options = SpeechOptions::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "avatar" => {
                request.avatar_filename = field.file_name().map(str::to_string);
                request.avatar = Some(field.bytes().await.map_err(multipart_error)?.to_vec());
            }
            "text" => request.text = Some(field.text().await.map_err(multipart_error)?),
            "voice" => {
                let voice = field.text().await.map_err(multipart_error)?;
                options.voice = Some(voice).filter(|v| !v.trim().is_empty());
            }
            "stability" | "similarity_boost" => {
                let value = parse_setting(&name, &field.text().await.map_err(multipart_error)?)?;
                if name == "stability" {
                    options.stability = value;
                } else {
                    options.similarity_boost = value;
                }
            }
            other => {
                tracing::debug!(field = other, "Ignoring unknown form field");
            }
        }
    }

    request.options = options;
    Ok(request)
}

/// Blank means "use the default"; out-of-range values are clamped later.
fn parse_setting(field: &str, value: &str) -> Result<Option<f32>, InputError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    value
        .parse::<f32>()
        .map(Some)
        .map_err(|_| InputError::InvalidField {
            field: field.to_string(),
            reason: format!("'{}' is not a number", value),
        })
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::BadRequest(format!("Invalid multipart body: {}", err.body_text()))
    }
}
