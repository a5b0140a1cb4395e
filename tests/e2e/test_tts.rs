use crate::e2e::helpers;

use helpers::mock_provider::{mock_audio, ProviderBehavior};
use helpers::{TestContext, TestOptions};
use hyper::StatusCode;
use serde_json::json;
use test_context::test_context;

const SYNTHESIZE: &str = "/api/tts/synthesize";

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_synthesize_text_to_speech(ctx: &TestContext) {
    let response = ctx
        .client
        .post_with_auth(SYNTHESIZE, &json!({ "text": "Hello world" }), &ctx.token)
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    response.assert_header("content-type", "audio/mpeg");
    response.assert_header("cache-control", "public, max-age=3600");
    response.assert_header("x-voice-id", "21m00Tcm4TlvDq8ikWAM");
    response.assert_header(
        "content-length",
        &mock_audio("Hello world").len().to_string(),
    );
    assert_eq!(response.body_bytes, mock_audio("Hello world"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_accept_raw_voice_ids(ctx: &TestContext) {
    let response = ctx
        .client
        .post_with_auth(
            SYNTHESIZE,
            &json!({ "text": "Hello", "voice": "pNInz6obpgDQGcFmaJgB", "stability": 0.9 }),
            &ctx.token,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    response.assert_header("x-voice-id", "pNInz6obpgDQGcFmaJgB");

    let calls = ctx.provider.calls();
    assert_eq!(calls[0].voice_id, "pNInz6obpgDQGcFmaJgB");
    let stability = calls[0].body["voice_settings"]["stability"].as_f64().unwrap();
    assert!((stability - 0.9).abs() < 1e-6);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_fall_back_to_default_voice_for_unknown_names(ctx: &TestContext) {
    let response = ctx
        .client
        .post_with_auth(
            SYNTHESIZE,
            &json!({ "text": "Hello", "voice": "Nobody" }),
            &ctx.token,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    response.assert_header("x-voice-id", "21m00Tcm4TlvDq8ikWAM");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_empty_text(ctx: &TestContext) {
    let response = ctx
        .client
        .post_with_auth(SYNTHESIZE, &json!({ "text": "  " }), &ctx.token)
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_error_message("text cannot be empty");
    assert_eq!(ctx.provider.call_count(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_text_over_the_limit(ctx: &TestContext) {
    let text = "b".repeat(ctx.config.max_text_length + 1);

    let response = ctx
        .client
        .post_with_auth(SYNTHESIZE, &json!({ "text": text }), &ctx.token)
        .await
        .unwrap();

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_require_authentication(ctx: &TestContext) {
    let response = ctx
        .client
        .post_with_auth(SYNTHESIZE, &json!({ "text": "Hello" }), "not-a-jwt")
        .await
        .unwrap();

    response.assert_status(StatusCode::UNAUTHORIZED);
    response.assert_error_message("Invalid token");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_surface_provider_errors(ctx: &TestContext) {
    ctx.provider.set_behavior(ProviderBehavior::Fail {
        status: 400,
        body: r#"{"detail":"Voice not found"}"#.to_string(),
    });

    let response = ctx
        .client
        .post_with_auth(SYNTHESIZE, &json!({ "text": "Hello" }), &ctx.token)
        .await
        .unwrap();

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_error_message("Voice not found");
}

#[tokio::test]
async fn it_should_serve_repeated_text_from_cache() {
    let ctx = TestContext::start(TestOptions {
        cache_enabled: true,
        ..Default::default()
    })
    .await
    .unwrap();

    for _ in 0..2 {
        ctx.client
            .post_with_auth(SYNTHESIZE, &json!({ "text": "Cached words" }), &ctx.token)
            .await
            .unwrap()
            .assert_status(StatusCode::OK);
    }

    assert_eq!(ctx.provider.call_count(), 1);
}
