use crate::e2e::helpers;

use helpers::TestContext;
use hyper::StatusCode;
use serde_json::Value;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_list_voices_without_auth(ctx: &TestContext) {
    let response = ctx.client.get("/api/voices").await.unwrap();

    response.assert_status(StatusCode::OK);

    let body = response.body.as_ref().unwrap();
    let voices: Vec<&str> = body["voices"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();

    assert_eq!(voices.len(), 14);
    assert!(voices.contains(&"Rachel"));
    assert!(voices.contains(&"Emily"));
    assert_eq!(body["default_voice"], "Rachel");
    assert_eq!(body["max_text_length"], ctx.config.max_text_length as u64);
}
