mod common;

use std::time::Duration;

use common::{
    credentials, screenshot_conversation, silent_server, sse_frames, text_conversation, TEST_KEY,
};
use mockito::Matcher;
use pixelcode_llms::{Error, Model, Orchestrator};
use serde_json::json;

const STREAM_PATH: &str = "/models/gemini-2.0-flash-exp:streamGenerateContent";

#[tokio::test]
async fn test_stream_until_server_closes() -> anyhow::Result<()> {
    let mut server = mockito::Server::new_async().await;
    let body = sse_frames(&[
        json!({"candidates": [{"content": {"role": "model", "parts": [{"text": "<html>"}]}}]}),
        json!({"candidates": [{"content": {"role": "model", "parts": [{"text": "</html>"}]}, "finishReason": "STOP"}],
               "usageMetadata": {"promptTokenCount": 8, "candidatesTokenCount": 2}}),
    ]);
    let mock = server
        .mock("POST", STREAM_PATH)
        .match_query(Matcher::UrlEncoded("alt".into(), "sse".into()))
        .match_header("x-goog-api-key", TEST_KEY)
        .match_body(Matcher::PartialJson(json!({
            "contents": [{
                "parts": [
                    {"text": "You are an expert web developer"},
                    {"inline_data": {"mime_type": "image/png", "data": "iVBOR"}}
                ]
            }],
            "generationConfig": {"temperature": 0.0, "maxOutputTokens": 8192}
        })))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(body)
        .expect(1)
        .create_async()
        .await;

    let mut chunks: Vec<String> = Vec::new();
    let completion = Orchestrator::new()
        .complete(
            Model::Gemini20FlashExp,
            &screenshot_conversation("data:image/png;base64,iVBOR"),
            &credentials(server.url()),
            &mut chunks,
        )
        .await?;

    mock.assert_async().await;
    assert_eq!(completion.text(), "<html></html>");
    assert_eq!(chunks, vec!["<html>", "</html>"]);
    Ok(())
}

#[tokio::test]
async fn test_forbidden_key() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", STREAM_PATH)
        .match_query(Matcher::Any)
        .with_status(403)
        .with_body(r#"{"error":{"code":403,"message":"API key not valid"}}"#)
        .create_async()
        .await;

    let err = Orchestrator::new()
        .complete(
            Model::Gemini20FlashExp,
            &screenshot_conversation("https://example.com/a.png"),
            &credentials(server.url()),
            &mut Vec::<String>::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Unauthorized { status: 403, .. }));
}

#[tokio::test]
async fn test_unanswered_stream_times_out() {
    let base_url = silent_server().await;

    let err = Orchestrator::new()
        .with_timeout(Duration::from_millis(200))
        .complete(
            Model::Gemini20FlashExp,
            &text_conversation(),
            &credentials(base_url),
            &mut Vec::<String>::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Timeout { ref provider, .. } if provider == "gemini"));
}
