//! Common test utilities.

use pixelcode_llms::{ContentPart, Conversation, Credentials};

pub const TEST_KEY: &str = "test-key";

/// `data:` frames for an OpenAI-style stream, without the `[DONE]` terminator.
pub fn sse_frames(payloads: &[serde_json::Value]) -> String {
    payloads
        .iter()
        .map(|p| format!("data: {}\n\n", p))
        .collect()
}

/// OpenAI-style stream of text deltas closed by `[DONE]`.
#[allow(dead_code)]
pub fn openai_stream(deltas: &[&str]) -> String {
    let payloads: Vec<_> = deltas
        .iter()
        .map(|d| serde_json::json!({"choices": [{"index": 0, "delta": {"content": d}}]}))
        .collect();
    format!("{}data: [DONE]\n\n", sse_frames(&payloads))
}

/// Anthropic messages stream with named events for the given text deltas.
#[allow(dead_code)]
pub fn anthropic_stream(deltas: &[&str]) -> String {
    let mut body = String::new();
    let mut push = |event: &str, data: serde_json::Value| {
        body.push_str(&format!("event: {}\ndata: {}\n\n", event, data));
    };

    push(
        "message_start",
        serde_json::json!({"type": "message_start", "message": {"id": "msg_1", "role": "assistant", "content": [], "usage": {"input_tokens": 12, "output_tokens": 1}}}),
    );
    push(
        "content_block_start",
        serde_json::json!({"type": "content_block_start", "index": 0, "content_block": {"type": "text", "text": ""}}),
    );
    push("ping", serde_json::json!({"type": "ping"}));
    for delta in deltas {
        push(
            "content_block_delta",
            serde_json::json!({"type": "content_block_delta", "index": 0, "delta": {"type": "text_delta", "text": delta}}),
        );
    }
    push(
        "content_block_stop",
        serde_json::json!({"type": "content_block_stop", "index": 0}),
    );
    push(
        "message_delta",
        serde_json::json!({"type": "message_delta", "delta": {"stop_reason": "end_turn", "stop_sequence": null}, "usage": {"output_tokens": 34}}),
    );
    push("message_stop", serde_json::json!({"type": "message_stop"}));
    body
}

/// Credentials pointing at a mock server.
pub fn credentials(base_url: impl Into<String>) -> Credentials {
    Credentials::new(TEST_KEY).with_base_url(base_url)
}

pub fn text_conversation() -> Conversation {
    Conversation::new("You are an expert web developer").with_user("Build a landing page")
}

#[allow(dead_code)]
pub fn screenshot_conversation(url: &str) -> Conversation {
    Conversation::new("You are an expert web developer").with_user(vec![
        ContentPart::image(url),
        ContentPart::text("Generate code for this screenshot"),
    ])
}

/// Base URL of a server that accepts connections and never answers.
#[allow(dead_code)]
pub async fn silent_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind silent listener");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{}", addr)
}
