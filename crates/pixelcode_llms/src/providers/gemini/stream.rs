//! Gemini streaming support

use futures::stream::StreamExt;
use reqwest_eventsource::{Event, EventSource};

use super::PROVIDER_ID;
use super::types::GeminiStreamChunk;
use crate::error::Error;
use crate::provider::event_error;
use crate::types::{StreamEvent, TextStream, Usage};

/// Create a stream from a Gemini event source. The server closes the stream when done.
pub fn create_stream(mut event_source: EventSource) -> TextStream {
    let stream = async_stream::stream! {
        while let Some(event) = event_source.next().await {
            match event {
                Ok(Event::Open) => continue,
                Ok(Event::Message(message)) => {
                    match serde_json::from_str::<GeminiStreamChunk>(&message.data) {
                        Ok(GeminiStreamChunk { error: Some(error), .. }) => {
                            yield Err(Error::provider_error(
                                PROVIDER_ID,
                                format!("{}: {}", error.code, error.message),
                            ));
                            break;
                        }
                        Ok(chunk) => {
                            for stream_event in process_chunk(chunk) {
                                yield Ok(stream_event);
                            }
                        }
                        Err(e) => {
                            yield Err(Error::stream_error(format!(
                                "Failed to parse Gemini chunk: {}", e
                            )));
                            break;
                        }
                    }
                }
                Err(reqwest_eventsource::Error::StreamEnded) => break,
                Err(e) => {
                    yield Err(event_error(PROVIDER_ID, e).await);
                    break;
                }
            }
        }

        event_source.close();
    };

    TextStream::new(Box::pin(stream))
}

fn process_chunk(chunk: GeminiStreamChunk) -> Vec<StreamEvent> {
    let mut events = Vec::new();

    for candidate in chunk.candidates {
        if let Some(content) = candidate.content {
            events.extend(
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .map(StreamEvent::text_delta),
            );
        }
        if candidate.finish_reason.is_some() {
            events.push(StreamEvent::finish(candidate.finish_reason));
        }
    }
    if let Some(usage) = chunk.usage_metadata {
        events.push(StreamEvent::Usage(Usage::new(
            usage.prompt_token_count,
            usage.candidates_token_count,
        )));
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_parts_become_deltas() {
        let chunk: GeminiStreamChunk = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"<html>"},{"text":"</html>"}]},"finishReason":"STOP"}],
                "usageMetadata":{"promptTokenCount":4,"candidatesTokenCount":2,"totalTokenCount":6}}"#,
        )
        .unwrap();
        assert_eq!(
            process_chunk(chunk),
            vec![
                StreamEvent::text_delta("<html>"),
                StreamEvent::text_delta("</html>"),
                StreamEvent::finish(Some("STOP".to_string())),
                StreamEvent::Usage(Usage::new(4, 2)),
            ]
        );
    }
}
