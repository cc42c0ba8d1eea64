//! DeepSeek streaming support
//!
//! Frames are `data: <json>` lines closed by `data: [DONE]`. A frame that fails to parse is
//! logged and skipped instead of ending the stream.

use futures::stream::StreamExt;
use reqwest_eventsource::{Event, EventSource};

use super::PROVIDER_ID;
use super::types::DeepSeekStreamChunk;
use crate::provider::event_error;
use crate::types::{StreamEvent, TextStream, Usage};

/// Create a stream from a DeepSeek event source
pub fn create_stream(mut event_source: EventSource) -> TextStream {
    let stream = async_stream::stream! {
        while let Some(event) = event_source.next().await {
            match event {
                Ok(Event::Open) => continue,
                Ok(Event::Message(message)) => {
                    let data = message.data.trim();
                    if data == "[DONE]" {
                        break;
                    }

                    match serde_json::from_str::<DeepSeekStreamChunk>(data) {
                        Ok(chunk) => {
                            for stream_event in process_chunk(chunk) {
                                yield Ok(stream_event);
                            }
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, line = data, "skipping malformed deepseek frame");
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

fn process_chunk(chunk: DeepSeekStreamChunk) -> Vec<StreamEvent> {
    let mut events = Vec::new();

    if let Some(choice) = chunk.choices.into_iter().next() {
        if let Some(content) = choice.delta.content {
            events.push(StreamEvent::text_delta(content));
        }
        if choice.finish_reason.is_some() {
            events.push(StreamEvent::finish(choice.finish_reason));
        }
    }
    if let Some(usage) = chunk.usage {
        events.push(StreamEvent::Usage(Usage::new(
            usage.prompt_tokens,
            usage.completion_tokens,
        )));
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_choice_only() {
        let chunk: DeepSeekStreamChunk = serde_json::from_str(
            r#"{"choices":[{"delta":{"content":"a"}},{"delta":{"content":"b"}}]}"#,
        )
        .unwrap();
        assert_eq!(process_chunk(chunk), vec![StreamEvent::text_delta("a")]);
    }

    #[test]
    fn test_empty_choices() {
        let chunk: DeepSeekStreamChunk = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(process_chunk(chunk).is_empty());
    }
}
