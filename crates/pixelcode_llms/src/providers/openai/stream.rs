//! OpenAI streaming support

use futures::stream::StreamExt;
use reqwest_eventsource::{Event, EventSource};

use super::PROVIDER_ID;
use super::types::OpenAIStreamChunk;
use crate::error::Error;
use crate::provider::event_error;
use crate::types::{StreamEvent, TextStream, Usage};

/// Create a stream from an OpenAI event source
pub fn create_stream(mut event_source: EventSource) -> TextStream {
    let stream = async_stream::stream! {
        while let Some(event) = event_source.next().await {
            match event {
                Ok(Event::Open) => continue,
                Ok(Event::Message(message)) => {
                    if message.data == "[DONE]" {
                        break;
                    }

                    match serde_json::from_str::<OpenAIStreamChunk>(&message.data) {
                        Ok(chunk) => {
                            for stream_event in process_chunk(chunk) {
                                yield Ok(stream_event);
                            }
                        }
                        Err(e) => {
                            yield Err(Error::stream_error(format!("Failed to parse event: {}", e)));
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

fn process_chunk(chunk: OpenAIStreamChunk) -> Vec<StreamEvent> {
    let mut events = Vec::new();

    for choice in chunk.choices {
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
    fn test_process_chunk_text_and_finish() {
        let chunk: OpenAIStreamChunk = serde_json::from_str(
            r#"{"choices":[{"index":0,"delta":{"content":"Hi"},"finish_reason":"stop"}]}"#,
        )
        .unwrap();
        assert_eq!(
            process_chunk(chunk),
            vec![
                StreamEvent::text_delta("Hi"),
                StreamEvent::finish(Some("stop".to_string()))
            ]
        );
    }

    #[test]
    fn test_role_only_delta_yields_nothing() {
        let chunk: OpenAIStreamChunk =
            serde_json::from_str(r#"{"choices":[{"index":0,"delta":{"role":"assistant"}}]}"#)
                .unwrap();
        assert!(process_chunk(chunk).is_empty());
    }
}
