//! Anthropic streaming support
//!
//! Text arrives in `content_block_delta` events; usage is split between `message_start`
//! (input) and `message_delta` (output). `message_stop` ends the stream.

use futures::stream::StreamExt;
use reqwest_eventsource::{Event, EventSource};

use super::PROVIDER_ID;
use super::types::{AnthropicDelta, AnthropicStreamEvent, AnthropicUsage};
use crate::error::Error;
use crate::provider::event_error;
use crate::types::{StreamEvent, TextStream, Usage};

/// Create a stream from an Anthropic event source
pub fn create_stream(mut event_source: EventSource) -> TextStream {
    let stream = async_stream::stream! {
        let mut usage = Usage::default();

        while let Some(event) = event_source.next().await {
            match event {
                Ok(Event::Open) => continue,
                Ok(Event::Message(message)) => {
                    match serde_json::from_str::<AnthropicStreamEvent>(&message.data) {
                        Ok(AnthropicStreamEvent::MessageStop) => break,
                        Ok(AnthropicStreamEvent::Error { error }) => {
                            yield Err(Error::provider_error(
                                PROVIDER_ID,
                                format!("{}: {}", error.kind, error.message),
                            ));
                            break;
                        }
                        Ok(event) => {
                            for stream_event in process_event(event, &mut usage) {
                                yield Ok(stream_event);
                            }
                        }
                        Err(e) => {
                            yield Err(Error::stream_error(format!(
                                "Failed to parse Anthropic event: {}", e
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

fn update_usage(usage: &mut Usage, update: AnthropicUsage) {
    if let Some(input) = update.input_tokens {
        usage.input_tokens = input;
    }
    if let Some(output) = update.output_tokens {
        usage.output_tokens = output;
    }
}

fn process_event(event: AnthropicStreamEvent, usage: &mut Usage) -> Vec<StreamEvent> {
    match event {
        AnthropicStreamEvent::MessageStart { message } => {
            if let Some(update) = message.usage {
                update_usage(usage, update);
            }
            Vec::new()
        }
        AnthropicStreamEvent::ContentBlockDelta {
            delta: AnthropicDelta::TextDelta { text },
        } => vec![StreamEvent::text_delta(text)],
        AnthropicStreamEvent::MessageDelta {
            delta,
            usage: update,
        } => {
            if let Some(update) = update {
                update_usage(usage, update);
            }
            vec![
                StreamEvent::Usage(*usage),
                StreamEvent::finish(delta.stop_reason),
            ]
        }
        _ => Vec::new(),
    }
}
