//! Drives a provider stream into a sink.

use futures::StreamExt;

use crate::error::Result;
use crate::types::{ChunkSink, StreamEvent, TextStream, Usage};

/// What a drained stream produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forwarded {
    /// Every text delta, whitespace included
    pub text: String,
    pub usage: Option<Usage>,
    pub finish_reason: Option<String>,
    /// Number of sink invocations
    pub fragments: usize,
}

/// Await each event and hand text to `sink` before awaiting the next one.
///
/// Empty deltas are ignored. Whitespace-only deltas are held back and prepended to the next
/// delta with visible text, so the sink never sees a blank fragment on its own. All deltas
/// land in [`Forwarded::text`]. The first error ends the stream and is returned as-is.
pub async fn forward(mut stream: TextStream, sink: &mut dyn ChunkSink) -> Result<Forwarded> {
    let mut out = Forwarded::default();
    let mut pending = String::new();

    while let Some(event) = stream.next().await {
        match event? {
            StreamEvent::TextDelta { delta } => {
                if delta.is_empty() {
                    continue;
                }
                out.text.push_str(&delta);

                if delta.trim().is_empty() {
                    pending.push_str(&delta);
                    continue;
                }

                if pending.is_empty() {
                    sink.on_chunk(&delta).await;
                } else {
                    pending.push_str(&delta);
                    sink.on_chunk(&pending).await;
                    pending.clear();
                }
                out.fragments += 1;
            }
            StreamEvent::Usage(usage) => out.usage = Some(usage),
            StreamEvent::Finish { reason } => out.finish_reason = reason,
        }
    }

    if !pending.is_empty() {
        tracing::trace!(chars = pending.len(), "trailing whitespace kept out of the sink");
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn deltas(items: &[&str]) -> TextStream {
        TextStream::from_events(
            items
                .iter()
                .map(|d| Ok(StreamEvent::text_delta(*d)))
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_forwards_in_order_and_concatenates() {
        let mut sink: Vec<String> = Vec::new();
        let out = forward(deltas(&["Hello ", "World!"]), &mut sink).await.unwrap();
        assert_eq!(sink, vec!["Hello ", "World!"]);
        assert_eq!(out.text, "Hello World!");
        assert_eq!(out.fragments, 2);
        assert_eq!(sink.concat(), out.text);
    }

    #[tokio::test]
    async fn test_empty_deltas_skipped() {
        let mut sink: Vec<String> = Vec::new();
        let out = forward(deltas(&["", "a", "", "b"]), &mut sink).await.unwrap();
        assert_eq!(sink, vec!["a", "b"]);
        assert_eq!(out.text, "ab");
    }

    #[tokio::test]
    async fn test_whitespace_deltas_coalesced_into_next_fragment() {
        let mut sink: Vec<String> = Vec::new();
        let out = forward(deltas(&["<div>", "\n", "  ", "<p>", "\n"]), &mut sink)
            .await
            .unwrap();
        assert_eq!(sink, vec!["<div>", "\n  <p>"]);
        assert_eq!(out.text, "<div>\n  <p>\n");
        assert!(sink.iter().all(|f| !f.trim().is_empty()));
    }

    #[tokio::test]
    async fn test_usage_and_finish_recorded() {
        let stream = TextStream::from_events(vec![
            Ok(StreamEvent::text_delta("x")),
            Ok(StreamEvent::Usage(Usage::new(10, 20))),
            Ok(StreamEvent::finish(Some("stop".to_string()))),
        ]);
        let mut sink: Vec<String> = Vec::new();
        let out = forward(stream, &mut sink).await.unwrap();
        assert_eq!(out.usage, Some(Usage::new(10, 20)));
        assert_eq!(out.finish_reason.as_deref(), Some("stop"));
    }

    #[tokio::test]
    async fn test_error_stops_forwarding() {
        let stream = TextStream::from_events(vec![
            Ok(StreamEvent::text_delta("partial")),
            Err(Error::stream_error("boom")),
            Ok(StreamEvent::text_delta("never")),
        ]);
        let mut sink: Vec<String> = Vec::new();
        let err = forward(stream, &mut sink).await.unwrap_err();
        assert!(matches!(err, Error::Stream(_)));
        assert_eq!(sink, vec!["partial"]);
    }
}
