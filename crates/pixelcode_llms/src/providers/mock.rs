//! Offline provider that streams a canned HTML page.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::provider::{Exchange, Forwarded, Provider, forward};
use crate::types::{ChunkSink, Completion, StreamEvent, TextStream};

pub(crate) const PROVIDER_ID: &str = "mock";

const CANNED_PAGE: &str = r#"<html>
<head>
  <title>Mock Page</title>
  <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-white text-gray-900">
  <div class="container mx-auto p-8">
    <h1 class="text-3xl font-bold mb-4">Hello from the mock provider</h1>
    <p class="text-lg">No request left this machine.</p>
  </div>
</body>
</html>"#;

/// Streams a fixed response in fixed-size chunks without touching the network.
pub struct MockProvider {
    response: String,
    chunk_size: usize,
    delay: Duration,
    clock: Arc<dyn Clock>,
}

impl MockProvider {
    pub const DEFAULT_CHUNK_SIZE: usize = 10;
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(10);

    pub fn new() -> Self {
        Self {
            response: CANNED_PAGE.to_string(),
            chunk_size: Self::DEFAULT_CHUNK_SIZE,
            delay: Self::DEFAULT_DELAY,
            clock: Arc::new(SystemClock::new()),
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response = response.into();
        self
    }

    /// Characters per chunk; zero is treated as one.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    fn chunks(&self) -> Vec<String> {
        let chars: Vec<char> = self.response.chars().collect();
        chars
            .chunks(self.chunk_size)
            .map(|chunk| chunk.iter().collect())
            .collect()
    }

    fn create_stream(&self) -> TextStream {
        let chunks = self.chunks();
        let delay = self.delay;
        let stream = async_stream::stream! {
            for chunk in chunks {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                yield Ok(StreamEvent::text_delta(chunk));
            }
            yield Ok(StreamEvent::finish(Some("stop".to_string())));
        };
        TextStream::new(Box::pin(stream))
    }

    /// One refinement pass: the canned response, whatever the conversation.
    pub(crate) async fn stream_pass(&self, sink: &mut dyn ChunkSink) -> Result<Forwarded> {
        forward(self.create_stream(), sink).await
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn provider_id(&self) -> &str {
        PROVIDER_ID
    }

    async fn complete(
        &self,
        exchange: Exchange<'_>,
        sink: &mut dyn ChunkSink,
    ) -> Result<Completion> {
        let started_at = exchange.started_at.unwrap_or_else(|| self.clock.now());
        tracing::debug!(model = %exchange.model, "serving mock response");
        let forwarded = forward(self.create_stream(), sink).await?;
        Ok(Completion::measured(
            self.clock.as_ref(),
            started_at,
            forwarded.text,
        ))
    }
}
