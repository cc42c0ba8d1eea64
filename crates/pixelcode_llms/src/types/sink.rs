//! Streaming callback sinks.

use async_trait::async_trait;
use tokio::sync::mpsc;

/// Receives text fragments as they arrive from a provider.
///
/// Called once per fragment, in arrival order, from within the call's own task. The
/// implementation owns backpressure and must not block indefinitely.
#[async_trait]
pub trait ChunkSink: Send {
    async fn on_chunk(&mut self, chunk: &str);
}

#[async_trait]
impl ChunkSink for mpsc::Sender<String> {
    async fn on_chunk(&mut self, chunk: &str) {
        if self.send(chunk.to_string()).await.is_err() {
            tracing::debug!("chunk receiver dropped, discarding fragment");
        }
    }
}

#[async_trait]
impl ChunkSink for mpsc::UnboundedSender<String> {
    async fn on_chunk(&mut self, chunk: &str) {
        if self.send(chunk.to_string()).is_err() {
            tracing::debug!("chunk receiver dropped, discarding fragment");
        }
    }
}

/// Collects every fragment.
#[async_trait]
impl ChunkSink for Vec<String> {
    async fn on_chunk(&mut self, chunk: &str) {
        self.push(chunk.to_string());
    }
}

/// Discards every fragment.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

#[async_trait]
impl ChunkSink for NullSink {
    async fn on_chunk(&mut self, _chunk: &str) {}
}

/// Adapts a synchronous closure into a sink.
pub struct FnSink<F>(pub F);

#[async_trait]
impl<F> ChunkSink for FnSink<F>
where
    F: FnMut(&str) + Send,
{
    async fn on_chunk(&mut self, chunk: &str) {
        (self.0)(chunk)
    }
}
