//! Anthropic provider implementation

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use super::PROVIDER_ID;
use super::convert::to_anthropic_request;
use super::stream::create_stream;
use super::types::{AnthropicConfig, AnthropicRequest};
use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::model::{Model, ProviderFamily};
use crate::provider::{
    DEFAULT_TIMEOUT, Exchange, Forwarded, Provider, forward, header_value, with_timeout,
};
use crate::types::{ChunkSink, Completion, Conversation};

const DEFAULT_MAX_TOKENS: u32 = 8192;

/// Output limit for the multi-pass refinement requests.
pub(crate) const NATIVE_MAX_TOKENS: u32 = 4096;

/// Anthropic provider
pub struct AnthropicProvider {
    config: AnthropicConfig,
    client: Client,
    clock: Arc<dyn Clock>,
    timeout: Duration,
}

impl AnthropicProvider {
    /// Environment variable for API key
    pub const API_KEY_ENV: &'static str = "ANTHROPIC_API_KEY";

    /// Create a new Anthropic provider
    pub fn new(config: AnthropicConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::MissingApiKey(PROVIDER_ID.to_string()));
        }

        Ok(Self {
            config,
            client: Client::new(),
            clock: Arc::new(SystemClock::new()),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn build_headers(&self, beta: bool) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("x-api-key"),
            header_value(PROVIDER_ID, self.config.api_key.trim())?,
        );
        headers.insert(
            HeaderName::from_static("anthropic-version"),
            HeaderValue::from_str(&self.config.version)
                .map_err(|e| Error::invalid_input(format!("anthropic-version header: {}", e)))?,
        );
        if beta {
            if let Some(ref beta) = self.config.beta {
                headers.insert(
                    HeaderName::from_static("anthropic-beta"),
                    HeaderValue::from_str(beta)
                        .map_err(|e| Error::invalid_input(format!("anthropic-beta header: {}", e)))?,
                );
            }
        }
        Ok(headers)
    }

    async fn stream(
        &self,
        request: &AnthropicRequest,
        beta: bool,
        sink: &mut dyn ChunkSink,
    ) -> Result<Forwarded> {
        let req_builder = self
            .client
            .post(self.config.messages_url())
            .headers(self.build_headers(beta)?)
            .json(request);

        let event_source = reqwest_eventsource::EventSource::new(req_builder)
            .map_err(|e| Error::stream_error(format!("Failed to create event source: {}", e)))?;

        forward(create_stream(event_source), sink).await
    }

    /// Single streamed request used by each refinement pass.
    ///
    /// `prefill` is sent as a trailing assistant turn so the answer continues from it.
    pub(crate) async fn stream_native(
        &self,
        conversation: &Conversation,
        model: Model,
        prefill: Option<&str>,
        sink: &mut dyn ChunkSink,
    ) -> Result<Forwarded> {
        if model.family() != ProviderFamily::Anthropic {
            return Err(Error::invalid_input(format!(
                "{} is not an Anthropic model",
                model
            )));
        }
        let request = to_anthropic_request(conversation, model, NATIVE_MAX_TOKENS, prefill)?;
        with_timeout(PROVIDER_ID, self.timeout, self.stream(&request, false, sink)).await
    }
}

#[async_trait]
impl Provider for AnthropicProvider {
    fn provider_id(&self) -> &str {
        PROVIDER_ID
    }

    async fn complete(
        &self,
        exchange: Exchange<'_>,
        sink: &mut dyn ChunkSink,
    ) -> Result<Completion> {
        let started_at = exchange.started_at.unwrap_or_else(|| self.clock.now());
        let max_tokens = exchange
            .model
            .params()
            .token_limit
            .map_or(DEFAULT_MAX_TOKENS, |limit| limit.value);
        let request = to_anthropic_request(exchange.conversation, exchange.model, max_tokens, None)?;

        let forwarded = with_timeout(PROVIDER_ID, self.timeout, self.stream(&request, true, sink)).await?;
        if let Some(usage) = forwarded.usage {
            tracing::debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                stop_reason = forwarded.finish_reason.as_deref().unwrap_or(""),
                "anthropic usage"
            );
        }

        Ok(Completion::measured(
            self.clock.as_ref(),
            started_at,
            forwarded.text,
        ))
    }
}
