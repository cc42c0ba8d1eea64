//! OpenAI provider implementation

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap};

use super::PROVIDER_ID;
use super::convert::{from_openai_response, to_openai_request};
use super::stream::create_stream;
use super::types::{OpenAIConfig, OpenAIRequest, OpenAIResponse};
use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::provider::{
    DEFAULT_TIMEOUT, Exchange, Provider, ensure_success, forward, header_value, with_timeout,
};
use crate::types::{ChunkSink, Completion};

/// OpenAI provider
pub struct OpenAIProvider {
    config: OpenAIConfig,
    client: Client,
    clock: Arc<dyn Clock>,
    timeout: Duration,
}

impl OpenAIProvider {
    /// Environment variable for API key
    pub const API_KEY_ENV: &'static str = "OPENAI_API_KEY";

    /// Create a new OpenAI provider
    pub fn new(config: OpenAIConfig) -> Result<Self> {
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

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            header_value(
                PROVIDER_ID,
                &format!("Bearer {}", self.config.api_key.trim()),
            )?,
        );
        Ok(headers)
    }

    async fn stream(&self, request: &OpenAIRequest<'_>, sink: &mut dyn ChunkSink) -> Result<String> {
        let req_builder = self
            .client
            .post(self.config.completions_url())
            .headers(self.build_headers()?)
            .json(request);

        let event_source = reqwest_eventsource::EventSource::new(req_builder)
            .map_err(|e| Error::stream_error(format!("Failed to create event source: {}", e)))?;

        let forwarded = forward(create_stream(event_source), sink).await?;
        if let Some(usage) = forwarded.usage {
            tracing::debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "openai usage"
            );
        }
        Ok(forwarded.text)
    }

    async fn generate(&self, request: &OpenAIRequest<'_>) -> Result<String> {
        let response = self
            .client
            .post(self.config.completions_url())
            .headers(self.build_headers()?)
            .json(request)
            .send()
            .await?;

        let response = ensure_success(PROVIDER_ID, response).await?;
        let body: OpenAIResponse = response.json().await?;
        let (text, usage) = from_openai_response(body)?;
        if let Some(usage) = usage {
            tracing::debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "openai usage"
            );
        }
        Ok(text)
    }
}

#[async_trait]
impl Provider for OpenAIProvider {
    fn provider_id(&self) -> &str {
        PROVIDER_ID
    }

    async fn complete(
        &self,
        exchange: Exchange<'_>,
        sink: &mut dyn ChunkSink,
    ) -> Result<Completion> {
        let started_at = exchange.started_at.unwrap_or_else(|| self.clock.now());
        let request = to_openai_request(exchange.conversation, exchange.model);

        let text = with_timeout(PROVIDER_ID, self.timeout, async {
            if request.stream == Some(true) {
                self.stream(&request, sink).await
            } else {
                self.generate(&request).await
            }
        })
        .await?;

        Ok(Completion::measured(self.clock.as_ref(), started_at, text))
    }
}
