//! DeepSeek provider implementation

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap};

use super::PROVIDER_ID;
use super::convert::to_deepseek_request;
use super::stream::create_stream;
use super::types::DeepSeekConfig;
use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::provider::{DEFAULT_TIMEOUT, Exchange, Provider, forward, header_value, with_timeout};
use crate::types::{ChunkSink, Completion};

/// DeepSeek provider
pub struct DeepSeekProvider {
    config: DeepSeekConfig,
    client: Client,
    clock: Arc<dyn Clock>,
    timeout: Duration,
}

impl DeepSeekProvider {
    /// Environment variable for API key
    pub const API_KEY_ENV: &'static str = "DEEPSEEK_API_KEY";
    /// Environment variable for the base URL override
    pub const BASE_URL_ENV: &'static str = "DEEPSEEK_API_BASE_URL";

    /// Create a new DeepSeek provider
    pub fn new(config: DeepSeekConfig) -> Result<Self> {
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
}

#[async_trait]
impl Provider for DeepSeekProvider {
    fn provider_id(&self) -> &str {
        PROVIDER_ID
    }

    async fn complete(
        &self,
        exchange: Exchange<'_>,
        sink: &mut dyn ChunkSink,
    ) -> Result<Completion> {
        let started_at = exchange.started_at.unwrap_or_else(|| self.clock.now());
        let request = to_deepseek_request(exchange.conversation, exchange.model);

        let req_builder = self
            .client
            .post(self.config.completions_url())
            .headers(self.build_headers()?)
            .json(&request);
        let event_source = reqwest_eventsource::EventSource::new(req_builder)
            .map_err(|e| Error::stream_error(format!("Failed to create event source: {}", e)))?;

        let forwarded =
            with_timeout(PROVIDER_ID, self.timeout, forward(create_stream(event_source), sink))
                .await?;

        Ok(Completion::measured(
            self.clock.as_ref(),
            started_at,
            forwarded.text,
        ))
    }
}
