//! Model dispatch, timing and logging around a single provider call.

use std::sync::Arc;
use std::time::Duration;

use tracing::Instrument;

use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::model::{Model, ProviderFamily};
use crate::prompt;
use crate::provider::{Credentials, DEFAULT_TIMEOUT, Exchange, Provider};
use crate::providers::anthropic::{AnthropicConfig, AnthropicProvider};
use crate::providers::deepseek::{DeepSeekConfig, DeepSeekProvider};
use crate::providers::gemini::{GeminiConfig, GeminiProvider};
use crate::providers::mock::MockProvider;
use crate::providers::openai::{OpenAIConfig, OpenAIProvider};
use crate::types::{ChunkSink, Completion, Conversation};

/// Builds a provider for each call and drives it to a [`Completion`].
///
/// Holds no clients between calls, so one orchestrator can serve concurrent requests.
#[derive(Clone)]
pub struct Orchestrator {
    clock: Arc<dyn Clock>,
    timeout: Duration,
    mock: bool,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self {
            clock: Arc::new(SystemClock::new()),
            timeout: DEFAULT_TIMEOUT,
            mock: false,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Answer every model with [`MockProvider`].
    pub fn with_mock(mut self, mock: bool) -> Self {
        self.mock = mock;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Provider for `model`, bound to `credentials`.
    pub fn build_provider(
        &self,
        model: Model,
        credentials: &Credentials,
    ) -> Result<Box<dyn Provider>> {
        if self.mock {
            return Ok(Box::new(MockProvider::new().with_clock(self.clock.clone())));
        }

        let key = credentials.api_key.trim();
        let base_url = credentials.base_url.clone();
        let provider: Box<dyn Provider> = match model.family() {
            ProviderFamily::OpenAI => {
                let mut config = OpenAIConfig::new(key);
                if let Some(url) = base_url {
                    config = config.with_base_url(url);
                }
                Box::new(
                    OpenAIProvider::new(config)?
                        .with_clock(self.clock.clone())
                        .with_timeout(self.timeout),
                )
            }
            ProviderFamily::Anthropic => {
                let mut config = AnthropicConfig::new(key);
                if let Some(url) = base_url {
                    config = config.with_base_url(url);
                }
                Box::new(
                    AnthropicProvider::new(config)?
                        .with_clock(self.clock.clone())
                        .with_timeout(self.timeout),
                )
            }
            ProviderFamily::Gemini => {
                let mut config = GeminiConfig::new(key);
                if let Some(url) = base_url {
                    config = config.with_base_url(url);
                }
                Box::new(
                    GeminiProvider::new(config)?
                        .with_clock(self.clock.clone())
                        .with_timeout(self.timeout),
                )
            }
            ProviderFamily::DeepSeek => {
                let mut config = DeepSeekConfig::new(key);
                if let Some(url) = base_url {
                    config = config.with_base_url(url);
                }
                Box::new(
                    DeepSeekProvider::new(config)?
                        .with_clock(self.clock.clone())
                        .with_timeout(self.timeout),
                )
            }
        };
        Ok(provider)
    }

    /// Run one completion. Errors come back unchanged; the provider is dropped before return.
    pub async fn complete(
        &self,
        model: Model,
        conversation: &Conversation,
        credentials: &Credentials,
        sink: &mut dyn ChunkSink,
    ) -> Result<Completion> {
        let provider = self.build_provider(model, credentials)?;
        let span = tracing::info_span!(
            "llm.complete",
            model = %model,
            provider = provider.provider_id()
        );

        async move {
            tracing::debug!(prompt = %prompt::preview(conversation), "sending prompt");

            let started_at = self.clock.now();
            let exchange = Exchange::new(conversation, model).started_at(started_at);
            match provider.complete(exchange, sink).await {
                Ok(completion) => {
                    tracing::info!(
                        duration_secs = completion.duration_secs(),
                        chars = completion.text().len(),
                        "completion finished"
                    );
                    Ok(completion)
                }
                Err(e) => {
                    tracing::error!(error = %e, kind = ?e.kind(), "completion failed");
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}
