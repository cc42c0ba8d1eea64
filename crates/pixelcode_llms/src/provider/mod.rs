//! Provider trait and per-call plumbing

mod forward;
mod http;

pub use forward::{Forwarded, forward};
pub(crate) use http::{ensure_success, event_error, header_value, with_timeout};

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::model::Model;
use crate::types::{ChunkSink, Completion, Conversation};

/// Upper bound on a whole exchange unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// API key plus optional base-URL override, supplied per call.
#[derive(Clone, Default)]
pub struct Credentials {
    pub api_key: String,
    pub base_url: Option<String>,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_optional_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url;
        self
    }

    /// The key, or [`Error::MissingApiKey`] when it is blank.
    pub fn require(&self, provider: &str) -> Result<&str> {
        let key = self.api_key.trim();
        if key.is_empty() {
            return Err(Error::MissingApiKey(provider.to_string()));
        }
        Ok(key)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &if self.api_key.is_empty() { "<empty>" } else { "<redacted>" })
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// One request to a provider.
#[derive(Debug, Clone, Copy)]
pub struct Exchange<'a> {
    pub conversation: &'a Conversation,
    pub model: Model,
    /// Clock reading taken by the caller before dispatch. Sampled on entry when absent.
    pub started_at: Option<Duration>,
}

impl<'a> Exchange<'a> {
    pub fn new(conversation: &'a Conversation, model: Model) -> Self {
        Self {
            conversation,
            model,
            started_at: None,
        }
    }

    pub fn started_at(mut self, at: Duration) -> Self {
        self.started_at = Some(at);
        self
    }
}

/// A backend that can turn a conversation into a completion.
///
/// Implementations are built per call and own their HTTP client; dropping the provider
/// releases it.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Short provider id used in logs and errors.
    fn provider_id(&self) -> &str;

    /// Run the exchange, forwarding text fragments to `sink` as they arrive.
    async fn complete(&self, exchange: Exchange<'_>, sink: &mut dyn ChunkSink)
    -> Result<Completion>;
}
