//! Multi-pass refinement over the Anthropic messages API.
//!
//! Each pass streams a full answer, then the answer and a fixed improvement instruction are
//! appended to the conversation before the next pass. The last pass's text is the result.

mod debug;

pub use debug::{DebugWriter, extract_html_content, thinking_section};

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::Instrument;

use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::model::{Model, ProviderFamily};
use crate::provider::{Credentials, DEFAULT_TIMEOUT, Forwarded, with_timeout};
use crate::providers::anthropic::{AnthropicConfig, AnthropicProvider, PROVIDER_ID as ANTHROPIC_ID};
use crate::providers::mock::MockProvider;
use crate::types::{ChunkSink, Completion, Conversation};

/// Opening tag sent as an assistant prefill when thinking is requested. Stored assistant
/// turns always start with it.
pub const THINKING_PREFIX: &str = "<thinking>";

/// User turn appended after every pass.
pub const IMPROVE_INSTRUCTION: &str = "You've done a good job with a first draft. Improve this further based on the original instructions so that the app is fully functional and looks like the original video of the app we're trying to replicate.";

#[derive(Debug, Clone)]
pub struct RefineOptions {
    pub passes: usize,
    /// Prefill each pass with [`THINKING_PREFIX`]
    pub include_thinking: bool,
    /// Base directory for per-run debug artifacts
    pub debug_dir: Option<PathBuf>,
}

impl Default for RefineOptions {
    fn default() -> Self {
        Self {
            passes: 2,
            include_thinking: false,
            debug_dir: None,
        }
    }
}

impl RefineOptions {
    pub fn with_passes(mut self, passes: usize) -> Self {
        self.passes = passes;
        self
    }

    pub fn with_thinking(mut self, include_thinking: bool) -> Self {
        self.include_thinking = include_thinking;
        self
    }

    pub fn with_debug_dir(mut self, debug_dir: Option<PathBuf>) -> Self {
        self.debug_dir = debug_dir;
        self
    }
}

enum Backend {
    Anthropic(AnthropicProvider),
    Mock(MockProvider),
}

impl Backend {
    async fn pass(
        &self,
        conversation: &Conversation,
        model: Model,
        prefill: Option<&str>,
        sink: &mut dyn ChunkSink,
    ) -> Result<Forwarded> {
        match self {
            Backend::Anthropic(provider) => {
                provider
                    .stream_native(conversation, model, prefill, sink)
                    .await
            }
            Backend::Mock(provider) => provider.stream_pass(sink).await,
        }
    }
}

/// Runs the refinement loop with one HTTP client for all passes.
pub struct Refiner {
    options: RefineOptions,
    clock: Arc<dyn Clock>,
    timeout: Duration,
    mock: bool,
}

impl Refiner {
    pub fn new(options: RefineOptions) -> Self {
        Self {
            options,
            clock: Arc::new(SystemClock::new()),
            timeout: DEFAULT_TIMEOUT,
            mock: false,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Bound on the whole run, all passes included.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Serve every pass from [`MockProvider`] instead of the network.
    pub fn with_mock(mut self, mock: bool) -> Self {
        self.mock = mock;
        self
    }

    pub fn options(&self) -> &RefineOptions {
        &self.options
    }

    /// Run every pass, growing `conversation` by two turns per pass.
    pub async fn run(
        &self,
        model: Model,
        conversation: &mut Conversation,
        credentials: &Credentials,
        sink: &mut dyn ChunkSink,
    ) -> Result<Completion> {
        if model.family() != ProviderFamily::Anthropic {
            return Err(Error::invalid_input(format!(
                "refinement needs an Anthropic model, got {}",
                model
            )));
        }
        let started_at = self.clock.now();
        let backend = self.backend(credentials)?;

        let span = tracing::info_span!(
            "llm.refine",
            model = %model,
            passes = self.options.passes,
            thinking = self.options.include_thinking
        );
        let text = with_timeout(
            ANTHROPIC_ID,
            self.timeout,
            self.run_passes(&backend, model, conversation, sink),
        )
        .instrument(span)
        .await?;

        let completion = Completion::measured(self.clock.as_ref(), started_at, text);
        tracing::info!(
            model = %model,
            duration_secs = completion.duration_secs(),
            chars = completion.text().len(),
            "refinement finished"
        );
        Ok(completion)
    }

    fn backend(&self, credentials: &Credentials) -> Result<Backend> {
        if self.mock {
            return Ok(Backend::Mock(
                MockProvider::new().with_clock(self.clock.clone()),
            ));
        }
        let mut config = AnthropicConfig::new(credentials.require(ANTHROPIC_ID)?);
        if let Some(ref base_url) = credentials.base_url {
            config = config.with_base_url(base_url.clone());
        }
        Ok(Backend::Anthropic(
            AnthropicProvider::new(config)?
                .with_clock(self.clock.clone())
                .with_timeout(self.timeout),
        ))
    }

    async fn run_passes(
        &self,
        backend: &Backend,
        model: Model,
        conversation: &mut Conversation,
        sink: &mut dyn ChunkSink,
    ) -> Result<String> {
        let debug = match self.options.debug_dir {
            Some(ref base) => DebugWriter::create(base).await,
            None => None,
        };
        let prefill = self.options.include_thinking.then_some(THINKING_PREFIX);
        let mut full_stream = String::new();
        let mut response: Option<String> = None;

        for pass in 1..=self.options.passes {
            tracing::debug!(
                pass,
                prompt = %crate::prompt::preview(&*conversation),
                "refinement pass"
            );

            let forwarded = backend
                .pass(&*conversation, model, prefill, sink)
                .instrument(tracing::debug_span!("refine.pass", pass))
                .await?;
            full_stream.push_str(&forwarded.text);

            if let Some(usage) = forwarded.usage {
                tracing::info!(
                    pass,
                    input_tokens = usage.input_tokens,
                    output_tokens = usage.output_tokens,
                    "token usage"
                );
            }

            if let Some(ref writer) = debug {
                writer
                    .write(
                        &format!("pass_{}.html", pass),
                        extract_html_content(&forwarded.text),
                    )
                    .await;
                writer
                    .write(
                        &format!("thinking_pass_{}.txt", pass),
                        thinking_section(&forwarded.text),
                    )
                    .await;
            }

            conversation.push_assistant(format!("{}{}", THINKING_PREFIX, forwarded.text));
            conversation.push_user(IMPROVE_INSTRUCTION);
            response = Some(forwarded.text);
        }

        if let Some(ref writer) = debug {
            writer.write("full_stream.txt", &full_stream).await;
        }

        response.ok_or(Error::ProtocolExhausted {
            passes: self.options.passes,
        })
    }
}
