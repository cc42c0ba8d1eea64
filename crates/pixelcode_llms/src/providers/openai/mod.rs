//! OpenAI chat-completions provider

mod convert;
mod provider;
mod stream;
mod types;

pub use provider::OpenAIProvider;
pub use types::OpenAIConfig;

pub(crate) const PROVIDER_ID: &str = "openai";
