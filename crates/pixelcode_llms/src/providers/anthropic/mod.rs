//! Anthropic messages provider

mod convert;
mod provider;
mod stream;
mod types;

pub use provider::AnthropicProvider;
pub use types::AnthropicConfig;

pub(crate) const PROVIDER_ID: &str = "anthropic";
