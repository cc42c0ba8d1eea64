//! DeepSeek chat provider (OpenAI-style SSE, text only)

mod convert;
mod provider;
mod stream;
mod types;

pub use provider::DeepSeekProvider;
pub use types::DeepSeekConfig;

pub(crate) const PROVIDER_ID: &str = "deepseek";
