//! Gemini `streamGenerateContent` provider

mod convert;
mod provider;
mod stream;
mod types;

pub use provider::GeminiProvider;
pub use types::GeminiConfig;

pub(crate) const PROVIDER_ID: &str = "gemini";
