//! Settings read from the environment (after `.env` loading).

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use pixelcode_llms::{Credentials, DEFAULT_TIMEOUT, ProviderFamily};

/// Artifacts land here when debugging is on and `DEBUG_DIR` is unset.
const DEFAULT_DEBUG_DIR: &str = "debug";

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub deepseek_api_key: Option<String>,
    pub deepseek_base_url: Option<String>,
    pub mock: bool,
    pub debug_enabled: bool,
    pub debug_dir: Option<PathBuf>,
    pub timeout: Option<Duration>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let timeout = match get("PIXELCODE_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .parse()
                    .with_context(|| format!("PIXELCODE_TIMEOUT_SECS is not a number: {raw}"))?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            openai_api_key: get("OPENAI_API_KEY"),
            openai_base_url: get("OPENAI_BASE_URL"),
            anthropic_api_key: get("ANTHROPIC_API_KEY"),
            gemini_api_key: get("GEMINI_API_KEY"),
            deepseek_api_key: get("DEEPSEEK_API_KEY"),
            deepseek_base_url: get("DEEPSEEK_API_BASE_URL"),
            mock: get("MOCK").as_deref().is_some_and(is_truthy),
            debug_enabled: get("IS_DEBUG_ENABLED").as_deref().is_some_and(is_truthy),
            debug_dir: get("DEBUG_DIR").map(PathBuf::from),
            timeout,
        })
    }

    /// Credentials for a family. A missing key yields blank credentials so the provider
    /// reports it with its own id.
    pub fn credentials_for(&self, family: ProviderFamily) -> Credentials {
        let (key, base_url) = match family {
            ProviderFamily::OpenAI => (&self.openai_api_key, self.openai_base_url.clone()),
            ProviderFamily::Anthropic => (&self.anthropic_api_key, None),
            ProviderFamily::Gemini => (&self.gemini_api_key, None),
            ProviderFamily::DeepSeek => (&self.deepseek_api_key, self.deepseek_base_url.clone()),
        };
        Credentials::new(key.clone().unwrap_or_default()).with_optional_base_url(base_url)
    }

    /// Where refinement artifacts go, if anywhere. An explicit override always wins.
    pub fn debug_artifacts_dir(&self, explicit: Option<PathBuf>) -> Option<PathBuf> {
        if explicit.is_some() {
            return explicit;
        }
        if !self.debug_enabled {
            return None;
        }
        Some(
            self.debug_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DEBUG_DIR)),
        )
    }

    pub fn timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_empty_environment() {
        let cfg = config(&[]).unwrap();
        assert!(!cfg.mock);
        assert!(!cfg.debug_enabled);
        assert_eq!(cfg.timeout(), DEFAULT_TIMEOUT);
        assert!(cfg.debug_artifacts_dir(None).is_none());
    }

    #[test]
    fn test_bool_flags_are_strict() {
        assert!(config(&[("MOCK", "TRUE")]).unwrap().mock);
        assert!(config(&[("MOCK", "1")]).unwrap().mock);
        assert!(config(&[("MOCK", "yes")]).unwrap().mock);
        assert!(!config(&[("MOCK", "false")]).unwrap().mock);
        assert!(!config(&[("MOCK", "0")]).unwrap().mock);
        assert!(!config(&[("IS_DEBUG_ENABLED", "no")]).unwrap().debug_enabled);
    }

    #[test]
    fn test_credentials_per_family() {
        let cfg = config(&[
            ("OPENAI_API_KEY", "sk-openai"),
            ("OPENAI_BASE_URL", "http://proxy/v1"),
            ("DEEPSEEK_API_KEY", "sk-ds"),
            ("DEEPSEEK_API_BASE_URL", "http://ds/v1"),
            ("ANTHROPIC_API_KEY", "  "),
        ])
        .unwrap();

        let openai = cfg.credentials_for(ProviderFamily::OpenAI);
        assert_eq!(openai.api_key, "sk-openai");
        assert_eq!(openai.base_url.as_deref(), Some("http://proxy/v1"));

        let deepseek = cfg.credentials_for(ProviderFamily::DeepSeek);
        assert_eq!(deepseek.base_url.as_deref(), Some("http://ds/v1"));

        let anthropic = cfg.credentials_for(ProviderFamily::Anthropic);
        assert!(anthropic.require("anthropic").is_err());
        assert!(cfg.credentials_for(ProviderFamily::Gemini).base_url.is_none());
    }

    #[test]
    fn test_debug_dir_resolution() {
        let cfg = config(&[("IS_DEBUG_ENABLED", "true")]).unwrap();
        assert_eq!(cfg.debug_artifacts_dir(None), Some(PathBuf::from("debug")));

        let cfg = config(&[("IS_DEBUG_ENABLED", "true"), ("DEBUG_DIR", "/tmp/runs")]).unwrap();
        assert_eq!(cfg.debug_artifacts_dir(None), Some(PathBuf::from("/tmp/runs")));

        let cfg = config(&[("DEBUG_DIR", "/tmp/runs")]).unwrap();
        assert!(cfg.debug_artifacts_dir(None).is_none());
        assert_eq!(
            cfg.debug_artifacts_dir(Some(PathBuf::from("out"))),
            Some(PathBuf::from("out"))
        );
    }

    #[test]
    fn test_timeout_parsing() {
        let cfg = config(&[("PIXELCODE_TIMEOUT_SECS", "30")]).unwrap();
        assert_eq!(cfg.timeout(), Duration::from_secs(30));
        assert!(config(&[("PIXELCODE_TIMEOUT_SECS", "soon")]).is_err());
    }
}
