//! Configuration for a receipt extraction run.
//!
//! Every knob lives in [`ExtractionConfig`], built once at startup through
//! [`ExtractionConfigBuilder`] and passed by reference into
//! [`crate::extract::extract`]. The library never reads environment variables
//! itself; the CLI resolves flags and env fallbacks before building the config.

use crate::error::ReceiptError;
use crate::pipeline::llm::ExtractionService;
use std::fmt;
use std::sync::Arc;

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "claude-3-7-sonnet-20250219";

/// Public Anthropic API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// Value sent in the `anthropic-version` header.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Output token cap used when none is configured.
pub const DEFAULT_MAX_TOKENS: u32 = 20_000;

/// Sampling temperature used when none is configured.
pub const DEFAULT_TEMPERATURE: f32 = 1.0;

/// Secret credential for the extraction service.
///
/// `Debug` never prints the value, so the key can't leak through a
/// `{:?}` in a log line.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// The raw key, for building the auth header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(****)")
    }
}

/// Configuration for one receipt extraction.
///
/// # Example
/// ```rust
/// use receipt2csv::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .api_key("sk-ant-...")
///     .max_tokens(8000)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_tokens, 8000);
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Credential sent as `x-api-key`. Required.
    pub api_key: ApiKey,

    /// Model identifier. Default: [`DEFAULT_MODEL`].
    pub model: String,

    /// Upper bound on generated tokens. Default: 20 000.
    ///
    /// Long receipts with many line items produce wide CSV rows; a low cap
    /// truncates the table mid-row.
    pub max_tokens: u32,

    /// Sampling temperature, 0.0–1.0. Default: 1.0.
    pub temperature: f32,

    /// API root without the `/v1/messages` suffix. Default: [`DEFAULT_BASE_URL`].
    pub base_url: String,

    /// Custom instruction. If None, uses [`crate::prompts::DEFAULT_SYSTEM_PROMPT`].
    pub system_prompt: Option<String>,

    /// Whole-request timeout in seconds. None leaves the HTTP client default
    /// (no timeout).
    pub request_timeout_secs: Option<u64>,

    /// Pre-constructed service. Takes precedence over the built-in Anthropic client.
    pub service: Option<Arc<dyn ExtractionService>>,
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("api_key", &self.api_key)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("base_url", &self.base_url)
            .field("system_prompt", &self.system_prompt.as_ref().map(|p| p.len()))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("service", &self.service.as_ref().map(|_| "<dyn ExtractionService>"))
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder::default()
    }
}

/// Builder for [`ExtractionConfig`].
pub struct ExtractionConfigBuilder {
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
    temperature: f32,
    base_url: String,
    system_prompt: Option<String>,
    request_timeout_secs: Option<u64>,
    service: Option<Arc<dyn ExtractionService>>,
}

impl Default for ExtractionConfigBuilder {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            base_url: DEFAULT_BASE_URL.to_string(),
            system_prompt: None,
            request_timeout_secs: None,
            service: None,
        }
    }
}

impl ExtractionConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the key from an optional source, e.g. a CLI flag with env fallback.
    pub fn api_key_opt(mut self, key: Option<String>) -> Self {
        self.api_key = key;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn max_tokens(mut self, n: u32) -> Self {
        self.max_tokens = n;
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.temperature = t.clamp(0.0, 1.0);
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn request_timeout_secs(mut self, secs: Option<u64>) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    pub fn service(mut self, service: Arc<dyn ExtractionService>) -> Self {
        self.service = Some(service);
        self
    }

    /// Build the configuration, validating constraints.
    ///
    /// Fails with [`ReceiptError::MissingApiKey`] when no non-blank key was set.
    pub fn build(self) -> Result<ExtractionConfig, ReceiptError> {
        let api_key = match self.api_key {
            Some(k) if !k.trim().is_empty() => ApiKey(k),
            _ => return Err(ReceiptError::MissingApiKey),
        };
        if self.max_tokens == 0 {
            return Err(ReceiptError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(ReceiptError::InvalidConfig("model must not be empty".into()));
        }
        let base_url = self.base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ReceiptError::InvalidConfig(format!(
                "base URL must be http(s), got '{}'",
                self.base_url
            )));
        }
        Ok(ExtractionConfig {
            api_key,
            model: self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            base_url,
            system_prompt: self.system_prompt,
            request_timeout_secs: self.request_timeout_secs,
            service: self.service,
        })
    }
}
