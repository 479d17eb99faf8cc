//! LLM endpoint configuration.

/// Default base URL (OpenAI-compatible `/chat/completions` lives under it).
const DEFAULT_API_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_TOKENS: u32 = 300;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for the chat-completion endpoint.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Base URL without the trailing `/chat/completions`.
    pub api_url: String,
    /// Bearer token. When `None` the avatar chat answers 503.
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl LlmConfig {
    /// Load LLM configuration from environment variables.
    ///
    /// | Env Var            | Default                     |
    /// |--------------------|-----------------------------|
    /// | `LLM_API_URL`      | `https://api.openai.com/v1` |
    /// | `LLM_API_KEY`      | -- (chat disabled)          |
    /// | `LLM_MODEL`        | `gpt-4o-mini`               |
    /// | `LLM_TEMPERATURE`  | `0.7`                       |
    /// | `LLM_MAX_TOKENS`   | `300`                       |
    /// | `LLM_TIMEOUT_SECS` | `30`                        |
    ///
    /// # Panics
    ///
    /// Panics if a numeric variable is set but does not parse.
    pub fn from_env() -> Self {
        let api_url = std::env::var("LLM_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
        let api_key = std::env::var("LLM_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());

        let temperature: f32 = std::env::var("LLM_TEMPERATURE")
            .unwrap_or_else(|_| DEFAULT_TEMPERATURE.to_string())
            .parse()
            .expect("LLM_TEMPERATURE must be a valid f32");

        let max_tokens: u32 = std::env::var("LLM_MAX_TOKENS")
            .unwrap_or_else(|_| DEFAULT_MAX_TOKENS.to_string())
            .parse()
            .expect("LLM_MAX_TOKENS must be a valid u32");

        let timeout_secs: u64 = std::env::var("LLM_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("LLM_TIMEOUT_SECS must be a valid u64");

        Self {
            api_url,
            api_key,
            model,
            temperature,
            max_tokens,
            timeout_secs,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            api_key: None,
            model: DEFAULT_MODEL.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}
