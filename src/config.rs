use thiserror::Error;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} not found in environment variables. Please set it in a .env file.")]
    MissingEnvironmentVar(&'static str),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
}

impl GeminiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get("GEMINI_API_KEY").ok_or(ConfigError::MissingEnvironmentVar("GEMINI_API_KEY"))?;
        let model = get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
        let api_base = get("GEMINI_API_BASE")
            .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            api_key,
            model,
            api_base,
        })
    }
}
