//! Environment-sourced service credentials.

use tracing::debug;
use vignette_error::{ConfigError, VignetteResult};

const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
const RUNCOMFY_API_KEY: &str = "RUNCOMFY_API_KEY";
const RUNCOMFY_USER_ID: &str = "RUNCOMFY_USER_ID";
const ELEVEN_LABS_API_KEY: &str = "ELEVEN_LABS_API_KEY";

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Credentials and endpoints for the SaaS collaborators.
///
/// Read once at startup with [`ServiceConfig::from_env`]; clients borrow
/// from the resolved config rather than consulting the environment
/// themselves.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// API key for the chat completion endpoint
    pub openai_api_key: String,
    /// Base URL for the OpenAI-compatible API
    pub openai_base_url: String,
    /// RunComfy API key
    pub runcomfy_api_key: String,
    /// RunComfy account identifier
    pub runcomfy_user_id: String,
    /// ElevenLabs API key
    pub eleven_labs_api_key: String,
}

impl ServiceConfig {
    /// Resolve the full configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming the first missing required variable.
    /// `OPENAI_BASE_URL` is optional and defaults to the public OpenAI
    /// endpoint.
    pub fn from_env() -> VignetteResult<Self> {
        let config = Self {
            openai_api_key: require(OPENAI_API_KEY)?,
            openai_base_url: std::env::var(OPENAI_BASE_URL)
                .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string()),
            runcomfy_api_key: require(RUNCOMFY_API_KEY)?,
            runcomfy_user_id: require(RUNCOMFY_USER_ID)?,
            eleven_labs_api_key: require(ELEVEN_LABS_API_KEY)?,
        };
        debug!(base_url = %config.openai_base_url, "Resolved service configuration");
        Ok(config)
    }
}

fn require(name: &str) -> VignetteResult<String> {
    std::env::var(name)
        .map_err(|_| ConfigError::new(format!("{name} not set")).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_variable_names_the_variable() {
        let err = require("VIGNETTE_TEST_UNSET_VARIABLE").unwrap_err();
        assert!(format!("{err}").contains("VIGNETTE_TEST_UNSET_VARIABLE"));
    }
}
