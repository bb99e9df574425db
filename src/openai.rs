//! OpenAI-compatible client construction.

use crate::config::ModelConfig;
use crate::error::Result;
use async_openai::{config::OpenAIConfig, Client};

/// Create a chat client for the configured endpoint.
///
/// The base URL and key come from `config`; the HTTP client carries the
/// configured request timeout.
pub fn create_client(config: &ModelConfig) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder().timeout(config.timeout).build()?;

    let openai_config = OpenAIConfig::new()
        .with_api_base(api_base(config))
        .with_api_key(config.api_key.clone());

    Ok(Client::with_config(openai_config).with_http_client(http_client))
}

/// async-openai appends `/chat/completions` itself, so drop a trailing slash.
fn api_base(config: &ModelConfig) -> String {
    config.base_url.as_str().trim_end_matches('/').to_string()
}
