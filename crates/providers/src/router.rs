//! Provider selection — builds the generation backend from config.

use std::sync::Arc;
use std::time::Duration;

use crate::openai_compat::OpenAiCompatProvider;
use voyager_core::error::ProviderError;
use voyager_core::provider::Provider;

/// Providers that run locally and accept any key.
const KEYLESS: &[&str] = &["ollama", "vllm", "llamacpp", "llama.cpp"];

/// Build the configured provider.
///
/// Hosted providers need an API key; local ones do not. An unknown provider
/// name is accepted only together with an explicit `api_url`.
pub fn build_from_config(
    config: &voyager_config::AppConfig,
) -> Result<Arc<dyn Provider>, ProviderError> {
    let name = config.provider.trim().to_ascii_lowercase();

    let base_url = match (&config.api_url, default_base_url(&name)) {
        (Some(url), _) => url.clone(),
        (None, Some(url)) => url.to_string(),
        (None, None) => {
            return Err(ProviderError::NotConfigured(format!(
                "unknown provider '{name}'; set api_url to use a custom endpoint"
            )));
        }
    };

    let api_key = match &config.api_key {
        Some(key) => key.clone(),
        None if KEYLESS.contains(&name.as_str()) => name.clone(),
        None => {
            return Err(ProviderError::NotConfigured(format!(
                "no API key for '{name}'; set VOYAGER_API_KEY or GROQ_API_KEY"
            )));
        }
    };

    let timeout = Duration::from_secs(config.request_timeout_secs);
    tracing::debug!(provider = %name, base_url = %base_url, ?timeout, "Provider built");
    Ok(Arc::new(
        OpenAiCompatProvider::new(name, base_url, api_key).with_timeout(timeout),
    ))
}

/// Default base URL for well-known OpenAI-compatible providers.
pub fn default_base_url(provider_name: &str) -> Option<&'static str> {
    let url = match provider_name {
        "groq" => "https://api.groq.com/openai/v1",
        "openai" => "https://api.openai.com/v1",
        "openrouter" => "https://openrouter.ai/api/v1",
        "deepseek" => "https://api.deepseek.com/v1",
        "together" => "https://api.together.xyz/v1",
        "fireworks" => "https://api.fireworks.ai/inference/v1",
        "ollama" => "http://localhost:11434/v1",
        "vllm" => "http://localhost:8000/v1",
        "llamacpp" | "llama.cpp" => "http://localhost:8080/v1",
        _ => return None,
    };
    Some(url)
}
