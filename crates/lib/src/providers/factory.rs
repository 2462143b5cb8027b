//! # AI Provider Factory
//!
//! This module centralizes the logic for creating AI provider instances from their
//! configured type, so that the `server` and `cli` crates build providers the same way.

use crate::{
    errors::GeoError,
    providers::ai::{gemini::GeminiProvider, local::LocalAiProvider, AiProvider},
};
use tracing::info;

/// The settings needed to instantiate one AI provider.
#[derive(Debug, Clone, Default)]
pub struct ProviderSpec<'a> {
    /// `gemini` or `local`.
    pub provider_type: &'a str,
    pub model_name: &'a str,
    pub api_url: Option<&'a str>,
    pub api_key: Option<&'a str>,
}

/// Creates an AI provider from its type, model name, URL, and key.
///
/// Gemini providers require a key and derive their URL from the model name unless one
/// is given. Local providers require a URL and treat the key as optional.
pub fn create_provider(spec: &ProviderSpec<'_>) -> Result<Box<dyn AiProvider>, GeoError> {
    match spec.provider_type {
        "gemini" => {
            let api_key = spec
                .api_key
                .filter(|k| !k.is_empty())
                .ok_or_else(|| {
                    GeoError::MissingAiProvider(format!(
                        "Gemini model '{}' has no API key",
                        spec.model_name
                    ))
                })?;
            let api_url = spec
                .api_url
                .map(str::to_string)
                .unwrap_or_else(|| GeminiProvider::model_url(spec.model_name));
            info!("Configuring Gemini provider with URL: {}", api_url);
            Ok(Box::new(GeminiProvider::new(api_url, api_key.to_string())?))
        }
        "local" => {
            let api_url = spec.api_url.ok_or_else(|| {
                GeoError::MissingAiProvider(format!(
                    "Local model '{}' has no api_url",
                    spec.model_name
                ))
            })?;
            info!("Configuring Local AI provider with URL: {}", api_url);
            Ok(Box::new(LocalAiProvider::new(
                api_url.to_string(),
                spec.api_key.map(str::to_string),
                Some(spec.model_name.to_string()),
            )?))
        }
        other => Err(GeoError::MissingAiProvider(format!(
            "Unsupported provider type: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gemini_without_key_is_rejected() {
        let spec = ProviderSpec {
            provider_type: "gemini",
            model_name: "gemini-pro",
            ..Default::default()
        };
        assert!(matches!(
            create_provider(&spec),
            Err(GeoError::MissingAiProvider(_))
        ));
    }

    #[test]
    fn local_requires_url_and_unknown_types_fail() {
        let spec = ProviderSpec {
            provider_type: "local",
            model_name: "llava",
            ..Default::default()
        };
        assert!(create_provider(&spec).is_err());

        let spec = ProviderSpec {
            provider_type: "local",
            model_name: "llava",
            api_url: Some("http://localhost:1234/v1/chat/completions"),
            api_key: None,
        };
        assert!(create_provider(&spec).is_ok());

        let spec = ProviderSpec {
            provider_type: "openai",
            ..Default::default()
        };
        assert!(create_provider(&spec).is_err());
    }
}
