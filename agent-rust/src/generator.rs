//! Turns a prompt into code: template, provider call (with the gemini
//! fallback), then extraction.

use crate::{
    build_prompt, extract_code, Credential, Framework, GenerateError, ModelFactory,
    Provider, GENERATION_ERROR_PLACEHOLDER,
};
use glimpse_sdk::{LanguageModelInput, ModelResponse};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_futures::Instrument;

const GEMINI_TEMPERATURE: f64 = 0.7;
const GEMINI_TOP_K: i32 = 40;
const GEMINI_TOP_P: f64 = 0.95;
const GEMINI_MAX_OUTPUT_TOKENS: u32 = 8192;

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub framework: Framework,
    pub provider: Provider,
    pub credential: Credential,
}

impl GenerationRequest {
    /// Build a request from the string identifiers a client sends.
    pub fn parse(
        prompt: impl Into<String>,
        framework: &str,
        provider: &str,
        credential: impl Into<String>,
    ) -> Result<Self, GenerateError> {
        Ok(Self {
            prompt: prompt.into(),
            framework: framework.parse()?,
            provider: provider.parse()?,
            credential: Credential::new(credential),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedArtifact {
    pub raw_response: String,
    pub code: String,
}

pub struct Generator {
    factory: Arc<dyn ModelFactory>,
    entry_point: String,
}

impl Generator {
    pub fn new(factory: Arc<dyn ModelFactory>) -> Self {
        Self {
            factory,
            entry_point: "App".to_string(),
        }
    }

    /// Name the React component the model is asked to produce.
    #[must_use]
    pub fn with_entry_point(mut self, entry_point: impl Into<String>) -> Self {
        self.entry_point = entry_point.into();
        self
    }

    #[must_use]
    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GeneratedArtifact, GenerateError> {
        let span = tracing::info_span!(
            "glimpse.generate",
            provider = %request.provider,
            framework = %request.framework,
        );

        async move {
            let prompt = build_prompt(&request.prompt, request.framework, &self.entry_point);
            let raw_response = self.complete(request, prompt).await?;
            let code = extract_code(&raw_response, request.framework)?;
            info!(code_len = code.len(), "generated code");
            Ok::<_, GenerateError>(GeneratedArtifact { raw_response, code })
        }
        .instrument(span)
        .await
    }

    /// Convenience over [`Generator::generate`] taking string identifiers and
    /// returning only the extracted code.
    pub async fn generate_code(
        &self,
        prompt: &str,
        framework: &str,
        provider: &str,
        credential: &str,
    ) -> Result<String, GenerateError> {
        let request = GenerationRequest::parse(prompt, framework, provider, credential)?;
        let artifact = self.generate(&request).await?;
        Ok(artifact.code)
    }

    async fn complete(
        &self,
        request: &GenerationRequest,
        prompt: String,
    ) -> Result<String, GenerateError> {
        let provider = request.provider;
        let model_id = provider.primary_model();
        let model = self
            .factory
            .create_model(provider, model_id, &request.credential);

        info!(model_id, "sending generation request");
        let primary_error = match model.generate(primary_input(provider, prompt.clone())).await {
            Ok(response) => return Ok(response_text(&response)),
            Err(error) => error,
        };

        let Some(fallback_model_id) = provider.fallback_model() else {
            error!(error = %primary_error, "generation request failed");
            return Err(GenerateError::ProviderCallFailed {
                provider: provider.as_str(),
                source: primary_error,
            });
        };

        warn!(
            error = %primary_error,
            fallback_model_id,
            "primary model failed, retrying with fallback model"
        );
        let fallback = self
            .factory
            .create_model(provider, fallback_model_id, &request.credential);

        match fallback.generate(LanguageModelInput::from_prompt(prompt)).await {
            Ok(response) => Ok(response_text(&response)),
            Err(fallback_error) => {
                error!(error = %fallback_error, "fallback model failed");
                Err(GenerateError::FallbackAlsoFailed {
                    primary: primary_error,
                    fallback: fallback_error,
                })
            }
        }
    }
}

fn primary_input(provider: Provider, prompt: String) -> LanguageModelInput {
    let input = LanguageModelInput::from_prompt(prompt);
    match provider {
        Provider::Gemini => LanguageModelInput {
            temperature: Some(GEMINI_TEMPERATURE),
            top_k: Some(GEMINI_TOP_K),
            top_p: Some(GEMINI_TOP_P),
            max_tokens: Some(GEMINI_MAX_OUTPUT_TOKENS),
            ..input
        },
        Provider::Groq | Provider::OpenAI => input,
    }
}

fn response_text(response: &ModelResponse) -> String {
    let text = response.text();
    if text.is_empty() {
        GENERATION_ERROR_PLACEHOLDER.to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gemini_primary_input_carries_sampling_config() {
        let input = primary_input(Provider::Gemini, "draw".to_string());
        assert_eq!(input.temperature, Some(0.7));
        assert_eq!(input.top_k, Some(40));
        assert_eq!(input.top_p, Some(0.95));
        assert_eq!(input.max_tokens, Some(8192));
    }

    #[test]
    fn other_providers_send_the_prompt_alone() {
        let input = primary_input(Provider::OpenAI, "draw".to_string());
        assert_eq!(input, LanguageModelInput::from_prompt("draw"));
    }

    #[test]
    fn empty_response_becomes_placeholder() {
        assert_eq!(
            response_text(&ModelResponse::default()),
            GENERATION_ERROR_PLACEHOLDER
        );
    }

    #[test]
    fn request_parse_rejects_unknown_identifiers() {
        assert!(matches!(
            GenerationRequest::parse("x", "vue", "openai", "k"),
            Err(GenerateError::UnsupportedFramework(_))
        ));
        assert!(matches!(
            GenerationRequest::parse("x", "react", "anthropic", "k"),
            Err(GenerateError::UnsupportedProvider(_))
        ));
    }
}
