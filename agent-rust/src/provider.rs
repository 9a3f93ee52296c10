use crate::GenerateError;
use glimpse_sdk::{
    google::{GoogleModel, GoogleModelOptions},
    groq::{GroqModel, GroqModelOptions},
    openai::{OpenAIChatModel, OpenAIChatModelOptions},
    LanguageModel,
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, sync::Arc};

/// The completion service a generation request is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[serde(alias = "grok")]
    Groq,
    OpenAI,
    #[serde(alias = "google")]
    Gemini,
}

impl Provider {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Groq => "groq",
            Self::OpenAI => "openai",
            Self::Gemini => "gemini",
        }
    }

    #[must_use]
    pub fn primary_model(self) -> &'static str {
        match self {
            Self::Groq => "mixtral-8x7b-32768",
            Self::OpenAI => "gpt-4o",
            Self::Gemini => "gemini-1.5-pro",
        }
    }

    /// The alternate model tried once when the primary call fails.
    #[must_use]
    pub fn fallback_model(self) -> Option<&'static str> {
        match self {
            Self::Gemini => Some("gemini-pro"),
            Self::Groq | Self::OpenAI => None,
        }
    }
}

impl FromStr for Provider {
    type Err = GenerateError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "groq" | "grok" => Ok(Self::Groq),
            "openai" => Ok(Self::OpenAI),
            "gemini" | "google" => Ok(Self::Gemini),
            other => Err(GenerateError::UnsupportedProvider(other.to_string())),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An API key supplied with a single request.
#[derive(Clone, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([hidden])")
    }
}

/// Builds the language model used for one provider call.
pub trait ModelFactory: Send + Sync {
    fn create_model(
        &self,
        provider: Provider,
        model_id: &str,
        credential: &Credential,
    ) -> Arc<dyn LanguageModel + Send + Sync>;
}

/// Builds the real provider models, optionally against overridden endpoints.
#[derive(Debug, Clone, Default)]
pub struct ProviderModelFactory {
    pub openai_base_url: Option<String>,
    pub groq_base_url: Option<String>,
    pub google_base_url: Option<String>,
}

impl ModelFactory for ProviderModelFactory {
    fn create_model(
        &self,
        provider: Provider,
        model_id: &str,
        credential: &Credential,
    ) -> Arc<dyn LanguageModel + Send + Sync> {
        let api_key = credential.expose().to_string();

        match provider {
            Provider::OpenAI => Arc::new(OpenAIChatModel::new(
                model_id,
                OpenAIChatModelOptions {
                    api_key,
                    base_url: self.openai_base_url.clone(),
                    ..Default::default()
                },
            )),
            Provider::Groq => Arc::new(GroqModel::new(
                model_id,
                GroqModelOptions {
                    api_key,
                    base_url: self.groq_base_url.clone(),
                    ..Default::default()
                },
            )),
            Provider::Gemini => Arc::new(GoogleModel::new(
                model_id,
                GoogleModelOptions {
                    api_key,
                    base_url: self.google_base_url.clone(),
                    ..Default::default()
                },
            )),
        }
    }
}
