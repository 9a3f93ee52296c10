//! Groq serves an OpenAI-compatible Chat Completions API, so the model reuses
//! the `OpenAI` chat implementation against a different base URL.

use crate::{
    openai::{OpenAIChatModel, OpenAIChatModelOptions},
    LanguageModel, LanguageModelInput, LanguageModelResult, ModelResponse,
};
use reqwest::Client;
use std::collections::HashMap;

const PROVIDER: &str = "groq";
const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

pub struct GroqModel {
    inner: OpenAIChatModel,
}

#[derive(Clone, Default)]
pub struct GroqModelOptions {
    pub base_url: Option<String>,
    pub api_key: String,
    pub headers: Option<HashMap<String, String>>,
    pub client: Option<Client>,
}

impl GroqModel {
    #[must_use]
    pub fn new(model_id: impl Into<String>, options: GroqModelOptions) -> Self {
        let GroqModelOptions {
            base_url,
            api_key,
            headers,
            client,
        } = options;

        let inner = OpenAIChatModel::new(
            model_id,
            OpenAIChatModelOptions {
                base_url: Some(base_url.unwrap_or_else(|| GROQ_BASE_URL.to_string())),
                api_key,
                headers,
                client,
            },
        )
        .with_provider(PROVIDER);

        Self { inner }
    }
}

#[async_trait::async_trait]
impl LanguageModel for GroqModel {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    fn model_id(&self) -> String {
        self.inner.model_id()
    }

    async fn generate(&self, input: LanguageModelInput) -> LanguageModelResult<ModelResponse> {
        self.inner.generate(input).await
    }
}
