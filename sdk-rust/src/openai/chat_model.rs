use super::chat_api::{ChatMessage, ChatRequest, ChatResponse, TokenCounts};
use crate::{
    client_utils, opentelemetry::trace_generate, LanguageModel, LanguageModelError,
    LanguageModelInput, LanguageModelResult, Message, ModelResponse, ModelUsage, Part,
};
use reqwest::{
    header::{HeaderValue, AUTHORIZATION},
    Client,
};
use std::collections::HashMap;

const PROVIDER: &str = "openai";
const OPENAI_API: &str = "https://api.openai.com/v1";

/// Chat Completions model. Also drives OpenAI-compatible services through
/// `base_url` and a different reported provider.
pub struct OpenAIChatModel {
    provider: &'static str,
    model_id: String,
    api_key: String,
    completions_url: String,
    client: Client,
    extra_headers: HashMap<String, String>,
}

#[derive(Clone, Default)]
pub struct OpenAIChatModelOptions {
    pub base_url: Option<String>,
    pub api_key: String,
    pub headers: Option<HashMap<String, String>>,
    pub client: Option<Client>,
}

impl OpenAIChatModel {
    #[must_use]
    pub fn new(model_id: impl Into<String>, options: OpenAIChatModelOptions) -> Self {
        let base_url = options.base_url.as_deref().unwrap_or(OPENAI_API);

        Self {
            provider: PROVIDER,
            model_id: model_id.into(),
            api_key: options.api_key,
            completions_url: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            client: options.client.unwrap_or_default(),
            extra_headers: options.headers.unwrap_or_default(),
        }
    }

    #[must_use]
    pub(crate) fn with_provider(mut self, provider: &'static str) -> Self {
        self.provider = provider;
        self
    }

    async fn complete(&self, input: LanguageModelInput) -> LanguageModelResult<ModelResponse> {
        let mut headers = client_utils::extra_headers(self.provider, &self.extra_headers)?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key)).map_err(|_| {
            LanguageModelError::InvalidInput(format!("{} API key is not a valid header", self.provider))
        })?;
        headers.insert(AUTHORIZATION, bearer);

        let request = chat_request(&self.model_id, &input);
        let response: ChatResponse =
            client_utils::post_json(&self.client, &self.completions_url, headers, &request).await?;

        let Some(choice) = response.choices.into_iter().next() else {
            return Err(LanguageModelError::Invariant(
                self.provider,
                "response has no choices".to_string(),
            ));
        };
        if let Some(refusal) = choice.message.refusal {
            return Err(LanguageModelError::Refusal(refusal));
        }

        Ok(ModelResponse {
            content: choice
                .message
                .content
                .filter(|text| !text.is_empty())
                .map(Part::text)
                .into_iter()
                .collect(),
            usage: response.usage.map(ModelUsage::from),
        })
    }
}

#[async_trait::async_trait]
impl LanguageModel for OpenAIChatModel {
    fn provider(&self) -> &'static str {
        self.provider
    }

    fn model_id(&self) -> String {
        self.model_id.clone()
    }

    async fn generate(&self, input: LanguageModelInput) -> LanguageModelResult<ModelResponse> {
        trace_generate(self.provider, &self.model_id, input, |input| self.complete(input)).await
    }
}

fn chat_request(model_id: &str, input: &LanguageModelInput) -> ChatRequest {
    let system = input
        .system_prompt
        .iter()
        .map(|prompt| chat_message("system", prompt.clone()));

    let turns = input.messages.iter().map(|message| match message {
        Message::User(user) => chat_message("user", joined_text(&user.content)),
        Message::Assistant(assistant) => chat_message("assistant", joined_text(&assistant.content)),
    });

    ChatRequest {
        model: model_id.to_string(),
        messages: system.chain(turns).collect(),
        max_tokens: input.max_tokens,
        temperature: input.temperature,
        top_p: input.top_p,
    }
}

fn chat_message(role: &'static str, content: String) -> ChatMessage {
    ChatMessage { role, content }
}

fn joined_text(parts: &[Part]) -> String {
    parts
        .iter()
        .map(|Part::Text(part)| part.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

impl From<TokenCounts> for ModelUsage {
    fn from(counts: TokenCounts) -> Self {
        Self {
            input_tokens: counts.prompt_tokens,
            output_tokens: counts.completion_tokens,
        }
    }
}
