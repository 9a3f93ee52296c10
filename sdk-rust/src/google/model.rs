use super::api::{
    Content, ContentPart, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    UsageMetadata,
};
use crate::{
    client_utils, opentelemetry::trace_generate, LanguageModel, LanguageModelError,
    LanguageModelInput, LanguageModelResult, Message, ModelResponse, ModelUsage, Part,
};
use reqwest::Client;
use std::collections::HashMap;

const PROVIDER: &str = "google";
const GEMINI_API: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini over the `generateContent` REST endpoint. The key travels as the
/// `key` query parameter.
pub struct GoogleModel {
    model_id: String,
    api_key: String,
    endpoint: String,
    client: Client,
    extra_headers: HashMap<String, String>,
}

#[derive(Clone, Default)]
pub struct GoogleModelOptions {
    pub api_key: String,
    pub base_url: Option<String>,
    pub headers: Option<HashMap<String, String>>,
    pub client: Option<Client>,
}

impl GoogleModel {
    #[must_use]
    pub fn new(model_id: impl Into<String>, options: GoogleModelOptions) -> Self {
        let model_id = model_id.into();
        let base_url = options.base_url.as_deref().unwrap_or(GEMINI_API);
        let endpoint = format!(
            "{}/models/{model_id}:generateContent",
            base_url.trim_end_matches('/')
        );

        Self {
            model_id,
            api_key: options.api_key,
            endpoint,
            client: options.client.unwrap_or_default(),
            extra_headers: options.headers.unwrap_or_default(),
        }
    }
}

#[async_trait::async_trait]
impl LanguageModel for GoogleModel {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    fn model_id(&self) -> String {
        self.model_id.clone()
    }

    async fn generate(&self, input: LanguageModelInput) -> LanguageModelResult<ModelResponse> {
        trace_generate(PROVIDER, &self.model_id, input, |input| async move {
            let request = to_generate_content_request(&input);
            let url = format!("{}?key={}", self.endpoint, self.api_key);
            let headers = client_utils::extra_headers(PROVIDER, &self.extra_headers)?;

            let response: GenerateContentResponse =
                client_utils::post_json(&self.client, &url, headers, &request).await?;

            let candidate = response.candidates.into_iter().next().ok_or_else(|| {
                LanguageModelError::Invariant(PROVIDER, "no candidate in response".to_string())
            })?;

            Ok(ModelResponse {
                content: answer_parts(candidate.content),
                usage: response.usage_metadata.map(ModelUsage::from),
            })
        })
        .await
    }
}

fn to_generate_content_request(input: &LanguageModelInput) -> GenerateContentRequest {
    let contents = input
        .messages
        .iter()
        .map(|message| match message {
            Message::User(user) => content("user", &user.content),
            Message::Assistant(assistant) => content("model", &assistant.content),
        })
        .collect();

    let system_instruction = input.system_prompt.as_ref().map(|system_prompt| Content {
        role: None,
        parts: vec![text_part(system_prompt)],
    });

    let sampled = input.temperature.is_some()
        || input.top_p.is_some()
        || input.top_k.is_some()
        || input.max_tokens.is_some();

    GenerateContentRequest {
        contents,
        system_instruction,
        generation_config: sampled.then(|| GenerationConfig {
            temperature: input.temperature,
            top_p: input.top_p,
            top_k: input.top_k,
            max_output_tokens: input.max_tokens,
        }),
    }
}

fn content(role: &str, parts: &[Part]) -> Content {
    Content {
        role: Some(role.to_string()),
        parts: parts
            .iter()
            .map(|Part::Text(part)| text_part(&part.text))
            .collect(),
    }
}

fn text_part(text: &str) -> ContentPart {
    ContentPart {
        text: Some(text.to_string()),
        thought: false,
    }
}

/// Text of the candidate without reasoning parts.
fn answer_parts(content: Content) -> Vec<Part> {
    content
        .parts
        .into_iter()
        .filter(|part| !part.thought)
        .filter_map(|part| part.text)
        .map(Part::text)
        .collect()
}

impl From<UsageMetadata> for ModelUsage {
    fn from(usage: UsageMetadata) -> Self {
        Self {
            input_tokens: usage.prompt_token_count,
            output_tokens: usage.candidates_token_count,
        }
    }
}
