use crate::{
    AssistantMessage, LanguageModelInput, Message, ModelResponse, Part, TextPart, UserMessage,
};

impl TextPart {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl From<&str> for TextPart {
    fn from(value: &str) -> Self {
        Self {
            text: value.to_string(),
        }
    }
}

impl From<String> for TextPart {
    fn from(value: String) -> Self {
        Self { text: value }
    }
}

impl Part {
    /// Create a new text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(TextPart::new(text))
    }
}

impl Message {
    pub fn user(content: impl IntoIterator<Item = impl Into<Part>>) -> Self {
        Self::User(UserMessage {
            content: content.into_iter().map(Into::into).collect(),
        })
    }

    pub fn assistant(content: impl IntoIterator<Item = impl Into<Part>>) -> Self {
        Self::Assistant(AssistantMessage {
            content: content.into_iter().map(Into::into).collect(),
        })
    }
}

impl From<TextPart> for Part {
    fn from(value: TextPart) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Part {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<String> for Part {
    fn from(value: String) -> Self {
        Self::text(value)
    }
}

impl LanguageModelInput {
    /// Input made of a single user message carrying `prompt` as text.
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::user([Part::text(prompt)])],
            ..Default::default()
        }
    }
}

impl ModelResponse {
    /// Concatenated text of every text part in the response.
    #[must_use]
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(|part| match part {
                Part::Text(TextPart { text }) => text.as_str(),
            })
            .collect()
    }
}
