use thiserror::Error;

pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Placeholder the parser reports when a response holds no code.
pub const UNPARSABLE_PLACEHOLDER: &str = "Error: Could not parse code from response";

/// Placeholder shown in place of code when a generation request fails.
pub const GENERATION_ERROR_PLACEHOLDER: &str = "Error generating code";

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Unsupported framework: {0}")]
    UnsupportedFramework(String),
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),
    #[error("{0}")]
    UnparsableResponse(&'static str),
    #[error("{provider} call failed: {source}")]
    ProviderCallFailed {
        provider: &'static str,
        #[source]
        source: glimpse_sdk::LanguageModelError,
    },
    #[error("{primary} (Fallback also failed)")]
    FallbackAlsoFailed {
        primary: glimpse_sdk::LanguageModelError,
        #[source]
        fallback: glimpse_sdk::LanguageModelError,
    },
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Agent {0} not found")]
    AgentNotFound(String),
    #[error("Agent {0} is already registered")]
    DuplicateAgent(String),
    #[error("Agent {id} failed: {source}")]
    Execution {
        id: String,
        #[source]
        source: BoxedError,
    },
}

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("{0}")]
    RenderFault(String),
    #[error("No component named {0} found")]
    NoComponentFound(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}
