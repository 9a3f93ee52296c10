use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single provider call.
#[derive(Debug, Error)]
pub enum LanguageModelError {
    /// The request could not be built, e.g. a key that is not a valid header.
    #[error("Invalid request: {0}")]
    InvalidInput(String),
    /// Sending the request or decoding the reply failed.
    #[error("Could not reach provider: {0}")]
    Transport(#[from] reqwest::Error),
    /// The provider answered with a non-2xx status.
    #[error("Provider responded with {status}: {body}")]
    StatusCode { status: StatusCode, body: String },
    /// The reply decoded but is missing something every answer should carry.
    #[error("Unexpected {0} response: {1}")]
    Invariant(&'static str, String),
    #[error("Model refused: {0}")]
    Refusal(String),
}

pub type LanguageModelResult<T> = Result<T, LanguageModelError>;
