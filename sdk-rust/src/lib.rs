mod client_utils;
mod errors;
pub mod google;
pub mod groq;
mod language_model;
pub mod openai;
mod opentelemetry;
pub mod sdk_test;
mod types;
mod types_ext;

pub use errors::*;
pub use language_model::LanguageModel;
pub use types::*;
