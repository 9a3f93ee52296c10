mod agent;
mod analysis;
mod config;
mod errors;
mod framework;
mod generator;
mod parser;
pub mod preview;
mod prompt;
mod provider;
mod registry;
pub mod server;
mod session;

pub use agent::{Agent, AgentCapability, AgentDescriptor};
pub use analysis::{analyze, AnalysisInput, AnalysisResult, CodeAnalysisAgent, CODE_ANALYZER_ID};
pub use config::GlimpseConfig;
pub use errors::*;
pub use framework::Framework;
pub use generator::{GeneratedArtifact, GenerationRequest, Generator};
pub use parser::extract_code;
pub use preview::{render_preview, PreviewOptions, SandboxDocument, SandboxMessage};
pub use prompt::build_prompt;
pub use provider::{Credential, ModelFactory, Provider, ProviderModelFactory};
pub use registry::AgentRegistry;
pub use server::AppState;
pub use session::{Session, SessionSummary};
