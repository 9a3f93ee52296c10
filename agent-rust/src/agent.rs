use crate::BoxedError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;

/// What an agent contributes to the preview workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentCapability {
    Generator,
    Analyzer,
    Visualizer,
    Learner,
}

/**
 * A named processing unit with a uniform JSON-in, JSON-out contract. Agents
 * are registered into an [`AgentRegistry`](crate::AgentRegistry) and can be
 * chained into pipelines, where the output of one agent becomes the input of
 * the next.
 */
#[async_trait]
pub trait Agent: Send + Sync {
    /// Unique identifier used for lookups.
    fn id(&self) -> String;
    fn capability(&self) -> AgentCapability;
    /// Human readable name.
    fn name(&self) -> String;
    fn description(&self) -> String;
    /// Inactive agents are skipped by pipelines.
    fn is_active(&self) -> bool {
        true
    }
    /// Process the input. An error aborts the run it is part of.
    async fn process(&self, input: Value) -> Result<Value, BoxedError>;
}

impl Debug for dyn Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("id", &self.id())
            .field("capability", &self.capability())
            .field("name", &self.name())
            .field("active", &self.is_active())
            .field("process", &"Function")
            .finish()
    }
}

/// Summary of a registered agent, as exposed to observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentDescriptor {
    pub id: String,
    pub capability: AgentCapability,
    pub name: String,
    pub description: String,
    pub active: bool,
}

impl From<&dyn Agent> for AgentDescriptor {
    fn from(agent: &dyn Agent) -> Self {
        Self {
            id: agent.id(),
            capability: agent.capability(),
            name: agent.name(),
            description: agent.description(),
            active: agent.is_active(),
        }
    }
}
