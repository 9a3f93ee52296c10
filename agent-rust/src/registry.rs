use crate::{Agent, AgentDescriptor, AgentError};
use futures::lock::Mutex;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info_span;
use tracing_futures::Instrument;

/// Per-session store of agents keyed by id.
///
/// Agents are only ever added. The busy flag mirrors the most recent call and
/// does not serialize overlapping calls.
#[derive(Default)]
pub struct AgentRegistry {
    agents: Vec<Box<dyn Agent>>,
    busy: AtomicBool,
    latest_result: Mutex<Option<Value>>,
}

struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn enter(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl AgentRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an agent. Ids are unique; registering an id twice is an error.
    pub fn register(&mut self, agent: impl Agent + 'static) -> Result<(), AgentError> {
        let id = agent.id();
        if self.get(&id).is_some() {
            return Err(AgentError::DuplicateAgent(id));
        }
        tracing::debug!(agent_id = %id, "registered agent");
        self.agents.push(Box::new(agent));
        Ok(())
    }

    fn get(&self, id: &str) -> Option<&dyn Agent> {
        self.agents
            .iter()
            .find(|agent| agent.id() == id)
            .map(|agent| agent.as_ref())
    }

    #[must_use]
    pub fn agents(&self) -> Vec<AgentDescriptor> {
        self.agents
            .iter()
            .map(|agent| AgentDescriptor::from(agent.as_ref()))
            .collect()
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Output of the last successful run, single or pipeline.
    pub async fn latest_result(&self) -> Option<Value> {
        self.latest_result.lock().await.clone()
    }

    /// Run one agent by id.
    pub async fn run_one(&self, id: &str, input: Value) -> Result<Value, AgentError> {
        let _busy = BusyGuard::enter(&self.busy);

        let agent = self.get(id).ok_or_else(|| {
            let error = AgentError::AgentNotFound(id.to_string());
            tracing::error!(%error, "Agent execution error");
            error
        })?;

        let output = agent
            .process(input)
            .instrument(info_span!("glimpse_agent.run_one", agent_id = id))
            .await
            .map_err(|source| {
                tracing::error!(agent_id = id, error = %source, "Agent execution error");
                AgentError::Execution {
                    id: id.to_string(),
                    source,
                }
            })?;

        *self.latest_result.lock().await = Some(output.clone());
        Ok(output)
    }

    /// Thread `input` through the agents in order. Unknown ids and inactive
    /// agents are skipped; the first failure aborts the remaining stages.
    pub async fn run_pipeline<S: AsRef<str>>(
        &self,
        ids: &[S],
        input: Value,
    ) -> Result<Value, AgentError> {
        let _busy = BusyGuard::enter(&self.busy);

        let mut current = input;
        for id in ids {
            let id = id.as_ref();
            let Some(agent) = self.get(id).filter(|agent| agent.is_active()) else {
                tracing::debug!(agent_id = id, "skipping missing or inactive agent");
                continue;
            };

            current = agent
                .process(current)
                .instrument(info_span!("glimpse_agent.pipeline_stage", agent_id = id))
                .await
                .map_err(|source| {
                    tracing::error!(agent_id = id, error = %source, "Pipeline execution error");
                    AgentError::Execution {
                        id: id.to_string(),
                        source,
                    }
                })?;
        }

        *self.latest_result.lock().await = Some(current.clone());
        Ok(current)
    }
}
