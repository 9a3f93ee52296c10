use crate::{LanguageModel, LanguageModelError, LanguageModelInput, LanguageModelResult, ModelResponse};
use std::{
    collections::VecDeque,
    sync::{Mutex, MutexGuard},
};

/// Outcome handed back by one [`MockLanguageModel::generate`] call.
pub enum MockGenerateResult {
    Response(ModelResponse),
    Error(LanguageModelError),
}

impl MockGenerateResult {
    pub fn response(response: ModelResponse) -> Self {
        Self::Response(response)
    }

    pub fn error(error: LanguageModelError) -> Self {
        Self::Error(error)
    }

    fn into_result(self) -> LanguageModelResult<ModelResponse> {
        match self {
            Self::Response(response) => Ok(response),
            Self::Error(error) => Err(error),
        }
    }
}

impl From<ModelResponse> for MockGenerateResult {
    fn from(response: ModelResponse) -> Self {
        Self::Response(response)
    }
}

impl From<LanguageModelResult<ModelResponse>> for MockGenerateResult {
    fn from(result: LanguageModelResult<ModelResponse>) -> Self {
        result.map_or_else(Self::Error, Self::Response)
    }
}

#[derive(Default)]
struct Recorded {
    queued: VecDeque<MockGenerateResult>,
    inputs: Vec<LanguageModelInput>,
}

/// In-memory [`LanguageModel`] that replays queued results in FIFO order and
/// records every input it receives. An empty queue is an `Invariant` error.
pub struct MockLanguageModel {
    provider: &'static str,
    model_id: String,
    recorded: Mutex<Recorded>,
}

impl Default for MockLanguageModel {
    fn default() -> Self {
        Self {
            provider: "mock",
            model_id: "mock-model".into(),
            recorded: Mutex::default(),
        }
    }
}

impl MockLanguageModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_provider(&mut self, provider: &'static str) {
        self.provider = provider;
    }

    pub fn set_model_id(&mut self, model_id: impl Into<String>) {
        self.model_id = model_id.into();
    }

    fn recorded(&self) -> MutexGuard<'_, Recorded> {
        self.recorded.lock().expect("mock state poisoned")
    }

    pub fn enqueue_generate_results(
        &self,
        results: impl IntoIterator<Item = MockGenerateResult>,
    ) -> &Self {
        self.recorded().queued.extend(results);
        self
    }

    pub fn enqueue_generate(&self, result: impl Into<MockGenerateResult>) -> &Self {
        self.recorded().queued.push_back(result.into());
        self
    }

    /// Inputs seen so far, oldest first.
    pub fn tracked_generate_inputs(&self) -> Vec<LanguageModelInput> {
        self.recorded().inputs.clone()
    }

    /// Forget queued results and recorded inputs.
    pub fn restore(&self) {
        *self.recorded() = Recorded::default();
    }
}

#[async_trait::async_trait]
impl LanguageModel for MockLanguageModel {
    fn provider(&self) -> &'static str {
        self.provider
    }

    fn model_id(&self) -> String {
        self.model_id.clone()
    }

    async fn generate(&self, input: LanguageModelInput) -> LanguageModelResult<ModelResponse> {
        let next = {
            let mut recorded = self.recorded();
            recorded.inputs.push(input);
            recorded.queued.pop_front()
        };

        next.ok_or_else(|| {
            LanguageModelError::Invariant(self.provider, "mock queue is empty".to_string())
        })?
        .into_result()
    }
}
