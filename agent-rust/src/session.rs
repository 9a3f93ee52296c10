use crate::{
    preview::{render_preview, PreviewOptions, PreviewStatus, PreviewTracker, SandboxDocument},
    AgentError, AgentRegistry, AnalysisInput, AnalysisResult, CodeAnalysisAgent, Framework,
    GenerateError, GeneratedArtifact, SandboxMessage, CODE_ANALYZER_ID,
    GENERATION_ERROR_PLACEHOLDER,
};
use serde::Serialize;

/// State behind one editor: the latest artifact, the user's edit of it, and
/// what the preview and analysis currently show.
pub struct Session {
    registry: AgentRegistry,
    framework: Framework,
    artifact: Option<GeneratedArtifact>,
    edited_code: Option<String>,
    running: bool,
    analysis: AnalysisResult,
    preview: PreviewOptions,
    tracker: Option<PreviewTracker>,
}

/// Snapshot reported to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub framework: Framework,
    pub code: Option<String>,
    pub running: bool,
    pub suggestions: Vec<String>,
    pub preview_status: Option<PreviewStatus>,
}

impl Session {
    pub fn new(preview: PreviewOptions) -> Result<Self, AgentError> {
        let mut registry = AgentRegistry::new();
        registry.register(CodeAnalysisAgent)?;

        Ok(Self {
            registry,
            framework: Framework::React,
            artifact: None,
            edited_code: None,
            running: preview.running,
            analysis: AnalysisResult::default(),
            preview,
            tracker: None,
        })
    }

    #[must_use]
    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    #[must_use]
    pub fn framework(&self) -> Framework {
        self.framework
    }

    pub fn set_framework(&mut self, framework: Framework) {
        self.framework = framework;
    }

    #[must_use]
    pub fn artifact(&self) -> Option<&GeneratedArtifact> {
        self.artifact.as_ref()
    }

    /// The edit when there is one, otherwise the generated code.
    #[must_use]
    pub fn current_code(&self) -> Option<&str> {
        self.edited_code
            .as_deref()
            .or_else(|| self.artifact.as_ref().map(|artifact| artifact.code.as_str()))
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    #[must_use]
    pub fn analysis(&self) -> &AnalysisResult {
        &self.analysis
    }

    /// Name of the React component mounted by later renders.
    #[must_use]
    pub fn preview_options(&self) -> &PreviewOptions {
        &self.preview
    }

    /// Record the outcome of a generation request and return the code now
    /// shown. A failure leaves the generation error placeholder in place.
    pub async fn apply_generation(
        &mut self,
        framework: Framework,
        outcome: Result<GeneratedArtifact, GenerateError>,
    ) -> Result<String, GenerateError> {
        self.framework = framework;
        self.edited_code = None;

        match outcome {
            Ok(artifact) => {
                let code = artifact.code.clone();
                self.artifact = Some(artifact);
                self.refresh_analysis().await;
                Ok(code)
            }
            Err(error) => {
                tracing::error!(%error, "Error generating code");
                self.artifact = Some(GeneratedArtifact {
                    raw_response: error.to_string(),
                    code: GENERATION_ERROR_PLACEHOLDER.to_string(),
                });
                self.refresh_analysis().await;
                Err(error)
            }
        }
    }

    pub async fn apply_edit(&mut self, code: impl Into<String>) {
        self.edited_code = Some(code.into());
        self.refresh_analysis().await;
    }

    /// Drop the edit and pause the sketch.
    pub async fn reload(&mut self) {
        self.running = false;
        if self.edited_code.take().is_some() {
            self.refresh_analysis().await;
        }
    }

    /// Suggestions followed by optimizations.
    #[must_use]
    pub fn suggestion_badge(&self) -> Vec<String> {
        self.analysis
            .suggestions
            .iter()
            .chain(&self.analysis.optimizations)
            .cloned()
            .collect()
    }

    /// Render the current code and start tracking its load state.
    pub fn render(&mut self) -> Option<SandboxDocument> {
        self.render_with_entry(None)
    }

    /// Render with a React entry point used for this render only; the
    /// configured entry point stays in place for later renders.
    pub fn render_with_entry(&mut self, entry_point: Option<&str>) -> Option<SandboxDocument> {
        let code = self.current_code()?.to_string();
        let mut options = PreviewOptions {
            running: self.running,
            ..self.preview.clone()
        };
        if let Some(entry_point) = entry_point {
            options.entry_point = entry_point.to_string();
        }
        let document = render_preview(self.framework, &code, &options);
        self.tracker = Some(PreviewTracker::start(options.load_timeout));
        Some(document)
    }

    pub fn apply_sandbox_message(&mut self, message: &SandboxMessage) {
        match self.tracker.as_mut() {
            Some(tracker) => tracker.apply(message),
            None => tracing::debug!(%message, "sandbox event without a rendered preview"),
        }
    }

    #[must_use]
    pub fn preview_status(&self) -> Option<PreviewStatus> {
        self.tracker.as_ref().map(PreviewTracker::status)
    }

    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            framework: self.framework,
            code: self.current_code().map(ToString::to_string),
            running: self.running,
            suggestions: self.suggestion_badge(),
            preview_status: self.preview_status(),
        }
    }

    async fn refresh_analysis(&mut self) {
        let code = self.current_code().map(ToString::to_string);
        let (Some(code), Some(language)) = (code, self.framework.analysis_language()) else {
            self.analysis = AnalysisResult::default();
            return;
        };

        let input = AnalysisInput {
            code,
            language: language.to_string(),
        };
        self.analysis = match self.run_analysis(&input).await {
            Ok(result) => result,
            Err(error) => {
                tracing::error!(%error, "Error in code analysis");
                AnalysisResult {
                    code: input.code,
                    ..AnalysisResult::default()
                }
            }
        };
    }

    async fn run_analysis(&self, input: &AnalysisInput) -> Result<AnalysisResult, AgentError> {
        let value = serde_json::to_value(input).map_err(|error| AgentError::Execution {
            id: CODE_ANALYZER_ID.to_string(),
            source: error.into(),
        })?;
        let output = self.registry.run_one(CODE_ANALYZER_ID, value).await?;
        serde_json::from_value(output).map_err(|error| AgentError::Execution {
            id: CODE_ANALYZER_ID.to_string(),
            source: error.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(PreviewOptions::default()).unwrap()
    }

    fn artifact(code: &str) -> GeneratedArtifact {
        GeneratedArtifact {
            raw_response: format!("explainfiton\n'''\n{code}\n'''\nexplanation"),
            code: code.to_string(),
        }
    }

    #[tokio::test]
    async fn new_session_registers_the_analyzer() {
        let session = session();
        let agents = session.registry().agents();
        assert_eq!(agents.len(), 1);
        assert_eq!(agents[0].id, CODE_ANALYZER_ID);
        assert!(session.current_code().is_none());
        assert!(session.preview_status().is_none());
    }

    #[tokio::test]
    async fn artifact_is_analyzed_and_badged() {
        let mut session = session();
        let code = "var x = 1;\nfor (let i = 0; i < 3; i++) { console.log(i); }";
        let shown = session
            .apply_generation(Framework::P5js, Ok(artifact(code)))
            .await
            .unwrap();

        assert_eq!(shown, code);
        assert_eq!(
            session.suggestion_badge(),
            vec![
                "Consider using let or const instead of var for better scoping".to_string(),
                "Remove console.log statements before production".to_string(),
                "Consider using forEach, map, or filter instead of for loops".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn failed_generation_shows_placeholder() {
        let mut session = session();
        let err = session
            .apply_generation(
                Framework::React,
                Err(GenerateError::UnsupportedProvider("anthropic".to_string())),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, GenerateError::UnsupportedProvider(_)));
        assert_eq!(session.current_code(), Some(GENERATION_ERROR_PLACEHOLDER));
        assert!(session.suggestion_badge().is_empty());
    }

    #[tokio::test]
    async fn edit_overrides_until_reload() {
        let mut session = session();
        session
            .apply_generation(Framework::Classic, Ok(artifact("<p>hi</p>")))
            .await
            .unwrap();
        session.apply_edit("<img src=\"a.png\">").await;

        assert_eq!(session.current_code(), Some("<img src=\"a.png\">"));
        assert_eq!(
            session.suggestion_badge(),
            vec!["Add alt attributes to img tags for better accessibility".to_string()]
        );

        session.reload().await;
        assert_eq!(session.current_code(), Some("<p>hi</p>"));
        assert!(!session.is_running());
        assert!(session.suggestion_badge().is_empty());
    }

    #[tokio::test]
    async fn entry_override_applies_to_one_render() {
        let mut session = session();
        session
            .apply_generation(
                Framework::React,
                Ok(artifact("function Widget() { return null; }")),
            )
            .await
            .unwrap();

        let document = session.render_with_entry(Some("Widget")).unwrap();
        assert!(!document.html().contains("<strong>Error:</strong>"));
        assert!(document.html().contains("Widget"));

        let document = session.render().unwrap();
        assert!(document
            .html()
            .contains("<strong>Error:</strong> No component named App found"));
        assert_eq!(session.preview_options().entry_point, "App");
    }

    #[tokio::test]
    async fn paused_render_stops_the_sketch_loop() {
        let mut session = session();
        session
            .apply_generation(Framework::P5js, Ok(artifact("function draw() {}")))
            .await
            .unwrap();
        session.set_running(false);

        let document = session.render().unwrap();
        assert!(document.html().contains("noLoop();"));
        assert_eq!(session.preview_status(), Some(PreviewStatus::Loading));

        session.apply_sandbox_message(&SandboxMessage::Loaded);
        assert_eq!(session.preview_status(), Some(PreviewStatus::Loaded));
    }
}
