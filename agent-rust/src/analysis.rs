use crate::{Agent, AgentCapability, BoxedError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const CODE_ANALYZER_ID: &str = "code-analyzer";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisInput {
    pub code: String,
    pub language: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub code: String,
    pub suggestions: Vec<String>,
    pub optimizations: Vec<String>,
    pub bugs: Vec<String>,
}

impl AnalysisResult {
    fn empty(code: String) -> Self {
        Self {
            code,
            ..Self::default()
        }
    }
}

/// Substring heuristics over generated code. Not a parser: every rule is a
/// presence check and there is no false-positive suppression.
#[must_use]
pub fn analyze(input: &AnalysisInput) -> AnalysisResult {
    let code = input.code.as_str();
    let mut result = AnalysisResult::empty(input.code.clone());

    match input.language.as_str() {
        "javascript" | "typescript" => {
            if code.contains("var ") {
                result.suggestions.push(
                    "Consider using let or const instead of var for better scoping".to_string(),
                );
            }
            if code.contains("for (let i = 0;") {
                result.optimizations.push(
                    "Consider using forEach, map, or filter instead of for loops".to_string(),
                );
            }
            if code.contains("console.log") {
                result
                    .suggestions
                    .push("Remove console.log statements before production".to_string());
            }
        }
        "html" => {
            if code.contains("<img") && !code.contains("alt=") {
                result
                    .suggestions
                    .push("Add alt attributes to img tags for better accessibility".to_string());
            }
            if code.contains("<table") && !code.contains("<th") {
                result
                    .suggestions
                    .push("Consider adding table headers (th) for better semantics".to_string());
            }
            if code.contains("onclick=") {
                result.optimizations.push(
                    "Consider using addEventListener instead of inline event handlers"
                        .to_string(),
                );
            }
            if code.contains("style=") {
                result
                    .optimizations
                    .push("Consider moving inline styles to a CSS stylesheet".to_string());
            }
        }
        _ => {}
    }

    result
}

/// Agent wrapper around [`analyze`]. It never fails: input it cannot read
/// produces empty lists.
#[derive(Debug, Default, Clone)]
pub struct CodeAnalysisAgent;

#[async_trait]
impl Agent for CodeAnalysisAgent {
    fn id(&self) -> String {
        CODE_ANALYZER_ID.to_string()
    }

    fn capability(&self) -> AgentCapability {
        AgentCapability::Analyzer
    }

    fn name(&self) -> String {
        "Code Analyzer".to_string()
    }

    fn description(&self) -> String {
        "Analyzes code for bugs, optimizations, and best practices".to_string()
    }

    async fn process(&self, input: Value) -> Result<Value, BoxedError> {
        let result = match serde_json::from_value::<AnalysisInput>(input.clone()) {
            Ok(input) => analyze(&input),
            Err(error) => {
                tracing::error!(%error, "Error in code analysis");
                let code = input
                    .get("code")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                AnalysisResult::empty(code)
            }
        };

        Ok(serde_json::to_value(result)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(code: &str, language: &str) -> AnalysisResult {
        analyze(&AnalysisInput {
            code: code.to_string(),
            language: language.to_string(),
        })
    }

    #[test]
    fn var_declaration_suggests_block_scope() {
        let result = run("var x = 1;", "javascript");
        assert_eq!(
            result.suggestions,
            vec!["Consider using let or const instead of var for better scoping"]
        );
        assert!(result.optimizations.is_empty());
        assert!(result.bugs.is_empty());
    }

    #[test]
    fn javascript_rules_fire_independently() {
        let result = run(
            "var n = 3;\nfor (let i = 0; i < n; i++) { console.log(i); }",
            "typescript",
        );
        assert_eq!(result.suggestions.len(), 2);
        assert_eq!(
            result.optimizations,
            vec!["Consider using forEach, map, or filter instead of for loops"]
        );
    }

    #[test]
    fn image_without_alt_is_flagged() {
        let result = run("<img src=x>", "html");
        assert_eq!(
            result.suggestions,
            vec!["Add alt attributes to img tags for better accessibility"]
        );
    }

    #[test]
    fn image_with_alt_is_not_flagged() {
        let result = run("<img src=x alt=y>", "html");
        assert!(result.suggestions.is_empty());
    }

    #[test]
    fn html_table_and_inline_attributes() {
        let result = run(
            "<table><tr><td onclick=\"go()\" style=\"color:red\">1</td></tr></table>",
            "html",
        );
        assert_eq!(
            result.suggestions,
            vec!["Consider adding table headers (th) for better semantics"]
        );
        assert_eq!(
            result.optimizations,
            vec![
                "Consider using addEventListener instead of inline event handlers",
                "Consider moving inline styles to a CSS stylesheet",
            ]
        );
    }

    #[test]
    fn other_languages_produce_nothing() {
        let result = run("var x = 1; <img src=x>", "python");
        assert_eq!(result, AnalysisResult::empty("var x = 1; <img src=x>".to_string()));
    }

    #[tokio::test]
    async fn agent_swallows_malformed_input() {
        let output = CodeAnalysisAgent
            .process(json!({ "code": "var x;" }))
            .await
            .expect("analysis never fails");

        assert_eq!(
            output,
            json!({ "code": "var x;", "suggestions": [], "optimizations": [], "bugs": [] })
        );
    }

    #[tokio::test]
    async fn agent_returns_serialized_result() {
        let output = CodeAnalysisAgent
            .process(json!({ "code": "console.log(1)", "language": "javascript" }))
            .await
            .unwrap();
        let result: AnalysisResult = serde_json::from_value(output).unwrap();
        assert_eq!(
            result.suggestions,
            vec!["Remove console.log statements before production"]
        );
    }
}
