//! Pulls the code block out of free-form model output.

use crate::{Framework, GenerateError, UNPARSABLE_PLACEHOLDER};
use regex::Regex;
use std::sync::LazyLock;

static DELIMITED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)'''(.*?)'''").expect("valid delimiter pattern"));

static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:\w+)?\n(.*?)```").expect("valid fence pattern"));

static PROSE_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z\s]+:").expect("valid label pattern"));

const RESERVED_MARKERS: [&str; 2] = ["explainfiton", "explanation"];

/// Extract the code a model returned for `framework`.
///
/// Tried in order, first hit wins: a `'''` delimited block, a markdown fence,
/// then every line that is not blank, not a reserved marker and not a
/// `Label:` prose line. Responses for [`Framework::Analysis`] are returned
/// verbatim.
pub fn extract_code(raw: &str, framework: Framework) -> Result<String, GenerateError> {
    if framework == Framework::Analysis {
        return Ok(raw.to_string());
    }

    if let Some(code) = first_capture(&DELIMITED_BLOCK, raw) {
        return Ok(code);
    }

    if let Some(code) = first_capture(&FENCED_BLOCK, raw) {
        return Ok(code);
    }

    let code_lines: Vec<&str> = raw
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter(|line| !RESERVED_MARKERS.iter().any(|marker| line.starts_with(marker)))
        .filter(|line| !PROSE_LABEL.is_match(line))
        .collect();

    if code_lines.is_empty() {
        return Err(GenerateError::UnparsableResponse(UNPARSABLE_PLACEHOLDER));
    }

    Ok(code_lines.join("\n").trim().to_string())
}

/// Trimmed interior of the first match, skipped when the interior is empty.
fn first_capture(pattern: &Regex, raw: &str) -> Option<String> {
    pattern
        .captures(raw)
        .and_then(|captures| captures.get(1))
        .map(|interior| interior.as_str())
        .filter(|interior| !interior.is_empty())
        .map(|interior| interior.trim().to_string())
}
