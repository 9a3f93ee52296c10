use crate::Framework;

const RESPONSE_SHAPE_SUFFIX: &str = "'''\nexplanation\n\nDo not deviate from this structure.";

/// Build the instruction sent to the model for `framework`.
///
/// Every generation framework asks for the code between `'''` markers,
/// preceded by an `explainfiton` line and followed by an `explanation` line.
/// [`Framework::Analysis`] forwards the prompt untouched.
#[must_use]
pub fn build_prompt(prompt: &str, framework: Framework, entry_point: &str) -> String {
    match framework {
        Framework::React => format!(
            "Generate {framework} code for: {prompt}. Return your response in this exact \
             format:\n\nexplainfiton\n'''\n[raw JavaScript/TypeScript code for a single React \
             component named {entry_point}, no imports (assume React and hooks are available), \
             no comments, no markdown]\n{RESPONSE_SHAPE_SUFFIX}"
        ),
        Framework::P5js => format!(
            "Generate {framework} code for: {prompt}. Return your response in this exact \
             format:\n\nexplainfiton\n'''\n[raw JavaScript code for a p5.js sketch, no \
             comments, no markdown]\n{RESPONSE_SHAPE_SUFFIX}"
        ),
        Framework::Classic => format!(
            "Generate a complete HTML document with embedded CSS and JavaScript for: {prompt}. \
             The HTML should include visualization elements. Return your response in this \
             exact format:\n\nexplainfiton\n'''\n<!DOCTYPE html>\n<html>\n<head>\n  <meta \
             charset=\"UTF-8\">\n  <title>{prompt}</title>\n  <style>\n    /* CSS goes here \
             */\n  </style>\n</head>\n<body>\n  <!-- HTML content goes here -->\n  <script>\n    \
             // JavaScript goes here\n  </script>\n</body>\n</html>\n{RESPONSE_SHAPE_SUFFIX}"
        ),
        Framework::Analysis => prompt.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn react_prompt_names_the_entry_point() {
        let prompt = build_prompt("a counter", Framework::React, "Counter");
        assert!(prompt.starts_with("Generate react code for: a counter."));
        assert!(prompt.contains("single React component named Counter"));
        assert!(prompt.contains("explainfiton\n'''\n"));
        assert!(prompt.ends_with("'''\nexplanation\n\nDo not deviate from this structure."));
    }

    #[test]
    fn classic_prompt_embeds_title_skeleton() {
        let prompt = build_prompt("solar system", Framework::Classic, "App");
        assert!(prompt.contains("<title>solar system</title>"));
        assert!(prompt.contains("<meta charset=\"UTF-8\">"));
        assert!(prompt.contains("  <script>\n    // JavaScript goes here\n  </script>"));
    }

    #[test]
    fn sketch_prompt_mentions_p5() {
        let prompt = build_prompt("bouncing ball", Framework::P5js, "App");
        assert!(prompt.starts_with("Generate p5.js code for: bouncing ball."));
        assert!(prompt.contains("p5.js sketch"));
    }

    #[test]
    fn analysis_prompt_is_verbatim() {
        assert_eq!(build_prompt("review this", Framework::Analysis, "App"), "review this");
    }
}
