use super::SandboxDocument;
use crate::{PreviewError, GENERATION_ERROR_PLACEHOLDER};

/// Serve raw HTML, wrapping bare fragments in a minimal document.
pub fn render_html_preview(code: &str) -> Result<SandboxDocument, PreviewError> {
    if code.trim().is_empty() {
        return Err(PreviewError::RenderFault("No code provided".to_string()));
    }
    if code.trim() == GENERATION_ERROR_PLACEHOLDER {
        return Err(PreviewError::RenderFault(
            GENERATION_ERROR_PLACEHOLDER.to_string(),
        ));
    }

    if is_full_document(code) {
        return Ok(SandboxDocument::new(code.to_string()));
    }

    Ok(SandboxDocument::new(FRAGMENT_SHELL.replace("__FRAGMENT__", code)))
}

fn is_full_document(code: &str) -> bool {
    code.contains("<!DOCTYPE html>") || code.contains("<html")
}

const FRAGMENT_SHELL: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <style>
    body {
      font-family: Arial, sans-serif;
      margin: 0;
      padding: 20px;
    }
  </style>
</head>
<body>
__FRAGMENT__
</body>
</html>"#;
