//! Render strategies. Each one turns generated code into a complete HTML
//! document meant to run inside a sandboxed frame; nothing here executes the
//! code itself.

mod html;
mod message;
mod react;
mod sketch;

pub use html::render_html_preview;
pub use message::{
    sandbox_channel, PreviewMonitor, PreviewStatus, PreviewTracker, SandboxMessage, SandboxSender,
};
pub(crate) use react::is_valid_entry_point;
pub use react::render_react_preview;
pub use sketch::render_sketch_preview;

use crate::{Framework, PreviewError};
use regex::Regex;
use serde_json::Value;
use std::{sync::LazyLock, time::Duration};

/// Capabilities granted to the frame that hosts a preview document.
pub const SANDBOX_PERMISSIONS: &str =
    "allow-scripts allow-same-origin allow-forms allow-modals allow-pointer-lock";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxDocument {
    html: String,
}

impl SandboxDocument {
    pub(crate) fn new(html: String) -> Self {
        Self { html }
    }

    /// In-place error display used whenever a strategy cannot render.
    #[must_use]
    pub fn error_display(message: &str) -> Self {
        Self::new(ERROR_DOCUMENT.replace("__MESSAGE__", &escape_html(message)))
    }

    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    #[must_use]
    pub fn into_html(self) -> String {
        self.html
    }

    /// Value for the `sandbox` attribute of the hosting frame.
    #[must_use]
    pub fn sandbox_attribute(&self) -> &'static str {
        SANDBOX_PERMISSIONS
    }

    /// Header value applying the same restrictions when the document is
    /// served directly.
    #[must_use]
    pub fn content_security_policy(&self) -> String {
        format!("sandbox {SANDBOX_PERMISSIONS}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewOptions {
    pub width: u32,
    pub height: u32,
    /// How long a sketch may stay silent before it is treated as loaded.
    pub load_timeout: Duration,
    /// Identifier of the React component to mount.
    pub entry_point: String,
    /// Whether a sketch loops continuously or draws a single frame.
    pub running: bool,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            width: 400,
            height: 400,
            load_timeout: Duration::from_millis(3000),
            entry_point: "App".to_string(),
            running: true,
        }
    }
}

/// Render `code` with the strategy for `framework`.
///
/// Never fails: render faults become an error display document.
#[must_use]
pub fn render_preview(framework: Framework, code: &str, options: &PreviewOptions) -> SandboxDocument {
    let rendered = match framework {
        Framework::React => render_react_preview(code, &options.entry_point),
        Framework::P5js => render_sketch_preview(code, options),
        Framework::Classic => render_html_preview(code),
        Framework::Analysis => Err(PreviewError::RenderFault(
            "Unsupported framework".to_string(),
        )),
    };

    rendered.unwrap_or_else(|error| {
        tracing::warn!(%framework, %error, "preview render failed");
        SandboxDocument::error_display(&error.to_string())
    })
}

static SCRIPT_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</(script)").expect("valid script close pattern"));

pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Keep script text from closing the element it is embedded in.
pub(crate) fn escape_script_text(code: &str) -> String {
    SCRIPT_CLOSE.replace_all(code, r"<\/$1").into_owned()
}

/// Quote `text` as a JavaScript string literal that is safe inside a
/// `<script>` element.
pub(crate) fn js_string_literal(text: &str) -> String {
    Value::String(text.to_string())
        .to_string()
        .replace("</", r"<\/")
        .replace("<!--", r"<\!--")
}

const ERROR_DOCUMENT: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <style>
    body {
      font-family: Arial, sans-serif;
      margin: 0;
      padding: 16px;
      color: #ef4444;
      background-color: #fef2f2;
    }
  </style>
</head>
<body>
  <div class="preview-error"><strong>Error:</strong> __MESSAGE__</div>
</body>
</html>"#;
