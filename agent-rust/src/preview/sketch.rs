use super::{escape_script_text, PreviewOptions, SandboxDocument};
use crate::{PreviewError, GENERATION_ERROR_PLACEHOLDER};

const P5_VERSION: &str = "1.9.0";

/// Build a document that runs a p5.js sketch in global mode.
///
/// The sketch gets a script element of its own so its top-level functions
/// land on `window`, where p5 looks for them; the wrapper script that follows
/// replaces `window.setup`. Syntax and top-level errors in the sketch reach
/// the parent through `window.onerror`.
///
/// The sketch's `setup` is wrapped to make the canvas focusable and report
/// the load; a sketch without one gets a `setup` that creates a canvas of the
/// configured size. `noLoop()` runs after setup when playback is paused.
/// Errors are posted to the parent window, and a sketch that stays silent for
/// `load_timeout` reports itself as loaded.
pub fn render_sketch_preview(
    code: &str,
    options: &PreviewOptions,
) -> Result<SandboxDocument, PreviewError> {
    let code = code.trim();
    if code.is_empty() || code == GENERATION_ERROR_PLACEHOLDER || !code.contains("function") {
        return Err(PreviewError::RenderFault(
            "Invalid or no code provided".to_string(),
        ));
    }

    let loop_control = if options.running { "" } else { "noLoop();" };
    let load_timeout_ms = options.load_timeout.as_millis().to_string();

    let html = SKETCH_DOCUMENT
        .replace("__P5_VERSION__", P5_VERSION)
        .replace("__WIDTH__", &options.width.to_string())
        .replace("__HEIGHT__", &options.height.to_string())
        .replace("__LOAD_TIMEOUT_MS__", &load_timeout_ms)
        .replace("__LOOP_CONTROL__", loop_control)
        .replace("__SKETCH__", &escape_script_text(code));
    Ok(SandboxDocument::new(html))
}

const SKETCH_DOCUMENT: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <script src="https://cdnjs.cloudflare.com/ajax/libs/p5.js/__P5_VERSION__/p5.js"></script>
  <script src="https://cdnjs.cloudflare.com/ajax/libs/p5.js/__P5_VERSION__/addons/p5.sound.min.js"></script>
  <style>
    body {
      margin: 0;
      padding: 0;
      overflow: hidden;
      display: flex;
      justify-content: center;
      align-items: center;
      min-height: 100vh;
      background: #f0f0f0;
    }
    canvas {
      display: block;
      outline: none;
    }
  </style>
</head>
<body>
  <script>
    window.alert = function () {};
    window.confirm = function () { return false; };
    window.prompt = function () { return ''; };

    var sketchLoaded = false;

    function notify(payload) {
      window.parent.postMessage(payload, '*');
    }

    window.onerror = function (message, source, lineno, colno) {
      notify({ type: 'error', message: String(message), source: source, lineno: lineno, colno: colno });
      return true;
    };

    function focusable(canvas) {
      if (canvas) {
        canvas.setAttribute('tabindex', '0');
        canvas.addEventListener('click', function () {
          this.focus();
        });
      }
    }

    function markLoaded() {
      sketchLoaded = true;
      notify({ type: 'loaded' });
      __LOOP_CONTROL__
    }
  </script>
  <script>
__SKETCH__
  </script>
  <script>
    var sketchSetup = window.setup;
    if (typeof sketchSetup === 'function') {
      window.setup = function () {
        try {
          sketchSetup();
          focusable(document.querySelector('canvas'));
          markLoaded();
        } catch (error) {
          notify({ type: 'error', message: 'Error in setup: ' + error.message });
        }
      };
    } else {
      window.setup = function () {
        focusable(createCanvas(__WIDTH__, __HEIGHT__).elt);
        markLoaded();
      };
    }

    setTimeout(function () {
      if (!sketchLoaded) {
        notify({ type: 'loaded' });
      }
    }, __LOAD_TIMEOUT_MS__);
  </script>
</body>
</html>"#;
