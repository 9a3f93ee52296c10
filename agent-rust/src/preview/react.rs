use super::{escape_script_text, js_string_literal, SandboxDocument};
use crate::{PreviewError, GENERATION_ERROR_PLACEHOLDER};
use regex::{Captures, Regex};
use std::sync::LazyLock;

static DEFAULT_REACT_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"import\s+React(?:\s*,\s*\{([^}]*)\})?\s+from\s+['"]react['"];?"#)
        .expect("valid default import pattern")
});

static NAMED_REACT_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"import\s*\{([^}]*)\}\s*from\s*['"]react['"];?"#)
        .expect("valid named import pattern")
});

static EXPORTED_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(\s*)export\s+(?:default\s+)?(function|class|const|let|var|async)\b")
        .expect("valid export pattern")
});

static EXPORTED_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*export\s+default\s+[A-Za-z_$][\w$]*\s*;?[ \t]*$")
        .expect("valid export name pattern")
});

static REACT_DESTRUCTURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([^}]*)\}\s*=\s*React\b").expect("valid destructure pattern")
});

static IDENTIFIER_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z_$][\w$]*(?:\s*\.\s*[A-Za-z_$][\w$]*)*")
        .expect("valid identifier path pattern")
});

const REACT_HOOKS: [&str; 12] = [
    "useState",
    "useEffect",
    "useLayoutEffect",
    "useRef",
    "useMemo",
    "useCallback",
    "useReducer",
    "useContext",
    "useId",
    "useTransition",
    "useDeferredValue",
    "useImperativeHandle",
];

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][\w$]*$").expect("valid identifier pattern"));

/// Whether `name` can be mounted as the React entry point.
pub(crate) fn is_valid_entry_point(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Build a document that compiles the JSX in the browser and mounts the
/// component named `entry_point`.
///
/// React imports are removed, named hook imports are rebound from the global
/// `React`, and `export` keywords are dropped so the component is a plain
/// top-level declaration.
pub fn render_react_preview(code: &str, entry_point: &str) -> Result<SandboxDocument, PreviewError> {
    if !is_valid_entry_point(entry_point) {
        return Err(PreviewError::RenderFault(format!(
            "Invalid entry point {entry_point:?}"
        )));
    }

    let code = code.trim();
    if code.is_empty() {
        return Err(PreviewError::RenderFault("No code provided".to_string()));
    }
    if code == GENERATION_ERROR_PLACEHOLDER {
        return Err(PreviewError::RenderFault(code.to_string()));
    }

    let source = prepare_source(code);
    if !declares(&source, entry_point) {
        return Err(PreviewError::NoComponentFound(entry_point.to_string()));
    }

    let html = REACT_DOCUMENT
        .replace("__ENTRY__", entry_point)
        .replace("__SOURCE__", &escape_script_text(&js_string_literal(&source)));
    Ok(SandboxDocument::new(html))
}

fn prepare_source(code: &str) -> String {
    let source = DEFAULT_REACT_IMPORT.replace_all(code, |captures: &Captures| {
        rebind_from_react(captures.get(1).map_or("", |names| names.as_str()))
    });
    let source = NAMED_REACT_IMPORT.replace_all(&source, |captures: &Captures| {
        rebind_from_react(&captures[1])
    });
    let source = EXPORTED_NAME.replace_all(&source, "");
    let source = EXPORTED_DECLARATION
        .replace_all(&source, "$1$2")
        .trim()
        .to_string();

    let hooks = unbound_hooks(&source);
    if hooks.is_empty() {
        source
    } else {
        format!("const {{ {} }} = React;\n{source}", hooks.join(", "))
    }
}

/// React hooks referenced without a `React.` prefix that nothing in
/// `source` binds, neither a destructure of `React` nor a declaration.
fn unbound_hooks(source: &str) -> Vec<&'static str> {
    let bound: Vec<&str> = REACT_DESTRUCTURE
        .captures_iter(source)
        .flat_map(|captures| captures.get(1).map_or("", |names| names.as_str()).split(','))
        .map(|binding| binding.rsplit(':').next().unwrap_or(binding).trim())
        .collect();
    let body = REACT_DESTRUCTURE.replace_all(source, "");

    REACT_HOOKS
        .into_iter()
        .filter(|hook| !bound.contains(hook) && !declares(&body, hook))
        .filter(|hook| IDENTIFIER_PATH.find_iter(&body).any(|path| path.as_str() == *hook))
        .collect()
}

/// `useState, useEffect as onMount` becomes
/// `const { useState, useEffect: onMount } = React;`.
fn rebind_from_react(names: &str) -> String {
    let bindings: Vec<String> = names
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| match name.split_once(" as ") {
            Some((imported, local)) => format!("{}: {}", imported.trim(), local.trim()),
            None => name.to_string(),
        })
        .collect();

    if bindings.is_empty() {
        String::new()
    } else {
        format!("const {{ {} }} = React;", bindings.join(", "))
    }
}

fn declares(source: &str, entry_point: &str) -> bool {
    let pattern = format!(
        r"(?m)(?:^|[^\w$.])(?:function(?:\s*\*\s*|\s+)|class\s+|(?:const|let|var)\s+){}(?:[^\w$]|$)",
        regex::escape(entry_point)
    );
    Regex::new(&pattern).is_ok_and(|declaration| declaration.is_match(source))
}

const REACT_DOCUMENT: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <script src="https://unpkg.com/react@18/umd/react.production.min.js" crossorigin></script>
  <script src="https://unpkg.com/react-dom@18/umd/react-dom.production.min.js" crossorigin></script>
  <script src="https://unpkg.com/@babel/standalone@7/babel.min.js"></script>
  <style>
    body {
      font-family: Arial, sans-serif;
      margin: 0;
      padding: 16px;
    }
    .render-error {
      color: #ef4444;
    }
  </style>
</head>
<body>
  <div id="preview-root"></div>
  <script>
    (function () {
      var surface = document.getElementById('preview-root');

      function report(message, source, lineno, colno) {
        window.parent.postMessage({
          type: 'error',
          message: String(message),
          source: source,
          lineno: lineno,
          colno: colno
        }, '*');
      }

      function showError(error) {
        var message = error && error.message ? error.message : String(error);
        var notice = document.createElement('div');
        notice.className = 'render-error';
        notice.textContent = 'Render Error: ' + message;
        surface.replaceChildren(notice);
        report(message);
      }

      window.onerror = function (message, source, lineno, colno) {
        report(message, source, lineno, colno);
        return true;
      };

      try {
        var source = __SOURCE__;
        var compiled = Babel.transform(source, { presets: ['react'] }).code;
        var evaluate = new Function(
          'React',
          'ReactDOM',
          compiled + '\nreturn typeof __ENTRY__ === "undefined" ? null : __ENTRY__;'
        );
        var Component = evaluate(React, ReactDOM);
        if (!Component) {
          throw new Error('No component named __ENTRY__ found');
        }
        var container = document.createElement('div');
        surface.replaceChildren(container);
        ReactDOM.createRoot(container).render(React.createElement(Component));
        window.parent.postMessage({ type: 'loaded' }, '*');
      } catch (error) {
        showError(error);
      }
    })();
  </script>
</body>
</html>"#;

#[cfg(test)]
mod tests {
    use super::*;

    const COUNTER: &str = r"import React, { useState } from 'react';

export default function App() {
  const [count, setCount] = useState(0);
  return <button onClick={() => setCount(count + 1)}>{count}</button>;
}";

    #[test]
    fn strips_imports_and_rebinds_hooks() {
        let source = prepare_source(COUNTER);
        assert!(!source.contains("import"));
        assert!(source.starts_with("const { useState } = React;"));
        assert!(source.contains("function App()"));
        assert!(!source.contains("export"));
    }

    #[test]
    fn bare_hook_calls_are_bound_from_react() {
        let source = prepare_source(
            "function App() {\n  const [n, setN] = useState(0);\n  useEffect(() => setN(1), []);\n  return <p>{n}</p>;\n}",
        );
        assert!(source.starts_with("const { useState, useEffect } = React;\nfunction App()"));
    }

    #[test]
    fn prefixed_hooks_are_left_alone() {
        let code = "function App() {\n  const [n] = React.useState(0);\n  return n;\n}";
        assert_eq!(prepare_source(code), code);
    }

    #[test]
    fn imported_hooks_are_not_bound_twice() {
        let source = prepare_source(
            "import { useState } from 'react';\nfunction App() { useState(0); useRef(); return null; }",
        );
        assert!(source.starts_with("const { useRef } = React;\nconst { useState } = React;\n"));
        assert_eq!(source.matches("useState } = React").count(), 1);
    }

    #[test]
    fn plain_default_import_is_removed() {
        let source = prepare_source("import React from \"react\";\nconst App = () => <p/>;");
        assert_eq!(source, "const App = () => <p/>;");
    }

    #[test]
    fn named_only_import_with_alias() {
        let source = prepare_source(
            "import { useEffect as onMount, useRef } from 'react'\nfunction App() { return null; }",
        );
        assert!(source.starts_with("const { useEffect: onMount, useRef } = React;"));
    }

    #[test]
    fn trailing_default_export_is_dropped() {
        let source = prepare_source("const App = () => null;\nexport default App;");
        assert_eq!(source, "const App = () => null;");
    }

    #[test]
    fn document_embeds_source_and_entry() {
        let document = render_react_preview(COUNTER, "App").unwrap();
        let html = document.html();
        assert!(html.contains("react-dom@18"));
        assert!(html.contains("@babel/standalone"));
        assert!(html.contains("return typeof App === \"undefined\" ? null : App;"));
        assert!(html.contains("const { useState } = React;"));
        assert!(html.contains("Render Error: "));
        assert!(html.contains("type: 'loaded'"));
    }

    #[test]
    fn custom_entry_point_is_honoured() {
        let code = "class Dashboard extends React.Component { render() { return null; } }";
        assert!(render_react_preview(code, "Dashboard").is_ok());
    }

    #[test]
    fn missing_entry_point_is_reported() {
        let err = render_react_preview("function Widget() { return null; }", "App").unwrap_err();
        assert!(matches!(err, PreviewError::NoComponentFound(ref name) if name == "App"));
        assert_eq!(err.to_string(), "No component named App found");
    }

    #[test]
    fn similarly_named_declarations_do_not_count() {
        let err = render_react_preview("function AppShell() { return null; }", "App").unwrap_err();
        assert!(matches!(err, PreviewError::NoComponentFound(_)));
    }

    #[test]
    fn invalid_entry_point_is_rejected() {
        let err = render_react_preview(COUNTER, "App); alert(1").unwrap_err();
        assert!(matches!(err, PreviewError::RenderFault(_)));
    }

    #[test]
    fn empty_and_placeholder_code_are_faults() {
        assert!(matches!(
            render_react_preview("  ", "App"),
            Err(PreviewError::RenderFault(_))
        ));
        assert!(matches!(
            render_react_preview(GENERATION_ERROR_PLACEHOLDER, "App"),
            Err(PreviewError::RenderFault(_))
        ));
    }

    #[test]
    fn script_close_in_code_cannot_break_out() {
        let code = "const App = () => <p>{'</script><script>alert(1)</script>'}</p>;";
        let document = render_react_preview(code, "App").unwrap();
        assert!(!document.html().contains("</script><script>alert(1)"));
    }
}
