//! HTML documents handed to the UI host.
//!
//! The graph page loads the remote calculator widget and drives it with a short
//! inline script; the error page is a static card.

use crate::config::{EscapeMode, WidgetConfig};
use crate::input::{GraphRequest, ViewportBounds};

pub const AUTOFIT_ID: &str = "autofit";
pub const AUTOFIT_REMOVE_DELAY_MS: u32 = 1000;

pub const ERROR_HEADING: &str = "Error Creating Graph";

/// Strips the first `y=` so `y=x^2` registers as `x^2`. Anything else passes through.
pub fn normalize_expression(function: &str) -> String {
    if function.contains("y=") {
        function.replacen("y=", "", 1)
    } else {
        function.to_string()
    }
}

pub fn graph_document(request: &GraphRequest, widget: &WidgetConfig, escape: EscapeMode) -> String {
    let title = html_text(&request.title, escape);
    let script_url = html_text(&widget.script_url(), escape);

    let mut script = String::new();
    script.push_str("    const elt = document.getElementById('calculator');\n");
    script.push_str("    const calculator = Desmos.GraphingCalculator(elt, {\n");
    script.push_str(&format!("      keypad: {},\n", request.show_keypad));
    script.push_str(&format!("      graphpaper: {},\n", request.show_grid));
    script.push_str(&format!("      expressions: {},\n", request.show_expressions));
    script.push_str("      settingsMenu: true,\n");
    script.push_str("      zoomButtons: true,\n");
    script.push_str("      expressionsTopbar: true,\n");
    script.push_str("      border: false,\n");
    script.push_str("      lockViewport: false\n");
    script.push_str("    });\n");

    if let Some(bounds) = &request.bounds {
        script.push_str(&format!("    {}\n", bounds_statement(bounds)));
    }

    for (index, function) in request.functions.iter().enumerate() {
        let latex = script_string(&normalize_expression(function), escape);
        script.push_str(&format!(
            "    calculator.setExpression({{ id: 'function{index}', latex: '{latex}' }});\n"
        ));
    }

    script.push_str(&format!(
        "    calculator.setExpression({{ id: '{AUTOFIT_ID}', latex: 'fit' }});\n"
    ));
    script.push_str(&format!(
        "    setTimeout(() => {{ calculator.removeExpression({{ id: '{AUTOFIT_ID}' }}); }}, {AUTOFIT_REMOVE_DELAY_MS});\n"
    ));

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
  <script src="{script_url}"></script>
  <style>
    html, body {{
      margin: 0;
      padding: 0;
      width: 100%;
      height: 100%;
      overflow: hidden;
    }}
    #calculator {{
      width: 100%;
      height: 100vh;
    }}
  </style>
</head>
<body>
  <div id="calculator"></div>
  <script>
{script}  </script>
</body>
</html>
"#
    )
}

pub fn error_document(message: &str, escape: EscapeMode) -> String {
    let message = html_text(message, escape);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>Error</title>
  <style>
    body {{
      margin: 0;
      padding: 20px;
      font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
      background: #f8f9fa;
    }}
    .error-card {{
      max-width: 560px;
      margin: 40px auto;
      padding: 24px;
      border: 1px solid #f5c2c7;
      border-radius: 8px;
      background: #f8d7da;
      color: #842029;
    }}
    .error-card h2 {{
      margin-top: 0;
    }}
  </style>
</head>
<body>
  <div class="error-card">
    <h2>{ERROR_HEADING}</h2>
    <p>{message}</p>
  </div>
</body>
</html>
"#
    )
}

fn bounds_statement(bounds: &ViewportBounds) -> String {
    format!(
        "calculator.setMathBounds({{ left: {}, right: {}, bottom: {}, top: {} }});",
        bounds.x_min, bounds.x_max, bounds.y_min, bounds.y_max
    )
}

fn html_text(text: &str, escape: EscapeMode) -> String {
    match escape {
        EscapeMode::Permissive => text.to_string(),
        EscapeMode::Strict => {
            let mut out = String::with_capacity(text.len());
            for ch in text.chars() {
                match ch {
                    '&' => out.push_str("&amp;"),
                    '<' => out.push_str("&lt;"),
                    '>' => out.push_str("&gt;"),
                    '"' => out.push_str("&quot;"),
                    '\'' => out.push_str("&#39;"),
                    _ => out.push(ch),
                }
            }
            out
        }
    }
}

/// Body of a single-quoted script string literal.
fn script_string(text: &str, escape: EscapeMode) -> String {
    match escape {
        EscapeMode::Permissive => text.to_string(),
        EscapeMode::Strict => {
            let mut out = String::with_capacity(text.len());
            for ch in text.chars() {
                match ch {
                    '\\' => out.push_str("\\\\"),
                    '\'' => out.push_str("\\'"),
                    '\n' => out.push_str("\\n"),
                    '\r' => out.push_str("\\r"),
                    // keeps `</script>` from closing the inline script
                    '<' => out.push_str("\\x3C"),
                    _ => out.push(ch),
                }
            }
            out
        }
    }
}
