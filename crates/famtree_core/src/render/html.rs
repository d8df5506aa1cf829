//! Standalone HTML page renderer.
//!
//! Embeds the description in `<pre class="mermaid">` and boots the
//! browser-side flowchart library with the family-tree theme. A restored
//! viewport transform, when given, is applied to the canvas up front.

use crate::render::{DiagramRenderer, RenderError};
use serde_json::json;

const DEFAULT_MAX_DESCRIPTION_BYTES: usize = 512 * 1024;
const DEFAULT_SCRIPT_URL: &str =
    "https://cdn.jsdelivr.net/npm/mermaid@10/dist/mermaid.esm.min.mjs";

/// Rendered HTML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlPage {
    pub html: String,
}

/// Produces a self-contained page that draws the family tree.
#[derive(Debug, Clone)]
pub struct HtmlPageRenderer {
    pub title: String,
    pub script_url: String,
    pub max_description_bytes: usize,
    /// CSS transform of the canvas, e.g. from `ViewportController::transform`.
    pub canvas_transform: Option<String>,
}

impl Default for HtmlPageRenderer {
    fn default() -> Self {
        Self {
            title: "Family Tree".to_string(),
            script_url: DEFAULT_SCRIPT_URL.to_string(),
            max_description_bytes: DEFAULT_MAX_DESCRIPTION_BYTES,
            canvas_transform: None,
        }
    }
}

impl HtmlPageRenderer {
    pub fn with_canvas_transform(mut self, transform: impl Into<String>) -> Self {
        self.canvas_transform = Some(transform.into());
        self
    }

    /// Client-side initialization options for the flowchart library.
    pub fn init_options() -> serde_json::Value {
        json!({
            "startOnLoad": false,
            "securityLevel": "loose",
            "theme": "base",
            "flowchart": {
                "nodeSpacing": 60,
                "rankSpacing": 100
            },
            "themeVariables": {
                "primaryColor": "#ffffff",
                "primaryBorderColor": "#b91c1c",
                "primaryTextColor": "#000",
                "lineColor": "#555"
            }
        })
    }

    fn canvas_style(&self) -> String {
        match self.canvas_transform.as_deref().map(str::trim) {
            Some(transform) if !transform.is_empty() => {
                format!(" style=\"transform: {}\"", escape_html(transform))
            }
            _ => String::new(),
        }
    }
}

impl DiagramRenderer for HtmlPageRenderer {
    type Surface = HtmlPage;

    fn render(&self, description: &str) -> Result<HtmlPage, RenderError> {
        let trimmed = description.trim();
        if trimmed.is_empty() {
            return Err(RenderError::Empty);
        }
        if description.len() > self.max_description_bytes {
            return Err(RenderError::TooLarge {
                bytes: description.len(),
                limit: self.max_description_bytes,
            });
        }
        if !trimmed.starts_with("flowchart ") {
            return Err(RenderError::InvalidDescription(
                "missing `flowchart` directive".to_string(),
            ));
        }

        let html = format!(
            r##"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ background: #f4f1ea; font-family: Georgia, serif; margin: 0; padding: 20px; }}
#viewport {{ position: relative; height: 85vh; overflow: hidden; background: #fff; border: 1px solid #ddd; border-radius: 10px; }}
#canvas {{ position: absolute; top: 50%; left: 50%; transform-origin: 0 0; }}
</style>
</head>
<body>
<div id="viewport"><div id="canvas"{canvas_style}>
<pre class="mermaid">
{description}</pre>
</div></div>
<script type="module">
import mermaid from "{script_url}";
mermaid.initialize({options});
await mermaid.run({{ nodes: document.querySelectorAll(".mermaid") }});
</script>
</body>
</html>
"##,
            title = escape_html(&self.title),
            canvas_style = self.canvas_style(),
            description = escape_html(description),
            script_url = escape_html(&self.script_url),
            options = Self::init_options(),
        );

        Ok(HtmlPage { html })
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::HtmlPageRenderer;
    use crate::render::{DiagramRenderer, RenderError};

    #[test]
    fn page_embeds_escaped_description_and_theme() {
        let page = HtmlPageRenderer::default()
            .render("flowchart TD\nN_1(\"A<br/>\"):::person\n")
            .expect("valid description renders");
        assert!(page.html.contains("N_1(&quot;A&lt;br/&gt;&quot;):::person"));
        assert!(page.html.contains("\"rankSpacing\":100"));
        assert!(!page.html.contains("A<br/>"));
        assert!(page.html.contains("<div id=\"canvas\">"));
    }

    #[test]
    fn canvas_carries_the_restored_transform() {
        let page = HtmlPageRenderer::default()
            .with_canvas_transform("translate(10px, -4px) scale(1.5)")
            .render("flowchart TD\n")
            .expect("valid description renders");
        assert!(page
            .html
            .contains("<div id=\"canvas\" style=\"transform: translate(10px, -4px) scale(1.5)\">"));
    }

    #[test]
    fn rejects_empty_oversized_and_foreign_descriptions() {
        let renderer = HtmlPageRenderer {
            max_description_bytes: 32,
            ..HtmlPageRenderer::default()
        };
        assert_eq!(renderer.render("  \n"), Err(RenderError::Empty));
        assert!(matches!(
            renderer.render(&format!("flowchart TD\n{}", "x".repeat(64))),
            Err(RenderError::TooLarge { limit: 32, .. })
        ));
        assert!(matches!(
            renderer.render("graph TD"),
            Err(RenderError::InvalidDescription(_))
        ));
    }
}
