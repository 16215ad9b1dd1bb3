//! Page template with `${name}` placeholders.

use std::{fs, path::Path};

use tracing::debug;

use crate::error::{IoContext, Result};

/// File name looked up in the templates directory.
pub const PAGE_TEMPLATE_FILE: &str = "page.html";

/// Template used when the templates directory does not provide one.
const DEFAULT_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>${title}</title>
<base href="${base_url}">
<link rel="stylesheet" href="${style}">
</head>
<body class="docset">
<main class="docs-content">
${content}
</main>
</body>
</html>
"#;

/// Values substituted into a page.
#[derive(Debug, Clone, Copy)]
pub struct PageVars<'a> {
    /// Page title, HTML-escaped on substitution.
    pub title: &'a str,
    /// Page body, inserted verbatim.
    pub content: &'a str,
    /// Relative prefix back to the output root.
    pub base_url: &'a str,
    /// Stylesheet href.
    pub style: &'a str,
}

/// A loaded page template.
#[derive(Debug, Clone)]
pub struct PageTemplate {
    /// Raw template text.
    source: String,
}

impl Default for PageTemplate {
    fn default() -> Self {
        Self {
            source: DEFAULT_PAGE.to_string(),
        }
    }
}

impl PageTemplate {
    /// Wrap template text.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Load `page.html` from `dir`, or the built-in template when absent.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(PAGE_TEMPLATE_FILE);
        if path.is_file() {
            debug!(path = %path.display(), "using page template");
            Ok(Self::new(fs::read_to_string(&path).at(&path)?))
        } else {
            debug!("using built-in page template");
            Ok(Self::default())
        }
    }

    /// Render a page.
    ///
    /// `${content}` is substituted last so that body text which happens to
    /// contain a placeholder is left alone.
    pub fn render(&self, vars: &PageVars<'_>) -> String {
        self.source
            .replace("${title}", &html_escape(vars.title))
            .replace("${base_url}", vars.base_url)
            .replace("${style}", vars.style)
            .replace("${content}", vars.content)
    }
}

/// Relative prefix from a page id back to the output root.
pub fn base_url(id: &str) -> String {
    let depth = id.matches('/').count();
    if depth == 0 {
        "./".to_string()
    } else {
        "../".repeat(depth)
    }
}

/// Escape text for inclusion in HTML.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
