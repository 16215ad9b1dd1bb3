//! Rewriting of links and headings in generated HTML.
//!
//! Upstream pages link to routes of the documentation app (`api/...`,
//! `guide/...`); inside the docset those routes are static `.html` files.

use once_cell::sync::Lazy;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::{Captures, Regex};

/// Characters left unescaped in section anchor names.
const ANCHOR_SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'_').remove(b'.').remove(b'-').remove(b'~');

/// `href="api/..."` or `href="/api/..."`, whole attribute.
static GUIDE_API_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"href="/?(api/[a-zA-Z0-9/-]*)""#).expect("valid regex"));
/// `href="guide/..."`, whole attribute.
static GUIDE_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"href="/?(guide/[a-zA-Z0-9/-]*)""#).expect("valid regex"));
/// `href="guide/...#fragment"`.
static GUIDE_FRAGMENT_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"href="/?(guide/[a-zA-Z0-9/-]*)(#[^"]*)""#).expect("valid regex"));
/// Relative links into class docs that have no counterpart in the docset.
static CLASS_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"href="(\.\./class[^"]*)""#).expect("valid regex"));
/// API links inside API pages; the closing quote is not required so fragments survive.
static API_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"href="(api/[a-zA-Z0-9/-]*)"#).expect("valid regex"));
/// Absolute image sources.
static ASSET_IMAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"img src="/assets/([^"]*)""#).expect("valid regex"));
/// `<h2>` and `<h3>` headings.
static SECTION_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<h[23]>(.*?)</h").expect("valid regex"));
/// First `<h1>`.
static PAGE_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"<h1>(.*?)</h1>").expect("valid regex"));

/// Rewrite links inside a guide page.
pub fn rewrite_guide_links(html: &str) -> String {
    let html = GUIDE_API_LINK.replace_all(html, r#"href="$1.html""#);
    let html = GUIDE_LINK.replace_all(&html, r#"href="$1.html""#);
    let html = GUIDE_FRAGMENT_LINK.replace_all(&html, r#"href="$1.html$2""#);
    CLASS_LINK
        .replace_all(&html, r#"href="javascript:;""#)
        .into_owned()
}

/// Rewrite links and image sources inside an API page.
pub fn rewrite_api_links(html: &str) -> String {
    let html = API_LINK.replace_all(html, r#"href="$1.html"#);
    let html = ASSET_IMAGE.replace_all(&html, r#"img src="assets/$1""#);
    html.replace(r#"<a href="/api">"#, r#"<a href="api/api-list.html">"#)
}

/// Rewrite API links in the rendered API list.
pub fn rewrite_api_list_links(html: &str) -> String {
    GUIDE_API_LINK
        .replace_all(html, r#"href="$1.html""#)
        .into_owned()
}

/// Insert a Dash section anchor before every `<h2>`/`<h3>` heading.
pub fn add_section_anchors(html: &str) -> String {
    SECTION_HEADING
        .replace_all(html, |caps: &Captures<'_>| {
            let title = caps[1].replace('/', " ");
            format!(
                r#"<a class="dashAnchor" name="//apple_ref/Section/{}"></a>{}"#,
                utf8_percent_encode(&title, ANCHOR_SAFE),
                &caps[0]
            )
        })
        .into_owned()
}

/// Text of the first `<h1>`, if any.
pub fn page_heading(html: &str) -> Option<&str> {
    PAGE_HEADING
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
