//! Rendering of generated content documents into static pages.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use super::{
    links::{
        add_section_anchors, page_heading, rewrite_api_links, rewrite_api_list_links,
        rewrite_guide_links,
    },
    template::{PageTemplate, PageVars, base_url, html_escape},
};
use crate::{
    context::{API_LIST_FILE, BuildContext},
    error::{IoContext, Result, RxdashError},
    model::{ApiGroup, ContentDoc, read_json},
};

/// Page id of the API list.
pub const API_LIST_ID: &str = "api/api-list";

/// Standalone documents rendered outside the guide tree: (file stem, page id, title).
const MISC_PAGES: &[(&str, &str, &str)] = &[
    ("code-of-conduct", "code-of-conduct", "Code of Conduct"),
    ("external-resources", "resources", "External Resources"),
];

/// Writes pages into the output root.
#[derive(Debug)]
pub struct PageWriter<'a> {
    /// Build context.
    ctx: &'a BuildContext,
    /// Page template.
    template: PageTemplate,
}

impl<'a> PageWriter<'a> {
    /// Create a writer using the context's templates directory.
    pub fn new(ctx: &'a BuildContext) -> Result<Self> {
        Ok(Self {
            ctx,
            template: PageTemplate::load(&ctx.templates)?,
        })
    }

    /// Render `content` into the page `id`.
    pub fn write(&self, id: &str, title: &str, content: &str) -> Result<PathBuf> {
        let path = self.ctx.output_page(id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).at(parent)?;
        }
        let base = base_url(id);
        let page = self.template.render(&PageVars {
            title,
            content,
            base_url: &base,
            style: self.ctx.style_href(),
        });
        fs::write(&path, page).at(&path)?;
        debug!(id, "page written");
        Ok(path)
    }

    /// Render every guide document. Returns the number of pages written.
    pub fn render_guides(&self) -> Result<usize> {
        let mut count = 0;
        for path in json_files(&self.ctx.source.docs().join("guide"))? {
            let doc: ContentDoc = read_json(&path)?;
            check_id(&doc, &path)?;
            let content = add_section_anchors(&rewrite_guide_links(&doc.contents));
            let title = page_heading(&doc.contents)
                .map(str::to_string)
                .unwrap_or_else(|| last_segment(&doc.id).to_string());
            self.write(&doc.id, &title, &content)?;
            count += 1;
        }
        info!(pages = count, "guides rendered");
        Ok(count)
    }

    /// Render every API document and the API list page.
    pub fn render_api(&self) -> Result<usize> {
        let mut count = 0;
        for path in json_files(&self.ctx.source.docs().join("api"))? {
            if path.file_name().is_some_and(|name| name == API_LIST_FILE) {
                let groups: Vec<ApiGroup> = read_json(&path)?;
                self.render_api_list(&groups)?;
                count += 1;
                continue;
            }
            let doc: ContentDoc = read_json(&path)?;
            check_id(&doc, &path)?;
            let title = doc
                .title
                .clone()
                .unwrap_or_else(|| last_segment(&doc.id).to_string());
            self.write(&doc.id, &title, &rewrite_api_links(&doc.contents))?;
            count += 1;
        }
        info!(pages = count, "API pages rendered");
        Ok(count)
    }

    /// Render the grouped API list page.
    pub fn render_api_list(&self, groups: &[ApiGroup]) -> Result<PathBuf> {
        let content = rewrite_api_list_links(&api_list_html(groups));
        self.write(API_LIST_ID, "API List", &content)
    }

    /// Render the optional standalone documents.
    pub fn render_misc(&self) -> Result<usize> {
        let mut count = 0;
        for (stem, id, title) in MISC_PAGES {
            let path = self.ctx.source.docs().join(format!("{stem}.json"));
            if !path.is_file() {
                debug!(path = %path.display(), "optional page not generated");
                continue;
            }
            let doc: ContentDoc = read_json(&path)?;
            self.write(id, title, &add_section_anchors(&doc.contents))?;
            count += 1;
        }
        Ok(count)
    }
}

/// Body of the API list page.
pub fn api_list_html(groups: &[ApiGroup]) -> String {
    let mut out = String::from(
        "<h1 class=\"no-toc\">API List</h1>\n<article class=\"api-list-container l-content-small docs-content\"><div>",
    );
    for group in groups {
        out.push_str(&format!(
            "\n<h2>{}</h2>\n<ul class=\"api-list\">",
            html_escape(&group.title)
        ));
        for item in &group.items {
            out.push_str(&format!(
                "\n  <li class=\"api-item\"><span class=\"symbol {}\"></span><a href=\"{}\">{}</a></li>",
                html_escape(&item.doc_type),
                html_escape(&item.path),
                html_escape(&item.title)
            ));
        }
        out.push_str("\n</ul>");
    }
    out.push_str("\n</div></article>");
    out
}

/// Sorted `*.json` files beneath `dir`; empty when `dir` does not exist.
fn json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        debug!(path = %dir.display(), "no documents");
        return Ok(Vec::new());
    }
    let pattern = format!("{}/**/*.json", glob::Pattern::escape(&dir.to_string_lossy()));
    let mut files: Vec<PathBuf> = glob::glob(&pattern)?.filter_map(|entry| entry.ok()).collect();
    files.sort();
    Ok(files)
}

/// Reject documents whose id would escape the output root.
fn check_id(doc: &ContentDoc, path: &Path) -> Result<()> {
    if doc.id.is_empty() || doc.id.starts_with('/') || doc.id.split('/').any(|seg| seg == "..") {
        return Err(RxdashError::InvalidDocument {
            path: path.to_path_buf(),
            message: format!("unusable page id '{}'", doc.id),
        });
    }
    Ok(())
}

/// Final `/`-separated segment of a page id.
fn last_segment(id: &str) -> &str {
    id.rsplit('/').next().unwrap_or(id)
}
