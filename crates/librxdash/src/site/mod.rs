//! Static site rendering from generated documentation JSON.

mod assets;
mod links;
mod pages;
mod template;

pub use assets::{copy_dir, copy_stylesheet, prepare_output};
pub use links::{
    add_section_anchors, page_heading, rewrite_api_links, rewrite_api_list_links,
    rewrite_guide_links,
};
pub use pages::{API_LIST_ID, PageWriter, api_list_html};
pub use template::{PAGE_TEMPLATE_FILE, PageTemplate, PageVars, base_url, html_escape};

use crate::{context::BuildContext, error::Result};

/// Page counts from a site render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SiteStats {
    /// Guide pages written.
    pub guides: usize,
    /// API pages written, including the API list.
    pub api: usize,
    /// Standalone pages written.
    pub misc: usize,
}

impl SiteStats {
    /// Total pages written.
    pub fn total(&self) -> usize {
        self.guides + self.api + self.misc
    }
}

/// Render every page into `ctx.output`.
///
/// The output directory must already be prepared (see [`prepare_output`]).
pub fn render_site(ctx: &BuildContext) -> Result<SiteStats> {
    let writer = PageWriter::new(ctx)?;
    Ok(SiteStats {
        guides: writer.render_guides()?,
        api: writer.render_api()?,
        misc: writer.render_misc()?,
    })
}
