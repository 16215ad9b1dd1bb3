use std::path::{Path, PathBuf};

use tracing::info;

use crate::{
    context::{BuildContext, SourceLayout, docset_dir_name},
    error::{Result, RxdashError},
    index::{DEFAULT_EXCLUDED_URLS, IndexBuilder, OutputDir, SearchIndex},
    model::{ApiGroup, Navigation, read_json},
    package::{DocsetSpec, assemble_docset},
    site::{SiteStats, copy_stylesheet, prepare_output, render_site},
    toolchain::ensure_node_modules,
};

/// Default product name.
pub const DEFAULT_PRODUCT: &str = "RxJS";

/// Builds the static site and the docset from an RxJS checkout.
///
/// Every path not set explicitly is resolved against the working directory:
/// `output/`, `templates/`, `assets/` and `<product>.docset`.
#[derive(Debug, Clone)]
pub struct DocsetBuilder {
    /// RxJS checkout.
    rxjs_dir: PathBuf,
    /// Directory relative paths resolve against.
    work_dir: PathBuf,
    /// Product name.
    product: String,
    /// Rendered site root override.
    output: Option<PathBuf>,
    /// Templates directory override.
    templates: Option<PathBuf>,
    /// Static assets directory override.
    assets: Option<PathBuf>,
    /// Docset folder override.
    docset: Option<PathBuf>,
    /// Whether to run `npm install` when dependencies are missing.
    install_deps: bool,
    /// Navigation urls excluded from the index.
    excluded_urls: Vec<String>,
}

/// Summary of a completed build.
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Pages rendered.
    pub pages: SiteStats,
    /// The search index written into the docset.
    pub index: SearchIndex,
    /// The docset folder.
    pub docset: PathBuf,
}

impl DocsetBuilder {
    /// Builder for the checkout at `rxjs_dir`, resolving outputs against `work_dir`.
    pub fn new(rxjs_dir: impl Into<PathBuf>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            rxjs_dir: rxjs_dir.into(),
            work_dir: work_dir.into(),
            product: DEFAULT_PRODUCT.to_string(),
            output: None,
            templates: None,
            assets: None,
            docset: None,
            install_deps: false,
            excluded_urls: DEFAULT_EXCLUDED_URLS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Sets the product name used for the docset folder.
    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.product = product.into();
        self
    }

    /// Overrides the rendered site directory.
    pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
        self.output = output;
        self
    }

    /// Overrides the templates directory.
    pub fn with_templates(mut self, templates: Option<PathBuf>) -> Self {
        self.templates = templates;
        self
    }

    /// Overrides the static assets directory.
    pub fn with_assets(mut self, assets: Option<PathBuf>) -> Self {
        self.assets = assets;
        self
    }

    /// Overrides the docset folder.
    pub fn with_docset(mut self, docset: Option<PathBuf>) -> Self {
        self.docset = docset;
        self
    }

    /// Enables or disables `npm install` for missing dependencies.
    pub fn with_install_deps(mut self, install_deps: bool) -> Self {
        self.install_deps = install_deps;
        self
    }

    /// Replaces the navigation urls excluded from the index. An empty list keeps the defaults.
    pub fn with_excluded_urls(mut self, urls: Vec<String>) -> Self {
        if !urls.is_empty() {
            self.excluded_urls = urls;
        }
        self
    }

    /// Input layout.
    pub fn source(&self) -> SourceLayout {
        SourceLayout::new(&self.rxjs_dir)
    }

    /// Resolve `path` against the working directory, or fall back to `default` there.
    fn resolve(&self, path: Option<&Path>, default: &str) -> PathBuf {
        self.work_dir.join(path.unwrap_or_else(|| Path::new(default)))
    }

    /// Final docset folder.
    pub fn docset_path(&self) -> PathBuf {
        self.resolve(self.docset.as_deref(), &docset_dir_name(&self.product))
    }

    /// The immutable context for a build that found `stylesheet`.
    pub fn context(&self, stylesheet: Option<String>) -> BuildContext {
        BuildContext {
            product: self.product.clone(),
            source: self.source(),
            output: self.resolve(self.output.as_deref(), "output"),
            templates: self.resolve(self.templates.as_deref(), "templates"),
            assets: self.resolve(self.assets.as_deref(), "assets"),
            docset: self.docset_path(),
            stylesheet,
            excluded_urls: self.excluded_urls.clone(),
        }
    }

    /// Render the site, build the search index and assemble the docset.
    pub fn build(&self) -> Result<BuildReport> {
        let source = self.source();
        if self.install_deps {
            ensure_node_modules(source.docs_app())?;
        }
        if !source.generated().is_dir() {
            return Err(RxdashError::SourceNotFound(source.generated()));
        }

        // Resolve the stylesheet once so the context is final before rendering.
        let draft = self.context(None);
        prepare_output(&draft.output, &draft.assets, &source.images())?;
        let stylesheet = copy_stylesheet(&source.dist(), &draft.output)?;
        let ctx = self.context(stylesheet);

        info!(product = %ctx.product, output = %ctx.output.display(), "rendering site");
        let pages = render_site(&ctx)?;

        let index = build_index(&ctx)?;
        let layout = assemble_docset(
            &DocsetSpec {
                product: &ctx.product,
                output: &ctx.output,
                templates: &ctx.templates,
                dest: &ctx.docset,
            },
            &index,
        )?;

        info!(pages = pages.total(), entries = index.len(), "build complete");
        Ok(BuildReport {
            pages,
            index,
            docset: layout.root().to_path_buf(),
        })
    }
}

/// Index the rendered site described by `ctx`.
pub fn build_index(ctx: &BuildContext) -> Result<SearchIndex> {
    let nav_path = ctx.source.navigation_json();
    if !nav_path.is_file() {
        return Err(RxdashError::SourceNotFound(nav_path));
    }
    let api_path = ctx.source.api_list_json();
    if !api_path.is_file() {
        return Err(RxdashError::SourceNotFound(api_path));
    }
    let navigation: Navigation = read_json(&nav_path)?;
    let groups: Vec<ApiGroup> = read_json(&api_path)?;

    let rendered = OutputDir::new(&ctx.output);
    IndexBuilder::new(&rendered)
        .with_excluded(ctx.excluded_urls.iter().cloned())
        .build(&navigation.root(), &groups)
}
