//! Paths and settings shared by every build stage.

use std::path::{Path, PathBuf};

/// Locations inside an RxJS checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLayout {
    /// `<rxjs>/docs_app`.
    docs_app: PathBuf,
}

impl SourceLayout {
    /// Layout for the RxJS checkout at `rxjs_dir`.
    pub fn new(rxjs_dir: impl AsRef<Path>) -> Self {
        Self {
            docs_app: rxjs_dir.as_ref().join("docs_app"),
        }
    }

    /// The documentation application directory, where `npm` runs.
    pub fn docs_app(&self) -> &Path {
        &self.docs_app
    }

    /// The documentation build output, `docs_app/dist`.
    pub fn dist(&self) -> PathBuf {
        self.docs_app.join("dist")
    }

    /// Generated JSON root, `docs_app/dist/generated`.
    pub fn generated(&self) -> PathBuf {
        self.dist().join("generated")
    }

    /// Generated docs root, `docs_app/dist/generated/docs`.
    pub fn docs(&self) -> PathBuf {
        self.generated().join("docs")
    }

    /// `navigation.json`.
    pub fn navigation_json(&self) -> PathBuf {
        self.generated().join("navigation.json")
    }

    /// `api-list.json`.
    pub fn api_list_json(&self) -> PathBuf {
        self.docs().join("api").join(API_LIST_FILE)
    }

    /// Images shipped with the documentation app.
    pub fn images(&self) -> PathBuf {
        self.dist().join("assets").join("images")
    }
}

/// Name of the API list document inside `docs/api`.
pub const API_LIST_FILE: &str = "api-list.json";

/// Immutable state threaded through rendering, indexing and packaging.
///
/// Created once, after the stylesheet has been located, and never mutated.
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// Product name, used for the docset and archive names.
    pub product: String,
    /// Input layout.
    pub source: SourceLayout,
    /// Rendered site root.
    pub output: PathBuf,
    /// Directory holding page templates, `Info.plist`, icons and `docset.json`.
    pub templates: PathBuf,
    /// Static assets copied into the site.
    pub assets: PathBuf,
    /// Final docset folder.
    pub docset: PathBuf,
    /// Stylesheet path relative to the output root, when one was found.
    pub stylesheet: Option<String>,
    /// Navigation urls excluded from the search index.
    pub excluded_urls: Vec<String>,
}

impl BuildContext {
    /// Absolute path of a page id inside the output root.
    pub fn output_page(&self, id: &str) -> PathBuf {
        self.output.join(crate::index::page_path(id))
    }

    /// Stylesheet reference for templates; empty when none was found.
    pub fn style_href(&self) -> &str {
        self.stylesheet.as_deref().unwrap_or("")
    }
}

/// Docset folder name for `product`.
pub fn docset_dir_name(product: &str) -> String {
    format!("{product}.docset")
}

/// Archive file name for `product`.
pub fn archive_name(product: &str) -> String {
    format!("{product}.tgz")
}
