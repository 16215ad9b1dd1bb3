//! Rxdash turns the RxJS documentation build into a Dash docset.
//!
//! The documentation app emits JSON for every guide and API page plus a
//! navigation tree and a grouped API list. Rxdash renders those into a static
//! site, indexes the rendered pages in a `docSet.dsidx` SQLite database,
//! packages the result as `<Product>.docset`, and publishes versioned archives
//! into a Dash-User-Contributions checkout while keeping its `docset.json`
//! catalog consistent.

/// Build pipeline driver.
mod builder;
/// The multi-version `docset.json` catalog.
mod catalog;
/// Shared build paths and settings.
mod context;
/// SQLite search index file.
mod dsidx;
/// Error types.
mod error;
/// Atomic file placement.
mod fileutils;
/// Search index rows and their construction.
mod index;
/// Input document shapes.
mod model;
/// Docset layout and archives.
mod package;
/// Publishing into the distribution repository.
mod publish;
/// Static site rendering.
pub mod site;
/// External tools.
mod toolchain;
/// Version strings.
mod version;

pub use crate::{
    builder::{BuildReport, DEFAULT_PRODUCT, DocsetBuilder, build_index},
    catalog::{Author, CATALOG_FILE, Catalog, VersionEntry, merge_version, prune_versions},
    context::{API_LIST_FILE, BuildContext, SourceLayout, archive_name, docset_dir_name},
    dsidx::{DSIDX_FILE, read_dsidx, write_dsidx},
    error::{Result, RxdashError},
    index::{
        DEFAULT_EXCLUDED_URLS, EntryKind, IndexBuilder, IndexRow, OutputDir, PAGE_EXTENSION,
        RenderedPages, SearchIndex, page_path, rewrite_alias,
    },
    model::{ApiGroup, ApiItem, ContentDoc, Navigation, NavigationNode, VersionInfo, read_json},
    package::{DocsetLayout, DocsetSpec, ICON_FILES, assemble_docset, create_archive, info_plist},
    publish::{PublishReport, Publisher, VERSIONS_DIR, version_dirs},
    toolchain::{ensure_node_modules, find_npm},
    version::{DocsetVersion, minor_line},
};
