use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or publishing a docset.
#[derive(Error, Debug)]
pub enum RxdashError {
    /// An API list item carried a `docType` outside the known set.
    #[error("Unknown docType '{doc_type}' for API item '{title}'")]
    UnknownDocType {
        /// Title of the offending item.
        title: String,
        /// The raw `docType` value.
        doc_type: String,
    },

    /// The same (name, type, path) triple was produced twice.
    #[error("Duplicate search index entry: name='{name}' type='{kind}' path='{path}'")]
    DuplicateIndexEntry {
        /// Entry name.
        name: String,
        /// Entry type label.
        kind: String,
        /// Entry path.
        path: String,
    },

    /// No catalog exists at the destination and no template was found.
    #[error("No docset.json at {dest} and no template at {template}")]
    MissingCatalog {
        /// Catalog path in the destination repository.
        dest: PathBuf,
        /// Fallback template path.
        template: PathBuf,
    },

    /// A newer version on the same minor line is already published.
    #[error("Version {version} is older than {published}, already published on its minor line")]
    StaleVersion {
        /// Version being published.
        version: String,
        /// Version already in the catalog.
        published: String,
    },

    /// A version string is not dot-separated unsigned integers.
    #[error("Malformed version string: '{0}'")]
    MalformedVersion(String),

    /// The docset has not been built yet.
    #[error("Docset does not exist at {0}, please build first")]
    DocsetNotFound(PathBuf),

    /// The publish destination is missing.
    #[error("Destination folder does not exist: {0}")]
    DestinationNotFound(PathBuf),

    /// A required generated input is missing.
    #[error("Generated documentation not found: {0}")]
    SourceNotFound(PathBuf),

    /// A generated JSON document lacks a field the renderer needs.
    #[error("Invalid document {path}: {message}")]
    InvalidDocument {
        /// Document path.
        path: PathBuf,
        /// What was wrong with it.
        message: String,
    },

    /// External tool failure (npm).
    #[error("Toolchain error: {0}")]
    Toolchain(String),

    /// Failed to read or write a file.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse or serialize JSON.
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// SQLite failure while writing the search index.
    #[error("Search index error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to expand a glob pattern.
    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// Failed to walk a directory tree.
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    /// Failed to move a temporary file into place.
    #[error("Failed to persist {0}")]
    Persist(#[from] tempfile::PersistError),
}

impl RxdashError {
    /// Wrap an I/O error together with the path that caused it.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RxdashError>;

/// Attach a path to I/O results.
pub trait IoContext<T> {
    /// Map an I/O error into [`RxdashError::Io`] carrying `path`.
    fn at(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn at(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| RxdashError::io(path, e))
    }
}
