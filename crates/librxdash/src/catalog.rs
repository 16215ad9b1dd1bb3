//! The multi-version `docset.json` catalog kept in the distribution repository.
//!
//! The catalog lists every published version of the docset, one per
//! minor-version line, newest first, and names the current version. Merging
//! and pruning are pure; loading and saving are the only disk effects.

use std::{
    collections::{BTreeSet, HashSet},
    fs,
    io::Write,
    path::Path,
};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, ser::PrettyFormatter};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::{
    error::{IoContext, Result, RxdashError},
    fileutils::{parent_dir, persist},
    version::DocsetVersion,
};

/// File name of the catalog inside the destination directory.
pub const CATALOG_FILE: &str = "docset.json";

/// Docset author block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Author {
    /// Author display name.
    #[serde(default)]
    pub name: String,
    /// Author homepage.
    #[serde(default)]
    pub link: String,
    /// Fields this tool does not manage.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single published version and the archive that holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionEntry {
    /// Dotted numeric version.
    pub version: String,
    /// Archive path relative to the catalog, e.g. `versions/7.8.1/RxJS.tgz`.
    pub archive: String,
}

impl VersionEntry {
    /// Entry for `version` whose archive lives at `versions/<version>/<product>.tgz`.
    pub fn for_product(product: &str, version: &str) -> Self {
        Self {
            version: version.to_string(),
            archive: format!("versions/{version}/{product}.tgz"),
        }
    }
}

/// The persisted catalog record.
///
/// Equality ignores [`Catalog::layout`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Docset name.
    #[serde(default)]
    pub name: String,
    /// Author block.
    #[serde(default)]
    pub author: Author,
    /// Current version. Empty when nothing has been published yet.
    #[serde(default)]
    pub version: String,
    /// Published versions, newest first.
    #[serde(default)]
    pub specific_versions: Vec<VersionEntry>,
    /// Fields this tool does not manage (aliases, archive, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// The document this catalog was loaded from. Saving writes keys in the
    /// same order; `None` writes them in declaration order.
    #[serde(skip)]
    pub layout: Option<Value>,
}

impl PartialEq for Catalog {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.author == other.author
            && self.version == other.version
            && self.specific_versions == other.specific_versions
            && self.extra == other.extra
    }
}

impl Catalog {
    /// Load the catalog from `dest`, falling back to `template` for a first publish.
    pub fn load_or_template(dest: &Path, template: &Path) -> Result<Self> {
        if dest.is_file() {
            debug!(path = %dest.display(), "loading catalog");
            return Self::load(dest);
        }
        if template.is_file() {
            info!(path = %template.display(), "no catalog at destination, using template");
            return Self::load(template);
        }
        Err(RxdashError::MissingCatalog {
            dest: dest.to_path_buf(),
            template: template.to_path_buf(),
        })
    }

    /// Load a catalog file, remembering its key order.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).at(path)?;
        let document: Value = serde_json::from_str(&raw)?;
        let mut catalog: Self = serde_json::from_value(document.clone())?;
        catalog.layout = Some(document);
        Ok(catalog)
    }

    /// Serialize with four-space indentation, in the loaded file's key order.
    pub fn to_json(&self) -> Result<String> {
        let mut value = serde_json::to_value(self)?;
        if let Some(layout) = &self.layout {
            value = order_like(value, layout);
        }
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        value.serialize(&mut ser)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Write the catalog to `path`, replacing any existing file atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        let dir = parent_dir(path);
        let json = self.to_json()?;
        let mut tmp = NamedTempFile::new_in(&dir).at(&dir)?;
        tmp.write_all(json.as_bytes()).at(tmp.path())?;
        persist(tmp, path)?;
        info!(path = %path.display(), version = %self.version, "catalog written");
        Ok(())
    }

    /// Version strings referenced by `specific_versions`.
    pub fn referenced_versions(&self) -> HashSet<&str> {
        self.specific_versions
            .iter()
            .map(|entry| entry.version.as_str())
            .collect()
    }

    /// Whether `version` is the catalog's current version.
    pub fn is_current(&self, version: &str) -> bool {
        self.version == version
    }
}

/// Reorder the objects in `value` to follow the key order of `layout`.
///
/// Keys missing from `layout` follow in their existing order. Array elements
/// are ordered like the first element of the matching `layout` array.
fn order_like(value: Value, layout: &Value) -> Value {
    match (value, layout) {
        (Value::Object(map), Value::Object(shape)) => {
            let mut rest: Vec<(String, Value)> = map.into_iter().collect();
            let mut ordered = Map::with_capacity(rest.len());
            for (key, sub) in shape {
                if let Some(pos) = rest.iter().position(|(k, _)| k == key) {
                    let (key, v) = rest.remove(pos);
                    ordered.insert(key, order_like(v, sub));
                }
            }
            ordered.extend(rest);
            Value::Object(ordered)
        }
        (Value::Array(items), Value::Array(shape)) => match shape.first() {
            Some(first) => Value::Array(items.into_iter().map(|v| order_like(v, first)).collect()),
            None => Value::Array(items),
        },
        (value, _) => value,
    }
}

/// Merge `entry` into `catalog`.
///
/// Every existing entry on the same minor-version line is dropped, the new
/// entry is appended, the list is sorted newest first, and the current version
/// moves to the head unless the head is older than the previous current
/// version.
///
/// A catalog without entries has no current version yet, whatever its
/// `version` field says. An entry older than the one already published on its
/// minor line is rejected with `StaleVersion`.
pub fn merge_version(mut catalog: Catalog, entry: VersionEntry) -> Result<Catalog> {
    let incoming = DocsetVersion::parse(&entry.version)?;
    let line = incoming.minor_line().to_string();
    let first_publish = catalog.specific_versions.is_empty();

    let mut parsed = Vec::with_capacity(catalog.specific_versions.len() + 1);
    for existing in catalog.specific_versions.drain(..) {
        let version = DocsetVersion::parse(&existing.version)?;
        if version.minor_line() == line {
            if version > incoming {
                return Err(RxdashError::StaleVersion {
                    version: entry.version,
                    published: existing.version,
                });
            }
            debug!(replaced = %existing.version, by = %entry.version, "dropping entry on same minor line");
            continue;
        }
        parsed.push((version, existing));
    }
    parsed.push((incoming, entry));
    parsed.sort_by(|a, b| b.0.cmp(&a.0));

    let previous = if first_publish || catalog.version.is_empty() {
        None
    } else {
        Some(DocsetVersion::parse(&catalog.version)?)
    };
    // parsed always holds at least the incoming entry
    let head = &parsed[0].0;
    let current = match previous {
        Some(prev) if prev > *head => prev,
        _ => head.clone(),
    };
    catalog.version = current.as_str().to_string();
    catalog.specific_versions = parsed.into_iter().map(|(_, entry)| entry).collect();
    Ok(catalog)
}

/// Version directory names on disk that the catalog no longer references.
pub fn prune_versions<I, S>(catalog: &Catalog, on_disk: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let referenced = catalog.referenced_versions();
    on_disk
        .into_iter()
        .filter(|name| !referenced.contains(name.as_ref()))
        .map(|name| name.as_ref().to_string())
        .collect()
}
