//! Publishing a built docset into a Dash-User-Contributions checkout.
//!
//! The destination holds `docset.json`, the current archive, the icons, and a
//! `versions/<version>/` folder per published minor line. A publish merges the
//! new version into the catalog, writes its archive, and removes version
//! folders the catalog no longer references.

use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::{
    builder::DEFAULT_PRODUCT,
    catalog::{CATALOG_FILE, Catalog, VersionEntry, merge_version, prune_versions},
    context::{SourceLayout, archive_name, docset_dir_name},
    error::{IoContext, Result, RxdashError},
    fileutils::StagedCopy,
    model::{Navigation, read_json},
    package::{copy_icons, create_archive},
    version::DocsetVersion,
};

/// Name of the per-version folder inside the destination.
pub const VERSIONS_DIR: &str = "versions";

/// Publishes a built docset.
#[derive(Debug, Clone)]
pub struct Publisher {
    /// RxJS checkout, read for the version number.
    rxjs_dir: PathBuf,
    /// Directory holding the built docset and templates.
    work_dir: PathBuf,
    /// Destination docset folder in the distribution repository.
    dest: PathBuf,
    /// Product name.
    product: String,
    /// Templates directory override.
    templates: Option<PathBuf>,
    /// Docset folder override.
    docset: Option<PathBuf>,
    /// Explicit version, bypassing navigation.json.
    version: Option<String>,
    /// Author name written into the catalog.
    author_name: Option<String>,
    /// Author link written into the catalog.
    author_link: Option<String>,
}

/// Summary of a completed publish.
#[derive(Debug, Clone)]
pub struct PublishReport {
    /// Published version.
    pub version: String,
    /// The catalog as written.
    pub catalog: Catalog,
    /// Whether the published version became current.
    pub current: bool,
    /// Version folders removed.
    pub pruned: BTreeSet<String>,
}

impl Publisher {
    /// Publisher reading from `rxjs_dir` and `work_dir`, writing to `dest`.
    pub fn new(
        rxjs_dir: impl Into<PathBuf>,
        work_dir: impl Into<PathBuf>,
        dest: impl Into<PathBuf>,
    ) -> Self {
        Self {
            rxjs_dir: rxjs_dir.into(),
            work_dir: work_dir.into(),
            dest: dest.into(),
            product: DEFAULT_PRODUCT.to_string(),
            templates: None,
            docset: None,
            version: None,
            author_name: None,
            author_link: None,
        }
    }

    /// Sets the product name.
    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.product = product.into();
        self
    }

    /// Overrides the templates directory.
    pub fn with_templates(mut self, templates: Option<PathBuf>) -> Self {
        self.templates = templates;
        self
    }

    /// Overrides the docset folder.
    pub fn with_docset(mut self, docset: Option<PathBuf>) -> Self {
        self.docset = docset;
        self
    }

    /// Publishes under an explicit version instead of the one in navigation.json.
    pub fn with_version(mut self, version: Option<String>) -> Self {
        self.version = version;
        self
    }

    /// Sets the catalog author.
    pub fn with_author(mut self, name: Option<String>, link: Option<String>) -> Self {
        self.author_name = name;
        self.author_link = link;
        self
    }

    /// Version being published.
    pub fn read_version(&self) -> Result<String> {
        if let Some(version) = &self.version {
            return Ok(version.clone());
        }
        let nav_path = SourceLayout::new(&self.rxjs_dir).navigation_json();
        if !nav_path.is_file() {
            return Err(RxdashError::SourceNotFound(nav_path));
        }
        let navigation: Navigation = read_json(&nav_path)?;
        Ok(navigation.version_info.raw)
    }

    /// Templates directory.
    fn templates(&self) -> PathBuf {
        self.work_dir
            .join(self.templates.as_deref().unwrap_or_else(|| Path::new("templates")))
    }

    /// Built docset folder.
    fn docset(&self) -> PathBuf {
        match &self.docset {
            Some(path) => self.work_dir.join(path),
            None => self.work_dir.join(docset_dir_name(&self.product)),
        }
    }

    /// Merge, archive, write the catalog and prune old versions.
    pub fn publish(&self) -> Result<PublishReport> {
        let version = self.read_version()?;
        DocsetVersion::parse(&version)?;

        let docset = self.docset();
        if !docset.is_dir() {
            return Err(RxdashError::DocsetNotFound(docset));
        }
        if !self.dest.is_dir() {
            return Err(RxdashError::DestinationNotFound(self.dest.clone()));
        }

        let templates = self.templates();
        let mut catalog =
            Catalog::load_or_template(&self.dest.join(CATALOG_FILE), &templates.join(CATALOG_FILE))?;
        catalog.name = self.product.clone();
        if let Some(name) = &self.author_name {
            catalog.author.name = name.clone();
        }
        if let Some(link) = &self.author_link {
            catalog.author.link = link.clone();
        }
        let catalog = merge_version(catalog, VersionEntry::for_product(&self.product, &version))?;
        let current = catalog.is_current(&version);

        let archive = self.work_dir.join(archive_name(&self.product));
        create_archive(&docset, &archive)?;

        // Archives are staged beside their destinations and only moved into
        // place once the catalog that references them has been written.
        let version_root = self.dest.join(VERSIONS_DIR).join(&version);
        let created = !version_root.is_dir();
        fs::create_dir_all(&version_root).at(&version_root)?;
        let placed = self.stage_archives(&archive, &version_root, current).and_then(|staged| {
            catalog.save(&self.dest.join(CATALOG_FILE))?;
            Ok(staged)
        });
        let staged = match placed {
            Ok(staged) => staged,
            Err(e) => {
                if created {
                    fs::remove_dir_all(&version_root).ok();
                }
                return Err(e);
            }
        };
        if !current {
            info!(version = %version, current = %catalog.version, "published version is not current");
        }
        for copy in staged {
            debug!(path = %copy.dest().display(), "archive placed");
            copy.commit()?;
        }
        copy_icons(&templates, &self.dest)?;
        let pruned = self.clean_versions(&catalog)?;

        info!(product = %self.product, version = %version, dest = %self.dest.display(), "publish done");
        Ok(PublishReport {
            version,
            catalog,
            current,
            pruned,
        })
    }

    /// Copy the archive beside its destinations without placing it yet.
    fn stage_archives(&self, archive: &Path, version_root: &Path, current: bool) -> Result<Vec<StagedCopy>> {
        let name = archive_name(&self.product);
        let mut staged = vec![StagedCopy::new(archive, &version_root.join(&name))?];
        if current {
            staged.push(StagedCopy::new(archive, &self.dest.join(&name))?);
        }
        Ok(staged)
    }

    /// Remove version folders the catalog does not reference.
    fn clean_versions(&self, catalog: &Catalog) -> Result<BTreeSet<String>> {
        let on_disk = version_dirs(&self.dest.join(VERSIONS_DIR))?;
        let doomed = prune_versions(catalog, &on_disk);
        for name in &doomed {
            let path = self.dest.join(VERSIONS_DIR).join(name);
            info!(version = %name, "deleting unneeded version");
            fs::remove_dir_all(&path).at(&path)?;
        }
        Ok(doomed)
    }
}

/// Names of the directories directly inside `versions`.
pub fn version_dirs(versions: &Path) -> Result<BTreeSet<String>> {
    if !versions.is_dir() {
        return Ok(BTreeSet::new());
    }
    let mut names = BTreeSet::new();
    for entry in fs::read_dir(versions).at(versions)? {
        let entry = entry.at(versions)?;
        if entry.file_type().at(entry.path())?.is_dir() {
            names.insert(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(names)
}
