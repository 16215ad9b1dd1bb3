//! Docset folder layout and archive creation.

use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

use flate2::{Compression, write::GzEncoder};
use tar::Builder as TarBuilder;
use tempfile::Builder as TempBuilder;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::{
    dsidx::{DSIDX_FILE, write_dsidx},
    error::{IoContext, Result, RxdashError},
    index::SearchIndex,
    site::copy_dir,
};

/// Icons copied from the templates directory to the docset root.
pub const ICON_FILES: &[&str] = &["icon.png", "icon@2x.png"];

/// Property list file name.
pub const INFO_PLIST: &str = "Info.plist";

/// Files never packed into an archive.
const ARCHIVE_IGNORED: &[&str] = &[".DS_Store"];

/// Paths inside a docset folder.
#[derive(Debug, Clone)]
pub struct DocsetLayout {
    /// The `<Product>.docset` folder.
    root: PathBuf,
}

impl DocsetLayout {
    /// Layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Docset root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `Contents/`.
    pub fn contents(&self) -> PathBuf {
        self.root.join("Contents")
    }

    /// `Contents/Resources/`.
    pub fn resources(&self) -> PathBuf {
        self.contents().join("Resources")
    }

    /// `Contents/Resources/Documents/`.
    pub fn documents(&self) -> PathBuf {
        self.resources().join("Documents")
    }

    /// `Contents/Resources/docSet.dsidx`.
    pub fn index(&self) -> PathBuf {
        self.resources().join(DSIDX_FILE)
    }

    /// `Contents/Info.plist`.
    pub fn info_plist(&self) -> PathBuf {
        self.contents().join(INFO_PLIST)
    }
}

/// Inputs for assembling a docset.
#[derive(Debug, Clone, Copy)]
pub struct DocsetSpec<'a> {
    /// Product name.
    pub product: &'a str,
    /// Rendered site root.
    pub output: &'a Path,
    /// Templates directory (Info.plist, icons).
    pub templates: &'a Path,
    /// Final docset folder.
    pub dest: &'a Path,
}

/// Assemble a docset at `spec.dest`.
///
/// Everything is written into a staging folder beside the destination; the
/// previous docset is only replaced once the new one is complete.
pub fn assemble_docset(spec: &DocsetSpec<'_>, index: &SearchIndex) -> Result<DocsetLayout> {
    let parent = match spec.dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).at(&parent)?;
    let staging = TempBuilder::new()
        .prefix(".docset-build")
        .tempdir_in(&parent)
        .at(&parent)?;
    let name = spec
        .dest
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "docset".into());
    let staged = DocsetLayout::new(staging.path().join(&name));

    let files = copy_dir(spec.output, &staged.documents())?;
    debug!(files, "documents staged");
    write_dsidx(&staged.index(), index)?;
    write_info_plist(spec.product, spec.templates, &staged.info_plist())?;
    copy_icons(spec.templates, staged.root())?;

    if spec.dest.exists() {
        debug!(path = %spec.dest.display(), "replacing previous docset");
        fs::remove_dir_all(spec.dest).at(spec.dest)?;
    }
    fs::rename(staged.root(), spec.dest).at(spec.dest)?;
    info!(path = %spec.dest.display(), rows = index.len(), "docset assembled");
    Ok(DocsetLayout::new(spec.dest))
}

/// Copy `Info.plist` from templates, or generate one.
fn write_info_plist(product: &str, templates: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).at(parent)?;
    }
    let template = templates.join(INFO_PLIST);
    if template.is_file() {
        fs::copy(&template, dest).at(&template)?;
    } else {
        warn!(path = %template.display(), "no Info.plist template, generating one");
        fs::write(dest, info_plist(product)).at(dest)?;
    }
    Ok(())
}

/// Default property list for `product`.
pub fn info_plist(product: &str) -> String {
    let id = product.to_lowercase();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>CFBundleIdentifier</key>
	<string>{id}</string>
	<key>CFBundleName</key>
	<string>{product}</string>
	<key>DocSetPlatformFamily</key>
	<string>{id}</string>
	<key>isDashDocset</key>
	<true/>
	<key>isJavaScriptEnabled</key>
	<true/>
	<key>dashIndexFilePath</key>
	<string>api/api-list.html</string>
	<key>DashDocSetFamily</key>
	<string>dashtoc</string>
</dict>
</plist>
"#
    )
}

/// Copy whichever docset icons exist in `templates` into `dest`.
pub fn copy_icons(templates: &Path, dest: &Path) -> Result<usize> {
    let mut copied = 0;
    for icon in ICON_FILES {
        let from = templates.join(icon);
        if !from.is_file() {
            warn!(path = %from.display(), "icon not found");
            continue;
        }
        fs::create_dir_all(dest).at(dest)?;
        fs::copy(&from, dest.join(icon)).at(&from)?;
        copied += 1;
    }
    Ok(copied)
}

/// Pack `docset` into a gzip tar at `archive`, with the docset folder as root entry.
pub fn create_archive(docset: &Path, archive: &Path) -> Result<()> {
    if !docset.is_dir() {
        return Err(RxdashError::DocsetNotFound(docset.to_path_buf()));
    }
    let root_name = docset
        .file_name()
        .ok_or_else(|| RxdashError::DocsetNotFound(docset.to_path_buf()))?;

    let file = File::create(archive).at(archive)?;
    let mut builder = TarBuilder::new(GzEncoder::new(file, Compression::default()));
    let mut entries = 0;
    for entry in WalkDir::new(docset).sort_by_file_name() {
        let entry = entry?;
        if ARCHIVE_IGNORED
            .iter()
            .any(|ignored| entry.file_name() == *ignored)
        {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(docset) else {
            continue;
        };
        let name = Path::new(root_name).join(relative);
        if entry.file_type().is_dir() {
            builder.append_dir(&name, entry.path()).at(entry.path())?;
        } else {
            builder
                .append_path_with_name(entry.path(), &name)
                .at(entry.path())?;
            entries += 1;
        }
    }
    let encoder = builder.into_inner().at(archive)?;
    encoder.finish().at(archive)?;
    info!(path = %archive.display(), files = entries, "archive created");
    Ok(())
}
