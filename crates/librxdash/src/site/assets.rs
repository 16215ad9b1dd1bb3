//! Output directory preparation and static asset copying.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{IoContext, Result};

/// Recreate `output` and populate `output/assets`.
///
/// `assets` (the tool's own static files) is copied first, then the
/// documentation app's images are layered into `assets/images`. Missing
/// sources are skipped with a warning.
pub fn prepare_output(output: &Path, assets: &Path, images: &Path) -> Result<()> {
    if output.is_dir() {
        debug!(path = %output.display(), "removing previous output");
        fs::remove_dir_all(output).at(output)?;
    }
    fs::create_dir_all(output).at(output)?;

    let target = output.join("assets");
    if assets.is_dir() {
        copy_dir(assets, &target)?;
    } else {
        warn!(path = %assets.display(), "assets directory not found");
        fs::create_dir_all(&target).at(&target)?;
    }

    if images.is_dir() {
        copy_dir(images, &target.join("images"))?;
    } else {
        warn!(path = %images.display(), "documentation images not found");
    }
    Ok(())
}

/// Copy the first stylesheet in `dist` into `output/assets`.
///
/// Returns the stylesheet path relative to the output root.
pub fn copy_stylesheet(dist: &Path, output: &Path) -> Result<Option<String>> {
    let Some(style) = find_stylesheet(dist)? else {
        warn!(path = %dist.display(), "no stylesheet found");
        return Ok(None);
    };
    let Some(name) = style.file_name().map(|n| n.to_string_lossy().into_owned()) else {
        return Ok(None);
    };
    let assets = output.join("assets");
    fs::create_dir_all(&assets).at(&assets)?;
    let dest = assets.join(&name);
    fs::copy(&style, &dest).at(&style)?;
    info!(stylesheet = %name, "stylesheet copied");
    Ok(Some(format!("assets/{name}")))
}

/// First `*.css` file directly inside `dist`, by name.
fn find_stylesheet(dist: &Path) -> Result<Option<PathBuf>> {
    if !dist.is_dir() {
        return Ok(None);
    }
    let mut sheets: Vec<PathBuf> = fs::read_dir(dist)
        .at(dist)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "css"))
        .collect();
    sheets.sort();
    Ok(sheets.into_iter().next())
}

/// Recursively copy `from` into `to`, creating directories as needed.
///
/// Returns the number of files copied.
pub fn copy_dir(from: &Path, to: &Path) -> Result<usize> {
    let mut copied = 0;
    for entry in WalkDir::new(from).sort_by_file_name() {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(from) else {
            continue;
        };
        let dest = to.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest).at(&dest)?;
        } else {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent).at(parent)?;
            }
            fs::copy(entry.path(), &dest).at(entry.path())?;
            copied += 1;
        }
    }
    debug!(from = %from.display(), to = %to.display(), files = copied, "directory copied");
    Ok(copied)
}
