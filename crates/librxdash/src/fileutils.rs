//! Atomic placement of files in shared directories.

use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

use crate::error::{IoContext, Result};

/// Mode given to files this tool publishes.
#[cfg(unix)]
const PUBLISHED_MODE: u32 = 0o644;

/// Directory containing `path`, or the current directory for bare names.
pub fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Move a finished temporary file over `path` with world-readable permissions.
///
/// Temporary files are created owner-only; the published file should not be.
pub fn persist(tmp: NamedTempFile, path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(PUBLISHED_MODE))
            .at(tmp.path())?;
    }
    tmp.persist(path)?;
    Ok(())
}

/// A copy of a file waiting to be moved into place.
#[derive(Debug)]
pub struct StagedCopy {
    /// The copied bytes, beside the destination.
    tmp: NamedTempFile,
    /// Final location.
    dest: PathBuf,
}

impl StagedCopy {
    /// Copy `src` into a temporary file in the directory of `dest`.
    pub fn new(src: &Path, dest: &Path) -> Result<Self> {
        let dir = parent_dir(dest);
        let mut tmp = NamedTempFile::new_in(&dir).at(&dir)?;
        let mut from = File::open(src).at(src)?;
        io::copy(&mut from, tmp.as_file_mut()).at(dest)?;
        Ok(Self {
            tmp,
            dest: dest.to_path_buf(),
        })
    }

    /// Final location.
    pub fn dest(&self) -> &Path {
        &self.dest
    }

    /// Move the copy into place. Dropping it instead removes the temporary file.
    pub fn commit(self) -> Result<()> {
        persist(self.tmp, &self.dest)
    }
}
