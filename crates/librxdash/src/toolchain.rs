use std::{
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use tracing::info;

use crate::error::{Result, RxdashError};

/// Locate the `npm` executable.
pub fn find_npm() -> Result<PathBuf> {
    which::which("npm").map_err(|e| {
        RxdashError::Toolchain(format!(
            "npm is required to install documentation dependencies: {e}"
        ))
    })
}

/// Install the documentation app's node dependencies if they are missing.
///
/// Returns `true` when `npm install` ran.
pub fn ensure_node_modules(docs_app: &Path) -> Result<bool> {
    if docs_app.join("node_modules").is_dir() {
        return Ok(false);
    }
    let npm = find_npm()?;
    info!(dir = %docs_app.display(), "running npm install");
    let status = Command::new(npm)
        .arg("install")
        .current_dir(docs_app)
        .stdin(Stdio::null())
        .status()
        .map_err(|e| RxdashError::Toolchain(format!("Failed to run npm: {e}")))?;

    if !status.success() {
        return Err(RxdashError::Toolchain(format!(
            "npm install failed in {} ({status})",
            docs_app.display()
        )));
    }
    Ok(true)
}
