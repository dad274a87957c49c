//! Filesystem infrastructure: implements `SourceFs` and shared path helpers.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::SourceFs;
use crate::domain::DeployError;

/// Reads sources and writes generated files on the local filesystem.
pub struct LocalFs;

impl SourceFs for LocalFs {
    fn read_source(&self, path: &Path) -> Result<String> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(DeployError::SourceNotFound(path.display().to_string()).into())
            }
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }

    fn write_generated(&self, path: &Path, content: &str) -> Result<()> {
        write_atomic(path, content, false)
    }
}

/// Write beside the target and rename, so a crash never leaves half a file.
///
/// The temp file is created owner-only; shared files are widened to 0644
/// before the rename, private ones never are.
fn write_atomic(path: &Path, content: &str, private: bool) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("cannot create {}", dir.display()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(&dir)
        .with_context(|| format!("cannot create temp file in {}", dir.display()))?;
    tmp.write_all(content.as_bytes())
        .with_context(|| format!("cannot write {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = if private { 0o600 } else { 0o644 };
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(mode))
            .with_context(|| format!("cannot set permissions on {}", path.display()))?;
    }
    #[cfg(not(unix))]
    let _ = private;

    tmp.persist(path)
        .with_context(|| format!("cannot write {}", path.display()))?;
    Ok(())
}

/// The user's home directory.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))
}

/// `~/.gradio-modal`, where config and credentials live.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn tool_dir() -> Result<PathBuf> {
    Ok(home_dir()?.join(".gradio-modal"))
}

/// Write `content` to `path` with owner-only permissions, creating parents.
///
/// The file is never readable by others, not even while being written.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn write_private(path: &Path, content: &str) -> Result<()> {
    write_atomic(path, content, true)
}
