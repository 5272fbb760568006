use std::fs::{File, OpenOptions, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::registry::{RegistryError, RegistryResult};

/// Write pretty JSON next to `path` under a temporary name, then rename it
/// into place.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> RegistryResult<()> {
    let mut data = serde_json::to_vec_pretty(value)?;
    data.push(b'\n');

    let parent = path.parent().filter(|dir| !dir.as_os_str().is_empty());
    if let Some(dir) = parent {
        create_dir_all(dir)?;
    }

    let staging = staging_path(path)?;
    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(&staging)?;
    file.write_all(&data)?;
    file.sync_all()?;
    drop(file);

    if let Err(err) = std::fs::rename(&staging, path) {
        let _ = std::fs::remove_file(&staging);
        return Err(err.into());
    }

    if let Some(dir) = parent {
        File::open(dir)?.sync_all()?;
    }

    Ok(())
}

/// `project.json` -> `.project.json.<pid>.tmp`
fn staging_path(path: &Path) -> RegistryResult<PathBuf> {
    let file_name = path
        .file_name()
        .ok_or_else(|| RegistryError::InvalidPath(path.display().to_string()))?;
    Ok(path.with_file_name(format!(
        ".{}.{}.tmp",
        file_name.to_string_lossy(),
        std::process::id()
    )))
}
