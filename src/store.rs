// src/store.rs
use std::{fs, path::{Path, PathBuf}};

use tracing::{debug, info, warn};

use crate::data::Snapshot;
use crate::error::{Error, Result};

/// Previous snapshot, or an empty one if it is missing or unreadable.
pub fn load_snapshot(path: &Path) -> Snapshot {
    match try_load_snapshot(path) {
        Ok(snap) => {
            debug!(path = %path.display(), centers = snap.centers.len(), "loaded previous snapshot");
            snap
        }
        Err(Error::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no previous snapshot; starting with empty cache");
            Snapshot::empty()
        }
        Err(e) => {
            warn!(error = %e, "ignoring unreadable snapshot");
            Snapshot::empty()
        }
    }
}

pub fn try_load_snapshot(path: &Path) -> Result<Snapshot> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_str(&text).map_err(|e| Error::json(path, e))
}

/// Replace the snapshot at `path`. The old file survives any failure.
pub fn save_snapshot(path: &Path, snap: &Snapshot) -> Result<()> {
    let json = serde_json::to_string_pretty(snap).map_err(|e| Error::json(path, e))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }

    let tmp = temp_sibling(path);
    if let Err(e) = fs::write(&tmp, json.as_bytes()) {
        let _ = fs::remove_file(&tmp);
        return Err(Error::io(&tmp, e));
    }
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(Error::io(path, e));
    }
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(Error::Config(format!("Path exists but is not a directory: {}", dir.display())));
    }
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }
    Ok(())
}
