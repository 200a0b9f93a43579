//! Polling change detection over a project tree.

use crate::error::{FlowError, Result};
use crate::obs;
use sha2::{Digest, Sha256};
use std::io;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use walkdir::{DirEntry, WalkDir};

/// Directories never scanned for changes.
const SKIPPED_DIRS: &[&str] = &["node_modules", "target"];

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.iter().any(|skipped| name == *skipped)
}

fn vanished(err: &walkdir::Error) -> bool {
    err.io_error()
        .is_some_and(|e| e.kind() == io::ErrorKind::NotFound)
}

/// SHA-256 over the sorted `(path, len, mtime)` of every file under `root`.
///
/// Files that disappear while the tree is being read are left out. A missing
/// `root` is an error.
pub fn fingerprint(root: &Path) -> Result<String> {
    let mut hasher = Sha256::new();

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e))
    {
        let entry = match entry {
            Ok(entry) => entry,
            // Editors create and remove swap files between readdir and stat.
            Err(e) if e.depth() > 0 && vanished(&e) => continue,
            Err(e) => {
                return Err(FlowError::Watch {
                    path: root.to_path_buf(),
                    message: e.to_string(),
                })
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(e) if vanished(&e) => continue,
            Err(e) => {
                return Err(FlowError::Watch {
                    path: entry.path().to_path_buf(),
                    message: e.to_string(),
                })
            }
        };
        let mtime = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());

        hasher.update(relative.to_string_lossy().as_bytes());
        hasher.update(b"\0");
        hasher.update(metadata.len().to_le_bytes());
        hasher.update(mtime.to_le_bytes());
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Remembers the last fingerprint of a tree and reports changes.
#[derive(Debug, Clone)]
pub struct TreeWatcher {
    root: PathBuf,
    last: Option<String>,
}

impl TreeWatcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            last: None,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Record the current state without reporting a change.
    pub fn prime(&mut self) -> Result<()> {
        self.last = Some(fingerprint(&self.root)?);
        Ok(())
    }

    /// Whether the tree changed since the previous poll or prime.
    ///
    /// The first poll on an unprimed watcher only records the state.
    pub fn poll(&mut self) -> Result<bool> {
        let current = fingerprint(&self.root)?;
        let changed = matches!(&self.last, Some(last) if *last != current);
        if changed {
            obs::emit_watch_changed(&self.root, &current);
        }
        self.last = Some(current);
        Ok(changed)
    }
}
