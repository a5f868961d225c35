//! Namespace listing from the generated output directory.
//!
//! Layout: `<out>/<namespace>/**/<file>`. Every immediate sub-directory of the
//! output directory is a namespace; plain files at the top level are ignored.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use tracing::debug;

/// Format of [`NamespaceInfo::updated_human`].
const UPDATED_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Error type for output directory access.
#[derive(Debug)]
pub enum StoreError {
    /// Creating the output directory failed.
    Create(PathBuf, std::io::Error),
    /// Reading the output directory failed.
    Read(PathBuf, std::io::Error),
    /// Namespace name is empty or would leave the output directory.
    InvalidName(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Create(path, e) => write!(f, "create {}: {}", path.display(), e),
            StoreError::Read(path, e) => write!(f, "read {}: {}", path.display(), e),
            StoreError::InvalidName(name) => write!(f, "invalid namespace name {:?}", name),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Create(_, e) | StoreError::Read(_, e) => Some(e),
            StoreError::InvalidName(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceInfo {
    pub name: String,
    /// Regular files anywhere below the namespace directory.
    pub item_count: usize,
    /// Latest file modification time; `None` when the namespace holds no files.
    pub updated: Option<SystemTime>,
    /// `updated` in local time as `YYYY-MM-DD HH:MM`, or empty.
    pub updated_human: String,
}

/// Creates the output directory (and parents) if missing.
pub fn ensure_out(out_dir: impl AsRef<Path>) -> Result<(), StoreError> {
    let out_dir = out_dir.as_ref();
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder
        .create(out_dir)
        .map_err(|e| StoreError::Create(out_dir.to_path_buf(), e))
}

/// Lists namespaces under `out_dir`, sorted by name.
pub fn list_namespaces(out_dir: impl AsRef<Path>) -> Result<Vec<NamespaceInfo>, StoreError> {
    let out_dir = out_dir.as_ref();
    let entries =
        std::fs::read_dir(out_dir).map_err(|e| StoreError::Read(out_dir.to_path_buf(), e))?;

    let mut res = Vec::new();
    for entry in entries.flatten() {
        if !entry.file_type().is_ok_and(|t| t.is_dir()) {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();

        let mut stats = WalkStats::default();
        walk_files(&entry.path(), &mut stats);

        let updated_human = stats
            .latest
            .map(|t| DateTime::<Local>::from(t).format(UPDATED_FORMAT).to_string())
            .unwrap_or_default();

        res.push(NamespaceInfo {
            name,
            item_count: stats.count,
            updated: stats.latest,
            updated_human,
        });
    }

    res.sort_by(|a, b| a.name.cmp(&b.name));
    debug!(dir = %out_dir.display(), namespaces = res.len(), "listed namespaces");
    Ok(res)
}

/// Lists the files of one namespace as `/`-separated paths relative to the
/// namespace directory, sorted.
pub fn list_files(out_dir: impl AsRef<Path>, namespace: &str) -> Result<Vec<String>, StoreError> {
    if namespace.is_empty()
        || namespace == "."
        || namespace == ".."
        || namespace.contains(['/', '\\'])
    {
        return Err(StoreError::InvalidName(namespace.to_string()));
    }
    let dir = out_dir.as_ref().join(namespace);
    if !dir.is_dir() {
        return Err(StoreError::Read(
            dir,
            std::io::Error::from(std::io::ErrorKind::NotFound),
        ));
    }

    let mut files = Vec::new();
    collect_files(&dir, "", &mut files);
    files.sort();
    Ok(files)
}

fn collect_files(dir: &Path, prefix: &str, files: &mut Vec<String>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        let name = entry.file_name().to_string_lossy().into_owned();
        let rel = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}/{name}")
        };
        if file_type.is_dir() {
            collect_files(&entry.path(), &rel, files);
        } else {
            files.push(rel);
        }
    }
}

#[derive(Default)]
struct WalkStats {
    count: usize,
    latest: Option<SystemTime>,
}

/// Recursive file walk. Unreadable entries are skipped.
fn walk_files(dir: &Path, stats: &mut WalkStats) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            walk_files(&entry.path(), stats);
            continue;
        }
        stats.count += 1;
        if let Ok(modified) = entry.metadata().and_then(|m| m.modified())
            && stats.latest.is_none_or(|latest| modified > latest)
        {
            stats.latest = Some(modified);
        }
    }
}
