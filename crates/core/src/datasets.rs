//! Dataset and upload file lookup.
//!
//! Jobs read their input from two directories: the read-only default
//! datasets shipped with the lab, and the shared upload work area. Client
//! supplied names are only ever joined onto those roots after being checked
//! to be a bare file name.

use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::CoreError;

/// Extension accepted by the analysis scripts.
pub const CSV_EXTENSION: &str = "csv";

/// True when `path` has a `.csv` extension (case-insensitive).
pub fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(CSV_EXTENSION))
}

/// Join a client-supplied file name onto `root`.
///
/// Rejects anything that is not a single normal path component, so names
/// like `../secrets.csv` or `/etc/passwd` never escape `root`.
pub fn resolve_in(root: &Path, name: &str) -> Result<PathBuf, CoreError> {
    let candidate = Path::new(name);
    let mut components = candidate.components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(root.join(candidate)),
        _ => Err(CoreError::Validation(format!("Invalid file name: {name}"))),
    }
}

/// List the `.csv` file names directly inside `dir`, sorted.
pub async fn list_csv_files(dir: &Path) -> io::Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if is_csv(&path) && entry.file_type().await?.is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// Whether `path` currently exists as a regular file.
pub async fn file_exists(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
