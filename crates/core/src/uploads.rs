//! Upload work area: collision-free naming, storage and retention sweep.
//!
//! Uploaded files are job inputs only. Each gets a unique name so
//! concurrent uploads never overwrite one another, and a periodic sweep
//! removes anything older than the retention window.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use uuid::Uuid;

/// Default age after which uploads are deleted (6 hours).
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(6 * 60 * 60);

/// How often the retention sweep runs (1 hour).
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Longest extension carried over from the client's file name.
const MAX_EXTENSION_LEN: usize = 10;

/// Build a unique stored name: `{unix_millis}-{uuid}{.ext}`.
///
/// The extension of `original_name` is kept (lower-cased) when it is short
/// and purely alphanumeric; anything else is dropped.
pub fn stored_file_name(original_name: &str, now: SystemTime) -> String {
    let millis = now
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();

    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| {
            !e.is_empty()
                && e.len() <= MAX_EXTENSION_LEN
                && e.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default();

    format!("{millis}-{}{ext}", Uuid::new_v4().simple())
}

/// Persist `bytes` under a fresh unique name inside `dir`, creating `dir`
/// if needed. Returns the full path written.
pub async fn save_upload(dir: &Path, original_name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(stored_file_name(original_name, SystemTime::now()));
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}

/// Result of one retention sweep.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    pub deleted: usize,
    pub failed: usize,
}

/// Delete regular files in `dir` whose modification time is more than
/// `retention` before `now`.
///
/// Per-file failures are logged and counted; only failing to read the
/// directory itself is an error.
pub async fn sweep_expired(
    dir: &Path,
    retention: Duration,
    now: SystemTime,
) -> io::Result<SweepReport> {
    let mut report = SweepReport::default();
    let mut entries = tokio::fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let metadata = match entry.metadata().await {
            Ok(m) if m.is_file() => m,
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to stat upload");
                report.failed += 1;
                continue;
            }
        };

        let age = metadata
            .modified()
            .ok()
            .and_then(|mtime| now.duration_since(mtime).ok())
            .unwrap_or_default();
        if age <= retention {
            continue;
        }

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), age_secs = age.as_secs(), "Deleted expired upload");
                report.deleted += 1;
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to delete upload");
                report.failed += 1;
            }
        }
    }

    Ok(report)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::fs::File;

    use super::*;

    #[test]
    fn stored_name_keeps_safe_extension() {
        let now = SystemTime::UNIX_EPOCH + Duration::from_millis(1_700_000_000_123);
        let name = stored_file_name("My Tweets.CSV", now);
        assert!(name.starts_with("1700000000123-"), "{name}");
        assert!(name.ends_with(".csv"), "{name}");
    }

    #[test]
    fn stored_name_drops_suspicious_extension() {
        let now = SystemTime::now();
        assert!(!stored_file_name("x.c$v", now).contains('$'));
        assert!(!stored_file_name("noext", now).contains('.'));
        assert!(!stored_file_name("../../etc/passwd", now).contains('/'));
    }

    #[test]
    fn stored_names_are_unique_within_same_millisecond() {
        let now = SystemTime::now();
        assert_ne!(stored_file_name("a.csv", now), stored_file_name("a.csv", now));
    }

    #[tokio::test]
    async fn save_upload_creates_dir_and_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("uploads");
        let path = save_upload(&target, "data.csv", b"text\nhello\n")
            .await
            .expect("save");
        assert!(path.starts_with(&target));
        assert_eq!(std::fs::read(&path).expect("read"), b"text\nhello\n");
    }

    #[tokio::test]
    async fn sweep_deletes_only_expired_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let old = dir.path().join("old.csv");
        let fresh = dir.path().join("fresh.csv");
        std::fs::write(&old, "x").expect("write");
        std::fs::write(&fresh, "y").expect("write");
        std::fs::create_dir(dir.path().join("subdir")).expect("mkdir");

        let now = SystemTime::now();
        File::options()
            .write(true)
            .open(&old)
            .expect("open")
            .set_modified(now - Duration::from_secs(7 * 60 * 60))
            .expect("set mtime");

        let report = sweep_expired(dir.path(), DEFAULT_RETENTION, now)
            .await
            .expect("sweep");
        assert_eq!(report, SweepReport { deleted: 1, failed: 0 });
        assert!(!old.exists());
        assert!(fresh.exists());
        assert!(dir.path().join("subdir").exists());
    }

    #[tokio::test]
    async fn sweep_of_missing_dir_is_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = sweep_expired(&dir.path().join("gone"), DEFAULT_RETENTION, SystemTime::now()).await;
        assert!(result.is_err());
    }
}
