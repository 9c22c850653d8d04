//! Periodic removal of expired uploads.
//!
//! Uploaded files only live long enough to feed one analysis job. Every
//! [`SWEEP_INTERVAL`] this task deletes files in the upload directory whose
//! modification time is older than the retention window.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use tokio_util::sync::CancellationToken;
use vlab_core::uploads::{sweep_expired, SWEEP_INTERVAL};

/// Run the sweep loop until `cancel` fires. The first sweep happens
/// immediately.
pub async fn run(uploads_dir: PathBuf, retention: Duration, cancel: CancellationToken) {
    run_every(uploads_dir, retention, SWEEP_INTERVAL, cancel).await;
}

pub(crate) async fn run_every(
    uploads_dir: PathBuf,
    retention: Duration,
    every: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(
        dir = %uploads_dir.display(),
        retention_secs = retention.as_secs(),
        interval_secs = every.as_secs(),
        "Upload cleanup job started"
    );

    let mut interval = tokio::time::interval(every);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Upload cleanup job stopping");
                break;
            }
            _ = interval.tick() => {
                match sweep_expired(&uploads_dir, retention, SystemTime::now()).await {
                    Ok(report) if report.deleted > 0 || report.failed > 0 => {
                        tracing::info!(
                            deleted = report.deleted,
                            failed = report.failed,
                            "Upload cleanup: swept expired files"
                        );
                    }
                    Ok(_) => tracing::debug!("Upload cleanup: nothing to delete"),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        tracing::debug!("Upload cleanup: upload directory does not exist yet");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Upload cleanup: sweep failed");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs::File;

    use super::*;

    #[tokio::test]
    async fn sweeps_then_stops_on_cancel() {
        let dir = tempfile::tempdir().expect("tempdir");
        let stale = dir.path().join("stale.csv");
        std::fs::write(&stale, "x").unwrap();
        File::options()
            .write(true)
            .open(&stale)
            .unwrap()
            .set_modified(SystemTime::now() - Duration::from_secs(3600))
            .unwrap();

        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_every(
            dir.path().to_path_buf(),
            Duration::from_secs(60),
            Duration::from_millis(20),
            cancel.clone(),
        ));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!stale.exists());

        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("task should stop after cancel")
            .unwrap();
    }

    #[tokio::test]
    async fn missing_directory_is_not_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_every(
            dir.path().join("never-created"),
            Duration::from_secs(60),
            Duration::from_millis(10),
            cancel.clone(),
        ));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!task.is_finished());
        cancel.cancel();
        task.await.unwrap();
    }
}
