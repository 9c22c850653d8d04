//! External analysis jobs: configuration and the request-scoped runner.

pub mod runner;

use std::path::PathBuf;
use std::time::Duration;

use vlab_core::uploads::DEFAULT_RETENTION;

/// Job layer configuration.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Fixed interpreter path. `None` discovers one on `PATH` at startup.
    pub python_path: Option<String>,
    /// Directory holding the analysis and scraper scripts.
    pub scripts_dir: PathBuf,
    /// Shared work area for uploaded inputs.
    pub uploads_dir: PathBuf,
    /// Read-only default datasets.
    pub datasets_dir: PathBuf,
    /// Wall-clock limit per job. `None` waits indefinitely.
    pub job_timeout: Option<Duration>,
    /// Include stderr and raw stdout in failure envelopes.
    pub expose_diagnostics: bool,
    /// Age after which uploads are swept.
    pub upload_retention: Duration,
}

impl AnalysisConfig {
    /// | Env Var                  | Default          |
    /// |--------------------------|------------------|
    /// | `PYTHON_PATH`            | discovered       |
    /// | `SCRIPTS_DIR`            | `python_scripts` |
    /// | `UPLOADS_DIR`            | `uploads`        |
    /// | `DATASETS_DIR`           | `datasets`       |
    /// | `JOB_TIMEOUT_SECS`       | unset (no limit) |
    /// | `EXPOSE_JOB_DIAGNOSTICS` | `true`           |
    /// | `UPLOAD_RETENTION_HOURS` | `6`              |
    pub fn from_env() -> Self {
        let dir = |var: &str, default: &str| {
            PathBuf::from(std::env::var(var).unwrap_or_else(|_| default.into()))
        };

        let job_timeout = std::env::var("JOB_TIMEOUT_SECS")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                Duration::from_secs(
                    s.trim()
                        .parse()
                        .expect("JOB_TIMEOUT_SECS must be a valid u64"),
                )
            });

        let expose_diagnostics: bool = std::env::var("EXPOSE_JOB_DIAGNOSTICS")
            .unwrap_or_else(|_| "true".into())
            .parse()
            .expect("EXPOSE_JOB_DIAGNOSTICS must be true or false");

        let upload_retention = std::env::var("UPLOAD_RETENTION_HOURS")
            .ok()
            .map(|s| {
                let hours: u64 = s
                    .parse()
                    .expect("UPLOAD_RETENTION_HOURS must be a valid u64");
                Duration::from_secs(hours * 60 * 60)
            })
            .unwrap_or(DEFAULT_RETENTION);

        Self {
            python_path: std::env::var("PYTHON_PATH").ok(),
            scripts_dir: dir("SCRIPTS_DIR", "python_scripts"),
            uploads_dir: dir("UPLOADS_DIR", "uploads"),
            datasets_dir: dir("DATASETS_DIR", "datasets"),
            job_timeout,
            expose_diagnostics,
            upload_retention,
        }
    }
}
