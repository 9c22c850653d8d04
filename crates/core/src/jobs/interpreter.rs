//! Interpreter path resolution.
//!
//! The interpreter is resolved once when the server starts and then handed
//! to [`JobDispatcher::new`](super::dispatcher::JobDispatcher::new) as a
//! plain value, so tests can substitute any executable they like.

use std::fmt;
use std::path::{Path, PathBuf};

use tokio::process::Command;

/// Bare command name used when nothing better can be found.
#[cfg(windows)]
pub const FALLBACK_INTERPRETER: &str = "python";
#[cfg(not(windows))]
pub const FALLBACK_INTERPRETER: &str = "python3";

/// Platform command used to locate an executable on `PATH`.
#[cfg(windows)]
const LOCATE_COMMAND: &str = "where";
#[cfg(not(windows))]
const LOCATE_COMMAND: &str = "which";

/// How the interpreter path was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpreterSource {
    /// Taken verbatim from configuration.
    Fixed,
    /// Found on `PATH` by the platform locate command.
    Discovered,
    /// Locate command failed; the bare command name is used.
    Fallback,
}

/// A resolved interpreter executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
    path: PathBuf,
    source: InterpreterSource,
}

impl Interpreter {
    /// Use `path` as-is without any lookup.
    pub fn fixed(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            source: InterpreterSource::Fixed,
        }
    }

    /// Resolve the interpreter for this deployment.
    ///
    /// A configured path always wins. Otherwise the platform locate command
    /// is asked for [`FALLBACK_INTERPRETER`]; the first non-empty line of its
    /// output is used. Any failure falls back to the bare command name.
    pub async fn resolve(configured: Option<&str>) -> Self {
        if let Some(path) = configured.map(str::trim).filter(|p| !p.is_empty()) {
            return Self::fixed(path);
        }

        match locate(FALLBACK_INTERPRETER).await {
            Some(path) => Self {
                path,
                source: InterpreterSource::Discovered,
            },
            None => {
                tracing::warn!(
                    command = FALLBACK_INTERPRETER,
                    "Interpreter discovery failed, falling back to bare command name"
                );
                Self {
                    path: PathBuf::from(FALLBACK_INTERPRETER),
                    source: InterpreterSource::Fallback,
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> InterpreterSource {
        self.source
    }
}

impl fmt::Display for Interpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Run the locate command for `name` and return the first reported path.
async fn locate(name: &str) -> Option<PathBuf> {
    let output = Command::new(LOCATE_COMMAND).arg(name).output().await.ok()?;
    if !output.status.success() {
        return None;
    }
    first_path_line(&String::from_utf8_lossy(&output.stdout))
}

/// First non-empty line of locate output, trimmed (`where` may list several).
fn first_path_line(stdout: &str) -> Option<PathBuf> {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(PathBuf::from)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
