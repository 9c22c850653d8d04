use std::sync::Arc;

use crate::analysis::runner::AnalysisRunner;
use crate::config::ServerConfig;
use crate::twitter::TwitterClient;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: everything is a pool handle or behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: vlab_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Runs external analysis scripts.
    pub analysis: Arc<AnalysisRunner>,
    pub twitter: Arc<TwitterClient>,
}
