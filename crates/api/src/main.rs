use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vlab_core::jobs::dispatcher::JobDispatcher;
use vlab_core::jobs::interpreter::Interpreter;

use vlab_api::analysis::runner::AnalysisRunner;
use vlab_api::background::upload_cleanup;
use vlab_api::config::ServerConfig;
use vlab_api::router::build_app_router;
use vlab_api::seed::seed_experiments;
use vlab_api::state::AppState;
use vlab_api::twitter::TwitterClient;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vlab_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = vlab_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    vlab_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    vlab_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    if let Some(path) = &config.experiments_seed_file {
        seed_experiments(&pool, path)
            .await
            .expect("Failed to seed experiments");
    }

    // --- Analysis jobs ---
    let analysis_config = &config.analysis;
    let interpreter = Interpreter::resolve(analysis_config.python_path.as_deref()).await;
    tracing::info!(
        interpreter = %interpreter,
        source = ?interpreter.source(),
        timeout_secs = analysis_config.job_timeout.map(|t| t.as_secs()),
        "Resolved job interpreter"
    );

    let runner = AnalysisRunner::new(
        JobDispatcher::new(interpreter, analysis_config.job_timeout),
        analysis_config.scripts_dir.clone(),
        analysis_config.expose_diagnostics,
    );

    tokio::fs::create_dir_all(&analysis_config.uploads_dir)
        .await
        .expect("Failed to create uploads directory");

    // --- Upload sweep ---
    let cleanup_cancel = CancellationToken::new();
    let cleanup_handle = tokio::spawn(upload_cleanup::run(
        analysis_config.uploads_dir.clone(),
        analysis_config.upload_retention,
        cleanup_cancel.clone(),
    ));

    // --- App state ---
    let twitter = TwitterClient::new(&config.twitter).expect("Failed to build HTTP client");
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        analysis: Arc::new(runner),
        twitter: Arc::new(twitter),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    cleanup_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), cleanup_handle).await;
    tracing::info!("Graceful shutdown complete");
}

/// Resolve on SIGINT, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl-C, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
