use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use forgefit_api::config::ServerConfig;
use forgefit_api::router::build_app_router;
use forgefit_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forgefit_api=debug,forgefit_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env().expect("Invalid server configuration");
    tracing::info!(
        host = %config.host,
        port = config.port,
        autosave_delay_ms = config.autosave.delay.as_millis() as u64,
        "Loaded server configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = forgefit_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    forgefit_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    forgefit_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Event bus ---
    let event_bus = Arc::new(forgefit_events::EventBus::default());
    let persistence_handle = tokio::spawn(forgefit_events::NotificationPersistence::run(
        pool.clone(),
        event_bus.subscribe(),
    ));
    tracing::info!("Notification persistence started");

    // --- App state + router ---
    let state = AppState::new(pool, config.clone(), event_bus);
    let live_sessions = Arc::clone(&state.live_sessions);

    // --- Background jobs ---
    let cancel = tokio_util::sync::CancellationToken::new();
    let sweeper_handle = tokio::spawn(forgefit_api::background::idle_sessions::run(
        Arc::clone(&live_sessions),
        config.live_session_idle,
        cancel.clone(),
    ));

    let app = build_app_router(state, &config).expect("Failed to build router");

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
    tracing::info!("Server stopped accepting connections, cleaning up");

    cancel.cancel();
    let _ = sweeper_handle.await;

    // Unsaved progress inside the quiet period is discarded, same as a
    // client navigating away.
    live_sessions.teardown_all().await;

    // The registry and every notifier hold the bus; the channel closes once
    // the last of them is dropped.
    drop(live_sessions);
    let _ = tokio::time::timeout(Duration::from_secs(5), persistence_handle).await;

    tracing::info!("Graceful shutdown complete");
}

/// Resolve on SIGINT or (on Unix) SIGTERM.
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
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
