use aggregator::RollingAggregator;
use axum::{
    extract::DefaultBodyLimit,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use configuration::ServerSettings;
use std::any::Any;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

pub mod clock;
pub mod error;
pub mod handlers;

pub use clock::{Clock, SystemClock};
use error::AppError;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<RollingAggregator>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// State backed by the system wall clock.
    pub fn new(aggregator: Arc<RollingAggregator>) -> Self {
        Self {
            aggregator,
            clock: Arc::new(SystemClock),
        }
    }
}

/// Builds the application routes.
pub fn router(state: Arc<AppState>, body_limit_bytes: usize) -> Router {
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/event", post(handlers::post_events))
        .route("/stats", get(handlers::get_stats))
        .with_state(state)
        // Logs every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(DefaultBodyLimit::max(body_limit_bytes))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    AppError::Internal(message).into_response()
}

/// Binds the listener and serves until Ctrl-C.
pub async fn run_server(settings: &ServerSettings, state: Arc<AppState>) -> anyhow::Result<()> {
    let addr = settings.socket_addr()?;
    let app = router(state, settings.body_limit_bytes);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server started and listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Web server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for the shutdown signal.");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received.");
}
