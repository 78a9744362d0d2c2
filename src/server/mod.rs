pub mod api;
pub mod leverage;
pub mod optimize;

use crate::error::AppError;
use crate::services::{SharedHealthStats, SharedIndicatorStore, SharedTokenStore};
use axum::{
    extract::FromRef,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// Filesystem locations the handlers read from
#[derive(Debug, Clone)]
pub struct ServerPaths {
    pub price_data_dir: PathBuf,
    pub reference_doc: PathBuf,
    pub public_dir: PathBuf,
}

pub type SharedServerPaths = Arc<ServerPaths>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub indicators: SharedIndicatorStore,
    pub tokens: SharedTokenStore,
    pub health_stats: SharedHealthStats,
    pub paths: SharedServerPaths,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        indicators: SharedIndicatorStore,
        tokens: SharedTokenStore,
        health_stats: SharedHealthStats,
        paths: ServerPaths,
    ) -> Self {
        Self {
            indicators,
            tokens,
            health_stats,
            paths: Arc::new(paths),
            started_at: Instant::now(),
        }
    }
}

// FromRef implementations to extract specific state components
impl FromRef<AppState> for SharedIndicatorStore {
    fn from_ref(app_state: &AppState) -> SharedIndicatorStore {
        app_state.indicators.clone()
    }
}

impl FromRef<AppState> for SharedTokenStore {
    fn from_ref(app_state: &AppState) -> SharedTokenStore {
        app_state.tokens.clone()
    }
}

impl FromRef<AppState> for SharedHealthStats {
    fn from_ref(app_state: &AppState) -> SharedHealthStats {
        app_state.health_stats.clone()
    }
}

impl FromRef<AppState> for SharedServerPaths {
    fn from_ref(app_state: &AppState) -> SharedServerPaths {
        app_state.paths.clone()
    }
}

/// All API routes plus the static frontend fallback
pub fn router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let public_dir = app_state.paths.public_dir.clone();
    let frontend = ServeDir::new(&public_dir).fallback(ServeFile::new(public_dir.join("index.html")));

    Router::new()
        .route("/indicator-aggregate", get(api::get_aggregate_handler))
        .route("/indicator/{name}", get(api::get_indicator_handler))
        .route("/bitcoin-price", get(api::get_bitcoin_price_handler))
        .route("/last-updated", get(api::last_updated_handler))
        .route("/health", get(api::health_handler))
        .route("/optimize-leverage", post(optimize::optimize_leverage_handler))
        .route("/optimize-leverage/reference-doc", get(optimize::reference_doc_handler))
        .route("/leverage/{venue}/asset/{asset}", get(leverage::get_asset_handler))
        .route("/leverage/last-updated", get(leverage::last_updated_handler))
        .fallback_service(frontend)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the axum server
pub async fn serve(app_state: AppState, port: u16) -> Result<(), AppError> {
    tracing::info!(
        public_dir = %app_state.paths.public_dir.display(),
        price_data_dir = %app_state.paths.price_data_dir.display(),
        "Starting cryptodash server"
    );

    tracing::info!("Registering routes:");
    tracing::info!("  GET  /indicator-aggregate?startDate=2024-01-01&endDate=2024-06-01");
    tracing::info!("  GET  /indicator/{{name}}?startDate=&endDate=");
    tracing::info!("  GET  /bitcoin-price?startDate=&endDate=");
    tracing::info!("  GET  /last-updated");
    tracing::info!("  POST /optimize-leverage");
    tracing::info!("  GET  /optimize-leverage/reference-doc");
    tracing::info!("  GET  /leverage/{{tlx|toros}}/asset/{{asset}}");
    tracing::info!("  GET  /leverage/last-updated");
    tracing::info!("  GET  /health");
    tracing::info!("  GET  /* (static files from {})", app_state.paths.public_dir.display());

    let app = router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
