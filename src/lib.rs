use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio_rusqlite::Connection;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod aggregators;
pub mod config;
pub mod error;
pub mod event_handler;
pub mod event_source;
pub mod handlers;
pub mod middleware;
pub mod migrations;

pub use config::Config;
pub use error::AppError;
pub use event_handler::EventHandler;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Connection>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: Connection, config: Config) -> Self {
        Self {
            db: Arc::new(db),
            config: Arc::new(config),
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    let dashboard = Router::new()
        .route("/api/analytics", get(handlers::get_statistics))
        .route_layer(from_fn_with_state(state.clone(), middleware::basic_auth));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/collect", post(handlers::track_page_view))
        .merge(dashboard)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
