mod http_error;

pub use http_error::HttpError;

use crate::signaling::{SignalingService, ws_handler};
use axum::Router;
use axum::routing::get;
use std::path::Path;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Path of the signaling WebSocket endpoint.
pub const SIGNALING_PATH: &str = "/server";

/// Build the public router: the signaling socket plus static client assets.
pub fn router(signaling: SignalingService, static_dir: impl AsRef<Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(SIGNALING_PATH, get(ws_handler))
        .fallback_service(ServeDir::new(static_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(signaling)
}
