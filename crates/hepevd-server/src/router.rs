//! Axum router construction for the event display.
//!
//! Assembles the data routes, the `/quit` control route, and the static
//! viewer assets into a single [`Router`].

use std::path::Path;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /geometry`, `/hits`, `/mcHits`, `/markers`, `/particles`,
///   `/mcTruth` -- JSON snapshots of the current data
/// - `GET`/`POST /quit` -- stop the server
/// - everything else -- files under `web_root` (`/` serves `index.html`);
///   missing files are a 404
pub fn build_router(state: Arc<AppState>, web_root: &Path) -> Router {
    Router::new()
        // Data
        .route("/geometry", get(handlers::get_geometry))
        .route("/hits", get(handlers::get_hits))
        .route("/mcHits", get(handlers::get_mc_hits))
        .route("/markers", get(handlers::get_markers))
        .route("/particles", get(handlers::get_particles))
        .route("/mcTruth", get(handlers::get_mc_truth))
        // Management
        .route("/quit", get(handlers::quit).post(handlers::quit))
        // Viewer
        .fallback_service(ServeDir::new(web_root))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
