//! Endpoint handlers for the event display API.
//!
//! Data handlers read the store at request time and return a JSON
//! snapshot of the current value. Nothing is cached between requests.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/geometry` | Detector geometry (array of volumes) |
//! | `GET` | `/hits` | Reconstructed hits |
//! | `GET` | `/mcHits` | Monte-Carlo truth hits |
//! | `GET` | `/markers` | Annotation markers |
//! | `GET` | `/particles` | Reconstructed particles |
//! | `GET` | `/mcTruth` | Truth description (JSON string) |
//! | `GET`/`POST` | `/quit` | Stop the server |

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use tracing::info;

use crate::error::ApiError;
use crate::lifecycle::LifecycleState;
use crate::state::AppState;
use crate::wire::JsonSnapshot;

/// Response body for `/quit`.
#[derive(Debug, serde::Serialize)]
struct QuitResponse {
    /// Whether the request was accepted.
    ok: bool,
    /// Human-readable message.
    message: &'static str,
}

// ---------------------------------------------------------------------------
// Data routes
// ---------------------------------------------------------------------------

/// Return the detector geometry.
pub async fn get_geometry(
    State(state): State<Arc<AppState>>,
) -> Result<JsonSnapshot, ApiError> {
    JsonSnapshot::encode(state.geometry.as_ref())
}

/// Return the current hits.
pub async fn get_hits(State(state): State<Arc<AppState>>) -> Result<JsonSnapshot, ApiError> {
    let store = state.store();
    JsonSnapshot::encode(store.hits())
}

/// Return the current MC hits.
pub async fn get_mc_hits(State(state): State<Arc<AppState>>) -> Result<JsonSnapshot, ApiError> {
    let store = state.store();
    JsonSnapshot::encode(store.mc_hits())
}

/// Return the current markers.
pub async fn get_markers(State(state): State<Arc<AppState>>) -> Result<JsonSnapshot, ApiError> {
    let store = state.store();
    JsonSnapshot::encode(store.markers())
}

/// Return the current particles.
pub async fn get_particles(
    State(state): State<Arc<AppState>>,
) -> Result<JsonSnapshot, ApiError> {
    let store = state.store();
    JsonSnapshot::encode(store.particles())
}

/// Return the truth description paired with the MC hits.
pub async fn get_mc_truth(State(state): State<Arc<AppState>>) -> Result<JsonSnapshot, ApiError> {
    let store = state.store();
    JsonSnapshot::encode(store.truth())
}

// ---------------------------------------------------------------------------
// Management
// ---------------------------------------------------------------------------

/// Signal the serve loop to stop.
///
/// The response is still delivered: the server stops accepting new
/// connections and closes once in-flight requests have finished.
pub async fn quit(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let message = if state.lifecycle.stop() {
        info!("Quit requested, shutting down");
        "Server stopping"
    } else if state.lifecycle.state() == LifecycleState::Listening {
        "Server already stopping"
    } else {
        "Server not running"
    };

    Json(QuitResponse { ok: true, message })
}
