//! Embedded HTTP server for the HepEVD event display.
//!
//! A host analysis program hands this crate a detector geometry and the
//! hits, Monte-Carlo truth, markers and particles of an event. The server
//! exposes each of those as a JSON endpoint on a loopback address, serves
//! the browser viewer's static files, and blocks until `/quit` is hit.
//!
//! # Architecture
//!
//! - [`store::EventStore`] accumulates event data. Hits, markers and
//!   particles append; MC hits and their truth string are replaced.
//! - [`state::AppState`] is shared with every handler: geometry behind an
//!   [`Arc`](std::sync::Arc), the store behind a read-write lock, and the
//!   [`lifecycle::Lifecycle`] controller.
//! - [`router::build_router`] wires the routes and the static mount.
//! - [`server::HepEvdServer`] is the embedding API and owns the serve loop.

pub mod config;
pub mod error;
pub mod handlers;
pub mod lifecycle;
pub mod router;
pub mod server;
pub mod state;
pub mod store;
pub mod wire;

// Re-export primary types for convenience.
pub use config::{ConfigError, HepEvdConfig, LogFormat, LoggingConfig, ServerConfig, DEFAULT_PORT};
pub use lifecycle::LifecycleState;
pub use router::build_router;
pub use server::{HepEvdServer, ServerError, ServerHandle};
pub use state::AppState;
pub use store::EventStore;
