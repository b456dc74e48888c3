//! The embeddable event display server and its serve loop.
//!
//! A host program builds a [`HepEvdServer`] from a detector geometry, feeds
//! it event data, then calls [`HepEvdServer::start`], which blocks until a
//! client requests `/quit` (or [`ServerHandle::stop`] is called).
//!
//! ```rust,ignore
//! use hepevd_server::HepEvdServer;
//!
//! let server = HepEvdServer::new(geometry);
//! server.add_hits(hits);
//! server.add_truth(mc_hits, "numu CC, 2 GeV");
//! server.start()?; // http://localhost:5555 until /quit
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use hepevd_types::{DetectorGeometry, Hits, Markers, McHits, Particles};
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::config::ServerConfig;
use crate::lifecycle::{LifecycleState, ListeningGuard};
use crate::router::build_router;
use crate::state::AppState;
use crate::store::EventStore;

/// Errors that can occur when starting or running the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The configured host is not a loopback address.
    #[error("refusing to bind non-loopback host {0:?}")]
    NonLoopback(String),

    /// A serve loop is already running for this server.
    #[error("server is already listening")]
    AlreadyListening,

    /// Failed to bind the TCP listener.
    #[error("bind failed on {addr}: {source}")]
    Bind {
        /// The address that could not be bound.
        addr: SocketAddr,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The server encountered a fatal error while serving.
    #[error("serve error: {0}")]
    Serve(std::io::Error),

    /// The Tokio runtime backing [`HepEvdServer::start`] could not be built.
    #[error("runtime error: {0}")]
    Runtime(std::io::Error),
}

/// The event display server.
///
/// Geometry is fixed at construction. Hits, markers and particles
/// accumulate across `add_*` calls; MC hits and truth are replaced.
/// Dropping the server clears the stored event.
#[derive(Debug)]
pub struct HepEvdServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl HepEvdServer {
    /// Create a server with a geometry and no event data.
    pub fn new(geometry: impl Into<Arc<DetectorGeometry>>) -> Self {
        Self::from_store(geometry, EventStore::new())
    }

    /// Create a server pre-seeded with hits.
    pub fn with_hits(geometry: impl Into<Arc<DetectorGeometry>>, hits: Hits) -> Self {
        Self::from_store(geometry, EventStore::seeded(hits, Vec::new()))
    }

    /// Create a server pre-seeded with hits and MC hits (empty truth).
    pub fn with_mc_hits(
        geometry: impl Into<Arc<DetectorGeometry>>,
        hits: Hits,
        mc_hits: McHits,
    ) -> Self {
        Self::from_store(geometry, EventStore::seeded(hits, mc_hits))
    }

    fn from_store(geometry: impl Into<Arc<DetectorGeometry>>, store: EventStore) -> Self {
        Self {
            config: ServerConfig::default(),
            state: Arc::new(AppState::new(geometry, store)),
        }
    }

    /// Replace the server configuration (bind host, port, asset directory).
    #[must_use]
    pub fn with_config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// The active configuration.
    pub const fn config(&self) -> &ServerConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Event data
    // -----------------------------------------------------------------------

    /// Add hits. The first non-empty call installs them, later calls append.
    pub fn add_hits(&self, hits: Hits) {
        let count = hits.len();
        let mut store = self.state.store_mut();
        store.add_hits(hits);
        debug!(added = count, total = store.hits().len(), "Hits added");
    }

    /// Add markers. Same policy as [`Self::add_hits`].
    pub fn add_markers(&self, markers: Markers) {
        let count = markers.len();
        let mut store = self.state.store_mut();
        store.add_markers(markers);
        debug!(added = count, total = store.markers().len(), "Markers added");
    }

    /// Add particles. Same policy as [`Self::add_hits`].
    pub fn add_particles(&self, particles: Particles) {
        let count = particles.len();
        let mut store = self.state.store_mut();
        store.add_particles(particles);
        debug!(added = count, total = store.particles().len(), "Particles added");
    }

    /// Replace the MC hits and their truth description.
    pub fn add_truth(&self, mc_hits: McHits, truth: impl Into<String>) {
        let count = mc_hits.len();
        self.state.store_mut().add_truth(mc_hits, truth);
        debug!(mc_hits = count, "MC truth replaced");
    }

    /// Replace the MC hits with an empty truth description.
    pub fn add_mc_hits(&self, mc_hits: McHits) {
        self.add_truth(mc_hits, "");
    }

    /// The detector geometry supplied at construction.
    pub fn geometry(&self) -> &DetectorGeometry {
        &self.state.geometry
    }

    /// A copy of the current hits.
    pub fn hits(&self) -> Hits {
        self.state.store().hits().clone()
    }

    /// A copy of the current MC hits.
    pub fn mc_hits(&self) -> McHits {
        self.state.store().mc_hits().clone()
    }

    /// A copy of the current markers.
    pub fn markers(&self) -> Markers {
        self.state.store().markers().clone()
    }

    /// A copy of the current particles.
    pub fn particles(&self) -> Particles {
        self.state.store().particles().clone()
    }

    /// The current truth description.
    pub fn truth(&self) -> String {
        self.state.store().truth().to_owned()
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Whether the server is currently listening.
    pub fn lifecycle_state(&self) -> LifecycleState {
        self.state.lifecycle.state()
    }

    /// A cloneable handle that can stop the server from another thread.
    pub fn handle(&self) -> ServerHandle {
        ServerHandle {
            state: Arc::clone(&self.state),
        }
    }

    /// Ask a running serve loop to stop. No-op when stopped.
    pub fn stop(&self) -> bool {
        self.state.lifecycle.stop()
    }

    /// Start the server, blocking the calling thread until it is stopped.
    ///
    /// Builds a multi-threaded Tokio runtime for the serve loop. Must not be
    /// called from inside an async context; use [`Self::run`] there.
    ///
    /// # Errors
    ///
    /// See [`Self::run`]. Also returns [`ServerError::Runtime`] if the
    /// runtime cannot be created.
    pub fn start(&self) -> Result<(), ServerError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(ServerError::Runtime)?;

        runtime.block_on(self.run())
    }

    /// Bind the configured loopback address and serve until stopped.
    ///
    /// May be called again after it has returned; the listener is bound
    /// afresh.
    ///
    /// # Errors
    ///
    /// - [`ServerError::NonLoopback`] if the configured host is not loopback
    /// - [`ServerError::AlreadyListening`] if a serve loop is running
    /// - [`ServerError::Bind`] if the port cannot be bound (no retry)
    /// - [`ServerError::Serve`] on a fatal I/O error while serving
    pub async fn run(&self) -> Result<(), ServerError> {
        let ip = self
            .config
            .loopback_ip()
            .ok_or_else(|| ServerError::NonLoopback(self.config.host.clone()))?;
        let addr = SocketAddr::new(ip, self.config.port);

        let guard = self
            .state
            .lifecycle
            .begin()
            .ok_or(ServerError::AlreadyListening)?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        self.serve_with(listener, &guard).await
    }

    /// Serve on an already-bound listener until stopped.
    ///
    /// # Errors
    ///
    /// Same as [`Self::run`], minus [`ServerError::Bind`]. The listener
    /// must be bound to a loopback address.
    pub async fn serve_on(&self, listener: TcpListener) -> Result<(), ServerError> {
        let addr = listener.local_addr().map_err(ServerError::Serve)?;
        if !addr.ip().is_loopback() {
            return Err(ServerError::NonLoopback(addr.ip().to_string()));
        }

        let guard = self
            .state
            .lifecycle
            .begin()
            .ok_or(ServerError::AlreadyListening)?;

        self.serve_with(listener, &guard).await
    }

    async fn serve_with(
        &self,
        listener: TcpListener,
        guard: &ListeningGuard<'_>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr().map_err(ServerError::Serve)?;
        let router = build_router(Arc::clone(&self.state), &self.config.web_root);

        info!(
            %addr,
            web_root = %self.config.web_root.display(),
            "Starting a server on http://{addr}"
        );

        axum::serve(listener, router)
            .with_graceful_shutdown(guard.shutdown_signal())
            .await
            .map_err(ServerError::Serve)?;

        info!(%addr, "Server closed, continuing");
        Ok(())
    }
}

impl Drop for HepEvdServer {
    fn drop(&mut self) {
        self.state.store_mut().clear();
    }
}

/// Cloneable remote control for a [`HepEvdServer`].
#[derive(Debug, Clone)]
pub struct ServerHandle {
    state: Arc<AppState>,
}

impl ServerHandle {
    /// Ask the serve loop to stop. Returns `true` if the signal was
    /// delivered, `false` if the server was not listening or already
    /// stopping.
    pub fn stop(&self) -> bool {
        self.state.lifecycle.stop()
    }

    /// Whether the server is currently listening.
    pub fn lifecycle_state(&self) -> LifecycleState {
        self.state.lifecycle.state()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use hepevd_types::{BoxVolume, Hit, HitDimension, McHit, Position, Volume};

    use super::*;

    fn geometry() -> DetectorGeometry {
        DetectorGeometry::new(vec![Volume::Box(BoxVolume::new(
            Position::ORIGIN,
            256.0,
            232.0,
            1036.0,
        ))])
    }

    fn hit(z: f64) -> Hit {
        Hit::new(HitDimension::ThreeD, Position::new(0.0, 0.0, z), 1.0)
    }

    #[test]
    fn scenario_hits_accumulate_across_calls() {
        let server = HepEvdServer::with_hits(geometry(), Vec::new());
        server.add_hits(vec![hit(1.0)]);
        server.add_hits(vec![hit(2.0), hit(3.0)]);
        assert_eq!(server.hits(), vec![hit(1.0), hit(2.0), hit(3.0)]);
    }

    #[test]
    fn scenario_truth_is_replaced() {
        let server = HepEvdServer::new(geometry());
        server.add_truth(
            vec![McHit::new(HitDimension::ThreeD, Position::ORIGIN, 1.0, 13)],
            "alpha",
        );
        server.add_truth(Vec::new(), "");
        assert!(server.mc_hits().is_empty());
        assert_eq!(server.truth(), "");
    }

    #[test]
    fn add_mc_hits_resets_truth() {
        let mc = vec![McHit::new(HitDimension::TwoD, Position::ORIGIN, 2.0, 11)];
        let server = HepEvdServer::new(geometry());
        server.add_truth(Vec::new(), "beta");
        server.add_mc_hits(mc.clone());
        assert_eq!(server.mc_hits(), mc);
        assert_eq!(server.truth(), "");
    }

    #[test]
    fn geometry_survives_mutation() {
        let server = HepEvdServer::with_mc_hits(
            geometry(),
            vec![hit(1.0)],
            vec![McHit::new(HitDimension::ThreeD, Position::ORIGIN, 1.0, 22)],
        );
        server.add_hits(vec![hit(2.0)]);
        server.add_markers(Vec::new());
        server.add_truth(Vec::new(), "gamma");
        assert_eq!(server.geometry(), &geometry());
    }

    #[test]
    fn fresh_server_is_stopped() {
        let server = HepEvdServer::new(geometry());
        assert_eq!(server.lifecycle_state(), LifecycleState::Stopped);
        assert!(!server.stop());
        assert!(!server.handle().stop());
    }

    #[tokio::test]
    async fn non_loopback_host_is_refused_before_binding() {
        let config = ServerConfig {
            host: String::from("0.0.0.0"),
            ..ServerConfig::default()
        };
        let server = HepEvdServer::new(geometry()).with_config(config);

        let err = server.run().await.unwrap_err();
        assert!(matches!(err, ServerError::NonLoopback(host) if host == "0.0.0.0"));
        assert_eq!(server.lifecycle_state(), LifecycleState::Stopped);
    }

    #[tokio::test]
    async fn bind_failure_is_reported_and_leaves_server_stopped() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let config = ServerConfig {
            port: taken.local_addr().unwrap().port(),
            ..ServerConfig::default()
        };
        let server = HepEvdServer::new(geometry()).with_config(config);

        let err = server.run().await.unwrap_err();
        assert!(matches!(err, ServerError::Bind { .. }));
        assert_eq!(server.lifecycle_state(), LifecycleState::Stopped);
    }
}
