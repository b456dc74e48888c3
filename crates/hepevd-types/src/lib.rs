//! Shared wire types for the HepEVD event display.
//!
//! Every value the server hands to the browser viewer is defined here.
//! Types flow to `TypeScript` via `ts-rs` so the viewer code can check
//! its expectations against the server's output.
//!
//! # Modules
//!
//! - [`geometry`] -- Detector volumes and the shared [`Position`] type
//! - [`hits`] -- Reconstructed hits and Monte-Carlo truth hits
//! - [`markers`] -- Point, line and ring annotations
//! - [`particles`] -- Reconstructed particles with their hits

pub mod geometry;
pub mod hits;
pub mod markers;
pub mod particles;

// Re-export all public types at crate root for convenience.
pub use geometry::{BoxVolume, DetectorGeometry, Position, Volume};
pub use hits::{Hit, HitDimension, Hits, McHit, McHits};
pub use markers::{LineMarker, Marker, Markers, PointMarker, RingMarker};
pub use particles::{DEFAULT_INTERACTION_TYPE, Particle, Particles};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation for the viewer.

    #[test]
    fn export_bindings() {
        // Files are written to `bindings/` relative to the crate root.
        use ts_rs::TS;

        let _ = crate::geometry::Position::export_all();
        let _ = crate::geometry::BoxVolume::export_all();
        let _ = crate::geometry::Volume::export_all();
        let _ = crate::geometry::DetectorGeometry::export_all();

        let _ = crate::hits::HitDimension::export_all();
        let _ = crate::hits::Hit::export_all();
        let _ = crate::hits::McHit::export_all();

        let _ = crate::markers::PointMarker::export_all();
        let _ = crate::markers::LineMarker::export_all();
        let _ = crate::markers::RingMarker::export_all();
        let _ = crate::markers::Marker::export_all();

        let _ = crate::particles::Particle::export_all();
    }
}
