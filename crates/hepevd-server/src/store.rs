//! The event data store: everything about the current event except the
//! geometry.
//!
//! Hits, markers and particles accumulate across calls. MC hits and the
//! truth string are a pair that is replaced as a unit.

use hepevd_types::{Hits, Markers, McHits, Particles};

/// Mutable aggregate of the current event's data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventStore {
    hits: Hits,
    mc_hits: McHits,
    markers: Markers,
    particles: Particles,
    mc_truth: String,
}

impl EventStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            hits: Vec::new(),
            mc_hits: Vec::new(),
            markers: Vec::new(),
            particles: Vec::new(),
            mc_truth: String::new(),
        }
    }

    /// Create a store pre-seeded with hits and MC hits (empty truth).
    pub const fn seeded(hits: Hits, mc_hits: McHits) -> Self {
        Self {
            hits,
            mc_hits,
            markers: Vec::new(),
            particles: Vec::new(),
            mc_truth: String::new(),
        }
    }

    /// Add hits to the event.
    ///
    /// On an empty store the given hits are installed as-is; otherwise
    /// they are appended after the existing ones.
    pub fn add_hits(&mut self, hits: Hits) {
        if self.hits.is_empty() {
            self.hits = hits;
            return;
        }

        self.hits.extend(hits);
    }

    /// Add markers to the event. Same policy as [`Self::add_hits`].
    pub fn add_markers(&mut self, markers: Markers) {
        if self.markers.is_empty() {
            self.markers = markers;
            return;
        }

        self.markers.extend(markers);
    }

    /// Add particles to the event. Same policy as [`Self::add_hits`].
    pub fn add_particles(&mut self, particles: Particles) {
        if self.particles.is_empty() {
            self.particles = particles;
            return;
        }

        self.particles.extend(particles);
    }

    /// Replace the MC hits and truth description.
    ///
    /// Nothing from a previous call survives.
    pub fn add_truth(&mut self, mc_hits: McHits, truth: impl Into<String>) {
        self.mc_hits = mc_hits;
        self.mc_truth = truth.into();
    }

    /// Current hits, in insertion order.
    pub const fn hits(&self) -> &Hits {
        &self.hits
    }

    /// Current MC hits.
    pub const fn mc_hits(&self) -> &McHits {
        &self.mc_hits
    }

    /// Current markers, in insertion order.
    pub const fn markers(&self) -> &Markers {
        &self.markers
    }

    /// Current particles, in insertion order.
    pub const fn particles(&self) -> &Particles {
        &self.particles
    }

    /// Current truth description paired with [`Self::mc_hits`].
    pub fn truth(&self) -> &str {
        &self.mc_truth
    }

    /// Drop every collection and the truth string.
    pub fn clear(&mut self) {
        self.hits.clear();
        self.mc_hits.clear();
        self.markers.clear();
        self.particles.clear();
        self.mc_truth.clear();
    }
}

#[cfg(test)]
mod tests {
    use hepevd_types::{Hit, HitDimension, Marker, McHit, Particle, Position};

    use super::*;

    fn hit(z: f64) -> Hit {
        Hit::new(HitDimension::ThreeD, Position::new(0.0, 0.0, z), 1.0)
    }

    fn mc_hit(z: f64) -> McHit {
        McHit::new(HitDimension::ThreeD, Position::new(0.0, 0.0, z), 1.0, 13)
    }

    #[test]
    fn new_store_is_empty() {
        let store = EventStore::new();
        assert!(store.hits().is_empty());
        assert!(store.mc_hits().is_empty());
        assert!(store.markers().is_empty());
        assert!(store.particles().is_empty());
        assert_eq!(store.truth(), "");
        assert_eq!(store, EventStore::default());
    }

    #[test]
    fn first_add_installs_hits() {
        let mut store = EventStore::new();
        store.add_hits(vec![hit(1.0), hit(2.0)]);
        assert_eq!(store.hits(), &vec![hit(1.0), hit(2.0)]);
    }

    #[test]
    fn later_adds_append_in_order() {
        let mut store = EventStore::new();
        store.add_hits(vec![hit(1.0)]);
        store.add_hits(vec![hit(2.0), hit(3.0)]);
        assert_eq!(store.hits(), &vec![hit(1.0), hit(2.0), hit(3.0)]);
    }

    #[test]
    fn empty_add_is_a_no_op() {
        let mut store = EventStore::new();
        store.add_hits(Vec::new());
        assert!(store.hits().is_empty());

        store.add_hits(vec![hit(1.0)]);
        store.add_hits(Vec::new());
        assert_eq!(store.hits(), &vec![hit(1.0)]);
    }

    #[test]
    fn seeded_hits_are_appended_to() {
        let mut store = EventStore::seeded(vec![hit(1.0)], vec![mc_hit(9.0)]);
        store.add_hits(vec![hit(2.0)]);
        assert_eq!(store.hits(), &vec![hit(1.0), hit(2.0)]);
        assert_eq!(store.mc_hits(), &vec![mc_hit(9.0)]);
        assert_eq!(store.truth(), "");
    }

    #[test]
    fn markers_accumulate() {
        let a = Marker::point(HitDimension::ThreeD, Position::ORIGIN);
        let b = Marker::ring(HitDimension::TwoD, Position::ORIGIN, 1.0, 2.0);
        let c = Marker::line(HitDimension::ThreeD, Position::ORIGIN, Position::new(1.0, 1.0, 1.0));

        let mut store = EventStore::new();
        store.add_markers(vec![a.clone()]);
        store.add_markers(vec![b.clone(), c.clone()]);
        assert_eq!(store.markers(), &vec![a, b, c]);
    }

    #[test]
    fn particles_accumulate() {
        let mut store = EventStore::new();
        store.add_particles(vec![Particle::new("0", "mu", 13, vec![hit(1.0)])]);
        store.add_particles(vec![Particle::new("1", "e", 11, Vec::new())]);

        let ids: Vec<&str> = store.particles().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["0", "1"]);
    }

    #[test]
    fn truth_is_replaced_as_a_pair() {
        let mut store = EventStore::new();
        store.add_truth(vec![mc_hit(1.0)], "alpha");
        store.add_truth(vec![mc_hit(2.0), mc_hit(3.0)], "beta");
        assert_eq!(store.mc_hits(), &vec![mc_hit(2.0), mc_hit(3.0)]);
        assert_eq!(store.truth(), "beta");

        store.add_truth(Vec::new(), "");
        assert!(store.mc_hits().is_empty());
        assert_eq!(store.truth(), "");
    }

    #[test]
    fn clear_empties_everything() {
        let mut store = EventStore::seeded(vec![hit(1.0)], vec![mc_hit(1.0)]);
        store.add_markers(vec![Marker::point(HitDimension::TwoD, Position::ORIGIN)]);
        store.add_truth(vec![mc_hit(2.0)], "gamma");
        store.clear();
        assert_eq!(store, EventStore::new());
    }
}
