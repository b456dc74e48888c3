//! Synthetic detector and event generation for the demo.
//!
//! The detector is a pair of drift volumes either side of a central
//! cathode. An event is a handful of straight tracks leaving a common
//! vertex, each recorded as 3D hits, a 2D projection onto the `xz`
//! plane, smeared Monte-Carlo hits and one particle.

use std::f64::consts::TAU;

use hepevd_server::ConfigError;
use hepevd_types::{
    BoxVolume, DetectorGeometry, Hit, HitDimension, Hits, Marker, Markers, McHit, McHits,
    Particle, Particles, Position, Volume,
};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

// -----------------------------------------------------------------------
// Configuration
// -----------------------------------------------------------------------

/// Event generation settings, read from the `event` section of
/// `hepevd-config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventConfig {
    /// RNG seed. The same seed always produces the same event.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Number of tracks leaving the vertex.
    #[serde(default = "default_tracks")]
    pub tracks: u32,

    /// Hits recorded along each track.
    #[serde(default = "default_hits_per_track")]
    pub hits_per_track: u32,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            tracks: default_tracks(),
            hits_per_track: default_hits_per_track(),
        }
    }
}

impl EventConfig {
    /// Extract the `event` section from a full YAML config document.
    ///
    /// A document without an `event` key yields the defaults.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: serde_yml::Value = serde_yml::from_str(yaml)?;
        match raw.get("event") {
            Some(section) => Ok(serde_yml::from_value(section.clone())?),
            None => Ok(Self::default()),
        }
    }
}

const fn default_seed() -> u64 {
    42
}

const fn default_tracks() -> u32 {
    4
}

const fn default_hits_per_track() -> u32 {
    60
}

// -----------------------------------------------------------------------
// Detector
// -----------------------------------------------------------------------

/// Half-width of one drift volume along `x`, in cm.
const DRIFT_WIDTH: f64 = 360.0;
const HEIGHT: f64 = 600.0;
const LENGTH: f64 = 700.0;

/// Spacing between consecutive hits on a track, in cm.
const HIT_PITCH: f64 = 1.5;

/// Interaction category of every generated particle.
const INTERACTION_TYPE: &str = "Neutrino";

/// PDG codes the generator draws tracks from.
const PDG_POOL: &[i32] = &[13, 211, 2212, 11];

/// Two drift volumes sharing a cathode at `x = 0`.
pub fn detector() -> DetectorGeometry {
    let half = DRIFT_WIDTH / 2.0;
    [-half, half]
        .into_iter()
        .map(|x| {
            Volume::Box(BoxVolume::new(
                Position::new(x, 0.0, LENGTH / 2.0),
                DRIFT_WIDTH,
                HEIGHT,
                LENGTH,
            ))
        })
        .collect()
}

// -----------------------------------------------------------------------
// Event
// -----------------------------------------------------------------------

/// Everything the demo hands to the server for one event.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Reconstructed 3D hits.
    pub hits_3d: Hits,
    /// The same hits projected onto the `xz` plane.
    pub hits_2d: Hits,
    /// Smeared truth-level hits.
    pub mc_hits: McHits,
    /// Vertex and track-direction markers.
    pub markers: Markers,
    /// One particle per track. The first is the primary.
    pub particles: Particles,
    /// Human-readable truth summary.
    pub truth: String,
}

/// Seeded generator of synthetic events.
#[derive(Debug)]
pub struct EventGenerator {
    config: EventConfig,
    rng: StdRng,
}

impl EventGenerator {
    /// Create a generator seeded from `config.seed`.
    pub fn new(config: EventConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    /// Generate the next event.
    pub fn generate(&mut self) -> Event {
        let vertex = Position::new(
            self.rng.random_range(-DRIFT_WIDTH / 2.0..DRIFT_WIDTH / 2.0),
            self.rng.random_range(-HEIGHT / 4.0..HEIGHT / 4.0),
            self.rng.random_range(LENGTH / 4.0..LENGTH / 2.0),
        );

        let mut event = Event {
            hits_3d: Vec::new(),
            hits_2d: Vec::new(),
            mc_hits: Vec::new(),
            markers: vec![
                Marker::point(HitDimension::ThreeD, vertex).with_label("vertex"),
                Marker::ring(HitDimension::TwoD, Position::new(vertex.x, 0.0, vertex.z), 2.0, 6.0)
                    .with_colour("#f85149"),
            ],
            particles: Vec::new(),
            truth: String::new(),
        };

        let mut names = Vec::new();
        for track in 0..self.config.tracks {
            let pdg = PDG_POOL.choose(&mut self.rng).copied().unwrap_or(13);
            let direction = self.direction();
            let label = particle_name(pdg);

            let track_hits: Hits = (0..self.config.hits_per_track)
                .map(|step| {
                    let t = f64::from(step) * HIT_PITCH;
                    let position = along(vertex, direction, t);
                    let energy = self.rng.random_range(0.5..3.0);
                    Hit::new(HitDimension::ThreeD, position, energy)
                        .with_label(label)
                        .with_property("trackID", f64::from(track))
                })
                .collect();

            event.hits_2d.extend(track_hits.iter().map(|hit| {
                Hit::new(
                    HitDimension::TwoD,
                    Position::new(hit.position.x, 0.0, hit.position.z),
                    hit.energy,
                )
                .with_property("trackID", f64::from(track))
            }));

            event.mc_hits.extend(track_hits.iter().map(|hit| {
                let smeared = Position::new(
                    hit.position.x + self.rng.random_range(-0.3..0.3),
                    hit.position.y + self.rng.random_range(-0.3..0.3),
                    hit.position.z + self.rng.random_range(-0.3..0.3),
                );
                McHit::new(HitDimension::ThreeD, smeared, hit.energy, pdg).with_label(label)
            }));

            event.markers.push(Marker::line(
                HitDimension::ThreeD,
                vertex,
                along(vertex, direction, 20.0),
            ));

            let id = format!("p{track}");
            let particle = Particle::new(&id, label, pdg, track_hits.clone())
                .with_interaction_type(INTERACTION_TYPE);
            let particle = if track == 0 {
                particle
            } else {
                particle.with_parent("p0")
            };
            if let Some(primary) = event.particles.first_mut() {
                primary.child_ids.push(id);
            }
            event.particles.push(particle);
            event.hits_3d.extend(track_hits);
            names.push(label);
        }

        event.truth = format!(
            "{} ({}) from vertex ({:.1}, {:.1}, {:.1})",
            names.len(),
            names.join(", "),
            vertex.x,
            vertex.y,
            vertex.z,
        );
        event
    }

    /// Isotropic unit vector.
    fn direction(&mut self) -> Position {
        let cos_theta: f64 = self.rng.random_range(-1.0..1.0);
        let sin_theta = cos_theta.mul_add(-cos_theta, 1.0).sqrt();
        let phi: f64 = self.rng.random_range(0.0..TAU);
        Position::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta)
    }
}

fn along(origin: Position, direction: Position, t: f64) -> Position {
    Position::new(
        direction.x.mul_add(t, origin.x),
        direction.y.mul_add(t, origin.y),
        direction.z.mul_add(t, origin.z),
    )
}

const fn particle_name(pdg: i32) -> &'static str {
    match pdg {
        13 => "muon",
        211 => "pion",
        2212 => "proton",
        11 => "electron",
        _ => "particle",
    }
}
