//! Detector geometry: the static reference frame the viewer draws hits into.
//!
//! The geometry is a flat list of [`Volume`]s. It serializes as a JSON
//! array so the viewer can filter volumes by their `type` tag.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A point in detector coordinates (centimetres).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Position {
    /// Drift coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// Beam coordinate.
    pub z: f64,
}

impl Position {
    /// The detector origin.
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    /// Create a position from its three components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<[f64; 3]> for Position {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

// ---------------------------------------------------------------------------
// Volumes
// ---------------------------------------------------------------------------

/// An axis-aligned box volume, given by its centre and full widths.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct BoxVolume {
    /// Centre of the box.
    pub position: Position,
    /// Full width along x.
    pub x_width: f64,
    /// Full width along y.
    pub y_width: f64,
    /// Full width along z.
    pub z_width: f64,
}

impl BoxVolume {
    /// Create a box centred on `position` with the given full widths.
    pub const fn new(position: Position, x_width: f64, y_width: f64, z_width: f64) -> Self {
        Self {
            position,
            x_width,
            y_width,
            z_width,
        }
    }
}

/// A single detector volume, tagged by `type` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Volume {
    /// A rectangular box (TPC, cryostat, module).
    Box(BoxVolume),
}

impl From<BoxVolume> for Volume {
    fn from(volume: BoxVolume) -> Self {
        Self::Box(volume)
    }
}

// ---------------------------------------------------------------------------
// DetectorGeometry
// ---------------------------------------------------------------------------

/// The full detector description served at `GET /geometry`.
///
/// Built once by the host and handed to the server at construction. The
/// server never mutates it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DetectorGeometry(pub Vec<Volume>);

impl DetectorGeometry {
    /// Create a geometry from a list of volumes.
    pub const fn new(volumes: Vec<Volume>) -> Self {
        Self(volumes)
    }

    /// The volumes making up this geometry, in insertion order.
    pub fn volumes(&self) -> &[Volume] {
        &self.0
    }

    /// Number of volumes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the geometry has no volumes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Volume> for DetectorGeometry {
    fn from_iter<I: IntoIterator<Item = Volume>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<Volume>> for DetectorGeometry {
    fn from(volumes: Vec<Volume>) -> Self {
        Self(volumes)
    }
}
