//! Reconstructed hits and Monte-Carlo truth hits.
//!
//! Both hit kinds share the same wire shape. MC hits additionally carry
//! the PDG code of the simulated particle that deposited them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::geometry::Position;

/// Ordered collection of reconstructed hits.
pub type Hits = Vec<Hit>;

/// Ordered collection of Monte-Carlo truth hits.
pub type McHits = Vec<McHit>;

/// Which view a hit (or marker) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum HitDimension {
    /// Full 3D space point.
    #[serde(rename = "3D")]
    ThreeD,
    /// Projected 2D wire-plane hit.
    #[serde(rename = "2D")]
    TwoD,
}

/// A single detected signal point.
///
/// `properties` is a list of single-entry maps, each naming an extra
/// per-hit quantity the viewer can colour by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Hit {
    /// 2D or 3D view.
    #[serde(rename = "type")]
    pub dimension: HitDimension,
    /// Location of the hit.
    pub position: Position,
    /// Deposited energy.
    pub energy: f64,
    /// Optional class label (e.g. `"track"`, `"shower"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub label: Option<String>,
    /// Extra named quantities.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<BTreeMap<String, f64>>,
}

impl Hit {
    /// Create an unlabelled hit with no extra properties.
    pub const fn new(dimension: HitDimension, position: Position, energy: f64) -> Self {
        Self {
            dimension,
            position,
            energy,
            label: None,
            properties: Vec::new(),
        }
    }

    /// Attach a class label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Attach a named quantity.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: f64) -> Self {
        self.properties.push(BTreeMap::from([(name.into(), value)]));
        self
    }

    /// Look up a named quantity. The first entry with that name wins.
    pub fn property(&self, name: &str) -> Option<f64> {
        self.properties.iter().find_map(|p| p.get(name).copied())
    }
}

/// A hit produced by the simulation rather than the detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct McHit {
    /// 2D or 3D view.
    #[serde(rename = "type")]
    pub dimension: HitDimension,
    /// Location of the deposit.
    pub position: Position,
    /// Deposited energy.
    pub energy: f64,
    /// PDG code of the depositing particle.
    pub pdg: i32,
    /// Optional class label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub label: Option<String>,
}

impl McHit {
    /// Create an unlabelled MC hit.
    pub const fn new(dimension: HitDimension, position: Position, energy: f64, pdg: i32) -> Self {
        Self {
            dimension,
            position,
            energy,
            pdg,
            label: None,
        }
    }

    /// Attach a class label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn dimension_uses_viewer_names() {
        assert_eq!(serde_json::to_string(&HitDimension::ThreeD).unwrap(), "\"3D\"");
        assert_eq!(serde_json::to_string(&HitDimension::TwoD).unwrap(), "\"2D\"");
    }

    #[test]
    fn bare_hit_omits_optional_fields() {
        let hit = Hit::new(HitDimension::ThreeD, Position::new(1.0, 2.0, 3.0), 0.5);
        let json = serde_json::to_value(&hit).unwrap();

        assert_eq!(json["type"], "3D");
        assert_eq!(json["energy"], 0.5);
        assert!(json.get("label").is_none());
        assert!(json.get("properties").is_none());
    }

    #[test]
    fn labelled_hit_round_trips() {
        let hit = Hit::new(HitDimension::TwoD, Position::new(-4.0, 0.0, 12.5), 2.0)
            .with_label("track")
            .with_property("charge", 110.0)
            .with_property("time", 3.5);

        let text = serde_json::to_string(&hit).unwrap();
        let back: Hit = serde_json::from_str(&text).unwrap();

        assert_eq!(back, hit);
        assert_eq!(back.property("time"), Some(3.5));
        assert_eq!(back.property("missing"), None);
    }

    #[test]
    fn properties_are_single_entry_objects() {
        let hit = Hit::new(HitDimension::ThreeD, Position::ORIGIN, 1.0).with_property("charge", 7.0);
        let json = serde_json::to_value(&hit).unwrap();

        assert_eq!(json["properties"][0]["charge"], 7.0);
    }

    #[test]
    fn mc_hit_carries_pdg() {
        let hit = McHit::new(HitDimension::ThreeD, Position::ORIGIN, 1.0, 13).with_label("muon");
        let json = serde_json::to_value(&hit).unwrap();

        assert_eq!(json["pdg"], 13);
        assert_eq!(json["label"], "muon");

        let back: McHit = serde_json::from_value(json).unwrap();
        assert_eq!(back, hit);
    }
}
