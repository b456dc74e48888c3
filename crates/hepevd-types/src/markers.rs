//! Annotation markers drawn on top of the hits.
//!
//! A [`Marker`] is tagged by `marker` on the wire (`point`, `line`,
//! `ring`) so the viewer can toggle each kind independently.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::geometry::Position;
use crate::hits::HitDimension;

/// Ordered collection of markers.
pub type Markers = Vec<Marker>;

/// A single point annotation (vertex, interaction point).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PointMarker {
    /// 2D or 3D view.
    #[serde(rename = "type")]
    pub dimension: HitDimension,
    /// Where to draw the point.
    pub position: Position,
    /// CSS colour override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub colour: Option<String>,
    /// Text label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub label: Option<String>,
}

/// A straight line segment from `position` to `end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LineMarker {
    /// 2D or 3D view.
    #[serde(rename = "type")]
    pub dimension: HitDimension,
    /// Start of the line.
    pub position: Position,
    /// End of the line.
    pub end: Position,
    /// CSS colour override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub colour: Option<String>,
    /// Text label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub label: Option<String>,
}

/// An annulus centred on `position`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RingMarker {
    /// 2D or 3D view.
    #[serde(rename = "type")]
    pub dimension: HitDimension,
    /// Centre of the ring.
    pub position: Position,
    /// Inner radius.
    pub inner: f64,
    /// Outer radius.
    pub outer: f64,
    /// CSS colour override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub colour: Option<String>,
    /// Text label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub label: Option<String>,
}

/// An annotation overlay, independent of the raw hits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "marker", rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Marker {
    /// See [`PointMarker`].
    Point(PointMarker),
    /// See [`LineMarker`].
    Line(LineMarker),
    /// See [`RingMarker`].
    Ring(RingMarker),
}

impl Marker {
    /// A point marker.
    pub const fn point(dimension: HitDimension, position: Position) -> Self {
        Self::Point(PointMarker {
            dimension,
            position,
            colour: None,
            label: None,
        })
    }

    /// A line marker from `start` to `end`.
    pub const fn line(dimension: HitDimension, start: Position, end: Position) -> Self {
        Self::Line(LineMarker {
            dimension,
            position: start,
            end,
            colour: None,
            label: None,
        })
    }

    /// A ring marker around `centre`.
    pub const fn ring(dimension: HitDimension, centre: Position, inner: f64, outer: f64) -> Self {
        Self::Ring(RingMarker {
            dimension,
            position: centre,
            inner,
            outer,
            colour: None,
            label: None,
        })
    }

    /// The view this marker is drawn in.
    pub const fn dimension(&self) -> HitDimension {
        match self {
            Self::Point(m) => m.dimension,
            Self::Line(m) => m.dimension,
            Self::Ring(m) => m.dimension,
        }
    }

    /// The anchor position (point, line start, ring centre).
    pub const fn position(&self) -> Position {
        match self {
            Self::Point(m) => m.position,
            Self::Line(m) => m.position,
            Self::Ring(m) => m.position,
        }
    }

    /// Set the colour override.
    #[must_use]
    pub fn with_colour(mut self, colour: impl Into<String>) -> Self {
        let colour = Some(colour.into());
        match &mut self {
            Self::Point(m) => m.colour = colour,
            Self::Line(m) => m.colour = colour,
            Self::Ring(m) => m.colour = colour,
        }
        self
    }

    /// Set the text label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        let label = Some(label.into());
        match &mut self {
            Self::Point(m) => m.label = label,
            Self::Line(m) => m.label = label,
            Self::Ring(m) => m.label = label,
        }
        self
    }
}
