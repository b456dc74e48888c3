//! Reconstructed particles: groups of hits with a hierarchy.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::hits::Hits;

/// Ordered collection of particles.
pub type Particles = Vec<Particle>;

/// A reconstructed particle and the hits assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Particle {
    /// Host-assigned identifier, unique within an event.
    pub id: String,
    /// Display name.
    pub name: String,
    /// PDG code of the particle hypothesis.
    pub pdg: i32,
    /// Interaction category the viewer groups and sorts primaries by.
    #[serde(rename = "interactionType", default = "default_interaction_type")]
    pub interaction_type: String,
    /// Hits assigned to this particle.
    pub hits: Hits,
    /// Identifier of the parent particle. Empty for a primary.
    #[serde(rename = "parentID", default)]
    pub parent_id: String,
    /// Identifiers of the daughter particles.
    #[serde(rename = "childIDs", default)]
    pub child_ids: Vec<String>,
}

impl Particle {
    /// Create a primary particle with no children, in the default
    /// interaction category.
    pub fn new(id: impl Into<String>, name: impl Into<String>, pdg: i32, hits: Hits) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            pdg,
            interaction_type: default_interaction_type(),
            hits,
            parent_id: String::new(),
            child_ids: Vec::new(),
        }
    }

    /// Set the parent particle.
    #[must_use]
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = parent_id.into();
        self
    }

    /// Set the interaction category.
    #[must_use]
    pub fn with_interaction_type(mut self, interaction_type: impl Into<String>) -> Self {
        self.interaction_type = interaction_type.into();
        self
    }

    /// Append a daughter particle.
    #[must_use]
    pub fn with_child(mut self, child_id: impl Into<String>) -> Self {
        self.child_ids.push(child_id.into());
        self
    }

    /// Whether this particle has no parent.
    pub fn is_primary(&self) -> bool {
        self.parent_id.is_empty()
    }
}

/// Category given to particles the host does not classify.
pub const DEFAULT_INTERACTION_TYPE: &str = "Other";

fn default_interaction_type() -> String {
    String::from(DEFAULT_INTERACTION_TYPE)
}
