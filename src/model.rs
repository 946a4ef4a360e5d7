//! SBML reaction-network data model.
//!
//! These types mirror the identifier-level structure of an SBML document:
//! species, reactions with reactant/product/modifier references, and the
//! optional `qual` (qualitative species + transitions) and `layout`
//! (per-species bounding boxes) extensions. They are produced by
//! [`crate::sbml::read`] and consumed by the converter, or built back up by
//! the export path and handed to [`crate::sbml::write`].

use crate::geometry::Rect;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// SBML level written when a diagram carries no round-trip metadata.
pub const DEFAULT_LEVEL: u32 = 3;
/// SBML version written when a diagram carries no round-trip metadata.
pub const DEFAULT_VERSION: u32 = 1;

// ────────────────────────────────────────────────────────────────────────────
// Document
// ────────────────────────────────────────────────────────────────────────────

/// A parsed SBML document: the model plus document-level attributes that must
/// survive a round-trip through the diagram representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SbmlDocument {
    pub level: Option<u32>,
    pub version: Option<u32>,
    /// Raw `<notes>` content, carried through conversion as an opaque comment.
    pub notes: Option<String>,
    pub model: Model,
}

impl SbmlDocument {
    pub fn level_or_default(&self) -> u32 {
        self.level.unwrap_or(DEFAULT_LEVEL)
    }

    pub fn version_or_default(&self) -> u32 {
        self.version.unwrap_or(DEFAULT_VERSION)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Model
// ────────────────────────────────────────────────────────────────────────────

/// An SBML model.
///
/// `species` preserves document order, which keeps the not-yet-materialized
/// species sweep (and therefore initial placement) deterministic across runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    pub name: Option<String>,
    pub species: IndexMap<String, Species>,
    pub reactions: Vec<Reaction>,
    /// Qualitative modelling extension, if the document uses it.
    pub qual: Option<QualModel>,
    /// Layout extension, if the document uses it.
    pub layout: Option<LayoutModel>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Species {
    pub id: String,
    pub name: Option<String>,
    pub boundary_condition: bool,
    pub substance_units: Option<String>,
    /// Metadata id addressed by RDF annotations (`rdf:about="#<meta_id>"`).
    pub meta_id: Option<String>,
    /// Controlled-vocabulary annotations (`bqbiol:is` and friends).
    pub annotations: Vec<CvTerm>,
}

impl Species {
    /// First resource of the first `is`-qualified CV term, if any. This is the
    /// cross-reference the annotation resolver works from.
    pub fn first_is_resource(&self) -> Option<&str> {
        self.annotations
            .iter()
            .find(|t| t.qualifier == Qualifier::Is)
            .and_then(|t| t.resources.first())
            .map(String::as_str)
    }
}

/// One controlled-vocabulary term: a biology qualifier plus its resource URIs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvTerm {
    pub qualifier: Qualifier,
    pub resources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Qualifier {
    Is,
    /// Any other biology qualifier; kept verbatim so it survives a re-write.
    Other(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Reactions
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Reaction {
    pub id: String,
    pub reactants: Vec<SpeciesRef>,
    pub products: Vec<SpeciesRef>,
    pub modifiers: Vec<SpeciesRef>,
}

/// A reference from a reaction to a species.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesRef {
    pub species: String,
    pub stoichiometry: Option<f64>,
}

impl SpeciesRef {
    pub fn new(species: impl Into<String>) -> Self {
        Self {
            species: species.into(),
            stoichiometry: None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Qualitative extension
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualModel {
    pub species: Vec<QualitativeSpecies>,
    pub transitions: Vec<Transition>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualitativeSpecies {
    pub id: String,
    pub name: Option<String>,
    pub annotations: Vec<CvTerm>,
}

impl QualitativeSpecies {
    pub fn first_is_resource(&self) -> Option<&str> {
        self.annotations
            .iter()
            .find(|t| t.qualifier == Qualifier::Is)
            .and_then(|t| t.resources.first())
            .map(String::as_str)
    }
}

/// A qualitative transition. Only 1-input/1-output transitions are
/// convertible to a diagram arc; others are skipped by the converter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transition {
    pub id: String,
    pub inputs: Vec<TransitionInput>,
    pub outputs: Vec<TransitionOutput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionInput {
    pub qualitative_species: String,
    pub sign: Sign,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionOutput {
    pub qualitative_species: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sign {
    Positive,
    Negative,
    Dual,
    Unknown,
}

// ────────────────────────────────────────────────────────────────────────────
// Layout extension
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutModel {
    pub species_glyphs: Vec<SpeciesGlyphBox>,
}

/// A species glyph bounding box from the layout extension. Overrides the
/// converter's guessed position for that species.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesGlyphBox {
    pub species: String,
    pub bounds: Rect,
}
