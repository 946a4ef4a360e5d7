//! Bidirectional conversion between the SBML reaction network and the
//! pathway diagram graph.
//!
//! Each direction is an explicit, one-shot pass owned by the caller: import
//! builds a fresh [`crate::diagram::Diagram`] from a parsed document, export
//! re-validates the (possibly host-mutated) diagram and flattens it back into
//! a [`crate::model::SbmlDocument`]. There is no shared state between
//! conversion sessions.
//!
//! - [`import`] – reaction network → diagram, including incremental placement
//! - [`export`] – diagram → reaction network, gated on connectivity
//! - [`placement`] – the deterministic placement cursor

pub mod export;
pub mod import;
pub mod placement;

pub use export::{export_document, export_to_file, is_fully_connected};
pub use import::import_document;
pub use placement::PlacementCursor;

/// Horizontal offset of product/reactant glyphs from their process node.
pub(crate) const SPECIES_OFFSET: f64 = 80.0;
/// Vertical offset of modifier glyphs above their process node.
pub(crate) const MODIFIER_OFFSET: f64 = 80.0;
/// Vertical step between stacked reactants or products of one reaction.
pub(crate) const STACK_STEP: f64 = 20.0;
/// Horizontal advance used to chain a reaction after an existing reactant.
pub(crate) const CHAIN_STEP: f64 = 100.0;
