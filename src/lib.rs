//! SBML ⇄ pathway-diagram conversion engine.
//!
//! This crate converts SBML reaction networks into SBGN-style pathway
//! diagrams (species become data nodes, reactions become process nodes with
//! reactant/product ports, interactions become arcs) and flattens such
//! diagrams back into SBML for export. A force-directed layout engine
//! relaxes node positions into a readable arrangement.
//!
//! The binary `pathsbml` demonstrates usage: it imports an SBML file and
//! prints the resulting diagram as JSON or re-exports it as SBML.

pub mod convert;
pub mod diagram;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod model;
pub mod sbml;
pub mod xref;
