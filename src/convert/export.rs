//! Export direction: pathway diagram → SBML reaction network.
//!
//! Export is gated on the connectivity invariant: every semantic arc must
//! have both endpoints resolvable in the graph before anything is assembled
//! or written. The check runs on every export attempt because the host owns
//! the diagram and may have mutated it since the last call.
//!
//! Reaction membership is recovered through the port map: an arc that starts
//! at a port contributes its end node as a product of the port's reaction, an
//! arc that ends at a port contributes its start node as a reactant. Arcs
//! attached to the process node itself (catalysis and the influence classes)
//! carry no species reference.

use crate::diagram::{Diagram, Node, NodeKind};
use crate::error::ExportError;
use crate::model::{
    CvTerm, Model, Qualifier, Reaction, SbmlDocument, Species, SpeciesRef, DEFAULT_LEVEL,
    DEFAULT_VERSION,
};
use camino::Utf8Path;
use indexmap::IndexMap;
use tracing::warn;

/// Role a species plays in a reaction, using the port convention: role 1 is
/// a product (arc leaves a port), role 2 is a reactant (arc enters a port).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Product = 1,
    Reactant = 2,
}

/// Connectivity invariant: every semantic arc has a non-empty start and end
/// reference that resolves to a node or port of this diagram. Pure read-only
/// traversal.
pub fn is_fully_connected(diagram: &Diagram) -> bool {
    diagram.arcs().all(|arc| {
        !arc.start_ref.is_empty()
            && !arc.end_ref.is_empty()
            && diagram.contains_ref(&arc.start_ref)
            && diagram.contains_ref(&arc.end_ref)
    })
}

/// Flatten a diagram back into an SBML document.
///
/// Fails with [`ExportError::GraphInconsistent`] before assembling anything
/// if the connectivity invariant does not hold.
pub fn export_document(diagram: &Diagram) -> Result<SbmlDocument, ExportError> {
    if !is_fully_connected(diagram) {
        return Err(ExportError::GraphInconsistent(
            "unconnected interactions found".into(),
        ));
    }

    let ports = diagram.port_map();

    // (reaction id, species id, role) triples recovered from the arcs.
    let mut triples: Vec<(String, String, Role)> = Vec::new();
    for arc in diagram.arcs() {
        if let Some(reaction) = ports.get(&arc.start_ref) {
            triples.push((reaction.clone(), arc.end_ref.clone(), Role::Product));
        }
        if let Some(reaction) = ports.get(&arc.end_ref) {
            triples.push((reaction.clone(), arc.start_ref.clone(), Role::Reactant));
        }
    }

    let mut species: IndexMap<String, Species> = IndexMap::new();
    let mut reactions: Vec<Reaction> = Vec::new();
    for node in diagram.nodes() {
        match &node.kind {
            NodeKind::Process(_) => reactions.push(build_reaction(node, &triples)),
            NodeKind::Data => {
                if let Some(sp) = build_species(node) {
                    species.insert(sp.id.clone(), sp);
                }
            }
            NodeKind::State | NodeKind::Label => {}
        }
    }

    Ok(SbmlDocument {
        level: Some(diagram.sbml_level.unwrap_or(DEFAULT_LEVEL)),
        version: Some(diagram.sbml_version.unwrap_or(DEFAULT_VERSION)),
        notes: diagram.notes.clone(),
        model: Model {
            id: diagram.name.clone(),
            name: None,
            species,
            reactions,
            qual: None,
            layout: None,
        },
    })
}

/// Export a diagram to an SBML file. The connectivity gate runs before the
/// target is opened, so a failed export leaves the file untouched.
pub fn export_to_file(diagram: &Diagram, path: impl AsRef<Utf8Path>) -> Result<(), ExportError> {
    let doc = export_document(diagram)?;
    let xml = crate::sbml::write::write_document(&doc);
    std::fs::write(path.as_ref(), xml)?;
    Ok(())
}

fn build_reaction(node: &Node, triples: &[(String, String, Role)]) -> Reaction {
    let mut reaction = Reaction {
        id: node.id.clone(),
        ..Default::default()
    };
    for (reaction_id, species_id, role) in triples {
        if *reaction_id != node.id {
            continue;
        }
        let reference = SpeciesRef::new(species_id.clone());
        match role {
            Role::Reactant => reaction.reactants.push(reference),
            Role::Product => reaction.products.push(reference),
        }
    }
    reaction
}

fn build_species(node: &Node) -> Option<Species> {
    if node.id.is_empty() {
        warn!("data node without identifier, skipping species");
        return None;
    }
    let mut sp = Species {
        id: node.id.clone(),
        name: node.label.clone(),
        ..Default::default()
    };
    if let Some(xref) = &node.xref {
        let label = node.label.as_deref().unwrap_or(&node.id);
        sp.meta_id = Some(format!("metaid_{label}"));
        sp.annotations.push(CvTerm {
            qualifier: Qualifier::Is,
            resources: vec![xref.urn()],
        });
    }
    Some(sp)
}
