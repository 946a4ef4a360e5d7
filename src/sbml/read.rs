//! Parse SBML XML into the reaction-network model.
//!
//! Element and attribute names are matched by local name so that the core,
//! `qual` and `layout` namespaces can appear under any prefix. Unknown
//! elements are ignored; a document-level shape problem (no `<sbml>` root,
//! no `<model>`) is fatal.

use crate::error::ImportError;
use crate::geometry::Rect;
use crate::model::{
    CvTerm, LayoutModel, Model, QualModel, Qualifier, QualitativeSpecies, Reaction, SbmlDocument,
    Sign, Species, SpeciesGlyphBox, SpeciesRef, Transition, TransitionInput, TransitionOutput,
};
use camino::Utf8Path;
use roxmltree::{Document, Node};

/// Read and parse an SBML file.
pub fn parse_file(path: impl AsRef<Utf8Path>) -> Result<SbmlDocument, ImportError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| ImportError::SourceMalformed(format!("could not read {path}: {e}")))?;
    parse_document(&text)
}

/// Parse SBML XML text into a document model.
pub fn parse_document(text: &str) -> Result<SbmlDocument, ImportError> {
    let doc = Document::parse(text)
        .map_err(|e| ImportError::SourceMalformed(format!("invalid XML: {e}")))?;
    let root = doc.root_element();
    if root.tag_name().name() != "sbml" {
        return Err(ImportError::SourceMalformed(format!(
            "expected <sbml> root element, found <{}>",
            root.tag_name().name()
        )));
    }

    let model_node = root
        .children()
        .filter(|c| c.is_element())
        .find(|c| c.tag_name().name() == "model")
        .ok_or_else(|| ImportError::SourceMalformed("document has no <model>".into()))?;

    Ok(SbmlDocument {
        level: attr(root, "level").and_then(|v| v.parse().ok()),
        version: attr(root, "version").and_then(|v| v.parse().ok()),
        notes: notes_text(root),
        model: parse_model(model_node),
    })
}

fn parse_model(node: Node) -> Model {
    let mut model = Model {
        id: attr(node, "id").unwrap_or_default().to_string(),
        name: attr(node, "name").map(str::to_string),
        ..Default::default()
    };

    for child in node.children().filter(|c| c.is_element()) {
        match child.tag_name().name() {
            "listOfSpecies" => {
                for sp in elements(child, "species") {
                    let sp = parse_species(sp);
                    model.species.insert(sp.id.clone(), sp);
                }
            }
            "listOfReactions" => {
                for re in elements(child, "reaction") {
                    model.reactions.push(parse_reaction(re));
                }
            }
            "listOfQualitativeSpecies" => {
                let qual = model.qual.get_or_insert_with(QualModel::default);
                for qs in elements(child, "qualitativeSpecies") {
                    qual.species.push(QualitativeSpecies {
                        id: attr(qs, "id").unwrap_or_default().to_string(),
                        name: attr(qs, "name").map(str::to_string),
                        annotations: parse_annotations(qs),
                    });
                }
            }
            "listOfTransitions" => {
                let qual = model.qual.get_or_insert_with(QualModel::default);
                for t in elements(child, "transition") {
                    qual.transitions.push(parse_transition(t));
                }
            }
            "listOfLayouts" => {
                let layout = model.layout.get_or_insert_with(LayoutModel::default);
                for l in elements(child, "layout") {
                    parse_layout(l, layout);
                }
            }
            _ => {}
        }
    }
    model
}

fn parse_species(node: Node) -> Species {
    Species {
        id: attr(node, "id").unwrap_or_default().to_string(),
        name: attr(node, "name").map(str::to_string),
        boundary_condition: attr(node, "boundaryCondition") == Some("true"),
        substance_units: attr(node, "substanceUnits").map(str::to_string),
        meta_id: attr(node, "metaid").map(str::to_string),
        annotations: parse_annotations(node),
    }
}

fn parse_reaction(node: Node) -> Reaction {
    let mut reaction = Reaction {
        id: attr(node, "id").unwrap_or_default().to_string(),
        ..Default::default()
    };
    for child in node.children().filter(|c| c.is_element()) {
        let refs = match child.tag_name().name() {
            "listOfReactants" => &mut reaction.reactants,
            "listOfProducts" => &mut reaction.products,
            "listOfModifiers" => &mut reaction.modifiers,
            _ => continue,
        };
        for r in child.children().filter(|c| c.is_element()) {
            if let Some(species) = attr(r, "species") {
                refs.push(SpeciesRef {
                    species: species.to_string(),
                    stoichiometry: attr(r, "stoichiometry").and_then(|v| v.parse().ok()),
                });
            }
        }
    }
    reaction
}

fn parse_transition(node: Node) -> Transition {
    let mut transition = Transition {
        id: attr(node, "id").unwrap_or_default().to_string(),
        ..Default::default()
    };
    for child in node.children().filter(|c| c.is_element()) {
        match child.tag_name().name() {
            "listOfInputs" => {
                for i in elements(child, "input") {
                    transition.inputs.push(TransitionInput {
                        qualitative_species: attr(i, "qualitativeSpecies")
                            .unwrap_or_default()
                            .to_string(),
                        sign: parse_sign(attr(i, "sign")),
                    });
                }
            }
            "listOfOutputs" => {
                for o in elements(child, "output") {
                    transition.outputs.push(TransitionOutput {
                        qualitative_species: attr(o, "qualitativeSpecies")
                            .unwrap_or_default()
                            .to_string(),
                    });
                }
            }
            _ => {}
        }
    }
    transition
}

fn parse_sign(value: Option<&str>) -> Sign {
    match value {
        Some("positive") => Sign::Positive,
        Some("negative") => Sign::Negative,
        Some("dual") => Sign::Dual,
        _ => Sign::Unknown,
    }
}

fn parse_layout(node: Node, layout: &mut LayoutModel) {
    for list in node
        .children()
        .filter(|c| c.is_element() && c.tag_name().name() == "listOfSpeciesGlyphs")
    {
        for glyph in elements(list, "speciesGlyph") {
            let Some(species) = attr(glyph, "species") else {
                continue;
            };
            if let Some(bounds) = parse_bounding_box(glyph) {
                layout.species_glyphs.push(SpeciesGlyphBox {
                    species: species.to_string(),
                    bounds,
                });
            }
        }
    }
}

fn parse_bounding_box(glyph: Node) -> Option<Rect> {
    let bb = glyph
        .children()
        .filter(|c| c.is_element())
        .find(|c| c.tag_name().name() == "boundingBox")?;
    let mut position = None;
    let mut dimensions = None;
    for child in bb.children().filter(|c| c.is_element()) {
        match child.tag_name().name() {
            "position" => {
                position = Some((
                    attr(child, "x").and_then(|v| v.parse().ok())?,
                    attr(child, "y").and_then(|v| v.parse().ok())?,
                ));
            }
            "dimensions" => {
                dimensions = Some((
                    attr(child, "width").and_then(|v| v.parse().ok())?,
                    attr(child, "height").and_then(|v| v.parse().ok())?,
                ));
            }
            _ => {}
        }
    }
    let ((x, y), (w, h)) = (position?, dimensions?);
    Some(Rect::from_top_left(x, y, w, h))
}

/// Collect the RDF controlled-vocabulary terms under a node's `<annotation>`.
/// Each qualifier element (e.g. `bqbiol:is`) becomes one [`CvTerm`] carrying
/// the `rdf:resource` values of its `<rdf:li>` children.
fn parse_annotations(node: Node) -> Vec<CvTerm> {
    let mut terms = Vec::new();
    let Some(annotation) = node
        .children()
        .filter(|c| c.is_element())
        .find(|c| c.tag_name().name() == "annotation")
    else {
        return terms;
    };
    for qualifier in annotation.descendants().filter(|d| d.is_element()) {
        let resources: Vec<String> = qualifier
            .descendants()
            .filter(|d| d.is_element() && d.tag_name().name() == "li")
            .filter_map(|li| attr(li, "resource"))
            .map(str::to_string)
            .collect();
        if resources.is_empty() {
            continue;
        }
        // Only direct qualifier containers, not RDF plumbing around them.
        match qualifier.tag_name().name() {
            "annotation" | "RDF" | "Description" | "Bag" | "li" => continue,
            "is" => terms.push(CvTerm {
                qualifier: Qualifier::Is,
                resources,
            }),
            other => terms.push(CvTerm {
                qualifier: Qualifier::Other(other.to_string()),
                resources,
            }),
        }
    }
    terms
}

fn notes_text(root: Node) -> Option<String> {
    let notes = root
        .children()
        .filter(|c| c.is_element())
        .find(|c| c.tag_name().name() == "notes")?;
    let text: String = notes
        .descendants()
        .filter(|d| d.is_text())
        .filter_map(|d| d.text())
        .collect::<Vec<_>>()
        .join(" ");
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() { None } else { Some(text) }
}

/// Attribute lookup by local name, ignoring namespaces so `qual:id` and
/// plain `id` both match.
fn attr<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attributes()
        .find(|a| a.name() == name)
        .map(|a| a.value())
}

fn elements<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |c| c.is_element() && c.tag_name().name() == name)
}
