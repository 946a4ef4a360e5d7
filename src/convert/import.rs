//! Import direction: SBML reaction network → pathway diagram.
//!
//! Reactions are converted first (process node + port arcs per reference),
//! then species no reaction touched, then the qualitative layer, and finally
//! the layout extension overrides whatever positions were guessed. Every
//! created node is annotated through the cross-reference resolver where the
//! source species carries an `is` CV term.

use crate::convert::placement::PlacementCursor;
use crate::convert::{CHAIN_STEP, MODIFIER_OFFSET, SPECIES_OFFSET, STACK_STEP};
use crate::diagram::{ArcClass, Diagram, Edge, GlyphClass, Node, PROCESS_NODE_SIZE};
use crate::geometry::Point;
use crate::model::{Reaction, SbmlDocument, Sign};
use crate::xref::{DatasourceRegistry, resolve_uri};
use tracing::warn;

/// Convert a parsed SBML document into a fresh diagram.
pub fn import_document(doc: &SbmlDocument, registry: &dyn DatasourceRegistry) -> Diagram {
    Importer {
        doc,
        registry,
        diagram: Diagram::new(doc.model.id.clone()),
        cursor: PlacementCursor::new(),
    }
    .run()
}

/// One import session. Owns the diagram it is building; nothing is shared
/// with other sessions.
struct Importer<'a> {
    doc: &'a SbmlDocument,
    registry: &'a dyn DatasourceRegistry,
    diagram: Diagram,
    cursor: PlacementCursor,
}

impl Importer<'_> {
    fn run(mut self) -> Diagram {
        self.diagram.sbml_level = Some(self.doc.level_or_default());
        self.diagram.sbml_version = Some(self.doc.version_or_default());
        self.diagram.notes = self.doc.notes.clone();

        self.do_reactions();
        self.do_species();
        self.do_qual();
        self.do_layout();
        self.diagram
    }

    // ── Reactions ──────────────────────────────────────────────────────────

    fn do_reactions(&mut self) {
        for re in &self.doc.model.reactions {
            if re.id.is_empty() {
                warn!("reaction without id, skipping");
                continue;
            }
            let pos = self.process_position(re);
            let (x, y) = (pos.x, pos.y);

            let process = Node::process(re.id.clone(), x, y);
            let Some(ports) = process.ports().cloned() else {
                continue;
            };
            self.diagram.add_process_node(process);

            // Products stack downward to the right of the process node; the
            // production arc runs from the product-side port to the glyph.
            let mut yy = y;
            for j in &re.products {
                if let Some(sid) = self.create_or_get_species(
                    &j.species,
                    x + SPECIES_OFFSET,
                    yy,
                    GlyphClass::SimpleChemical,
                ) {
                    let target = self.diagram.node(&sid).map(|n| n.bounds).unwrap_or_default();
                    self.diagram.edges.push(Edge::arc(
                        ArcClass::Production,
                        ports.product.id.clone(),
                        sid,
                        Point::new(x + PROCESS_NODE_SIZE, y),
                        Point::new(target.left(), target.cy),
                    ));
                }
                yy += STACK_STEP;
            }

            // Reactants stack downward to the left; the consumption arc runs
            // from the glyph into the reactant-side port.
            let mut yy = y;
            for j in &re.reactants {
                if let Some(sid) = self.create_or_get_species(
                    &j.species,
                    x - SPECIES_OFFSET,
                    yy,
                    GlyphClass::SimpleChemical,
                ) {
                    let source = self.diagram.node(&sid).map(|n| n.bounds).unwrap_or_default();
                    self.diagram.edges.push(Edge::arc(
                        ArcClass::Consumption,
                        sid,
                        ports.reactant.id.clone(),
                        Point::new(source.right(), source.cy),
                        Point::new(x - PROCESS_NODE_SIZE, y),
                    ));
                }
                yy += STACK_STEP;
            }

            // Modifiers sit above and connect to the process node itself,
            // not to a port.
            for j in &re.modifiers {
                if let Some(sid) = self.create_or_get_species(
                    &j.species,
                    x,
                    y - MODIFIER_OFFSET,
                    GlyphClass::Macromolecule,
                ) {
                    let source = self.diagram.node(&sid).map(|n| n.bounds).unwrap_or_default();
                    self.diagram.edges.push(Edge::arc(
                        ArcClass::Catalysis,
                        sid,
                        re.id.clone(),
                        Point::new(source.cx, source.bottom()),
                        Point::new(x, y),
                    ));
                }
            }
        }
    }

    /// Initial position for a reaction's process node. If some reactant is
    /// already materialized, the process node goes `CHAIN_STEP` to its right
    /// at the same height so chains keep flowing left to right; otherwise the
    /// placement cursor decides.
    fn process_position(&mut self, re: &Reaction) -> Point {
        for j in &re.reactants {
            if let Some(existing) = self.diagram.node(&j.species) {
                return Point::new(existing.bounds.cx + CHAIN_STEP, existing.bounds.cy);
            }
        }
        self.cursor.next()
    }

    /// Materialize a species glyph, or reuse the one already in the diagram.
    /// Returns the node id, or `None` when the reference has no usable id.
    fn create_or_get_species(
        &mut self,
        sid: &str,
        pref_x: f64,
        pref_y: f64,
        glyph_class: GlyphClass,
    ) -> Option<String> {
        if sid.is_empty() {
            warn!("species reference without id, skipping");
            return None;
        }
        if self.diagram.node(sid).is_some() {
            return Some(sid.to_string());
        }

        let mut node = Node::data(sid, glyph_class, pref_x, pref_y);
        node.label = Some(sid.to_string());
        if let Some(sp) = self.doc.model.species.get(sid) {
            self.annotate(&mut node, sp.first_is_resource());
        }
        self.diagram.add_node(node);
        Some(sid.to_string())
    }

    // ── Remaining species ──────────────────────────────────────────────────

    /// Species no reaction referenced still get a bare glyph each.
    fn do_species(&mut self) {
        let unplaced: Vec<String> = self
            .doc
            .model
            .species
            .keys()
            .filter(|sid| self.diagram.node(sid).is_none())
            .cloned()
            .collect();
        for sid in unplaced {
            let pos = self.cursor.next();
            self.create_or_get_species(&sid, pos.x, pos.y, GlyphClass::BiologicalActivity);
        }
    }

    // ── Qualitative extension ──────────────────────────────────────────────

    fn do_qual(&mut self) {
        let Some(qual) = &self.doc.model.qual else {
            return;
        };

        for qs in &qual.species {
            if qs.id.is_empty() {
                warn!("qualitative species without id, skipping");
                continue;
            }
            let pos = self.cursor.next();
            let mut node = Node::state(qs.id.clone(), pos.x, pos.y);
            node.label = qs.name.clone().or_else(|| Some(qs.id.clone()));
            let resource = qs.first_is_resource();
            self.annotate(&mut node, resource);
            self.diagram.add_node(node);
        }

        for t in &qual.transitions {
            if t.inputs.len() != 1 || t.outputs.len() != 1 {
                warn!(
                    transition = %t.id,
                    inputs = t.inputs.len(),
                    outputs = t.outputs.len(),
                    "transition is not 1-input/1-output, skipping"
                );
                continue;
            }
            let input = &t.inputs[0];
            let output = &t.outputs[0];
            let (Some(start), Some(end)) = (
                self.diagram.node(&input.qualitative_species).map(|n| n.bounds),
                self.diagram.node(&output.qualitative_species).map(|n| n.bounds),
            ) else {
                warn!(transition = %t.id, "missing input or output qualitative species");
                continue;
            };
            let class = match input.sign {
                Sign::Positive => ArcClass::PositiveInfluence,
                Sign::Negative => ArcClass::NegativeInfluence,
                Sign::Dual | Sign::Unknown => ArcClass::UnknownInfluence,
            };
            self.diagram.edges.push(Edge::arc(
                class,
                input.qualitative_species.clone(),
                output.qualitative_species.clone(),
                start.center(),
                end.center(),
            ));
        }
    }

    // ── Layout extension ───────────────────────────────────────────────────

    /// Bounding boxes from the layout extension override the guessed
    /// positions and sizes.
    fn do_layout(&mut self) {
        let Some(layout) = &self.doc.model.layout else {
            return;
        };
        for glyph in &layout.species_glyphs {
            match self.diagram.node_mut(&glyph.species) {
                Some(node) => node.bounds = glyph.bounds,
                None => warn!(species = %glyph.species, "layout glyph for unknown species"),
            }
        }
    }

    // ── Annotation ─────────────────────────────────────────────────────────

    fn annotate(&self, node: &mut Node, resource: Option<&str>) {
        let Some(uri) = resource else { return };
        match resolve_uri(uri, self.registry) {
            Some(xref) => node.xref = Some(xref),
            None => warn!(node = %node.id, uri, "could not resolve annotation to an xref"),
        }
    }
}
