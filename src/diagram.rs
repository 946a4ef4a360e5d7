//! SBGN-style pathway diagram graph.
//!
//! The diagram is the visual counterpart of a reaction network: species
//! become data nodes, reactions become process nodes with a reactant-side and
//! a product-side port, qualitative species become state nodes, and the
//! relationships between them become arcs. Structural port-link edges tie
//! each process node to its two ports and are flagged apart from semantic
//! arcs so that export and layout can tell them apart.
//!
//! Node identifiers are derived from the source identifiers and are unique
//! within a diagram, which is what makes import→export round-trips
//! identity-preserving.

use crate::geometry::{Point, Rect};
use crate::xref::Xref;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Default width of a species glyph.
pub const DATA_NODE_WIDTH: f64 = 80.0;
/// Default height of a species glyph.
pub const DATA_NODE_HEIGHT: f64 = 30.0;
/// Side length of a process glyph; also the port offset from its center.
pub const PROCESS_NODE_SIZE: f64 = 20.0;

// ────────────────────────────────────────────────────────────────────────────
// Diagram
// ────────────────────────────────────────────────────────────────────────────

/// A pathway diagram: a set of uniquely-identified nodes plus the edges
/// connecting them, together with the document metadata needed to round-trip
/// back to SBML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagram {
    /// Diagram name; carries the source model id.
    pub name: String,
    /// SBML level of the source document, kept for re-export.
    pub sbml_level: Option<u32>,
    /// SBML version of the source document, kept for re-export.
    pub sbml_version: Option<u32>,
    /// Source document notes, carried through as an opaque comment.
    pub notes: Option<String>,
    nodes: IndexMap<String, Node>,
    pub edges: Vec<Edge>,
}

impl Diagram {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Insert a fully-constructed node. A node with a duplicate identifier is
    /// dropped with a warning; identifiers must be unique within the diagram.
    pub fn add_node(&mut self, node: Node) {
        if self.nodes.contains_key(&node.id) {
            warn!(id = %node.id, "duplicate node identifier, keeping the first");
            return;
        }
        self.nodes.insert(node.id.clone(), node);
    }

    /// Add a process node and the two structural port-link edges that tie it
    /// to its ports.
    pub fn add_process_node(&mut self, node: Node) {
        if let NodeKind::Process(ports) = &node.kind {
            for port in [&ports.reactant, &ports.product] {
                self.edges.push(Edge {
                    kind: EdgeKind::PortLink,
                    start_ref: node.id.clone(),
                    end_ref: port.id.clone(),
                    start: node.bounds.center(),
                    end: port.center(),
                });
            }
        }
        self.add_node(node);
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.values_mut()
    }

    /// Semantic arcs only (port-link edges excluded).
    pub fn arcs(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(|e| !e.is_port())
    }

    /// Map from port identifier to the identifier of the process node owning
    /// it, built from the port-link edges. Rebuilt on demand because the host
    /// may mutate the graph between calls.
    pub fn port_map(&self) -> IndexMap<String, String> {
        let mut map = IndexMap::new();
        for edge in self.edges.iter().filter(|e| e.is_port()) {
            map.insert(edge.end_ref.clone(), edge.start_ref.clone());
        }
        map
    }

    /// Whether `r` names a node or a process-node port in this diagram.
    pub fn contains_ref(&self, r: &str) -> bool {
        if self.nodes.contains_key(r) {
            return true;
        }
        self.nodes.values().any(|n| match &n.kind {
            NodeKind::Process(ports) => ports.reactant.id == r || ports.product.id == r,
            _ => false,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Nodes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub glyph_class: GlyphClass,
    pub bounds: Rect,
    pub label: Option<String>,
    pub xref: Option<Xref>,
}

impl Node {
    /// A species glyph with the default data-node size.
    pub fn data(id: impl Into<String>, glyph_class: GlyphClass, cx: f64, cy: f64) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Data,
            glyph_class,
            bounds: Rect::new(cx, cy, DATA_NODE_WIDTH, DATA_NODE_HEIGHT),
            label: None,
            xref: None,
        }
    }

    /// A process glyph for a reaction, with its reactant-side port to the
    /// left and product-side port to the right.
    pub fn process(id: impl Into<String>, cx: f64, cy: f64) -> Self {
        let id = id.into();
        let ports = ProcessPorts {
            reactant: Port {
                id: format!("{id}.reactant"),
                cx: cx - PROCESS_NODE_SIZE,
                cy,
            },
            product: Port {
                id: format!("{id}.product"),
                cx: cx + PROCESS_NODE_SIZE,
                cy,
            },
        };
        Self {
            id,
            kind: NodeKind::Process(ports),
            glyph_class: GlyphClass::Process,
            bounds: Rect::new(cx, cy, PROCESS_NODE_SIZE, PROCESS_NODE_SIZE),
            label: None,
            xref: None,
        }
    }

    /// A state glyph for a qualitative species.
    pub fn state(id: impl Into<String>, cx: f64, cy: f64) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::State,
            glyph_class: GlyphClass::BiologicalActivity,
            bounds: Rect::new(cx, cy, DATA_NODE_WIDTH, DATA_NODE_HEIGHT),
            label: None,
            xref: None,
        }
    }

    pub fn ports(&self) -> Option<&ProcessPorts> {
        match &self.kind {
            NodeKind::Process(ports) => Some(ports),
            _ => None,
        }
    }

    /// Move the node's center, dragging process-node ports along with it.
    pub fn set_center(&mut self, cx: f64, cy: f64) {
        let dx = cx - self.bounds.cx;
        let dy = cy - self.bounds.cy;
        self.bounds.cx = cx;
        self.bounds.cy = cy;
        if let NodeKind::Process(ports) = &mut self.kind {
            for port in [&mut ports.reactant, &mut ports.product] {
                port.cx += dx;
                port.cy += dy;
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Data,
    Process(ProcessPorts),
    State,
    Label,
}

/// The two connection anchors of a process node. Ports are owned by their
/// process node and have no identity outside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessPorts {
    pub reactant: Port,
    pub product: Port,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    pub id: String,
    pub cx: f64,
    pub cy: f64,
}

impl Port {
    pub fn center(&self) -> Point {
        Point::new(self.cx, self.cy)
    }
}

/// SBGN glyph class of a node. Determines how the export path interprets it
/// and gives renderers the visual category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GlyphClass {
    SimpleChemical,
    Macromolecule,
    BiologicalActivity,
    Process,
}

// ────────────────────────────────────────────────────────────────────────────
// Edges
// ────────────────────────────────────────────────────────────────────────────

/// A connector between two endpoint references (node or port identifiers).
/// `start` and `end` are rendered coordinates only; the semantic linkage
/// lives in the references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub kind: EdgeKind,
    pub start_ref: String,
    pub end_ref: String,
    pub start: Point,
    pub end: Point,
}

impl Edge {
    pub fn arc(kind: ArcClass, start_ref: impl Into<String>, end_ref: impl Into<String>, start: Point, end: Point) -> Self {
        Self {
            kind: EdgeKind::Arc(kind),
            start_ref: start_ref.into(),
            end_ref: end_ref.into(),
            start,
            end,
        }
    }

    /// True for the structural process-node-to-port edges.
    pub fn is_port(&self) -> bool {
        matches!(self.kind, EdgeKind::PortLink)
    }

    pub fn arc_class(&self) -> Option<ArcClass> {
        match self.kind {
            EdgeKind::Arc(class) => Some(class),
            EdgeKind::PortLink => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeKind {
    Arc(ArcClass),
    /// Structural edge from a process node to one of its ports.
    PortLink,
}

/// Interaction class of a semantic arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArcClass {
    Consumption,
    Production,
    Catalysis,
    Stimulation,
    PositiveInfluence,
    NegativeInfluence,
    UnknownInfluence,
}
