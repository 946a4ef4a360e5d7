//! Diagram layout algorithms.
//!
//! A layout algorithm consumes the diagram's node/edge structure and writes
//! updated node positions back in place; it never changes identifiers or
//! edge topology. Algorithms implement [`LayoutAlgorithm`] so hosts can add
//! further strategies next to the shipped force-directed one.
//!
//! - [`force`] – force-directed relaxation (repulsion, springs, drag)
//! - [`routing`] – re-attach arc endpoints to the facing glyph sides

pub mod force;
pub mod routing;

pub use force::ForceDirected;

use crate::diagram::Diagram;
use crate::geometry::Point;
use indexmap::IndexMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

// ────────────────────────────────────────────────────────────────────────────
// Cancellation
// ────────────────────────────────────────────────────────────────────────────

/// Cooperative cancellation handle for long-running layout passes. Cloneable
/// and safe to trip from another thread; the engine checks it between
/// iterations.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal(Arc<AtomicBool>);

impl CancelSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Algorithm interface
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct LayoutOptions {
    /// Restrict the layout to these node ids; `None` lays out the whole
    /// diagram. A laid-out selection is moved to the right of the remainder.
    pub selection: Option<Vec<String>>,
    /// Checked between iterations; positions committed before cancellation
    /// remain valid.
    pub cancel: Option<CancelSignal>,
    /// Re-run arc routing once positions are final.
    pub route_lines: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutReport {
    /// Simulation iterations actually run.
    pub iterations: usize,
    pub cancelled: bool,
    pub particles: usize,
}

/// A layout strategy over a node/edge subgraph.
pub trait LayoutAlgorithm {
    fn name(&self) -> &'static str;

    /// Mutate node positions in place. Must not change identifiers or edge
    /// topology. An empty subgraph is a no-op.
    fn run(&self, diagram: &mut Diagram, opts: &LayoutOptions) -> LayoutReport;
}

// ────────────────────────────────────────────────────────────────────────────
// Shared position write-back
// ────────────────────────────────────────────────────────────────────────────

/// Node ids participating in a layout pass: the host's selection if given,
/// otherwise every node in the diagram.
pub(crate) fn participant_ids(diagram: &Diagram, opts: &LayoutOptions) -> Vec<String> {
    match &opts.selection {
        Some(ids) => ids
            .iter()
            .filter(|id| diagram.node(id.as_str()).is_some())
            .cloned()
            .collect(),
        None => diagram.nodes().map(|n| n.id.clone()).collect(),
    }
}

/// Write solver positions back onto the diagram.
///
/// All positions are translated so their minima land at zero. When laying
/// out a selection, everything is additionally shifted right of the
/// rightmost extent of the non-selected remainder so the relaxed subgraph
/// does not overlap it.
pub(crate) fn apply_positions(
    diagram: &mut Diagram,
    positions: &IndexMap<String, Point>,
    selection: bool,
) {
    if positions.is_empty() {
        return;
    }

    let mut plus_x = 0.0;
    if selection {
        plus_x = diagram
            .nodes()
            .filter(|n| !positions.contains_key(&n.id))
            .map(|n| n.bounds.right())
            .fold(0.0, f64::max);
    }

    let min_x = positions.values().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let min_y = positions.values().map(|p| p.y).fold(f64::INFINITY, f64::min);

    for (id, p) in positions {
        if let Some(node) = diagram.node_mut(id) {
            let half_w = node.bounds.width / 2.0;
            let half_h = node.bounds.height / 2.0;
            node.set_center(p.x - min_x + half_w + plus_x, p.y - min_y + half_h);
        }
    }
}
