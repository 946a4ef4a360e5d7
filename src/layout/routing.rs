//! Arc routing: snap rendered endpoints to the facing sides of the glyphs.
//!
//! After node positions change, each arc's start and end points are
//! recomputed to attach to whichever pair of facing sides leaves the larger
//! clear gap: a dominant horizontal gap attaches left/right faces, otherwise
//! (including ties) the arc attaches top/bottom faces. Endpoints naming a
//! port are routed against the port's process node.

use crate::diagram::Diagram;
use crate::geometry::{Point, Rect};

/// Recompute the rendered endpoints of every semantic arc. Old endpoint
/// geometry is discarded wholesale; references are untouched.
pub fn route_arcs(diagram: &mut Diagram) {
    let ports = diagram.port_map();
    let resolve = |r: &str| {
        diagram
            .node(r)
            .or_else(|| ports.get(r).and_then(|owner| diagram.node(owner)))
    };

    let updates: Vec<(usize, Point, Point)> = diagram
        .edges
        .iter()
        .enumerate()
        .filter(|(_, e)| !e.is_port())
        .filter_map(|(i, e)| {
            let start = resolve(&e.start_ref)?.bounds;
            let end = resolve(&e.end_ref)?.bounds;
            let (s, t) = attach_points(start, end);
            Some((i, s, t))
        })
        .collect();

    for (i, s, t) in updates {
        let edge = &mut diagram.edges[i];
        edge.start = s;
        edge.end = t;
    }
}

/// Choose attachment points on two boxes: the pair of facing sides with the
/// larger clear gap wins; vertical wins ties.
pub fn attach_points(start: Rect, end: Rect) -> (Point, Point) {
    let (gap_x, start_left_of_end) = if start.cx < end.cx {
        (end.left() - start.right(), true)
    } else {
        (start.left() - end.right(), false)
    };
    let (gap_y, start_above_end) = if start.cy < end.cy {
        (end.top() - start.bottom(), true)
    } else {
        (start.top() - end.bottom(), false)
    };

    if gap_x > gap_y {
        if start_left_of_end {
            (
                Point::new(start.right(), start.cy),
                Point::new(end.left(), end.cy),
            )
        } else {
            (
                Point::new(start.left(), start.cy),
                Point::new(end.right(), end.cy),
            )
        }
    } else if start_above_end {
        (
            Point::new(start.cx, start.bottom()),
            Point::new(end.cx, end.top()),
        )
    } else {
        (
            Point::new(start.cx, start.top()),
            Point::new(end.cx, end.bottom()),
        )
    }
}
