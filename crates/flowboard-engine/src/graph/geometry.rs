use std::collections::HashMap;

use crate::coords::WorldPoint;

use super::Node;

/// Fraction of the horizontal delta used for the curve's tangent handles.
const TANGENT_FRACTION: f64 = 0.35;

/// Control points of a cubic edge curve in world space:
/// `(sx,sy) -> (x1,y1) -> (x2,y2) -> (tx,ty)`.
///
/// Derived per frame from the two endpoint nodes; never persisted.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EdgeCurve {
    pub sx: f64,
    pub sy: f64,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub tx: f64,
    pub ty: f64,
}

/// Builds an id -> node lookup for one node-list snapshot.
///
/// Ids are expected to be unique; on a duplicate the last entry wins.
pub fn node_index(nodes: &[Node]) -> HashMap<&str, &Node> {
    nodes.iter().map(|node| (node.id.as_str(), node)).collect()
}

/// Constructs the cubic curve between two node centers.
///
/// The tangent handles extend horizontally by `TANGENT_FRACTION` of the
/// horizontal center delta, so swapping source and target mirrors the curve
/// rather than reproducing it.
pub fn edge_curve(source: &Node, target: &Node) -> EdgeCurve {
    let s = source.center();
    let t = target.center();
    let dx = t.x - s.x;

    EdgeCurve {
        sx: s.x,
        sy: s.y,
        x1: s.x + dx * TANGENT_FRACTION,
        y1: s.y,
        x2: t.x - dx * TANGENT_FRACTION,
        y2: t.y,
        tx: t.x,
        ty: t.y,
    }
}

/// Inclusive axis-aligned bounds test in world space.
#[inline]
pub fn point_in_node(p: WorldPoint, node: &Node) -> bool {
    p.x >= node.position.x
        && p.x <= node.position.x + node.width
        && p.y >= node.position.y
        && p.y <= node.position.y + node.height
}

/// Returns the topmost node under a world point.
///
/// Scans last-to-first so the most recently added node wins on overlap;
/// z-order is the array order.
pub fn top_node_at_point(nodes: &[Node], p: WorldPoint) -> Option<&Node> {
    nodes.iter().rev().find(|node| point_in_node(p, node))
}

/// Evaluates the cubic at `t` in `[0, 1]` via Bernstein coefficients.
pub fn bezier_point(t: f64, curve: &EdgeCurve) -> WorldPoint {
    let omt = 1.0 - t;
    let omt2 = omt * omt;
    let omt3 = omt2 * omt;
    let t2 = t * t;
    let t3 = t2 * t;

    WorldPoint::new(
        omt3 * curve.sx + 3.0 * omt2 * t * curve.x1 + 3.0 * omt * t2 * curve.x2 + t3 * curve.tx,
        omt3 * curve.sy + 3.0 * omt2 * t * curve.y1 + 3.0 * omt * t2 * curve.y2 + t3 * curve.ty,
    )
}
