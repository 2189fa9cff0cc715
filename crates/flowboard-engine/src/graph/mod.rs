//! Graph model and geometry.
//!
//! Nodes and edges are the canonical scene content; everything here is pure
//! and renderer-agnostic. Hit-testing and curve construction live in
//! `geometry`, the read-only per-frame view in `snapshot`.

mod geometry;
mod model;
mod snapshot;

pub use geometry::{
    EdgeCurve, bezier_point, edge_curve, node_index, point_in_node, top_node_at_point,
};
pub use model::{Edge, Node};
pub use snapshot::SceneSnapshot;
