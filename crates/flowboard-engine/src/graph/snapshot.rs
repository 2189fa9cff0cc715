use crate::coords::Viewport;

use super::{Edge, Node};

/// Read-only view of the canonical board state for one frame.
///
/// The interaction controller owns the state; each backend consumes a
/// snapshot and produces output without mutating anything.
#[derive(Debug, Copy, Clone)]
pub struct SceneSnapshot<'a> {
    pub nodes: &'a [Node],
    pub edges: &'a [Edge],
    pub viewport: Viewport,
}
