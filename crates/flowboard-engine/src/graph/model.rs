use crate::coords::WorldPoint;

/// A node on the board.
///
/// `position` is the world-space top-left corner. Only the interaction
/// controller mutates it (during a drag); renderers see read-only snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub position: WorldPoint,
    pub width: f64,
    pub height: f64,
}

impl Node {
    pub fn new(id: impl Into<String>, position: WorldPoint, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            position,
            width,
            height,
        }
    }

    /// World-space center, the anchor used for edge curves.
    #[inline]
    pub fn center(&self) -> WorldPoint {
        WorldPoint::new(
            self.position.x + self.width / 2.0,
            self.position.y + self.height / 2.0,
        )
    }
}

/// A connection between two nodes, immutable after creation.
///
/// An endpoint id that does not resolve against the current node set simply
/// suppresses the edge's draw; it is expected transient state, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl Edge {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }
}
