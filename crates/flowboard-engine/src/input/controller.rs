use std::collections::HashSet;

use crate::coords::{BoardPoint, Viewport, WorldPoint};
use crate::graph::{Edge, Node, SceneSnapshot, top_node_at_point};

use super::types::{PointerId, PressTarget, RenderBackend};

/// An in-flight board pan, keyed by the owning pointer.
///
/// Pan moves by the raw board-pixel delta since the press, which is
/// zoom-invariant because pan is stored in board pixels.
#[derive(Debug, Copy, Clone)]
struct PanTracker {
    pointer: PointerId,
    start_point: BoardPoint,
    start_pan: (f64, f64),
}

/// An in-flight node drag, keyed by the owning pointer.
///
/// `offset` is the world-space vector from the node origin to the pointer at
/// press time; it stays constant for the whole gesture so the grabbed point
/// remains under the cursor at any zoom.
#[derive(Debug, Clone)]
struct DragTracker {
    pointer: PointerId,
    node_id: String,
    offset: (f64, f64),
}

/// Owner of the canonical board state and the pointer state machine.
///
/// All mutation of `nodes`, `edges`, and `viewport` funnels through this
/// type. Mutating methods return `true` when state changed, which is the
/// host's signal to produce a frame; there is no internal render loop.
#[derive(Debug)]
pub struct BoardController {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    viewport: Viewport,
    backend: RenderBackend,
    gpu_available: bool,

    pan: Option<PanTracker>,
    drag: Option<DragTracker>,
    captured: HashSet<PointerId>,
}

impl BoardController {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>, gpu_available: bool) -> Self {
        Self {
            nodes,
            edges,
            viewport: Viewport::default(),
            backend: RenderBackend::default(),
            gpu_available,
            pan: None,
            drag: None,
            captured: HashSet::new(),
        }
    }

    // ── state access ──────────────────────────────────────────────────────

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn backend(&self) -> RenderBackend {
        self.backend
    }

    pub fn gpu_available(&self) -> bool {
        self.gpu_available
    }

    pub fn scene(&self) -> SceneSnapshot<'_> {
        SceneSnapshot {
            nodes: &self.nodes,
            edges: &self.edges,
            viewport: self.viewport,
        }
    }

    /// Id of the node currently being dragged, if any.
    pub fn dragged_node(&self) -> Option<&str> {
        self.drag.as_ref().map(|d| d.node_id.as_str())
    }

    pub fn is_panning(&self) -> bool {
        self.pan.is_some()
    }

    pub fn has_capture(&self, pointer: PointerId) -> bool {
        self.captured.contains(&pointer)
    }

    // ── render backend selection ──────────────────────────────────────────

    /// Selects a backend. Switching to the GPU backend silently falls back to
    /// the retained backend when the capability probe reported no GPU; probe
    /// success still does not guarantee that device creation will succeed.
    pub fn set_backend(&mut self, backend: RenderBackend) -> bool {
        let next = match backend {
            RenderBackend::Gpu if !self.gpu_available => {
                log::warn!("gpu backend unavailable; staying on the retained backend");
                RenderBackend::Svg
            }
            other => other,
        };

        if next == self.backend {
            return false;
        }
        self.backend = next;
        true
    }

    // ── pointer state machine ─────────────────────────────────────────────

    /// Resolves a pointer press into pan, node drag, or nothing.
    ///
    /// `point` is the press position in board space. Returns `true` when a
    /// gesture started (and the pointer was captured).
    pub fn pointer_down(&mut self, pointer: PointerId, point: BoardPoint, target: PressTarget) -> bool {
        match target {
            PressTarget::Toolbar => false,

            PressTarget::Node { id, grab_x, grab_y } => {
                // Native element hit from the retained backend; the grab
                // offset arrives in board-scale pixels.
                let zoom = self.viewport.zoom;
                self.begin_drag(pointer, id, (grab_x / zoom, grab_y / zoom))
            }

            PressTarget::Board => {
                if self.backend == RenderBackend::Gpu {
                    let world = self.viewport.board_to_world(point);
                    if let Some(node) = top_node_at_point(&self.nodes, world) {
                        let id = node.id.clone();
                        let offset = (world.x - node.position.x, world.y - node.position.y);
                        return self.begin_drag(pointer, id, offset);
                    }
                }

                let replaced = self.pan.replace(PanTracker {
                    pointer,
                    start_point: point,
                    start_pan: (self.viewport.pan_x, self.viewport.pan_y),
                });
                // A new pan supersedes an unfinished one; its pointer no
                // longer owns a gesture, so its capture goes with it.
                if let Some(old) = replaced.filter(|p| p.pointer != pointer) {
                    self.release(old.pointer);
                }
                self.capture(pointer);
                true
            }
        }
    }

    /// Routes a pointer move to whichever tracker owns the pointer.
    pub fn pointer_move(&mut self, pointer: PointerId, point: BoardPoint) -> bool {
        if self.drag.as_ref().is_some_and(|d| d.pointer == pointer) {
            let world = self.viewport.board_to_world(point);
            return self.drag_to(world);
        }

        let Some(pan) = self.pan.filter(|p| p.pointer == pointer) else {
            return false;
        };

        self.viewport.pan_x = pan.start_pan.0 + (point.x - pan.start_point.x);
        self.viewport.pan_y = pan.start_pan.1 + (point.y - pan.start_point.y);
        true
    }

    /// Finalizes any gesture owned by the pointer. Shared by pointer-up and
    /// pointer-cancel; capture is released exactly once per transition.
    pub fn pointer_up(&mut self, pointer: PointerId) -> bool {
        let mut handled = false;

        if self.drag.as_ref().is_some_and(|d| d.pointer == pointer) {
            self.drag = None;
            handled = true;
        }

        if self.pan.is_some_and(|p| p.pointer == pointer) {
            self.pan = None;
            handled = true;
        }

        if handled {
            self.release(pointer);
        }
        handled
    }

    pub fn pointer_cancel(&mut self, pointer: PointerId) -> bool {
        self.pointer_up(pointer)
    }

    /// Applies one pointer-anchored wheel zoom step at `point`.
    pub fn wheel(&mut self, point: BoardPoint, delta_y: f64) -> bool {
        self.viewport = self.viewport.zoom_about(point, delta_y);
        true
    }

    // ── drag core ─────────────────────────────────────────────────────────

    // Both press paths (native element hit and world-space hit test) funnel
    // into this pair, so drag semantics cannot diverge between backends.

    fn begin_drag(&mut self, pointer: PointerId, node_id: String, offset: (f64, f64)) -> bool {
        if !self.nodes.iter().any(|n| n.id == node_id) {
            return false;
        }

        let replaced = self.drag.replace(DragTracker {
            pointer,
            node_id,
            offset,
        });
        if let Some(old) = replaced.filter(|d| d.pointer != pointer) {
            self.release(old.pointer);
        }
        self.capture(pointer);
        true
    }

    fn drag_to(&mut self, world: WorldPoint) -> bool {
        let Some(drag) = self.drag.as_ref() else {
            return false;
        };

        let position = WorldPoint::new(world.x - drag.offset.0, world.y - drag.offset.1);
        if let Some(node) = self.nodes.iter_mut().find(|n| n.id == drag.node_id) {
            node.position = position;
            return true;
        }
        false
    }

    // ── pointer capture ───────────────────────────────────────────────────

    fn capture(&mut self, pointer: PointerId) {
        self.captured.insert(pointer);
    }

    fn release(&mut self, pointer: PointerId) {
        debug_assert!(
            self.captured.contains(&pointer),
            "released a pointer that was never captured"
        );
        self.captured.remove(&pointer);
    }
}
