use super::{BoardPoint, WorldPoint};

/// Smallest zoom factor the board allows.
pub const ZOOM_MIN: f64 = 0.5;

/// Largest zoom factor the board allows.
pub const ZOOM_MAX: f64 = 3.0;

/// Exponential response rate for wheel zoom. The factor applied per step is
/// `exp(-delta_y * WHEEL_ZOOM_RATE)`, which keeps zoom speed scale-invariant.
const WHEEL_ZOOM_RATE: f64 = 0.015;

/// Pan + zoom state of the board.
///
/// `pan_x`/`pan_y` are the board-space pixel offset of the world origin.
/// `zoom` stays within `[ZOOM_MIN, ZOOM_MAX]`; the clamp is enforced by
/// [`Viewport::zoom_about`], the only mutation path that changes it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan_x: 0.0,
            pan_y: 0.0,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    #[inline]
    pub const fn new(pan_x: f64, pan_y: f64, zoom: f64) -> Self {
        Self { pan_x, pan_y, zoom }
    }

    /// Maps a board-space point into world space.
    #[inline]
    pub fn board_to_world(self, p: BoardPoint) -> WorldPoint {
        WorldPoint::new((p.x - self.pan_x) / self.zoom, (p.y - self.pan_y) / self.zoom)
    }

    /// Maps a world-space point into board space. Exact inverse of
    /// [`board_to_world`] for any finite zoom > 0.
    #[inline]
    pub fn world_to_board(self, p: WorldPoint) -> BoardPoint {
        BoardPoint::new(p.x * self.zoom + self.pan_x, p.y * self.zoom + self.pan_y)
    }

    /// Applies one pointer-anchored wheel zoom step.
    ///
    /// The world point under `anchor` before the step is still under `anchor`
    /// after it: the pan is re-solved as `pan = anchor - world * zoom'`.
    #[must_use]
    pub fn zoom_about(self, anchor: BoardPoint, delta_y: f64) -> Viewport {
        let world = self.board_to_world(anchor);
        let zoom = (self.zoom * (-delta_y * WHEEL_ZOOM_RATE).exp()).clamp(ZOOM_MIN, ZOOM_MAX);

        Viewport {
            pan_x: anchor.x - world.x * zoom,
            pan_y: anchor.y - world.y * zoom,
            zoom,
        }
    }
}
