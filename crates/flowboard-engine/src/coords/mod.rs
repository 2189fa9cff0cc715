//! Coordinate spaces shared by every renderer.
//!
//! Canonical spaces:
//! - Board: pixels relative to the canvas host's top-left corner, before
//!   pan/zoom (origin top-left, +X right, +Y down).
//! - World: logical graph coordinates; `board = world * zoom + pan`.
//!
//! All conversions are pure; the viewport owns the pan/zoom state they read.

mod host;
mod point;
mod viewport;

pub use host::{HostRect, board_point_from_client};
pub use point::{BoardPoint, WorldPoint};
pub use viewport::{Viewport, ZOOM_MAX, ZOOM_MIN};
