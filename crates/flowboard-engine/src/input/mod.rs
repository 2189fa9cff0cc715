//! Pointer interaction subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types; the
//! studio shell translates window-system events into the calls on
//! [`BoardController`].

mod controller;
mod types;

pub use controller::BoardController;
pub use types::{PointerId, PressTarget, RenderBackend};
