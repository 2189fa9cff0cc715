//! Flowboard engine crate.
//!
//! This crate owns the board model and both render backends used by the
//! studio shell: the coordinate/viewport math, graph geometry, the pointer
//! interaction state machine, the wgpu device + render runtime, and the
//! retained-mode SVG backend.

pub mod assistant;
pub mod coords;
pub mod device;
pub mod graph;
pub mod input;
pub mod logging;
pub mod render;
pub mod svg;
