//! GPU rendering subsystem.
//!
//! The tessellator (`scene`) turns a board snapshot into flat vertex meshes;
//! `buffers` owns the growable GPU vertex buffers they stream into; `runtime`
//! owns device, pipelines, and the per-frame draw pass; `slot` tracks the
//! runtime's asynchronous lifecycle.
//!
//! Convention:
//! - CPU geometry is produced in physical pixels (top-left origin, +Y down).
//! - Vertex shaders convert to NDC using a resolution uniform.

mod buffers;
mod mesh;
mod runtime;
mod scene;
mod slot;

pub use buffers::DynamicVertexBuffer;
pub use mesh::{EdgeVertex, NodeVertex};
pub use runtime::GpuRenderer;
pub use scene::{EDGE_SEGMENTS, SceneVertices, tessellate_scene};
pub use slot::{RuntimeSlot, RuntimeStatus, Teardown};
