//! GPU device + surface management.
//!
//! This module is responsible for:
//! - probing platform GPU capability
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain)
//! - acquiring frames and providing encoders/views for rendering

mod gpu;

pub use gpu::{Gpu, GpuFrame, SurfaceErrorAction, gpu_available};
