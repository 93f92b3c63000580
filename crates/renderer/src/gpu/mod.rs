//! wgpu backend for the orb.
//!
//! - `context` owns surface/adapter/device wiring and picks the swapchain
//!   format, alpha mode, and MSAA sample count.
//! - `pipeline` builds the single WGSL render pipeline with a depth buffer.
//! - `mesh` uploads the tessellated sphere once.
//! - `uniforms` packs [`orb::FrameParams`] into the shader's uniform block.
//! - `state` glues everything together as an [`orb::RenderSurface`] and
//!   provides the matching [`orb::SurfaceFactory`].

mod context;
mod mesh;
mod pipeline;
mod state;
mod uniforms;

pub use state::{GpuState, WgpuSurfaceFactory};
