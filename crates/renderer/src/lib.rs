//! Native renderer for the reactive orb.
//!
//! The crate hosts an [`orb::OrbComponent`] inside a winit window and draws it
//! with wgpu. The overall flow is:
//!
//! ```text
//!   CLI / nixorb
//!          │ RendererConfig
//!          ▼
//!   Renderer::run ──▶ WgpuSurfaceFactory ──▶ OrbComponent::initialize
//!                                                   │
//!   winit event loop ── Resized ──▶ resize()        │
//!                    ── CursorMoved ──▶ pointer_moved()
//!                    ── RedrawRequested ──▶ advance(dt) ─▶ render() ─▶ GPU UBO
//! ```
//!
//! When no adapter or surface can be created the component stays
//! uninitialized and the window simply shows nothing.

mod gpu;
mod types;
mod window;

use anyhow::Result;

pub use gpu::{GpuState, WgpuSurfaceFactory};
pub use types::{Antialiasing, RendererConfig};

/// High-level entry point that owns the chosen configuration.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Opens the orb window and blocks until it is closed.
    ///
    /// Returns an error only when the event loop or window cannot be created;
    /// missing GPU support is logged and leaves the window blank.
    pub fn run(&mut self) -> Result<()> {
        window::run_window(self.config.clone())
    }
}
