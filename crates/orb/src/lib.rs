//! GPU-free core of the reactive orb.
//!
//! The orb is a single translucent sphere whose surface undulates over time,
//! tinted by a brand colour and lit by a fixed two-light rig. This crate owns
//! everything that can be reasoned about without a graphics device:
//!
//! ```text
//!   OrbConfig ──▶ OrbComponent::initialize(container, factory)
//!                      │
//!                      ├─ advance(dt) ──▶ RenderState (time, drift, bob)
//!                      ├─ resize(..)  ──▶ breakpoint scale, render target
//!                      ├─ pointer_moved(..) ──▶ eased pointer influence
//!                      └─ render() ──▶ RenderSurface::render(FrameParams)
//! ```
//!
//! [`shading`] mirrors the WGSL shader so the wave field and lighting can be
//! tested as plain functions. Graphics backends implement [`SurfaceFactory`]
//! and [`RenderSurface`]; see the `renderer` crate for the wgpu one.

pub mod component;
pub mod config;
pub mod geometry;
pub mod palette;
pub mod responsive;
pub mod shading;
pub mod state;

pub use component::{
    ContainerHandle, OrbComponent, OrbError, Phase, RenderSurface, SceneSetup, SurfaceFactory,
};
pub use config::{
    Breakpoint, CameraConfig, ConfigError, MotionConfig, OrbConfig, PointerConfig,
    TessellationConfig,
};
pub use geometry::SphereMesh;
pub use palette::BrandColor;
pub use responsive::RenderTarget;
pub use shading::WaveParams;
pub use state::{ContainerRect, FrameParams, RenderState};
