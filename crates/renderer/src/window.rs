use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Result};
use glam::Vec2;
use orb::{ContainerHandle, ContainerRect, OrbComponent, Phase};
use tracing::{error, info, warn};
use winit::dpi::{LogicalSize, PhysicalPosition, PhysicalSize};
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use crate::gpu::{GpuState, WgpuSurfaceFactory};
use crate::types::RendererConfig;

/// Wall-clock frame delta source. The first tick reports zero.
#[derive(Debug, Default)]
pub(crate) struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub(crate) fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    pub(crate) fn tick_at(&mut self, now: Instant) -> f32 {
        let dt = self
            .last
            .map(|last| now.saturating_duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last = Some(now);
        dt
    }
}

/// The window plays the part of both container and viewport: its logical
/// size drives breakpoints, and its scale factor is the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct WindowMetrics {
    pub physical: PhysicalSize<u32>,
    pub scale_factor: f64,
}

impl WindowMetrics {
    pub(crate) fn of(window: &Window) -> Self {
        Self {
            physical: window.inner_size(),
            scale_factor: window.scale_factor(),
        }
    }

    pub(crate) fn logical(&self) -> LogicalSize<u32> {
        self.physical.to_logical(self.scale_factor)
    }

    pub(crate) fn container(&self, id: &str) -> ContainerHandle {
        let logical = self.logical();
        ContainerHandle {
            id: id.to_string(),
            width: logical.width,
            height: logical.height,
            viewport_height: logical.height,
            device_pixel_ratio: self.scale_factor,
        }
    }

    pub(crate) fn bounds(&self) -> ContainerRect {
        let logical = self.logical();
        ContainerRect::from_size(logical.width as f32, logical.height as f32)
    }

    pub(crate) fn pointer(&self, position: PhysicalPosition<f64>) -> Vec2 {
        let logical = position.to_logical::<f64>(self.scale_factor);
        Vec2::new(logical.x as f32, logical.y as f32)
    }
}

pub(crate) fn run_window(config: RendererConfig) -> Result<()> {
    let event_loop = EventLoop::new().map_err(|err| anyhow!("failed to create event loop: {err}"))?;

    let (width, height) = config.window_size;
    let window = WindowBuilder::new()
        .with_title(config.title.clone())
        .with_inner_size(LogicalSize::new(width, height))
        .with_transparent(true)
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create orb window: {err}"))?;
    let window = Arc::new(window);

    let mut metrics = WindowMetrics::of(&window);
    let container = metrics.container(&config.orb.container_id);
    let mut factory = WgpuSurfaceFactory::new(window.clone(), config.antialiasing);
    let mut orb: OrbComponent<GpuState> =
        OrbComponent::initialize(config.orb.clone(), Some(container), &mut factory);

    if orb.phase() == Phase::Uninitialized {
        info!("orb unavailable on this system; window left blank");
    }

    let mut clock = FrameClock::default();
    let run_result = event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                elwt.exit();
            }
            WindowEvent::Resized(new_size) => {
                metrics.physical = new_size;
                resize_orb(&mut orb, &metrics);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                metrics.scale_factor = scale_factor;
                metrics.physical = window.inner_size();
                resize_orb(&mut orb, &metrics);
            }
            WindowEvent::CursorMoved { position, .. } => {
                orb.pointer_moved(metrics.pointer(position), &metrics.bounds());
            }
            WindowEvent::RedrawRequested => {
                orb.advance(clock.tick());
                match orb.render() {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        if let Some(surface) = orb.surface_mut() {
                            surface.recover();
                        }
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        error!("surface out of memory; closing orb window");
                        elwt.exit();
                    }
                    Err(wgpu::SurfaceError::Timeout) => {
                        warn!("surface timeout; retrying next frame");
                    }
                    Err(other) => {
                        warn!("surface error: {other:?}; retrying next frame");
                    }
                }
            }
            _ => {}
        },
        Event::AboutToWait => {
            if orb.phase() != Phase::Uninitialized {
                window.request_redraw();
            }
            elwt.set_control_flow(ControlFlow::Wait);
        }
        _ => {}
    });

    run_result.map_err(|err| anyhow!("window event loop error: {err}"))
}

fn resize_orb(orb: &mut OrbComponent<GpuState>, metrics: &WindowMetrics) {
    let logical = metrics.logical();
    orb.resize(
        logical.width,
        logical.height,
        logical.height,
        metrics.scale_factor,
    );
}
