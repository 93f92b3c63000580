use glam::Vec2;

use crate::config::OrbConfig;
use crate::geometry::SphereMesh;
use crate::responsive::{pixel_ratio, segments_for_width, RenderTarget};
use crate::state::{ContainerRect, FrameParams, RenderState};

/// Reasons the orb declines to start. Neither is surfaced to the user; the
/// component logs once and stays [`Phase::Uninitialized`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrbError {
    #[error("3D graphics capability unavailable: {0}")]
    CapabilityMissing(String),
    #[error("container '{0}' not found")]
    ContainerMissing(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Ready,
    Animating,
}

/// The element the orb renders into, measured at construction time.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerHandle {
    pub id: String,
    /// Client width in logical pixels.
    pub width: u32,
    /// Client height in logical pixels.
    pub height: u32,
    /// Height of the surrounding viewport in logical pixels.
    pub viewport_height: u32,
    /// Raw device pixel ratio reported by the host.
    pub device_pixel_ratio: f64,
}

/// What a backend needs to build its surface.
pub struct SceneSetup<'a> {
    pub config: &'a OrbConfig,
    pub mesh: &'a SphereMesh,
    pub target: RenderTarget,
    pub pixel_ratio: f32,
}

/// A drawable surface owned by the component once setup succeeds.
pub trait RenderSurface {
    type Error: std::error::Error + Send + Sync + 'static;

    fn resize(&mut self, target: RenderTarget, pixel_ratio: f32);

    fn render(&mut self, frame: &FrameParams) -> Result<(), Self::Error>;
}

/// Creates surfaces for a graphics backend.
pub trait SurfaceFactory {
    type Surface: RenderSurface;

    /// Reports whether the host offers a usable 3D graphics capability.
    fn detect(&mut self) -> Result<(), OrbError>;

    fn create(
        &mut self,
        container: &ContainerHandle,
        setup: &SceneSetup<'_>,
    ) -> Result<Self::Surface, OrbError>;
}

/// One orb instance bound to one container.
///
/// All entry points are no-ops while the component is uninitialized, so hosts
/// can wire events unconditionally.
pub struct OrbComponent<S> {
    phase: Phase,
    state: RenderState,
    surface: Option<S>,
    segments: u32,
    pixel_ratio: f32,
    skipped: Option<OrbError>,
}

impl<S: RenderSurface> OrbComponent<S> {
    pub fn initialize<F>(
        config: OrbConfig,
        container: Option<ContainerHandle>,
        factory: &mut F,
    ) -> Self
    where
        F: SurfaceFactory<Surface = S>,
    {
        let mut component = Self {
            phase: Phase::Uninitialized,
            state: RenderState::new(config),
            surface: None,
            segments: 0,
            pixel_ratio: 1.0,
            skipped: None,
        };

        if let Err(err) = component.setup(container, factory) {
            tracing::warn!(error = %err, "orb setup skipped");
            component.skipped = Some(err);
        }
        component
    }

    fn setup<F>(
        &mut self,
        container: Option<ContainerHandle>,
        factory: &mut F,
    ) -> Result<(), OrbError>
    where
        F: SurfaceFactory<Surface = S>,
    {
        factory.detect()?;
        let config = self.state.config().clone();
        let container =
            container.ok_or_else(|| OrbError::ContainerMissing(config.container_id.clone()))?;

        self.segments = segments_for_width(container.width, &config.tessellation);
        self.pixel_ratio = pixel_ratio(container.device_pixel_ratio, config.max_pixel_ratio);
        let target = self
            .state
            .resize(container.width, container.height, container.viewport_height);
        let mesh = SphereMesh::uv_sphere(1.0, self.segments, self.segments);

        let setup = SceneSetup {
            config: &config,
            mesh: &mesh,
            target,
            pixel_ratio: self.pixel_ratio,
        };
        let mut surface = factory.create(&container, &setup)?;
        surface.resize(target, self.pixel_ratio);

        tracing::info!(
            container = %container.id,
            width = target.width,
            height = target.height,
            segments = self.segments,
            scale = self.state.orb_scale(),
            "orb ready"
        );
        self.surface = Some(surface);
        self.phase = Phase::Ready;
        Ok(())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Why setup was skipped, if it was.
    pub fn skipped(&self) -> Option<&OrbError> {
        self.skipped.as_ref()
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    /// Sphere segments chosen at start-up; fixed for the component's life.
    pub fn segments(&self) -> u32 {
        self.segments
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    pub fn advance(&mut self, dt: f32) {
        if self.phase == Phase::Uninitialized {
            return;
        }
        self.state.advance(dt);
        self.phase = Phase::Animating;
    }

    pub fn render(&mut self) -> Result<(), S::Error> {
        let Some(surface) = self.surface.as_mut() else {
            return Ok(());
        };
        surface.render(&self.state.frame())
    }

    /// Re-measures the container; tessellation is left untouched.
    pub fn resize(
        &mut self,
        container_width: u32,
        container_height: u32,
        viewport_height: u32,
        device_pixel_ratio: f64,
    ) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        self.pixel_ratio = pixel_ratio(device_pixel_ratio, self.state.config().max_pixel_ratio);
        let target = self
            .state
            .resize(container_width, container_height, viewport_height);
        surface.resize(target, self.pixel_ratio);
        tracing::debug!(
            width = target.width,
            height = target.height,
            scale = self.state.orb_scale(),
            pixel_ratio = self.pixel_ratio,
            "orb resized"
        );
    }

    pub fn pointer_moved(&mut self, pointer: Vec2, bounds: &ContainerRect) {
        if self.phase == Phase::Uninitialized {
            return;
        }
        self.state.pointer_moved(pointer, bounds);
    }
}
