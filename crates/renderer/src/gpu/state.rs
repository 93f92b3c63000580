use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use orb::{
    ContainerHandle, FrameParams, OrbError, RenderSurface, RenderTarget, SceneSetup,
    SurfaceFactory,
};
use tracing::{debug, warn};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::types::Antialiasing;

use super::context::GpuContext;
use super::mesh::MeshBuffers;
use super::pipeline::{OrbPipeline, DEPTH_FORMAT};
use super::uniforms::{OrbUniforms, UNIFORM_SIZE};

/// Clear to transparent so the page (or desktop) shows around the orb.
const CLEAR_COLOR: wgpu::Color = wgpu::Color::TRANSPARENT;

struct AttachmentTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl AttachmentTarget {
    fn new(
        device: &wgpu::Device,
        label: &str,
        format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
        sample_count: u32,
    ) -> Self {
        let extent = wgpu::Extent3d {
            width: size.width.max(1),
            height: size.height.max(1),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: extent,
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

/// wgpu-backed [`RenderSurface`] for one orb.
pub struct GpuState {
    context: GpuContext,
    pipeline: OrbPipeline,
    mesh: MeshBuffers,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    multisample_target: Option<AttachmentTarget>,
    depth_target: AttachmentTarget,
    last_stats_update: Instant,
    frames_since_stats: u32,
}

impl GpuState {
    pub(crate) fn new(
        instance: &wgpu::Instance,
        window: Arc<Window>,
        setup: &SceneSetup<'_>,
        antialiasing: Antialiasing,
    ) -> Result<Self> {
        let (width, height) = setup.target.physical(setup.pixel_ratio);
        let context = GpuContext::new(
            instance,
            window,
            PhysicalSize::new(width, height),
            antialiasing,
        )?;

        let pipeline = OrbPipeline::new(
            &context.device,
            context.surface_format,
            context.sample_count,
        );
        let mesh = MeshBuffers::upload(&context.device, setup.mesh);

        let uniform_buffer = context.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("orb uniform buffer"),
            size: UNIFORM_SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("orb uniform bind group"),
                layout: &pipeline.uniform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });

        let (multisample_target, depth_target) = Self::attachments(&context);

        debug!(
            vertices = setup.mesh.vertex_count(),
            triangles = setup.mesh.triangle_count(),
            width = context.size.width,
            height = context.size.height,
            sample_count = context.sample_count,
            "orb surface created"
        );

        Ok(Self {
            context,
            pipeline,
            mesh,
            uniform_buffer,
            uniform_bind_group,
            multisample_target,
            depth_target,
            last_stats_update: Instant::now(),
            frames_since_stats: 0,
        })
    }

    fn attachments(context: &GpuContext) -> (Option<AttachmentTarget>, AttachmentTarget) {
        let multisample = (context.sample_count > 1).then(|| {
            AttachmentTarget::new(
                &context.device,
                "msaa color target",
                context.surface_format,
                context.size,
                context.sample_count,
            )
        });
        let depth = AttachmentTarget::new(
            &context.device,
            "depth target",
            DEPTH_FORMAT,
            context.size,
            context.sample_count,
        );
        (multisample, depth)
    }

    /// Reconfigures the swapchain at its current size after `Lost`/`Outdated`.
    pub(crate) fn recover(&mut self) {
        self.context.reconfigure();
    }

    fn record_stats(&mut self) {
        self.frames_since_stats += 1;
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(self.last_stats_update);
        if elapsed >= Duration::from_secs(1) {
            let fps = self.frames_since_stats as f32 / elapsed.as_secs_f32();
            debug!(fps = fps.round(), "render stats");
            self.frames_since_stats = 0;
            self.last_stats_update = now;
        }
    }
}

impl RenderSurface for GpuState {
    type Error = wgpu::SurfaceError;

    fn resize(&mut self, target: RenderTarget, pixel_ratio: f32) {
        let (width, height) = target.physical(pixel_ratio);
        let max_dimension = self.context.device.limits().max_texture_dimension_2d;
        let size = PhysicalSize::new(
            width.clamp(1, max_dimension),
            height.clamp(1, max_dimension),
        );
        if size == self.context.size {
            return;
        }
        self.context.resize(size);
        let (multisample_target, depth_target) = Self::attachments(&self.context);
        self.multisample_target = multisample_target;
        self.depth_target = depth_target;
    }

    fn render(&mut self, frame: &FrameParams) -> Result<(), Self::Error> {
        let acquire_start = Instant::now();
        let surface_texture = self.context.surface.get_current_texture()?;
        let acquire = acquire_start.elapsed();
        if acquire > Duration::from_millis(50) {
            warn!("acquiring frame took {}ms", acquire.as_millis());
        }

        let uniforms = OrbUniforms::from_frame(frame);
        self.context
            .queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("orb encoder"),
                });

        {
            let (attachment_view, resolve_target) =
                if let Some(msaa) = self.multisample_target.as_ref() {
                    (&msaa.view, Some(&view))
                } else {
                    (&view, None)
                };
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("orb pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: attachment_view,
                    depth_slice: None,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_target.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&self.pipeline.pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.mesh.vertices.slice(..));
            render_pass.set_index_buffer(self.mesh.indices.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..self.mesh.index_count, 0, 0..1);
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        self.record_stats();
        Ok(())
    }
}

/// Builds [`GpuState`] surfaces on a winit window.
pub struct WgpuSurfaceFactory {
    instance: wgpu::Instance,
    window: Arc<Window>,
    antialiasing: Antialiasing,
}

impl WgpuSurfaceFactory {
    pub fn new(window: Arc<Window>, antialiasing: Antialiasing) -> Self {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            flags: wgpu::InstanceFlags::default(),
            memory_budget_thresholds: wgpu::MemoryBudgetThresholds::default(),
            backend_options: wgpu::BackendOptions::default(),
        });
        Self {
            instance,
            window,
            antialiasing,
        }
    }
}

impl SurfaceFactory for WgpuSurfaceFactory {
    type Surface = GpuState;

    fn detect(&mut self) -> Result<(), OrbError> {
        let adapters = self.instance.enumerate_adapters(wgpu::Backends::all());
        if adapters.is_empty() {
            return Err(OrbError::CapabilityMissing(
                "no graphics adapter available".to_string(),
            ));
        }
        debug!(count = adapters.len(), "graphics adapters detected");
        Ok(())
    }

    fn create(
        &mut self,
        container: &ContainerHandle,
        setup: &SceneSetup<'_>,
    ) -> Result<Self::Surface, OrbError> {
        debug!(container = %container.id, "creating wgpu surface");
        GpuState::new(&self.instance, self.window.clone(), setup, self.antialiasing)
            .map_err(|err| OrbError::CapabilityMissing(format!("{err:#}")))
    }
}
