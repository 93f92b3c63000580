use glam::{Mat4, Vec2, Vec3};

use crate::config::OrbConfig;
use crate::responsive::{render_target, scale_for_width, RenderTarget};
use crate::shading::WaveParams;

/// Container rectangle in the same coordinate space as pointer events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ContainerRect {
    pub fn from_size(width: f32, height: f32) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width,
            height,
        }
    }

    /// Maps a pointer position to `[-1, 1]` on both axes (y grows downwards).
    /// Returns `None` for rectangles without area.
    pub fn normalize(&self, pointer: Vec2) -> Option<Vec2> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return None;
        }
        let nx = ((pointer.x - self.left) / self.width) * 2.0 - 1.0;
        let ny = ((pointer.y - self.top) / self.height) * 2.0 - 1.0;
        Some(Vec2::new(nx, ny))
    }
}

/// Everything the GPU needs to draw one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    pub shader_time: f32,
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    pub camera_position: Vec3,
    pub brand: Vec3,
    pub wave: WaveParams,
    pub target: RenderTarget,
}

/// Mutable animation state shared by the frame, resize, and pointer callbacks.
///
/// `rotation.x` is pitch and `rotation.y` is yaw. The rotation is always the
/// baseline drift for the current `elapsed` plus `pointer_influence`.
#[derive(Debug, Clone)]
pub struct RenderState {
    elapsed: f32,
    target: RenderTarget,
    orb_scale: f32,
    rotation: Vec2,
    pointer_influence: Vec2,
    bob_offset: f32,
    config: OrbConfig,
}

impl RenderState {
    pub fn new(config: OrbConfig) -> Self {
        let mut state = Self {
            elapsed: 0.0,
            target: RenderTarget {
                width: 1,
                height: 1,
            },
            orb_scale: config.default_scale,
            rotation: Vec2::ZERO,
            pointer_influence: Vec2::ZERO,
            bob_offset: 0.0,
            config,
        };
        state.apply_motion();
        state
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn target(&self) -> RenderTarget {
        self.target
    }

    pub fn aspect(&self) -> f32 {
        self.target.aspect()
    }

    pub fn orb_scale(&self) -> f32 {
        self.orb_scale
    }

    pub fn rotation(&self) -> Vec2 {
        self.rotation
    }

    pub fn pointer_influence(&self) -> Vec2 {
        self.pointer_influence
    }

    pub fn bob_offset(&self) -> f32 {
        self.bob_offset
    }

    pub fn config(&self) -> &OrbConfig {
        &self.config
    }

    pub fn shader_time(&self) -> f32 {
        self.elapsed * self.config.time_scale
    }

    /// Moves the clock forward. Negative or non-finite steps are dropped so
    /// elapsed time stays monotonic.
    pub fn advance(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
        self.apply_motion();
    }

    /// Recomputes render target, aspect, and orb scale from the container.
    pub fn resize(
        &mut self,
        container_width: u32,
        container_height: u32,
        viewport_height: u32,
    ) -> RenderTarget {
        self.target = render_target(
            container_width,
            container_height,
            viewport_height,
            self.config.min_height_fraction,
        );
        self.orb_scale = scale_for_width(
            self.target.width,
            &self.config.breakpoints,
            self.config.default_scale,
        );
        self.target
    }

    /// Eases the rotation towards the pointer-derived target by a fixed
    /// fraction of the remaining distance. The offset from the drift baseline
    /// is kept so later frames carry it forward. Returns false when the
    /// bounds cannot normalise the pointer.
    pub fn pointer_moved(&mut self, pointer: Vec2, bounds: &ContainerRect) -> bool {
        let Some(normalized) = bounds.normalize(pointer) else {
            return false;
        };
        let settings = self.config.pointer;
        let target = Vec2::new(
            -normalized.y * settings.pitch_gain,
            normalized.x * settings.yaw_gain,
        );
        self.rotation += (target - self.rotation) * settings.easing;
        self.pointer_influence = self.rotation - self.baseline_rotation();
        true
    }

    /// Drift-only rotation for the current elapsed time.
    pub fn baseline_rotation(&self) -> Vec2 {
        let motion = self.config.motion;
        let t = self.elapsed;
        Vec2::new(
            (t * motion.wobble_rate).sin() * motion.wobble_amplitude,
            t * motion.drift_rate,
        )
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, self.bob_offset, 0.0))
            * Mat4::from_rotation_x(self.rotation.x)
            * Mat4::from_rotation_y(self.rotation.y)
            * Mat4::from_scale(Vec3::splat(self.orb_scale))
    }

    pub fn camera_position(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.config.camera.distance)
    }

    pub fn frame(&self) -> FrameParams {
        let camera = self.config.camera;
        let camera_position = self.camera_position();
        FrameParams {
            shader_time: self.shader_time(),
            model: self.model_matrix(),
            view: Mat4::look_at_rh(camera_position, Vec3::ZERO, Vec3::Y),
            projection: Mat4::perspective_rh(
                camera.fov_degrees.to_radians(),
                self.aspect(),
                camera.near,
                camera.far,
            ),
            camera_position,
            brand: self.config.brand_color.rgb(),
            wave: WaveParams::from(&self.config),
            target: self.target,
        }
    }

    fn apply_motion(&mut self) {
        let motion = self.config.motion;
        self.rotation = self.baseline_rotation() + self.pointer_influence;
        self.bob_offset = (self.elapsed * motion.bob_rate).sin() * motion.bob_amplitude;
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn state() -> RenderState {
        RenderState::new(OrbConfig::default())
    }

    #[test]
    fn advance_accumulates_and_drifts() {
        let mut state = state();
        state.advance(0.5);
        state.advance(1.5);
        assert_relative_eq!(state.elapsed(), 2.0);
        assert_relative_eq!(state.rotation().y, 0.16);
        assert_relative_eq!(state.rotation().x, (2.0_f32 * 0.12).sin() * 0.03);
        assert_relative_eq!(state.bob_offset(), (2.0_f32 * 0.5).sin() * 0.045);
        assert_relative_eq!(state.shader_time(), 1.8);
    }

    #[test]
    fn advance_ignores_negative_and_nan_steps() {
        let mut state = state();
        state.advance(1.0);
        state.advance(-0.5);
        state.advance(f32::NAN);
        state.advance(f32::INFINITY);
        assert_relative_eq!(state.elapsed(), 1.0);
    }

    #[test]
    fn resize_applies_breakpoints() {
        let mut state = state();
        for (width, expected) in [(400, 0.7), (600, 0.85), (900, 0.95), (1200, 1.0)] {
            state.resize(width, 300, 800);
            assert_eq!(state.orb_scale(), expected, "width {width}");
        }
        assert_eq!(state.target().height, 360);
        assert_relative_eq!(state.aspect(), 1200.0 / 360.0);
    }

    #[test]
    fn pointer_step_is_fraction_of_remaining_delta() {
        let mut state = state();
        let bounds = ContainerRect::from_size(200.0, 100.0);
        // Right edge, vertical centre: yaw target 0.25, pitch target 0.
        assert!(state.pointer_moved(Vec2::new(200.0, 50.0), &bounds));
        assert_relative_eq!(state.rotation().y, 0.25 * 0.06);
        assert_relative_eq!(state.rotation().x, 0.0);

        let before = state.rotation().y;
        state.pointer_moved(Vec2::new(200.0, 50.0), &bounds);
        let step = state.rotation().y - before;
        assert_relative_eq!(step, (0.25 - before) * 0.06, epsilon = 1e-7);
    }

    #[test]
    fn pointer_eases_rotation_after_drift() {
        let mut state = state();
        let bounds = ContainerRect::from_size(200.0, 100.0);
        state.advance(10.0);
        let before = state.rotation();
        assert!(before.y > 0.25);

        state.pointer_moved(Vec2::new(200.0, 50.0), &bounds);
        let after = state.rotation();
        assert_relative_eq!(after.y, before.y + (0.25 - before.y) * 0.06, epsilon = 1e-6);
        assert_relative_eq!(after.x, before.x * (1.0 - 0.06), epsilon = 1e-6);
        assert_relative_eq!(
            state.pointer_influence().y,
            after.y - state.baseline_rotation().y,
            epsilon = 1e-6
        );

        for _ in 0..2000 {
            state.pointer_moved(Vec2::new(200.0, 50.0), &bounds);
        }
        assert_relative_eq!(state.rotation().y, 0.25, epsilon = 1e-4);
    }

    #[test]
    fn pointer_converges_without_overshoot() {
        let mut state = state();
        let bounds = ContainerRect {
            left: 10.0,
            top: 20.0,
            width: 100.0,
            height: 100.0,
        };
        // Top-left corner: yaw target -0.25, pitch target +0.12.
        let pointer = Vec2::new(10.0, 20.0);
        let mut previous_gap = f32::MAX;
        for _ in 0..400 {
            state.pointer_moved(pointer, &bounds);
            let rotation = state.rotation();
            assert!(rotation.y >= -0.25 - 1e-6);
            assert!(rotation.x <= 0.12 + 1e-6);
            let gap = (rotation.y + 0.25).abs();
            assert!(gap <= previous_gap);
            previous_gap = gap;
        }
        assert_relative_eq!(state.rotation().y, -0.25, epsilon = 1e-4);
        assert_relative_eq!(state.rotation().x, 0.12, epsilon = 1e-4);
    }

    #[test]
    fn pointer_influence_adds_to_drift() {
        let mut state = state();
        let bounds = ContainerRect::from_size(100.0, 100.0);
        state.pointer_moved(Vec2::new(100.0, 0.0), &bounds);
        let influence = state.pointer_influence();
        state.advance(3.0);
        let expected = state.baseline_rotation() + influence;
        assert_relative_eq!(state.rotation().x, expected.x);
        assert_relative_eq!(state.rotation().y, expected.y);
    }

    #[test]
    fn pointer_ignored_for_empty_bounds() {
        let mut state = state();
        assert!(!state.pointer_moved(Vec2::new(5.0, 5.0), &ContainerRect::from_size(0.0, 10.0)));
        assert_eq!(state.pointer_influence(), Vec2::ZERO);
    }

    #[test]
    fn frame_uses_camera_and_scale() {
        let mut state = state();
        state.resize(400, 400, 400);
        let frame = state.frame();
        assert_eq!(frame.camera_position, Vec3::new(0.0, 0.0, 3.2));
        let edge = frame.model.transform_point3(Vec3::X);
        assert_relative_eq!(edge.length(), 0.7, epsilon = 1e-5);
        assert_eq!(frame.target, state.target());
        assert_relative_eq!(frame.wave.amplitude, 0.12);
    }
}
