//! Breakpoint scaling, render-target sizing, and tessellation choice.

use crate::config::{Breakpoint, TessellationConfig};

/// Orb scale for a container width: the first breakpoint whose `max_width`
/// exceeds `width`, otherwise `default_scale`.
pub fn scale_for_width(width: u32, breakpoints: &[Breakpoint], default_scale: f32) -> f32 {
    breakpoints
        .iter()
        .find(|breakpoint| width < breakpoint.max_width)
        .map(|breakpoint| breakpoint.scale)
        .unwrap_or(default_scale)
}

/// Pixel dimensions of the render target, never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTarget {
    pub width: u32,
    pub height: u32,
}

impl RenderTarget {
    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }

    /// Device-pixel size for a given pixel ratio.
    pub fn physical(&self, pixel_ratio: f32) -> (u32, u32) {
        let scale = |value: u32| ((value as f32 * pixel_ratio).round() as u32).max(1);
        (scale(self.width), scale(self.height))
    }
}

/// Container width by the larger of container height and a fraction of the
/// viewport height.
pub fn render_target(
    container_width: u32,
    container_height: u32,
    viewport_height: u32,
    min_height_fraction: f32,
) -> RenderTarget {
    let floor = (viewport_height as f32 * min_height_fraction).round() as u32;
    RenderTarget {
        width: container_width.max(1),
        height: container_height.max(floor).max(1),
    }
}

/// Sphere segment count for the start-up container width.
pub fn segments_for_width(width: u32, tessellation: &TessellationConfig) -> u32 {
    if width > tessellation.threshold {
        tessellation.dense
    } else {
        tessellation.coarse
    }
}

/// Device pixel ratio clamped to `max`; unusable ratios become 1.
pub fn pixel_ratio(device_ratio: f64, max: f32) -> f32 {
    let ratio = device_ratio as f32;
    if ratio.is_finite() && ratio > 0.0 {
        ratio.min(max)
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::config::OrbConfig;

    fn scale(width: u32) -> f32 {
        let config = OrbConfig::default();
        scale_for_width(width, &config.breakpoints, config.default_scale)
    }

    #[test]
    fn breakpoint_scales() {
        assert_eq!(scale(400), 0.7);
        assert_eq!(scale(600), 0.85);
        assert_eq!(scale(900), 0.95);
        assert_eq!(scale(1200), 1.0);
    }

    #[test]
    fn breakpoint_thresholds_are_exclusive() {
        assert_eq!(scale(479), 0.7);
        assert_eq!(scale(480), 0.85);
        assert_eq!(scale(767), 0.85);
        assert_eq!(scale(768), 0.95);
        assert_eq!(scale(1099), 0.95);
        assert_eq!(scale(1100), 1.0);
        assert_eq!(scale(0), 0.7);
    }

    #[test]
    fn render_height_respects_viewport_fraction() {
        let target = render_target(800, 100, 1000, 0.45);
        assert_eq!(target, RenderTarget { width: 800, height: 450 });
        let tall = render_target(800, 900, 1000, 0.45);
        assert_eq!(tall.height, 900);
        assert_relative_eq!(tall.aspect(), 800.0 / 900.0);
    }

    #[test]
    fn render_target_never_collapses() {
        let target = render_target(0, 0, 0, 0.45);
        assert_eq!(target, RenderTarget { width: 1, height: 1 });
    }

    #[test]
    fn tessellation_switches_above_threshold() {
        let tessellation = TessellationConfig::default();
        assert_eq!(segments_for_width(700, &tessellation), 80);
        assert_eq!(segments_for_width(701, &tessellation), 160);
        assert_eq!(segments_for_width(320, &tessellation), 80);
    }

    #[test]
    fn pixel_ratio_is_capped() {
        assert_eq!(pixel_ratio(3.0, 2.0), 2.0);
        assert_eq!(pixel_ratio(1.5, 2.0), 1.5);
        assert_eq!(pixel_ratio(f64::NAN, 2.0), 1.0);
        assert_eq!(pixel_ratio(0.0, 2.0), 1.0);
        assert_eq!(RenderTarget { width: 400, height: 300 }.physical(2.0), (800, 600));
    }
}
