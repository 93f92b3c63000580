use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::geometry::MAX_SEGMENTS;
use crate::palette::BrandColor;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid brand colour '{0}'; expected #RRGGBB")]
    InvalidColor(String),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Everything that parameterises one orb instance.
///
/// Every field has a default, so an empty TOML document yields the stock
/// look: a lime-tinted sphere drifting slowly in front of a 40° camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrbConfig {
    /// Identifier of the container the orb is embedded into.
    pub container_id: String,
    pub brand_color: BrandColor,
    /// Displacement along the normal per unit of wave field.
    pub amplitude: f32,
    /// Base spatial frequency of the wave field.
    pub frequency: f32,
    /// Multiplier on the specular highlights.
    pub gloss: f32,
    /// Shader time advances at `elapsed * time_scale`.
    pub time_scale: f32,
    pub camera: CameraConfig,
    /// Upper bound on the device pixel ratio used for the render target.
    pub max_pixel_ratio: f32,
    /// Minimum render height as a fraction of the viewport height.
    pub min_height_fraction: f32,
    /// Width thresholds (exclusive) mapped to orb scales, ascending.
    pub breakpoints: Vec<Breakpoint>,
    /// Scale used at and above the last breakpoint.
    pub default_scale: f32,
    pub tessellation: TessellationConfig,
    pub motion: MotionConfig,
    pub pointer: PointerConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub max_width: u32,
    pub scale: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub distance: f32,
    pub near: f32,
    pub far: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TessellationConfig {
    /// Containers wider than this get the dense mesh.
    pub threshold: u32,
    pub dense: u32,
    pub coarse: u32,
}

/// Decorative baseline motion, independent of input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MotionConfig {
    /// Yaw drift in radians per second.
    pub drift_rate: f32,
    pub wobble_rate: f32,
    pub wobble_amplitude: f32,
    pub bob_rate: f32,
    pub bob_amplitude: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PointerConfig {
    pub yaw_gain: f32,
    pub pitch_gain: f32,
    /// Fraction of the remaining distance covered per pointer event.
    pub easing: f32,
}

impl Default for OrbConfig {
    fn default() -> Self {
        Self {
            container_id: "orb-container".to_string(),
            brand_color: BrandColor::default(),
            amplitude: 0.12,
            frequency: 2.6,
            gloss: 1.1,
            time_scale: 0.9,
            camera: CameraConfig::default(),
            max_pixel_ratio: 2.0,
            min_height_fraction: 0.45,
            breakpoints: vec![
                Breakpoint {
                    max_width: 480,
                    scale: 0.7,
                },
                Breakpoint {
                    max_width: 768,
                    scale: 0.85,
                },
                Breakpoint {
                    max_width: 1100,
                    scale: 0.95,
                },
            ],
            default_scale: 1.0,
            tessellation: TessellationConfig::default(),
            motion: MotionConfig::default(),
            pointer: PointerConfig::default(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 40.0,
            distance: 3.2,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Default for TessellationConfig {
    fn default() -> Self {
        Self {
            threshold: 700,
            dense: 160,
            coarse: 80,
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            drift_rate: 0.08,
            wobble_rate: 0.12,
            wobble_amplitude: 0.03,
            bob_rate: 0.5,
            bob_amplitude: 0.045,
        }
    }
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            yaw_gain: 0.25,
            pitch_gain: 0.12,
            easing: 0.06,
        }
    }
}

impl OrbConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), "loaded orb configuration");
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.container_id.trim().is_empty() {
            return invalid("container_id must not be empty");
        }
        for (name, value) in [
            ("amplitude", self.amplitude),
            ("frequency", self.frequency),
            ("gloss", self.gloss),
            ("time_scale", self.time_scale),
        ] {
            if !value.is_finite() || value < 0.0 {
                return invalid(format!("{name} must be a non-negative number"));
            }
        }
        if !(self.max_pixel_ratio.is_finite() && self.max_pixel_ratio >= 1.0) {
            return invalid("max_pixel_ratio must be at least 1.0");
        }
        if !(0.0..=1.0).contains(&self.min_height_fraction) {
            return invalid("min_height_fraction must be within 0.0..=1.0");
        }
        if !(self.default_scale.is_finite() && self.default_scale > 0.0) {
            return invalid("default_scale must be positive");
        }
        let mut previous: Option<u32> = None;
        for breakpoint in &self.breakpoints {
            if !(breakpoint.scale.is_finite() && breakpoint.scale > 0.0) {
                return invalid(format!(
                    "breakpoint at {}px has non-positive scale",
                    breakpoint.max_width
                ));
            }
            if previous.is_some_and(|prev| breakpoint.max_width <= prev) {
                return invalid("breakpoints must be strictly ascending by max_width");
            }
            previous = Some(breakpoint.max_width);
        }
        let camera = &self.camera;
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return invalid("camera.fov_degrees must be within (0, 180)");
        }
        if !(camera.distance > 0.0 && camera.near > 0.0 && camera.far > camera.near) {
            return invalid("camera requires distance > 0 and 0 < near < far");
        }
        for segments in [self.tessellation.dense, self.tessellation.coarse] {
            if !(3..=MAX_SEGMENTS).contains(&segments) {
                return invalid(format!(
                    "tessellation segments must be within 3..={MAX_SEGMENTS}"
                ));
            }
        }
        if !(self.pointer.easing > 0.0 && self.pointer.easing <= 1.0) {
            return invalid("pointer.easing must be within (0, 1]");
        }
        Ok(())
    }
}

fn invalid<T>(message: impl Into<String>) -> Result<T, ConfigError> {
    Err(ConfigError::Invalid(message.into()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = OrbConfig::from_toml_str("").unwrap();
        assert_eq!(config, OrbConfig::default());
    }

    #[test]
    fn parses_partial_overrides() {
        let config = OrbConfig::from_toml_str(
            r##"
brand_color = "#FF0080"
amplitude = 0.2

[pointer]
easing = 0.1

[[breakpoints]]
max_width = 600
scale = 0.5
"##,
        )
        .unwrap();
        assert_eq!(config.brand_color.to_hex(), "#FF0080");
        assert_eq!(config.amplitude, 0.2);
        assert_eq!(config.pointer.easing, 0.1);
        assert_eq!(config.pointer.yaw_gain, 0.25);
        assert_eq!(config.breakpoints.len(), 1);
        assert_eq!(config.gloss, 1.1);
    }

    #[test]
    fn rejects_unsorted_breakpoints() {
        let err = OrbConfig::from_toml_str(
            r#"
[[breakpoints]]
max_width = 900
scale = 0.9

[[breakpoints]]
max_width = 400
scale = 0.7
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_bad_colour_and_unknown_keys() {
        assert!(OrbConfig::from_toml_str("brand_color = \"lime\"").is_err());
        assert!(matches!(
            OrbConfig::from_toml_str("colour = 1"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_easing() {
        let mut config = OrbConfig::default();
        config.pointer.easing = 1.5;
        assert!(config.validate().is_err());
        config.pointer.easing = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_tessellation() {
        let mut config = OrbConfig::default();
        config.tessellation.dense = 70_000;
        assert!(config.validate().is_err());
        config.tessellation.dense = MAX_SEGMENTS;
        assert!(config.validate().is_ok());
        config.tessellation.coarse = 2;
        assert!(config.validate().is_err());

        let err = OrbConfig::from_toml_str("[tessellation]\ndense = 70000\n").unwrap_err();
        assert!(err.to_string().contains("tessellation"), "{err}");
    }

    #[test]
    fn round_trips_through_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let mut config = OrbConfig::default();
        config.gloss = 1.4;
        file.write_all(config.to_toml_string().unwrap().as_bytes())
            .unwrap();

        let loaded = OrbConfig::load(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = OrbConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }
}
