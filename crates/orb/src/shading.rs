//! Pure numeric form of the orb shader.
//!
//! These functions are the reference for `shader.wgsl` in the renderer crate;
//! both evaluate the same formulas so the look can be unit-tested without a
//! GPU. All inputs are plain `glam` vectors and the outputs are deterministic
//! for identical inputs.

use glam::Vec3;

use crate::config::OrbConfig;

/// Wave time runs slightly slower than shader time.
const WAVE_TIME_SCALE: f32 = 0.8;

const BASE_DARK: f32 = 0.06;
const BASE_LIGHT: f32 = 1.0;
const BRAND_MIX: f32 = 0.6;
const FRESNEL_POWER: f32 = 3.0;
const FRESNEL_WEIGHT: f32 = 0.25;
const RIM_POWER: f32 = 6.0;
const RIM_WEIGHT: f32 = 0.12;
const AMBIENT: f32 = 0.65;
const DIFFUSE_GAIN: f32 = 0.6;
const GAMMA: f32 = 1.9;

/// Fixed light rig: (direction, diffuse weight, specular exponent, specular weight).
const KEY_LIGHT: LightTerm = LightTerm {
    direction: Vec3::new(0.6, 0.9, 1.0),
    diffuse: 0.9,
    shininess: 40.0,
    specular: 0.9,
};
const FILL_LIGHT: LightTerm = LightTerm {
    direction: Vec3::new(-0.4, 0.2, -0.8),
    diffuse: 0.35,
    shininess: 80.0,
    specular: 0.35,
};

struct LightTerm {
    direction: Vec3,
    diffuse: f32,
    shininess: f32,
    specular: f32,
}

/// Per-surface parameters shared by displacement and shading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveParams {
    pub frequency: f32,
    pub amplitude: f32,
    pub gloss: f32,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            frequency: 2.6,
            amplitude: 0.12,
            gloss: 1.1,
        }
    }
}

impl From<&OrbConfig> for WaveParams {
    fn from(config: &OrbConfig) -> Self {
        Self {
            frequency: config.frequency,
            amplitude: config.amplitude,
            gloss: config.gloss,
        }
    }
}

/// Weighted sum of three travelling sinusoids, modulated by a radial envelope.
pub fn wave_field(p: Vec3, shader_time: f32, frequency: f32) -> f32 {
    let t = shader_time * WAVE_TIME_SCALE;
    let mut w = 0.0;
    w += 0.45 * ((p.x * 1.3 + p.y * 0.7 + p.z * 0.9) * frequency + t).sin();
    w += 0.30 * ((p.y * 1.9 - p.x * 0.6 + p.z * 0.4) * (frequency * 1.1) + t * 1.4 + 0.7).sin();
    w += 0.20 * ((p.z * 2.3 + p.x * 0.5 - p.y * 0.2) * (frequency * 0.8) + t * 0.6 - 0.4).sin();
    let r = p.length();
    w * (0.8 + 0.2 * (r * 3.0 + t * 0.6).sin())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplacedVertex {
    pub position: Vec3,
    pub wave: f32,
}

/// Pushes a surface point along its normal by `wave * amplitude`.
pub fn displace(
    position: Vec3,
    normal: Vec3,
    shader_time: f32,
    params: &WaveParams,
) -> DisplacedVertex {
    let wave = wave_field(position, shader_time, params.frequency);
    DisplacedVertex {
        position: position + normal * (wave * params.amplitude),
        wave,
    }
}

pub fn specular_blinn(n: Vec3, v: Vec3, l: Vec3, shininess: f32) -> f32 {
    let h = (l + v).normalize_or_zero();
    n.dot(h).max(0.0).powf(shininess)
}

/// Fragment inputs for [`shade`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadingInput {
    pub normal: Vec3,
    pub view_dir: Vec3,
    pub wave: f32,
    pub brand: Vec3,
    pub gloss: f32,
}

/// Final display colour for one fragment, after the gamma curve.
pub fn shade(input: &ShadingInput) -> Vec3 {
    let n = input.normal.normalize_or_zero();
    let v = input.view_dir.normalize_or_zero();
    let brand = input.brand;

    let up = smoothstep(-0.6, 0.9, n.y);
    let mut base = Vec3::splat(BASE_DARK).lerp(Vec3::splat(BASE_LIGHT), up);
    base = base.lerp(brand, BRAND_MIX);

    let facing = n.dot(v).max(0.0);
    let fresnel = (1.0 - facing).powf(FRESNEL_POWER);
    base += fresnel * (brand * FRESNEL_WEIGHT);

    let mut diffuse = 0.0;
    let mut specular = 0.0;
    for light in [&KEY_LIGHT, &FILL_LIGHT] {
        let l = light.direction.normalize();
        diffuse += n.dot(l).max(0.0) * light.diffuse;
        specular += specular_blinn(n, v, l, light.shininess) * light.specular;
    }
    specular *= (0.6 + (input.wave * 1.2).clamp(0.0, 1.0)) * input.gloss;

    let mut color = base * (AMBIENT + diffuse * DIFFUSE_GAIN) + Vec3::splat(specular);
    color += (1.0 - facing).powf(RIM_POWER) * brand * RIM_WEIGHT;
    gamma_correct(color)
}

/// `pow(c, 1/1.9)` per channel; negative channels clamp to zero first.
pub fn gamma_correct(color: Vec3) -> Vec3 {
    let exponent = 1.0 / GAMMA;
    Vec3::new(
        color.x.max(0.0).powf(exponent),
        color.y.max(0.0).powf(exponent),
        color.z.max(0.0).powf(exponent),
    )
}

pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn brand() -> Vec3 {
        crate::palette::BrandColor::default().rgb()
    }

    #[test]
    fn wave_field_is_reproducible() {
        let p = Vec3::new(0.3, -0.7, 0.64);
        let first = wave_field(p, 12.25, 2.6);
        let second = wave_field(p, 12.25, 2.6);
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn wave_field_at_origin_matches_closed_form() {
        let expected = (0.45 * 0.0_f32.sin() + 0.30 * 0.7_f32.sin() + 0.20 * (-0.4_f32).sin()) * 0.8;
        assert_relative_eq!(wave_field(Vec3::ZERO, 0.0, 2.6), expected, epsilon = 1e-6);
    }

    #[test]
    fn wave_field_stays_within_weight_bounds() {
        let bound = (0.45 + 0.30 + 0.20) * 1.0;
        for step in 0..200 {
            let t = step as f32 * 0.37;
            let p = Vec3::new(t.sin(), t.cos(), (t * 0.5).sin()).normalize();
            assert!(wave_field(p, t, 2.6).abs() <= bound + 1e-5);
        }
    }

    #[test]
    fn displacement_follows_normal() {
        let params = WaveParams::default();
        let normal = Vec3::Y;
        let position = normal;
        let displaced = displace(position, normal, 3.0, &params);
        let expected_offset = displaced.wave * params.amplitude;
        assert_relative_eq!(displaced.position.x, 0.0);
        assert_relative_eq!(displaced.position.z, 0.0);
        assert_relative_eq!(displaced.position.y, 1.0 + expected_offset, epsilon = 1e-6);
    }

    #[test]
    fn zero_amplitude_leaves_surface_untouched() {
        let params = WaveParams {
            amplitude: 0.0,
            ..WaveParams::default()
        };
        let position = Vec3::new(0.0, 0.6, 0.8);
        let displaced = displace(position, position, 7.5, &params);
        assert_eq!(displaced.position, position);
    }

    #[test]
    fn specular_peaks_on_half_vector() {
        let l = Vec3::new(0.0, 1.0, 1.0).normalize();
        let v = Vec3::Z;
        let h = (l + v).normalize();
        assert_relative_eq!(specular_blinn(h, v, l, 40.0), 1.0, epsilon = 1e-5);
        assert_eq!(specular_blinn(-h, v, l, 40.0), 0.0);
    }

    #[test]
    fn rim_is_brighter_than_facing_surface_in_brand_channel() {
        let facing = shade(&ShadingInput {
            normal: Vec3::new(0.0, 0.0, 1.0),
            view_dir: Vec3::Z,
            wave: 0.0,
            brand: brand(),
            gloss: 1.1,
        });
        let grazing = shade(&ShadingInput {
            normal: Vec3::new(0.0, -1.0, 0.0),
            view_dir: Vec3::Z,
            wave: 0.0,
            brand: brand(),
            gloss: 1.1,
        });
        // The downward normal gets no key light, only Fresnel and rim from the brand.
        assert!(grazing.y > 0.0);
        assert!(facing.length() > 0.0);
        assert!(grazing.z < facing.z);
    }

    #[test]
    fn shading_output_is_finite_and_non_negative() {
        for step in 0..64 {
            let a = step as f32 * 0.2;
            let normal = Vec3::new(a.cos(), (a * 0.7).sin(), a.sin());
            let color = shade(&ShadingInput {
                normal,
                view_dir: Vec3::Z,
                wave: (a * 0.3).sin(),
                brand: brand(),
                gloss: 1.1,
            });
            for channel in color.to_array() {
                assert!(channel.is_finite() && channel >= 0.0);
            }
        }
    }

    #[test]
    fn wave_boosts_specular_up_to_clamp() {
        let input = ShadingInput {
            normal: Vec3::new(0.6, 0.9, 1.0).normalize(),
            view_dir: Vec3::new(0.6, 0.9, 1.0).normalize(),
            wave: 0.0,
            brand: brand(),
            gloss: 1.1,
        };
        let calm = shade(&input);
        let crest = shade(&ShadingInput { wave: 0.9, ..input });
        let saturated = shade(&ShadingInput { wave: 5.0, ..input });
        assert!(crest.x > calm.x);
        assert_relative_eq!(
            saturated.x,
            shade(&ShadingInput { wave: 1.0 / 1.2, ..input }).x,
            epsilon = 1e-5
        );
    }

    #[test]
    fn gamma_curve_clamps_negatives() {
        let corrected = gamma_correct(Vec3::new(-0.5, 1.0, 0.25));
        assert_eq!(corrected.x, 0.0);
        assert_relative_eq!(corrected.y, 1.0);
        assert_relative_eq!(corrected.z, 0.25_f32.powf(1.0 / 1.9));
    }

    #[test]
    fn smoothstep_edges() {
        assert_eq!(smoothstep(-0.6, 0.9, -1.0), 0.0);
        assert_eq!(smoothstep(-0.6, 0.9, 1.0), 1.0);
        assert_relative_eq!(smoothstep(0.0, 1.0, 0.5), 0.5);
    }
}
