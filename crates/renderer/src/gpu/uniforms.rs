use bytemuck::{Pod, Zeroable};
use orb::FrameParams;

/// Per-frame block bound at `@group(0) @binding(0)` in `shader.wgsl`.
///
/// Only `vec4`/`mat4x4` members, so the WGSL uniform layout needs no padding.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct OrbUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    /// Used for view-space normals.
    pub view: [[f32; 4]; 4],
    /// xyz = eye position in world space.
    pub camera_position: [f32; 4],
    /// rgb = brand colour, a = output alpha.
    pub brand: [f32; 4],
    /// x = shader time, y = amplitude, z = frequency, w = gloss.
    pub params: [f32; 4],
}

pub(crate) const UNIFORM_SIZE: u64 = std::mem::size_of::<OrbUniforms>() as u64;

impl OrbUniforms {
    pub fn from_frame(frame: &FrameParams) -> Self {
        let view_proj = frame.projection * frame.view;
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            model: frame.model.to_cols_array_2d(),
            view: frame.view.to_cols_array_2d(),
            camera_position: frame.camera_position.extend(1.0).to_array(),
            brand: frame.brand.extend(1.0).to_array(),
            params: [
                frame.shader_time,
                frame.wave.amplitude,
                frame.wave.frequency,
                frame.wave.gloss,
            ],
        }
    }
}
