//! Sphere tessellation.

use std::f32::consts::PI;

use glam::Vec3;

/// Indexed triangle mesh of a sphere centred at the origin.
#[derive(Debug, Clone, Default)]
pub struct SphereMesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

/// Upper bound on segments per axis; keeps vertex indices well inside `u32`.
pub const MAX_SEGMENTS: u32 = 1024;

impl SphereMesh {
    /// Latitude/longitude sphere with a seam column duplicated at `u = 1`.
    ///
    /// Pole rows emit a single triangle per quad so no degenerate triangles
    /// reach the GPU.
    pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.clamp(3, MAX_SEGMENTS);
        let height_segments = height_segments.clamp(2, MAX_SEGMENTS);
        let stride = width_segments + 1;
        let vertex_count = (stride * (height_segments + 1)) as usize;

        let mut positions = Vec::with_capacity(vertex_count);
        let mut normals = Vec::with_capacity(vertex_count);
        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            let (sin_theta, cos_theta) = (v * PI).sin_cos();
            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let (sin_phi, cos_phi) = (u * 2.0 * PI).sin_cos();
                let normal = Vec3::new(-cos_phi * sin_theta, cos_theta, sin_phi * sin_theta);
                positions.push(normal * radius);
                normals.push(normal.normalize_or_zero());
            }
        }

        let mut indices = Vec::with_capacity((6 * width_segments * (height_segments - 1)) as usize);
        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = iy * stride + ix + 1;
                let b = iy * stride + ix;
                let c = (iy + 1) * stride + ix;
                let d = (iy + 1) * stride + ix + 1;
                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self {
            positions,
            normals,
            indices,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}
