//! Interleaved vertex layouts for GPU upload.
//!
//! Field order must match the vertex attribute layout of the axon shaders.

use bytemuck::{Pod, Zeroable};

/// One point-cloud vertex (72 bytes).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct PointVertex {
    pub position: [f32; 3],
    pub layer: f32,
    pub root_normal: [f32; 3],
    pub size_attenuation: f32,
    pub root_uv: [f32; 2],
    pub uv: [f32; 2],
    pub root_random: [f32; 3],
    pub color: [f32; 3],
}

/// One tube-mesh vertex (68 bytes).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct TubeVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub layer: f32,
    pub root_normal: [f32; 3],
    pub root_uv: [f32; 2],
    pub root_random: [f32; 3],
}

/// View a vertex slice as raw bytes for buffer upload
pub fn as_bytes<T: Pod>(vertices: &[T]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}
