//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// 2D vertex in world pixels with an RGBA colour
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Colours that don't come from the atlas
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
    pub const PLAYFIELD: [f32; 4] = [0.06, 0.06, 0.1, 1.0];
    pub const WALL: [f32; 4] = [0.3, 0.3, 0.4, 1.0];
    pub const BAR_TRACK: [f32; 4] = [0.1, 0.1, 0.12, 0.8];
    pub const BAR_FILL: [f32; 4] = [0.4, 0.95, 0.55, 1.0];

    // High contrast overrides
    pub const HC_BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const HC_OUTLINE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const HC_HERO: [f32; 4] = [1.0, 1.0, 0.0, 1.0];

    /// Same colour with a different alpha
    pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
        [color[0], color[1], color[2], alpha]
    }
}
