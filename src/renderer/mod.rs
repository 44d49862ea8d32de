//! WebGPU rendering
//!
//! `draw` builds world-space triangles from the game state; `pipeline` maps
//! them onto the canvas and submits them.

pub mod draw;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use draw::build_scene;
pub use pipeline::{RenderState, Viewport, clear_color};
pub use vertex::Vertex;
