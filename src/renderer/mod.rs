//! WebGPU rendering module
//!
//! The scene is rebuilt every frame as a flat triangle list in playfield
//! coordinates; [`RenderState`] maps it to the viewport and draws it.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod theme;
pub mod vertex;

pub use pipeline::{RenderError, RenderState, playfield_to_ndc};
pub use scene::build_scene;
pub use vertex::Vertex;
