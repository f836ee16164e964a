//! This module contains the thin wrappers around OpenGL objects: the window and context, data
//! buffers and their vertex array state, textures, shader effects and meshes.

pub mod app;
pub mod buffer;
pub mod buffer_state;
pub mod mesh;
pub mod shader;
pub mod texture;

pub use app::*;
pub use buffer::*;
pub use buffer_state::*;
pub use mesh::*;
pub use shader::*;
pub use texture::*;
