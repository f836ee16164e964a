//! Errors produced while importing and packing meshes.

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum ImportError {
    #[error("obj load or parse failed: {0}")]
    Obj(#[from] tobj::LoadError),
    #[error("gltf load failed: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("unsupported scene format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("scene contains no meshes")]
    NoMeshes,
    #[error("mesh '{mesh}' has a face with {arity} vertices, expected triangles")]
    NotTriangulated { mesh: String, arity: usize },
    #[error("mesh '{mesh}' uses unsupported primitive type {primitive}")]
    UnsupportedPrimitive { mesh: String, primitive: String },
    #[error("mesh '{mesh}' references vertex {index} but has only {vertex_count} vertices")]
    IndexOutOfRange {
        mesh: String,
        index: u32,
        vertex_count: usize,
    },
    #[error("mesh '{mesh}' has {actual} {attribute} for {expected} vertices")]
    AttributeCountMismatch {
        mesh: String,
        attribute: &'static str,
        expected: usize,
        actual: usize,
    },
}
