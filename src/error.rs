//! The error type shared by the GPU-side wrappers and the application setup.

use std::path::PathBuf;

use skyball_core::ImportError;

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("shader error: {0}")]
    Shader(String),
    #[error("uniform '{0}' not found in shader program")]
    MissingUniform(String),
    #[error("OpenGL error: {0}")]
    Gl(String),
    #[error("buffer holds {expected} elements of {element_size} bytes, got {actual} of {actual_size} bytes")]
    BufferSizeMismatch {
        expected: usize,
        element_size: usize,
        actual: usize,
        actual_size: usize,
    },
    #[error("invalid configuration '{}': {source}", path.display())]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("window setup failed: {0}")]
    Window(String),
}

pub type Result<T, E = RenderError> = std::result::Result<T, E>;
