//! OpenGL shaders and effects.
//!
//! This module defines the [`Shader`] struct for a single compiled stage and the [`Effect`]
//! struct for a linked program. Uniforms are written through the [`Uniform`] trait using
//! locations looked up once with [`Effect::uniform_location`].

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use glam::Mat4;
use glow::HasContext;

use crate::error::{RenderError, Result};

/// Represents an individual OpenGL shader.
pub struct Shader {
    gl: Arc<glow::Context>,
    id: glow::Shader,
}

impl Shader {
    /// Compiles a new shader from the given source code.
    pub fn new(gl: &Arc<glow::Context>, shader_type: u32, source: &str) -> Result<Self> {
        unsafe {
            let shader = gl.create_shader(shader_type).map_err(RenderError::Gl)?;
            gl.shader_source(shader, source);
            gl.compile_shader(shader);

            if !gl.get_shader_compile_status(shader) {
                let log = gl.get_shader_info_log(shader);
                gl.delete_shader(shader);
                return Err(RenderError::Shader(log));
            }

            Ok(Self {
                gl: Arc::clone(gl),
                id: shader,
            })
        }
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_shader(self.id);
        }
    }
}

/// Vertex and fragment shader sources read from disk.
#[derive(Debug, Clone)]
pub struct EffectSource {
    pub vertex: String,
    pub fragment: String,
    /// Where the sources came from, used in log messages.
    pub origin: PathBuf,
}

impl EffectSource {
    /// Reads the sources from two files.
    pub fn load(vertex: impl AsRef<Path>, fragment: impl AsRef<Path>) -> Result<Self> {
        let read = |path: &Path| {
            std::fs::read_to_string(path).map_err(|source| RenderError::Io {
                path: path.to_path_buf(),
                source,
            })
        };
        let vertex = vertex.as_ref();

        Ok(Self {
            vertex: read(vertex)?,
            fragment: read(fragment.as_ref())?,
            origin: vertex.parent().unwrap_or(vertex).to_path_buf(),
        })
    }

    /// Reads `vert.glsl` and `frag.glsl` from `dir`.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        Self::load(dir.join("vert.glsl"), dir.join("frag.glsl"))
    }
}

/// Represents a uniform variable value.
pub trait Uniform {
    /// Writes the value to `location` of the program currently in use.
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation);
}

impl Uniform for i32 {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe {
            gl.uniform_1_i32(Some(location), *self);
        }
    }
}

impl Uniform for Mat4 {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe {
            gl.uniform_matrix_4_f32_slice(Some(location), false, self.as_ref());
        }
    }
}

impl<T: Uniform> Uniform for &T {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        (*self).set_uniform(gl, location);
    }
}

/// A linked shader program.
pub struct Effect {
    gl: Arc<glow::Context>,
    id: glow::Program,
}

impl Effect {
    /// Compiles and links the given sources.
    pub fn new(gl: &Arc<glow::Context>, source: &EffectSource) -> Result<Self> {
        let vertex = Shader::new(gl, glow::VERTEX_SHADER, &source.vertex)?;
        let fragment = Shader::new(gl, glow::FRAGMENT_SHADER, &source.fragment)?;

        unsafe {
            let program = gl.create_program().map_err(RenderError::Gl)?;

            for shader in [&vertex, &fragment] {
                gl.attach_shader(program, shader.id);
            }

            gl.link_program(program);

            if !gl.get_program_link_status(program) {
                let log = gl.get_program_info_log(program);
                gl.delete_program(program);
                return Err(RenderError::Shader(log));
            }

            for shader in [&vertex, &fragment] {
                gl.detach_shader(program, shader.id);
            }

            log::info!("Linked effect '{}'", source.origin.display());

            Ok(Self {
                gl: Arc::clone(gl),
                id: program,
            })
        }
    }

    /// Makes this program the active one.
    pub fn apply(&self) {
        unsafe {
            self.gl.use_program(Some(self.id));
        }
    }

    pub fn unapply(&self) {
        unsafe {
            self.gl.use_program(None);
        }
    }

    /// Looks up a uniform, failing if the program has no active uniform called `name`.
    pub fn uniform_location(&self, name: &str) -> Result<glow::UniformLocation> {
        unsafe { self.gl.get_uniform_location(self.id, name) }
            .ok_or_else(|| RenderError::MissingUniform(name.to_string()))
    }

    /// Writes a uniform of this program. The program has to be applied.
    pub fn set_uniform<T: Uniform>(&self, location: &glow::UniformLocation, value: T) {
        value.set_uniform(&self.gl, location);
    }
}

impl Drop for Effect {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_program(self.id);
        }
    }
}
