//! Vertex array state.
//!
//! A [`BufferState`] ties a [`VertexFormat`] to a vertex buffer and an index buffer so that a
//! single bind restores every attribute pointer needed for a draw call.

use std::sync::Arc;

use glow::HasContext;
use skyball_core::{VertexElementType, VertexFormat};

use crate::{
    abs::{Buffer, BufferKind},
    error::{RenderError, Result},
};

fn gl_type(element_type: VertexElementType) -> u32 {
    match element_type {
        VertexElementType::Float32 => glow::FLOAT,
        VertexElementType::Int32 => glow::INT,
        VertexElementType::UInt32 => glow::UNSIGNED_INT,
    }
}

/// Represents a vertex array object on the GPU side.
pub struct BufferState {
    gl: Arc<glow::Context>,
    vao: glow::VertexArray,
    format: VertexFormat,
}

impl BufferState {
    /// Records `format` as the attribute layout of `vertex_buffer` and attaches `index_buffer`.
    pub fn new(
        gl: &Arc<glow::Context>,
        format: VertexFormat,
        vertex_buffer: &Buffer,
        index_buffer: &Buffer,
    ) -> Result<Self> {
        debug_assert_eq!(vertex_buffer.kind(), BufferKind::Vertex);
        debug_assert_eq!(index_buffer.kind(), BufferKind::Index);

        let vao = unsafe { gl.create_vertex_array() }.map_err(RenderError::Gl)?;
        let stride = format.stride_bytes() as i32;

        unsafe {
            gl.bind_vertex_array(Some(vao));
            vertex_buffer.bind();
            index_buffer.bind();

            for (offset, element) in format.offsets() {
                let ty = gl_type(element.element_type);
                let size = element.components as i32;
                gl.enable_vertex_attrib_array(element.index);
                if element.element_type.is_integer() {
                    gl.vertex_attrib_pointer_i32(element.index, size, ty, stride, offset as i32);
                } else {
                    gl.vertex_attrib_pointer_f32(
                        element.index,
                        size,
                        ty,
                        element.normalized,
                        stride,
                        offset as i32,
                    );
                }
            }

            gl.bind_vertex_array(None);
            vertex_buffer.unbind();
        }

        Ok(Self {
            gl: Arc::clone(gl),
            vao,
            format,
        })
    }

    pub fn format(&self) -> &VertexFormat {
        &self.format
    }

    pub fn apply(&self) {
        unsafe {
            self.gl.bind_vertex_array(Some(self.vao));
        }
    }

    pub fn unapply(&self) {
        unsafe {
            self.gl.bind_vertex_array(None);
        }
    }
}

impl Drop for BufferState {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_vertex_array(self.vao);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_types_map_to_gl_types() {
        assert_eq!(gl_type(VertexElementType::Float32), glow::FLOAT);
        assert_eq!(gl_type(VertexElementType::Int32), glow::INT);
        assert_eq!(gl_type(VertexElementType::UInt32), glow::UNSIGNED_INT);
    }
}
