//! GPU data buffers.
//!
//! A [`Buffer`] owns one OpenGL buffer object holding either vertex or index data.

use std::sync::Arc;

use glow::HasContext;

use crate::error::{RenderError, Result};

/// What a buffer is bound as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    Vertex,
    Index,
}

impl BufferKind {
    pub fn target(self) -> u32 {
        match self {
            BufferKind::Vertex => glow::ARRAY_BUFFER,
            BufferKind::Index => glow::ELEMENT_ARRAY_BUFFER,
        }
    }
}

/// How often the buffer contents are expected to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    /// Written once, drawn many times.
    Static,
    /// Rewritten occasionally.
    Dynamic,
    /// Rewritten every frame.
    Stream,
}

impl BufferUsage {
    pub fn hint(self) -> u32 {
        match self {
            BufferUsage::Static => glow::STATIC_DRAW,
            BufferUsage::Dynamic => glow::DYNAMIC_DRAW,
            BufferUsage::Stream => glow::STREAM_DRAW,
        }
    }
}

/// Represents a buffer object stored on the GPU side.
pub struct Buffer {
    gl: Arc<glow::Context>,
    id: glow::Buffer,
    kind: BufferKind,
    usage: BufferUsage,
    element_count: usize,
    element_size: usize,
}

impl Buffer {
    /// Creates an empty buffer for `element_count` elements of `element_size` bytes.
    pub fn new(
        gl: &Arc<glow::Context>,
        element_count: usize,
        element_size: usize,
        kind: BufferKind,
        usage: BufferUsage,
    ) -> Result<Self> {
        let id = unsafe { gl.create_buffer() }.map_err(RenderError::Gl)?;
        log::debug!(
            "Created {:?} buffer for {} elements of {} bytes",
            kind,
            element_count,
            element_size
        );

        Ok(Self {
            gl: Arc::clone(gl),
            id,
            kind,
            usage,
            element_count,
            element_size,
        })
    }

    /// Uploads `data`, which has to match the element count and size the buffer was created with.
    pub fn set_data<T: bytemuck::Pod>(&mut self, data: &[T]) -> Result<()> {
        let actual_size = std::mem::size_of::<T>();
        if data.len() != self.element_count || actual_size != self.element_size {
            return Err(RenderError::BufferSizeMismatch {
                expected: self.element_count,
                element_size: self.element_size,
                actual: data.len(),
                actual_size,
            });
        }

        // Index buffer bindings belong to the bound vertex array, so upload through the copy
        // target to leave vertex array state untouched.
        unsafe {
            self.gl.bind_buffer(glow::COPY_WRITE_BUFFER, Some(self.id));
            self.gl.buffer_data_u8_slice(
                glow::COPY_WRITE_BUFFER,
                bytemuck::cast_slice(data),
                self.usage.hint(),
            );
            self.gl.bind_buffer(glow::COPY_WRITE_BUFFER, None);
        }
        Ok(())
    }

    pub fn bind(&self) {
        unsafe {
            self.gl.bind_buffer(self.kind.target(), Some(self.id));
        }
    }

    pub fn unbind(&self) {
        unsafe {
            self.gl.bind_buffer(self.kind.target(), None);
        }
    }

    pub fn kind(&self) -> BufferKind {
        self.kind
    }

    pub fn element_count(&self) -> usize {
        self.element_count
    }

    /// Size of the buffer contents in bytes.
    pub fn size(&self) -> usize {
        self.element_count * self.element_size
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_buffer(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_buffer_targets() {
        assert_eq!(BufferKind::Vertex.target(), glow::ARRAY_BUFFER);
        assert_eq!(BufferKind::Index.target(), glow::ELEMENT_ARRAY_BUFFER);
    }

    #[test]
    fn usages_map_to_draw_hints() {
        assert_eq!(BufferUsage::Static.hint(), glow::STATIC_DRAW);
        assert_eq!(BufferUsage::Dynamic.hint(), glow::DYNAMIC_DRAW);
        assert_eq!(BufferUsage::Stream.hint(), glow::STREAM_DRAW);
    }
}
