//! Mesh management module.
//!
//! This module defines the [`Mesh`] struct: packed vertex and index buffers on the GPU side plus
//! the effect and diffuse texture used to draw them.

use std::{path::Path, rc::Rc, sync::Arc};

use glow::HasContext;
use skyball_core::{ImportOptions, PackedMesh, VertexComponents, import_file, pack};

use crate::{
    abs::{Buffer, BufferKind, BufferState, BufferUsage, Effect, Texture},
    error::Result,
};

/// Texture unit the diffuse map is bound to.
pub const DIFFUSE_UNIT: u32 = 0;

/// Represents a mesh stored on the GPU side.
pub struct Mesh {
    gl: Arc<glow::Context>,
    // Declared before the buffers so the vertex array is deleted first.
    buffer_state: BufferState,
    vertex_buffer: Buffer,
    index_buffer: Buffer,
    components: VertexComponents,
    effect: Rc<Effect>,
    diffuse: Option<Rc<Texture>>,
}

impl Mesh {
    /// Uploads already packed mesh data.
    pub fn new(
        gl: &Arc<glow::Context>,
        packed: &PackedMesh,
        effect: Rc<Effect>,
        diffuse: Option<Rc<Texture>>,
    ) -> Result<Self> {
        let mut vertex_buffer = Buffer::new(
            gl,
            packed.vertices.len(),
            std::mem::size_of::<f32>(),
            BufferKind::Vertex,
            BufferUsage::Static,
        )?;
        let mut index_buffer = Buffer::new(
            gl,
            packed.indices.len(),
            std::mem::size_of::<u32>(),
            BufferKind::Index,
            BufferUsage::Static,
        )?;

        vertex_buffer.set_data(&packed.vertices)?;
        index_buffer.set_data(&packed.indices)?;

        let buffer_state = BufferState::new(gl, packed.format(), &vertex_buffer, &index_buffer)?;

        Ok(Self {
            gl: Arc::clone(gl),
            buffer_state,
            vertex_buffer,
            index_buffer,
            components: packed.components,
            effect,
            diffuse,
        })
    }

    /// Imports the model at `path` and uploads its first mesh.
    pub fn load(
        gl: &Arc<glow::Context>,
        path: impl AsRef<Path>,
        effect: Rc<Effect>,
        diffuse: Option<Rc<Texture>>,
    ) -> Result<Rc<Self>> {
        let path = path.as_ref();
        let scene = import_file(path, &ImportOptions::default())?;
        if scene.meshes.len() > 1 {
            log::warn!(
                "'{}' contains {} meshes, only the first one is used",
                path.display(),
                scene.meshes.len()
            );
        }
        let packed = pack(scene.first_mesh()?)?;

        let mesh = Self::new(gl, &packed, effect, diffuse)?;
        log::debug!(
            "'{}' uses a {} byte vertex stride",
            path.display(),
            mesh.buffer_state.format().stride_bytes()
        );
        log::info!(
            "Loaded mesh '{}' ({} vertices, {} triangles, {:?})",
            path.display(),
            packed.vertex_count(),
            packed.indices.len() / 3,
            mesh.components
        );

        Ok(Rc::new(mesh))
    }

    /// Draws the mesh with its effect and diffuse texture.
    pub fn draw(&self) {
        self.effect.apply();
        self.buffer_state.apply();
        self.apply_texture_maps();
        unsafe {
            self.gl.draw_elements(
                glow::TRIANGLES,
                self.index_buffer.element_count() as i32,
                glow::UNSIGNED_INT,
                0,
            );
        }
        self.unapply_texture_maps();
        self.buffer_state.unapply();
        self.effect.unapply();
    }

    fn apply_texture_maps(&self) {
        if let Some(diffuse) = &self.diffuse {
            diffuse.bind(DIFFUSE_UNIT);
        }
    }

    fn unapply_texture_maps(&self) {
        if let Some(diffuse) = &self.diffuse {
            unsafe {
                self.gl.active_texture(glow::TEXTURE0 + DIFFUSE_UNIT);
            }
            diffuse.unapply();
        }
    }

    pub fn components(&self) -> VertexComponents {
        self.components
    }

    /// Size of the packed vertex data in bytes.
    pub fn vertex_data_size(&self) -> usize {
        self.vertex_buffer.size()
    }

    pub fn index_count(&self) -> usize {
        self.index_buffer.element_count()
    }
}
