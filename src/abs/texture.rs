//! Structs and functions for handling textures.
//!
//! The module provides the [`Texture`] struct which is a CPU representation of a GPU texture,
//! either a plain 2D texture or a cube map made of six faces.

use std::{path::Path, sync::Arc};

use glow::HasContext;
use image::{DynamicImage, GenericImageView};

use crate::error::{RenderError, Result};

/// The kind of texture object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureKind {
    Texture2D,
    CubeMap,
}

impl TextureKind {
    pub fn target(self) -> u32 {
        match self {
            TextureKind::Texture2D => glow::TEXTURE_2D,
            TextureKind::CubeMap => glow::TEXTURE_CUBE_MAP,
        }
    }
}

/// One face of a cube map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubeSide {
    PositiveX,
    PositiveY,
    PositiveZ,
    NegativeX,
    NegativeY,
    NegativeZ,
}

impl CubeSide {
    pub const ALL: [CubeSide; 6] = [
        CubeSide::PositiveX,
        CubeSide::PositiveY,
        CubeSide::PositiveZ,
        CubeSide::NegativeX,
        CubeSide::NegativeY,
        CubeSide::NegativeZ,
    ];

    pub fn target(self) -> u32 {
        match self {
            CubeSide::PositiveX => glow::TEXTURE_CUBE_MAP_POSITIVE_X,
            CubeSide::PositiveY => glow::TEXTURE_CUBE_MAP_POSITIVE_Y,
            CubeSide::PositiveZ => glow::TEXTURE_CUBE_MAP_POSITIVE_Z,
            CubeSide::NegativeX => glow::TEXTURE_CUBE_MAP_NEGATIVE_X,
            CubeSide::NegativeY => glow::TEXTURE_CUBE_MAP_NEGATIVE_Y,
            CubeSide::NegativeZ => glow::TEXTURE_CUBE_MAP_NEGATIVE_Z,
        }
    }
}

/// Represents a texture stored on the GPU side.
pub struct Texture {
    gl: Arc<glow::Context>,
    id: glow::Texture,
    kind: TextureKind,
    width: u32,
    height: u32,
}

impl Texture {
    /// Creates a new 2D texture from the given [`image::DynamicImage`].
    pub fn new(gl: &Arc<glow::Context>, image: &DynamicImage) -> Result<Self> {
        let texture = Self::create(gl, TextureKind::Texture2D, image.dimensions())?;
        unsafe {
            gl.bind_texture(glow::TEXTURE_2D, Some(texture.id));
            upload(gl, glow::TEXTURE_2D, image);
            gl.generate_mipmap(glow::TEXTURE_2D);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::LINEAR_MIPMAP_LINEAR as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::LINEAR as i32,
            );
            gl.bind_texture(glow::TEXTURE_2D, None);
        }
        Ok(texture)
    }

    /// Creates a cube map whose +X face is `image`. The other faces are added with
    /// [`Texture::add_cube_side`].
    pub fn new_cube_map(gl: &Arc<glow::Context>, image: &DynamicImage) -> Result<Self> {
        let texture = Self::create(gl, TextureKind::CubeMap, image.dimensions())?;
        unsafe {
            gl.bind_texture(glow::TEXTURE_CUBE_MAP, Some(texture.id));
            upload(gl, CubeSide::PositiveX.target(), image);
            for (parameter, value) in [
                (glow::TEXTURE_MAG_FILTER, glow::LINEAR),
                (glow::TEXTURE_MIN_FILTER, glow::LINEAR),
                (glow::TEXTURE_WRAP_R, glow::CLAMP_TO_EDGE),
                (glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE),
                (glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE),
            ] {
                gl.tex_parameter_i32(glow::TEXTURE_CUBE_MAP, parameter, value as i32);
            }
            gl.bind_texture(glow::TEXTURE_CUBE_MAP, None);
        }
        Ok(texture)
    }

    /// Decodes the image at `path` into a texture of the given kind.
    ///
    /// 2D images are flipped so their first row ends up at `v = 0`. For cube maps `path` is the
    /// +X face.
    pub fn load(gl: &Arc<glow::Context>, kind: TextureKind, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)?;

        let texture = match kind {
            TextureKind::Texture2D => Self::new(gl, &image.flipv())?,
            TextureKind::CubeMap => Self::new_cube_map(gl, &image)?,
        };
        log::info!(
            "Loaded {:?} texture '{}' ({}x{})",
            texture.kind(),
            path.display(),
            texture.width(),
            texture.height()
        );
        Ok(texture)
    }

    /// Decodes the image at `path` and uploads it as one face of this cube map.
    pub fn add_cube_side(&self, side: CubeSide, path: impl AsRef<Path>) -> Result<()> {
        if self.kind != TextureKind::CubeMap {
            return Err(RenderError::Gl(format!(
                "cannot add a cube side to a {:?} texture",
                self.kind
            )));
        }

        let path = path.as_ref();
        let image = image::open(path)?;
        unsafe {
            self.gl.bind_texture(glow::TEXTURE_CUBE_MAP, Some(self.id));
            upload(&self.gl, side.target(), &image);
            self.gl.bind_texture(glow::TEXTURE_CUBE_MAP, None);
        }
        log::debug!("Loaded {:?} cube side '{}'", side, path.display());
        Ok(())
    }

    fn create(gl: &Arc<glow::Context>, kind: TextureKind, (width, height): (u32, u32)) -> Result<Self> {
        let id = unsafe { gl.create_texture() }.map_err(RenderError::Gl)?;
        Ok(Self {
            gl: Arc::clone(gl),
            id,
            kind,
            width,
            height,
        })
    }

    pub fn kind(&self) -> TextureKind {
        self.kind
    }

    /// Returns the width of the texture.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the texture.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Binds the texture on the active texture unit.
    pub fn apply(&self) {
        unsafe {
            self.gl.bind_texture(self.kind.target(), Some(self.id));
        }
    }

    pub fn unapply(&self) {
        unsafe {
            self.gl.bind_texture(self.kind.target(), None);
        }
    }

    /// Binds the texture to the specified texture unit.
    pub fn bind(&self, unit: u32) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
        }
        self.apply();
    }
}

/// Uploads `image` as RGBA8 to `target` of the currently bound texture.
unsafe fn upload(gl: &glow::Context, target: u32, image: &DynamicImage) {
    let (width, height) = image.dimensions();
    let data = image.to_rgba8().into_raw();
    unsafe {
        gl.tex_image_2d(
            target,
            0,
            glow::RGBA as i32,
            width as i32,
            height as i32,
            0,
            glow::RGBA,
            glow::UNSIGNED_BYTE,
            glow::PixelUnpackData::Slice(Some(data.as_slice())),
        );
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_texture(self.id);
        }
    }
}
