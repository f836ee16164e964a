//! Model file importing.
//!
//! [`import_file`] picks an importer from the file extension, converts every mesh in the file
//! into an [`ImportedMesh`] and then runs the requested [`PostProcess`] steps over the result.
//! Wavefront OBJ files go through `tobj`, glTF files through `gltf`.

use std::path::Path;

use bitflags::bitflags;

use crate::{
    error::ImportError,
    postprocess,
    scene::{ImportedMesh, Scene},
};

mod gltf_scene;
mod wavefront;

pub use gltf_scene::{import_gltf, import_gltf_slice};
pub use wavefront::{import_obj, import_obj_reader};

bitflags! {
    /// Processing steps applied while importing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PostProcess: u8 {
        /// Generate tangents for meshes with texture coordinates and normals.
        const CALC_TANGENT_SPACE = 1 << 0;
        /// Merge vertices with identical attributes.
        const JOIN_IDENTICAL_VERTICES = 1 << 1;
        /// Split meshes so that every mesh holds a single primitive type.
        ///
        /// [`ImportedMesh`] only stores triangles, so the importers always split: glTF yields one
        /// mesh per primitive, and OBJ points and lines are either dropped or rejected. Clearing
        /// the flag changes nothing.
        const SORT_BY_PRIMITIVE_TYPE = 1 << 2;
        /// Turn polygons, strips and fans into triangle lists.
        const TRIANGULATE = 1 << 3;
    }
}

bitflags! {
    /// Primitive types found in model files.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PrimitiveTypes: u8 {
        const POINT = 1 << 0;
        const LINE = 1 << 1;
        const TRIANGLE = 1 << 2;
    }
}

/// Options controlling how a model file is imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    pub post_process: PostProcess,
    /// Primitive types dropped from the scene instead of being reported as errors.
    pub remove_primitives: PrimitiveTypes,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            post_process: PostProcess::all(),
            remove_primitives: PrimitiveTypes::POINT | PrimitiveTypes::LINE,
        }
    }
}

impl ImportOptions {
    pub fn triangulate(&self) -> bool {
        self.post_process.contains(PostProcess::TRIANGULATE)
    }

    pub fn removes(&self, primitive: PrimitiveTypes) -> bool {
        self.remove_primitives.contains(primitive)
    }
}

/// Imports the scene stored at `path`.
pub fn import_file(path: impl AsRef<Path>, options: &ImportOptions) -> Result<Scene, ImportError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("obj") => import_obj(path, options),
        Some("gltf" | "glb") => import_gltf(path, options),
        _ => Err(ImportError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Runs the post-processing steps and validation shared by all importers.
pub(crate) fn finish(
    mut meshes: Vec<ImportedMesh>,
    options: &ImportOptions,
) -> Result<Scene, ImportError> {
    for mesh in &mut meshes {
        mesh.validate()?;

        if options.post_process.contains(PostProcess::JOIN_IDENTICAL_VERTICES) {
            postprocess::join_identical_vertices(mesh);
        }

        if options.post_process.contains(PostProcess::CALC_TANGENT_SPACE) {
            postprocess::calc_tangent_space(mesh);
        }
    }

    Ok(Scene { meshes })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_match_renderer_needs() {
        let options = ImportOptions::default();
        assert!(options.triangulate());
        assert!(options.removes(PrimitiveTypes::LINE));
        assert!(options.removes(PrimitiveTypes::POINT));
        assert!(!options.removes(PrimitiveTypes::TRIANGLE));
    }

    #[test]
    fn unknown_extensions_are_rejected() {
        let result = import_file("assets/models/cube.dae", &ImportOptions::default());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));

        let result = import_file("no_extension", &ImportOptions::default());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
    }
}
