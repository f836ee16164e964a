//! glTF 2.0 importing through `gltf`.
//!
//! Every primitive becomes its own [`ImportedMesh`], so a scene never mixes primitive types
//! inside one mesh.

use std::path::Path;

use ::gltf::{buffer, mesh::Mode};
use glam::{Vec2, Vec3, Vec4};

use super::{ImportOptions, PrimitiveTypes, finish};
use crate::{
    error::ImportError,
    postprocess::{triangle_list, triangulate_fan, triangulate_strip},
    scene::{ImportedMesh, Scene},
};

/// Imports a `.gltf` or `.glb` file together with its buffers.
pub fn import_gltf(path: &Path, options: &ImportOptions) -> Result<Scene, ImportError> {
    let (document, buffers, _images) = ::gltf::import(path)?;
    convert(&document, &buffers, options)
}

/// Imports a glTF document held in memory. External buffers must be embedded as data URIs.
pub fn import_gltf_slice(bytes: &[u8], options: &ImportOptions) -> Result<Scene, ImportError> {
    let (document, buffers, _images) = ::gltf::import_slice(bytes)?;
    convert(&document, &buffers, options)
}

fn primitive_type(mode: Mode) -> PrimitiveTypes {
    match mode {
        Mode::Points => PrimitiveTypes::POINT,
        Mode::Lines | Mode::LineLoop | Mode::LineStrip => PrimitiveTypes::LINE,
        Mode::Triangles | Mode::TriangleStrip | Mode::TriangleFan => PrimitiveTypes::TRIANGLE,
    }
}

fn convert(
    document: &::gltf::Document,
    buffers: &[buffer::Data],
    options: &ImportOptions,
) -> Result<Scene, ImportError> {
    let mut meshes = Vec::new();

    for mesh in document.meshes() {
        let mesh_name = mesh
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("mesh{}", mesh.index()));

        for primitive in mesh.primitives() {
            let name = format!("{}/{}", mesh_name, primitive.index());
            let mode = primitive.mode();

            let kind = primitive_type(mode);
            if kind != PrimitiveTypes::TRIANGLE {
                if options.removes(kind) {
                    log::debug!("Dropping {:?} primitive '{}'", mode, name);
                    continue;
                }
                return Err(ImportError::UnsupportedPrimitive {
                    mesh: name,
                    primitive: format!("{:?}", mode),
                });
            }
            if options.removes(PrimitiveTypes::TRIANGLE) {
                continue;
            }

            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

            let positions: Vec<Vec3> = match reader.read_positions() {
                Some(positions) => positions.map(Vec3::from).collect(),
                None => continue,
            };
            let tex_coords = reader
                .read_tex_coords(0)
                .map(|uvs| uvs.into_f32().map(Vec2::from).collect());
            let normals = reader
                .read_normals()
                .map(|normals| normals.map(Vec3::from).collect());
            let tangents = reader
                .read_tangents()
                .map(|tangents| tangents.map(|t| Vec4::from(t).truncate()).collect());

            let indices: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..positions.len() as u32).collect(),
            };

            let faces = match mode {
                Mode::Triangles => triangle_list(&indices),
                Mode::TriangleStrip | Mode::TriangleFan if !options.triangulate() => {
                    return Err(ImportError::NotTriangulated {
                        mesh: name,
                        arity: indices.len(),
                    });
                }
                Mode::TriangleStrip => triangulate_strip(&indices),
                _ => triangulate_fan(&indices),
            };

            meshes.push(ImportedMesh {
                name,
                positions,
                tex_coords,
                normals,
                tangents,
                faces,
            });
        }
    }

    finish(meshes, options)
}
