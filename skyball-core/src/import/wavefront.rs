//! Wavefront OBJ importing through `tobj`.

use std::{io::BufRead, path::Path};

use fxhash::FxHashMap;
use glam::{Vec2, Vec3};

use super::{ImportOptions, PrimitiveTypes, finish};
use crate::{
    error::ImportError,
    postprocess::triangle_list,
    scene::{ImportedMesh, Scene},
};

// Texture coordinates and normals keep their own per-corner indices; `convert_model` builds the
// combined vertices so faces without `vt` or `vn` still line up with the rest of the mesh.
fn load_options(options: &ImportOptions) -> tobj::LoadOptions {
    tobj::LoadOptions {
        single_index: false,
        triangulate: options.triangulate(),
        ignore_points: options.removes(PrimitiveTypes::POINT),
        ignore_lines: options.removes(PrimitiveTypes::LINE),
        ..Default::default()
    }
}

/// Imports an OBJ file. Materials are not loaded.
pub fn import_obj(path: &Path, options: &ImportOptions) -> Result<Scene, ImportError> {
    let (models, _materials) = tobj::load_obj(path, &load_options(options))?;
    convert(models, options)
}

/// Imports OBJ data from a reader. `mtllib` statements are ignored.
pub fn import_obj_reader<R: BufRead>(
    reader: &mut R,
    options: &ImportOptions,
) -> Result<Scene, ImportError> {
    let (models, _materials) = tobj::load_obj_buf(reader, &load_options(options), |_| {
        Err(tobj::LoadError::OpenFileFailed)
    })?;
    convert(models, options)
}

fn convert(models: Vec<tobj::Model>, options: &ImportOptions) -> Result<Scene, ImportError> {
    let meshes = models
        .into_iter()
        .filter(|model| !model.mesh.positions.is_empty())
        .map(convert_model)
        .collect::<Result<Vec<_>, _>>()?;

    finish(meshes, options)
}

fn convert_model(model: tobj::Model) -> Result<ImportedMesh, ImportError> {
    let mesh = model.mesh;

    if let Some(&arity) = mesh.face_arities.iter().find(|&&arity| arity != 3) {
        return Err(if arity < 3 {
            ImportError::UnsupportedPrimitive {
                mesh: model.name,
                primitive: if arity == 1 { "point" } else { "line" }.to_string(),
            }
        } else {
            ImportError::NotTriangulated {
                mesh: model.name,
                arity: arity as usize,
            }
        });
    }

    let mut lookup: FxHashMap<[u32; 3], u32> = FxHashMap::default();
    let mut positions = Vec::new();
    let mut tex_coords = (!mesh.texcoord_indices.is_empty()).then(Vec::new);
    let mut normals = (!mesh.normal_indices.is_empty()).then(Vec::new);
    let mut corners = Vec::with_capacity(mesh.indices.len());

    for (corner, &position) in mesh.indices.iter().enumerate() {
        let tex_coord = mesh.texcoord_indices.get(corner).copied();
        let normal = mesh.normal_indices.get(corner).copied();
        let key = [
            position,
            tex_coord.unwrap_or(u32::MAX),
            normal.unwrap_or(u32::MAX),
        ];

        let index = *lookup.entry(key).or_insert_with(|| {
            positions.push(vec3_at(&mesh.positions, Some(position)));
            if let Some(out) = &mut tex_coords {
                out.push(vec2_at(&mesh.texcoords, tex_coord));
            }
            if let Some(out) = &mut normals {
                out.push(vec3_at(&mesh.normals, normal));
            }
            (positions.len() - 1) as u32
        });
        corners.push(index);
    }

    Ok(ImportedMesh {
        name: model.name,
        positions,
        tex_coords,
        normals,
        tangents: None,
        faces: triangle_list(&corners),
    })
}

/// Reads the `index`th pair of `data`, or zero if it is missing.
fn vec2_at(data: &[f32], index: Option<u32>) -> Vec2 {
    index
        .and_then(|i| data.get(i as usize * 2..i as usize * 2 + 2))
        .map_or(Vec2::ZERO, Vec2::from_slice)
}

/// Reads the `index`th triple of `data`, or zero if it is missing.
fn vec3_at(data: &[f32], index: Option<u32>) -> Vec3 {
    index
        .and_then(|i| data.get(i as usize * 3..i as usize * 3 + 3))
        .map_or(Vec3::ZERO, Vec3::from_slice)
}
