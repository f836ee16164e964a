//! Post-processing steps applied to meshes after import.

use fxhash::FxHashMap;
use glam::Vec3;

use crate::scene::ImportedMesh;

const DEGENERATE_EPSILON: f32 = 1e-12;

/// Merges vertices whose attributes are bit-for-bit identical and remaps the faces. Signed
/// zeros compare equal.
pub fn join_identical_vertices(mesh: &mut ImportedMesh) {
    let mut lookup: FxHashMap<Vec<u32>, u32> = FxHashMap::default();
    let mut remap = Vec::with_capacity(mesh.vertex_count());

    let mut positions = Vec::new();
    let mut tex_coords = mesh.tex_coords.as_ref().map(|_| Vec::new());
    let mut normals = mesh.normals.as_ref().map(|_| Vec::new());
    let mut tangents = mesh.tangents.as_ref().map(|_| Vec::new());

    for i in 0..mesh.vertex_count() {
        let key = vertex_key(mesh, i);
        let index = *lookup.entry(key).or_insert_with(|| {
            positions.push(mesh.positions[i]);
            if let (Some(out), Some(src)) = (&mut tex_coords, &mesh.tex_coords) {
                out.push(src[i]);
            }
            if let (Some(out), Some(src)) = (&mut normals, &mesh.normals) {
                out.push(src[i]);
            }
            if let (Some(out), Some(src)) = (&mut tangents, &mesh.tangents) {
                out.push(src[i]);
            }
            (positions.len() - 1) as u32
        });
        remap.push(index);
    }

    if positions.len() == mesh.vertex_count() {
        return;
    }

    log::debug!(
        "Joined '{}' from {} to {} vertices",
        mesh.name,
        mesh.vertex_count(),
        positions.len()
    );

    for face in &mut mesh.faces {
        for index in face.iter_mut() {
            *index = remap[*index as usize];
        }
    }
    mesh.positions = positions;
    mesh.tex_coords = tex_coords;
    mesh.normals = normals;
    mesh.tangents = tangents;
}

fn vertex_key(mesh: &ImportedMesh, i: usize) -> Vec<u32> {
    let mut key: Vec<u32> = mesh.positions[i].to_array().map(key_bits).to_vec();
    if let Some(tex_coords) = &mesh.tex_coords {
        key.extend(tex_coords[i].to_array().map(key_bits));
    }
    if let Some(normals) = &mesh.normals {
        key.extend(normals[i].to_array().map(key_bits));
    }
    if let Some(tangents) = &mesh.tangents {
        key.extend(tangents[i].to_array().map(key_bits));
    }
    key
}

/// Bit pattern used for comparing components. `-0.0` maps to `0.0`.
fn key_bits(value: f32) -> u32 {
    if value == 0.0 { 0 } else { value.to_bits() }
}

/// Generates per-vertex tangents for meshes that have texture coordinates and normals but no
/// tangents. Meshes missing either input are left alone.
pub fn calc_tangent_space(mesh: &mut ImportedMesh) {
    if mesh.tangents.is_some() {
        return;
    }
    let (Some(tex_coords), Some(normals)) = (&mesh.tex_coords, &mesh.normals) else {
        return;
    };

    let mut accumulated = vec![Vec3::ZERO; mesh.vertex_count()];

    for &[a, b, c] in &mesh.faces {
        let (a, b, c) = (a as usize, b as usize, c as usize);
        let edge1 = mesh.positions[b] - mesh.positions[a];
        let edge2 = mesh.positions[c] - mesh.positions[a];
        let duv1 = tex_coords[b] - tex_coords[a];
        let duv2 = tex_coords[c] - tex_coords[a];

        let det = duv1.x * duv2.y - duv2.x * duv1.y;
        if det.abs() < DEGENERATE_EPSILON {
            continue;
        }

        let tangent = (edge1 * duv2.y - edge2 * duv1.y) / det;
        accumulated[a] += tangent;
        accumulated[b] += tangent;
        accumulated[c] += tangent;
    }

    let tangents: Vec<Vec3> = accumulated
        .into_iter()
        .zip(normals)
        .map(|(tangent, &normal)| {
            // Gram-Schmidt against the normal
            let orthogonal = tangent - normal * normal.dot(tangent);
            if orthogonal.length_squared() < DEGENERATE_EPSILON {
                perpendicular(normal)
            } else {
                orthogonal.normalize()
            }
        })
        .collect();

    mesh.tangents = Some(tangents);
}

fn perpendicular(normal: Vec3) -> Vec3 {
    let normal = normal.normalize_or_zero();
    if normal == Vec3::ZERO {
        Vec3::X
    } else {
        normal.any_orthonormal_vector()
    }
}

/// Splits a triangle strip into a triangle list, keeping a consistent winding.
pub fn triangulate_strip(indices: &[u32]) -> Vec<[u32; 3]> {
    indices
        .windows(3)
        .enumerate()
        .map(|(i, w)| {
            if i % 2 == 0 {
                [w[0], w[1], w[2]]
            } else {
                [w[1], w[0], w[2]]
            }
        })
        .collect()
}

/// Splits a triangle fan into a triangle list.
pub fn triangulate_fan(indices: &[u32]) -> Vec<[u32; 3]> {
    match indices.split_first() {
        Some((&center, rest)) => rest.windows(2).map(|w| [center, w[0], w[1]]).collect(),
        None => Vec::new(),
    }
}

/// Groups a flat triangle list into faces. Trailing indices that do not form a full triangle
/// are dropped.
pub fn triangle_list(indices: &[u32]) -> Vec<[u32; 3]> {
    indices
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .collect()
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;

    fn textured_quad() -> ImportedMesh {
        ImportedMesh {
            name: "quad".into(),
            positions: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            tex_coords: Some(vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(0.0, 1.0),
            ]),
            normals: Some(vec![Vec3::Z; 4]),
            tangents: None,
            faces: vec![[0, 1, 2], [0, 2, 3]],
        }
    }

    #[test]
    fn tangents_follow_u_direction() {
        let mut mesh = textured_quad();
        calc_tangent_space(&mut mesh);

        let tangents = mesh.tangents.unwrap();
        assert_eq!(tangents.len(), 4);
        for tangent in tangents {
            assert!((tangent - Vec3::X).length() < 1e-5);
        }
    }

    #[test]
    fn tangents_need_uvs_and_normals() {
        let mut mesh = textured_quad();
        mesh.tex_coords = None;
        calc_tangent_space(&mut mesh);
        assert!(mesh.tangents.is_none());
    }

    #[test]
    fn degenerate_uvs_fall_back_to_perpendicular() {
        let mut mesh = textured_quad();
        mesh.tex_coords = Some(vec![Vec2::ZERO; 4]);
        calc_tangent_space(&mut mesh);

        for tangent in mesh.tangents.unwrap() {
            assert!(tangent.dot(Vec3::Z).abs() < 1e-5);
            assert!((tangent.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn identical_vertices_are_joined() {
        let mut mesh = ImportedMesh {
            name: "split quad".into(),
            positions: vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            faces: vec![[0, 1, 2], [3, 4, 5]],
            ..Default::default()
        };

        join_identical_vertices(&mut mesh);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.faces, vec![[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn signed_zeros_are_joined() {
        let mut mesh = ImportedMesh {
            name: "pole".into(),
            positions: vec![
                Vec3::new(0.0, 5.0, 0.0),
                Vec3::X,
                Vec3::Y,
                Vec3::new(-0.0, 5.0, -0.0),
            ],
            normals: Some(vec![Vec3::Y, Vec3::Y, Vec3::Y, Vec3::new(-0.0, 1.0, 0.0)]),
            faces: vec![[0, 1, 2], [3, 2, 1]],
            ..Default::default()
        };

        join_identical_vertices(&mut mesh);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.faces, vec![[0, 1, 2], [0, 2, 1]]);
    }

    #[test]
    fn vertices_differing_in_normals_stay_apart() {
        let mut mesh = ImportedMesh {
            name: "edge".into(),
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::ZERO],
            normals: Some(vec![Vec3::Z, Vec3::Z, Vec3::Z, Vec3::X]),
            faces: vec![[0, 1, 2], [3, 1, 2]],
            ..Default::default()
        };

        join_identical_vertices(&mut mesh);
        assert_eq!(mesh.vertex_count(), 4);
    }

    #[test]
    fn strips_and_fans_become_lists() {
        assert_eq!(triangulate_strip(&[0, 1, 2, 3]), vec![[0, 1, 2], [2, 1, 3]]);
        assert_eq!(triangulate_fan(&[0, 1, 2, 3]), vec![[0, 1, 2], [0, 2, 3]]);
        assert!(triangulate_fan(&[]).is_empty());
        assert_eq!(triangle_list(&[0, 1, 2, 3]), vec![[0, 1, 2]]);
    }
}
