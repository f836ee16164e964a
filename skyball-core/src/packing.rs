//! Packing of imported meshes into interleaved vertex and index arrays.

use crate::{
    error::ImportError,
    scene::ImportedMesh,
    vertex::{VertexComponents, VertexFormat},
};

/// Interleaved vertex data and triangle indices ready for upload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PackedMesh {
    /// `stride * vertex_count` floats, attributes in [`VertexFormat`] order.
    pub vertices: Vec<f32>,
    /// Three indices per triangle.
    pub indices: Vec<u32>,
    pub components: VertexComponents,
    /// Floats per vertex.
    pub stride: usize,
}

impl PackedMesh {
    pub fn vertex_count(&self) -> usize {
        if self.stride == 0 {
            0
        } else {
            self.vertices.len() / self.stride
        }
    }

    /// The vertex slice for the vertex at `index`.
    pub fn vertex(&self, index: usize) -> &[f32] {
        &self.vertices[index * self.stride..(index + 1) * self.stride]
    }

    pub fn format(&self) -> VertexFormat {
        VertexFormat::from_components(self.components)
    }
}

/// Packs the given mesh into an interleaved vertex array.
///
/// Vertices are written while walking the faces, so a vertex no face references stays zeroed.
/// Writing the same vertex from several faces always produces the same values.
pub fn pack(mesh: &ImportedMesh) -> Result<PackedMesh, ImportError> {
    mesh.validate()?;

    let components = mesh.components();
    let stride = components.stride();

    let mut vertices = vec![0.0f32; stride * mesh.vertex_count()];
    let mut indices = Vec::with_capacity(3 * mesh.face_count());

    for face in &mesh.faces {
        for &index in face {
            indices.push(index);

            let i = index as usize;
            let vertex = &mut vertices[stride * i..stride * (i + 1)];

            vertex[..3].copy_from_slice(&mesh.positions[i].to_array());
            let mut offset = 3;

            if let Some(tex_coords) = &mesh.tex_coords {
                vertex[offset..offset + 2].copy_from_slice(&tex_coords[i].to_array());
                offset += 2;
            }

            if let Some(normals) = &mesh.normals {
                vertex[offset..offset + 3].copy_from_slice(&normals[i].to_array());
                offset += 3;
            }

            if let Some(tangents) = &mesh.tangents {
                vertex[offset..offset + 3].copy_from_slice(&tangents[i].to_array());
            }
        }
    }

    Ok(PackedMesh {
        vertices,
        indices,
        components,
        stride,
    })
}

#[cfg(test)]
mod tests {
    use glam::{Vec2, Vec3};

    use super::*;

    fn quad() -> ImportedMesh {
        ImportedMesh {
            name: "quad".into(),
            positions: vec![
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(1.0, -1.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(-1.0, 1.0, 0.0),
            ],
            faces: vec![[0, 1, 2], [0, 2, 3]],
            ..Default::default()
        }
    }

    #[test]
    fn positions_only_quad() {
        let packed = pack(&quad()).unwrap();
        assert_eq!(packed.stride, 3);
        assert_eq!(packed.vertices.len(), 12);
        assert_eq!(packed.indices, vec![0, 1, 2, 0, 2, 3]);
        assert!(packed.indices.iter().all(|&i| i <= 3));
        assert_eq!(packed.vertex(2), &[1.0, 1.0, 0.0]);
        assert_eq!(packed.vertex_count(), 4);
    }

    #[test]
    fn uvs_and_normals_without_tangents() {
        let mut mesh = quad();
        mesh.tex_coords = Some(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ]);
        mesh.normals = Some(vec![Vec3::Z; 4]);

        let packed = pack(&mesh).unwrap();
        assert_eq!(packed.stride, 8);
        assert_eq!(packed.vertices.len(), 32);
        assert_eq!(packed.vertex(1), &[1.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);

        let counts: Vec<usize> = packed.format().elements().iter().map(|e| e.components).collect();
        assert_eq!(counts, vec![3, 2, 3]);
    }

    #[test]
    fn all_attributes_use_fixed_order() {
        let mut mesh = quad();
        mesh.tex_coords = Some(vec![Vec2::new(0.25, 0.75); 4]);
        mesh.normals = Some(vec![Vec3::new(0.0, 0.0, 1.0); 4]);
        mesh.tangents = Some(vec![Vec3::new(1.0, 0.0, 0.0); 4]);

        let packed = pack(&mesh).unwrap();
        assert_eq!(packed.stride, 11);
        assert_eq!(packed.components, VertexComponents::all());
        assert_eq!(
            packed.vertex(3),
            &[-1.0, 1.0, 0.0, 0.25, 0.75, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0]
        );
    }

    #[test]
    fn shared_vertices_pack_identically() {
        let mesh = quad();
        let packed = pack(&mesh).unwrap();

        let mut reversed = mesh.clone();
        reversed.faces.reverse();
        let repacked = pack(&reversed).unwrap();

        // vertices 0 and 2 are shared by both triangles
        assert_eq!(packed.vertex(0), repacked.vertex(0));
        assert_eq!(packed.vertex(2), repacked.vertex(2));
        assert_eq!(packed.vertices, repacked.vertices);
    }

    #[test]
    fn index_count_matches_faces() {
        let mesh = quad();
        let packed = pack(&mesh).unwrap();
        assert_eq!(packed.indices.len(), 3 * mesh.face_count());
        assert!(packed.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));
    }

    #[test]
    fn empty_mesh_packs_to_empty_buffers() {
        let packed = pack(&ImportedMesh::default()).unwrap();
        assert!(packed.vertices.is_empty());
        assert!(packed.indices.is_empty());
        assert_eq!(packed.stride, 3);
        assert_eq!(packed.vertex_count(), 0);
    }

    #[test]
    fn unreferenced_vertices_stay_zeroed() {
        let mut mesh = quad();
        mesh.faces.truncate(1);
        let packed = pack(&mesh).unwrap();
        assert_eq!(packed.vertex(3), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn out_of_range_faces_are_rejected() {
        let mut mesh = quad();
        mesh.faces.push([1, 2, 9]);
        assert!(matches!(pack(&mesh), Err(ImportError::IndexOutOfRange { .. })));
    }
}
