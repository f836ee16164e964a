//! In-memory representation of an imported scene.

use glam::{Vec2, Vec3};

use crate::{error::ImportError, vertex::VertexComponents};

/// A triangle mesh as delivered by an importer.
///
/// Optional attributes are either absent or hold exactly one entry per position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedMesh {
    pub name: String,
    pub positions: Vec<Vec3>,
    /// First texture coordinate channel.
    pub tex_coords: Option<Vec<Vec2>>,
    pub normals: Option<Vec<Vec3>>,
    pub tangents: Option<Vec<Vec3>>,
    pub faces: Vec<[u32; 3]>,
}

impl ImportedMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn has_tex_coords(&self) -> bool {
        self.tex_coords.is_some()
    }

    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    pub fn has_tangents(&self) -> bool {
        self.tangents.is_some()
    }

    /// The attribute set a packed version of this mesh carries.
    pub fn components(&self) -> VertexComponents {
        let mut components = VertexComponents::POSITIONS;
        components.set(VertexComponents::TEXTURE_COORDINATES, self.has_tex_coords());
        components.set(VertexComponents::NORMALS, self.has_normals());
        components.set(VertexComponents::TANGENTS, self.has_tangents());
        components
    }

    /// Checks that every attribute matches the position count and that all faces reference
    /// existing vertices.
    pub fn validate(&self) -> Result<(), ImportError> {
        let expected = self.vertex_count();

        let check = |attribute: &'static str, actual: Option<usize>| match actual {
            Some(actual) if actual != expected => Err(ImportError::AttributeCountMismatch {
                mesh: self.name.clone(),
                attribute,
                expected,
                actual,
            }),
            _ => Ok(()),
        };
        check("texture coordinates", self.tex_coords.as_ref().map(Vec::len))?;
        check("normals", self.normals.as_ref().map(Vec::len))?;
        check("tangents", self.tangents.as_ref().map(Vec::len))?;

        if let Some(&index) = self
            .faces
            .iter()
            .flatten()
            .find(|&&index| index as usize >= expected)
        {
            return Err(ImportError::IndexOutOfRange {
                mesh: self.name.clone(),
                index,
                vertex_count: expected,
            });
        }

        Ok(())
    }
}

/// The result of importing a model file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub meshes: Vec<ImportedMesh>,
}

impl Scene {
    pub fn has_meshes(&self) -> bool {
        !self.meshes.is_empty()
    }

    /// Returns the first mesh, the only one the renderer uses.
    pub fn first_mesh(&self) -> Result<&ImportedMesh, ImportError> {
        self.meshes.first().ok_or(ImportError::NoMeshes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> ImportedMesh {
        ImportedMesh {
            name: "triangle".into(),
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            faces: vec![[0, 1, 2]],
            ..Default::default()
        }
    }

    #[test]
    fn components_reflect_present_attributes() {
        let mut mesh = triangle();
        assert_eq!(mesh.components(), VertexComponents::POSITIONS);

        mesh.normals = Some(vec![Vec3::Z; 3]);
        assert_eq!(
            mesh.components(),
            VertexComponents::POSITIONS | VertexComponents::NORMALS
        );
    }

    #[test]
    fn validate_rejects_out_of_range_indices() {
        let mut mesh = triangle();
        mesh.faces.push([0, 2, 3]);
        assert!(matches!(
            mesh.validate(),
            Err(ImportError::IndexOutOfRange { index: 3, vertex_count: 3, .. })
        ));
    }

    #[test]
    fn validate_rejects_short_attributes() {
        let mut mesh = triangle();
        mesh.tex_coords = Some(vec![Vec2::ZERO; 2]);
        assert!(matches!(
            mesh.validate(),
            Err(ImportError::AttributeCountMismatch { attribute: "texture coordinates", .. })
        ));
    }

    #[test]
    fn empty_scene_has_no_first_mesh() {
        let scene = Scene::default();
        assert!(!scene.has_meshes());
        assert!(matches!(scene.first_mesh(), Err(ImportError::NoMeshes)));
    }
}
