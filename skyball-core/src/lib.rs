//! The GPU-independent half of skyball. This crate turns model files into packed vertex data
//! and describes the vertex layouts the renderer binds. It also holds the small amount of math
//! the demo scene needs.

pub mod error;
pub mod import;
pub mod packing;
pub mod postprocess;
pub mod scene;
pub mod transform;
pub mod vertex;

pub use error::ImportError;
pub use import::{ImportOptions, PostProcess, PrimitiveTypes, import_file};
pub use packing::{PackedMesh, pack};
pub use scene::{ImportedMesh, Scene};
pub use vertex::{VertexComponents, VertexElement, VertexElementType, VertexFormat};

/// Imports `path` with the default options and packs its first mesh.
pub fn load_packed(path: impl AsRef<std::path::Path>) -> Result<PackedMesh, ImportError> {
    let scene = import_file(path, &ImportOptions::default())?;
    pack(scene.first_mesh()?)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use glam::Vec3;

    use super::*;

    fn model(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../assets/models")
            .join(name)
    }

    #[test]
    fn skybox_packs_positions_only() {
        let packed = load_packed(model("skybox.obj")).unwrap();
        assert_eq!(packed.components, VertexComponents::POSITIONS);
        assert_eq!(packed.stride, 3);
        assert_eq!(packed.vertex_count(), 8);
        assert_eq!(packed.indices.len(), 36);
    }

    #[test]
    fn ball_packs_every_component() {
        let packed = load_packed(model("ball.obj")).unwrap();
        assert_eq!(packed.components, VertexComponents::all());
        assert_eq!(packed.stride, 11);
        assert_eq!(packed.vertices.len(), packed.vertex_count() * 11);
        assert!(
            packed
                .indices
                .iter()
                .all(|&i| (i as usize) < packed.vertex_count())
        );
    }

    #[test]
    fn ball_faces_wind_counter_clockwise_from_outside() {
        let packed = load_packed(model("ball.obj")).unwrap();
        let position = |i: u32| Vec3::from_slice(&packed.vertex(i as usize)[..3]);

        let mut outward = 0;
        for face in packed.indices.chunks_exact(3) {
            let (a, b, c) = (position(face[0]), position(face[1]), position(face[2]));
            let normal = (b - a).cross(c - a);
            if normal.length() < 1e-6 {
                continue;
            }
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0, "face {:?} winds clockwise", face);
            outward += 1;
        }
        assert!(outward > 0);
    }
}
