//! Face reconstruction.
//!
//! Mesh sources share vertex positions between adjacent faces and store
//! UVs per loop. The export format wants every face as a private block of
//! corners, each with exactly one position, normal and UV. This module
//! walks the faces in order and, for each corner, picks the UV of the loop
//! that belongs to the face being built rather than any other face that
//! shares the vertex.

mod face;

pub use face::Face;

use crate::error::{ExportError, Result};
use crate::object_data::ObjectData;
use crate::scene::MeshSource;
use crate::types::{Vector2, Vector3};

/// Which UV layer to read loop coordinates from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UvSelection {
    /// The mesh's active layer.
    #[default]
    Active,
    /// A layer by name.
    Named(String),
}

impl UvSelection {
    fn resolve<M: MeshSource + ?Sized>(&self, mesh: &M) -> Result<usize> {
        match self {
            UvSelection::Active => mesh.active_uv_layer().ok_or_else(|| ExportError::NoActiveUvLayer {
                mesh: mesh.name().to_string(),
            }),
            UvSelection::Named(layer) => {
                mesh.uv_layer_by_name(layer)
                    .ok_or_else(|| ExportError::UnknownUvLayer {
                        mesh: mesh.name().to_string(),
                        layer: layer.clone(),
                    })
            }
        }
    }
}

/// Rebuild one face as a block of unwelded corners.
pub fn reconstruct_face<M: MeshSource + ?Sized>(mesh: &M, face: usize, uv_layer: usize) -> Result<Face> {
    let corners = mesh.face_vertices(face);
    let mut block = Face::with_capacity(corners.len(), mesh.face_material_index(face));
    // A vertex listed twice in one face owns one loop per occurrence.
    let mut consumed = Vec::with_capacity(corners.len());

    for &vertex in corners {
        let loop_index = mesh
            .vertex_loops(vertex)
            .iter()
            .copied()
            .find(|&l| mesh.loop_face(l) == face && !consumed.contains(&l))
            .ok_or(ExportError::UnmatchedLoop { face, vertex })?;
        consumed.push(loop_index);

        let uv = mesh
            .loop_uv(uv_layer, loop_index)
            .ok_or(ExportError::MissingUv { loop_index })?;

        block.vertices.push(Vector3::from(mesh.vertex_position(vertex)));
        block.normals.push(Vector3::from(mesh.vertex_normal(vertex)));
        block.uvs.push(Vector2::from(uv));
    }

    Ok(block)
}

/// Rebuild every face of a mesh, in face order.
///
/// The returned data has no materials; callers attach those separately.
pub fn reconstruct<M: MeshSource + ?Sized>(mesh: &M, uv: &UvSelection) -> Result<ObjectData> {
    let uv_layer = uv.resolve(mesh)?;
    let mut data = ObjectData::new();

    for face in 0..mesh.face_count() {
        data.push_face(reconstruct_face(mesh, face, uv_layer)?);
    }

    log::debug!(
        "Reconstructed mesh '{}': {} faces, {} corners",
        mesh.name(),
        data.face_count(),
        data.vertex_count()
    );

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::mesh::two_triangle_quad;
    use crate::scene::{Mesh, MeshData, MeshFace, MeshVertex, UvLayer};
    use glam::{DVec2, DVec3};

    #[test]
    fn test_face_blocks_are_contiguous() {
        let mesh = two_triangle_quad();
        let data = reconstruct(&mesh, &UvSelection::Active).unwrap();

        assert_eq!(data.vertex_count(), 6);
        assert_eq!(data.normals.len(), 6);
        assert_eq!(data.uvs.len(), 6);
        assert_eq!(data.material_indices, vec![0, 1]);

        // second block follows the second face's winding: 0, 2, 3
        assert_eq!(
            &data.vertices[3..],
            &[
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(1.0, 1.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
            ]
        );
    }

    #[test]
    fn test_shared_vertex_uses_own_face_uv() {
        let mesh = two_triangle_quad();
        let data = reconstruct(&mesh, &UvSelection::Active).unwrap();

        // vertex 0 appears in both faces with different UVs
        assert_eq!(data.vertices[0], data.vertices[3]);
        assert_eq!(data.uvs[0], Vector2::new(0.0, 0.0));
        assert_eq!(data.uvs[3], Vector2::new(0.5, 0.0));
        // vertex 2 likewise
        assert_eq!(data.uvs[2], Vector2::new(1.0, 1.0));
        assert_eq!(data.uvs[4], Vector2::new(1.0, 0.5));
    }

    #[test]
    fn test_repeated_vertex_takes_next_loop() {
        let up = [0.0, 0.0, 1.0];
        let mesh = Mesh::from_data(MeshData {
            name: "Pinched".to_string(),
            vertices: vec![
                MeshVertex::new([0.0, 0.0, 0.0], up),
                MeshVertex::new([1.0, 0.0, 0.0], up),
                MeshVertex::new([0.0, 1.0, 0.0], up),
            ],
            faces: vec![MeshFace::new(vec![0, 1, 0, 2])],
            uv_layers: vec![UvLayer::new(
                "UVMap",
                vec![[0.1, 0.1], [0.2, 0.2], [0.3, 0.3], [0.4, 0.4]],
            )],
            active_uv_layer: None,
        })
        .unwrap();

        let data = reconstruct(&mesh, &UvSelection::Active).unwrap();
        assert_eq!(
            data.uvs,
            vec![
                Vector2::new(0.1, 0.1),
                Vector2::new(0.2, 0.2),
                Vector2::new(0.3, 0.3),
                Vector2::new(0.4, 0.4),
            ]
        );
        assert_eq!(data.vertices[0], data.vertices[2]);
    }

    #[test]
    fn test_mixed_face_sizes() {
        let up = [0.0, 0.0, 1.0];
        let mesh = Mesh::from_data(MeshData {
            name: "Mixed".to_string(),
            vertices: vec![
                MeshVertex::new([0.0, 0.0, 0.0], up),
                MeshVertex::new([1.0, 0.0, 0.0], up),
                MeshVertex::new([1.0, 1.0, 0.0], up),
                MeshVertex::new([0.0, 1.0, 0.0], up),
                MeshVertex::new([2.0, 0.0, 0.0], up),
            ],
            faces: vec![
                MeshFace::new(vec![0, 1, 2, 3]).with_material(3),
                MeshFace::new(vec![1, 4, 2]).with_material(1),
            ],
            uv_layers: vec![UvLayer::new("UVMap", vec![[0.0, 0.0]; 7])],
            active_uv_layer: None,
        })
        .unwrap();

        let data = reconstruct(&mesh, &UvSelection::Active).unwrap();
        assert_eq!(data.vertex_count(), 7);
        assert_eq!(data.face_count(), 2);
        assert_eq!(data.material_indices, vec![3, 1]);
    }

    #[test]
    fn test_named_layer() {
        let up = [0.0, 0.0, 1.0];
        let mesh = Mesh::from_data(MeshData {
            name: "Layers".to_string(),
            vertices: vec![
                MeshVertex::new([0.0, 0.0, 0.0], up),
                MeshVertex::new([1.0, 0.0, 0.0], up),
                MeshVertex::new([0.0, 1.0, 0.0], up),
            ],
            faces: vec![MeshFace::new(vec![0, 1, 2])],
            uv_layers: vec![
                UvLayer::new("A", vec![[0.0, 0.0]; 3]),
                UvLayer::new("B", vec![[0.5, 0.5]; 3]),
            ],
            active_uv_layer: None,
        })
        .unwrap();

        let data = reconstruct(&mesh, &UvSelection::Named("B".to_string())).unwrap();
        assert_eq!(data.uvs[0], Vector2::new(0.5, 0.5));

        let missing = reconstruct(&mesh, &UvSelection::Named("C".to_string()));
        assert!(matches!(missing, Err(ExportError::UnknownUvLayer { .. })));
    }

    #[test]
    fn test_no_uv_layer_is_an_error() {
        let up = [0.0, 0.0, 1.0];
        let mesh = Mesh::from_data(MeshData {
            name: "Bare".to_string(),
            vertices: vec![MeshVertex::new([0.0; 3], up); 3],
            faces: vec![MeshFace::new(vec![0, 1, 2])],
            ..Default::default()
        })
        .unwrap();

        match reconstruct(&mesh, &UvSelection::Active) {
            Err(ExportError::NoActiveUvLayer { mesh }) => assert_eq!(mesh, "Bare"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    /// A triangle whose vertex 2 has lost its loop.
    struct Torn {
        faces: Vec<Vec<usize>>,
        vertex_loops: Vec<Vec<usize>>,
        loop_faces: Vec<usize>,
    }

    impl MeshSource for Torn {
        fn name(&self) -> &str {
            "Torn"
        }
        fn face_count(&self) -> usize {
            self.faces.len()
        }
        fn face_vertices(&self, face: usize) -> &[usize] {
            &self.faces[face]
        }
        fn face_material_index(&self, _face: usize) -> usize {
            0
        }
        fn vertex_position(&self, _vertex: usize) -> DVec3 {
            DVec3::ZERO
        }
        fn vertex_normal(&self, _vertex: usize) -> DVec3 {
            DVec3::Z
        }
        fn vertex_loops(&self, vertex: usize) -> &[usize] {
            &self.vertex_loops[vertex]
        }
        fn loop_face(&self, loop_index: usize) -> usize {
            self.loop_faces[loop_index]
        }
        fn active_uv_layer(&self) -> Option<usize> {
            Some(0)
        }
        fn uv_layer_by_name(&self, _name: &str) -> Option<usize> {
            None
        }
        fn loop_uv(&self, _layer: usize, loop_index: usize) -> Option<DVec2> {
            (loop_index < 2).then_some(DVec2::ZERO)
        }
    }

    #[test]
    fn test_unmatched_loop() {
        let torn = Torn {
            faces: vec![vec![0, 1, 2]],
            // vertex 2 only has a loop on some other face
            vertex_loops: vec![vec![0], vec![1], vec![2]],
            loop_faces: vec![0, 0, 7],
        };

        assert!(matches!(
            reconstruct(&torn, &UvSelection::Active),
            Err(ExportError::UnmatchedLoop { face: 0, vertex: 2 })
        ));
    }

    #[test]
    fn test_missing_uv() {
        let torn = Torn {
            faces: vec![vec![0, 1, 2]],
            vertex_loops: vec![vec![0], vec![1], vec![2]],
            loop_faces: vec![0, 0, 0],
        };

        assert!(matches!(
            reconstruct(&torn, &UvSelection::Active),
            Err(ExportError::MissingUv { loop_index: 2 })
        ));
    }
}
