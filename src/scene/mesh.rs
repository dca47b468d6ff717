//! Mesh topology input.
//!
//! A mesh is described the way authoring tools store it: shared vertices,
//! faces that list vertex indices in winding order, and UV layers that
//! hold one coordinate per loop. Loops are numbered face by face in face
//! order, so face 0 owns loops `0..n0`, face 1 owns `n0..n0+n1`, and so on.

use crate::error::{ExportError, Result};
use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

/// Read access to mesh topology, implemented by host adapters.
pub trait MeshSource {
    /// Mesh name, used in error messages.
    fn name(&self) -> &str;

    fn face_count(&self) -> usize;

    /// Vertex indices of a face in winding order.
    fn face_vertices(&self, face: usize) -> &[usize];

    /// Material slot index assigned to a face.
    fn face_material_index(&self, face: usize) -> usize;

    fn vertex_position(&self, vertex: usize) -> DVec3;

    fn vertex_normal(&self, vertex: usize) -> DVec3;

    /// All loops that use a vertex, one per face corner it participates in.
    fn vertex_loops(&self, vertex: usize) -> &[usize];

    /// The face a loop belongs to.
    fn loop_face(&self, loop_index: usize) -> usize;

    /// Index of the active UV layer, if the mesh has one.
    fn active_uv_layer(&self) -> Option<usize>;

    /// Look up a UV layer by name.
    fn uv_layer_by_name(&self, name: &str) -> Option<usize>;

    /// UV coordinate stored for a loop on a layer.
    fn loop_uv(&self, layer: usize, loop_index: usize) -> Option<DVec2>;
}

/// A mesh vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeshVertex {
    pub co: DVec3,
    pub normal: DVec3,
}

impl MeshVertex {
    pub fn new(co: [f64; 3], normal: [f64; 3]) -> Self {
        Self {
            co: DVec3::from_array(co),
            normal: DVec3::from_array(normal),
        }
    }
}

/// A polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshFace {
    pub vertices: Vec<usize>,
    #[serde(default)]
    pub material_index: usize,
}

impl MeshFace {
    pub fn new(vertices: Vec<usize>) -> Self {
        Self {
            vertices,
            material_index: 0,
        }
    }

    pub fn with_material(mut self, material_index: usize) -> Self {
        self.material_index = material_index;
        self
    }
}

/// Per-loop texture coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UvLayer {
    pub name: String,
    pub uv: Vec<DVec2>,
}

impl UvLayer {
    pub fn new(name: impl Into<String>, uv: Vec<[f64; 2]>) -> Self {
        Self {
            name: name.into(),
            uv: uv.into_iter().map(DVec2::from_array).collect(),
        }
    }
}

/// Serialized form of a mesh.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeshData {
    pub name: String,
    #[serde(default)]
    pub vertices: Vec<MeshVertex>,
    #[serde(default)]
    pub faces: Vec<MeshFace>,
    #[serde(default)]
    pub uv_layers: Vec<UvLayer>,
    /// Name of the active UV layer. Defaults to the first layer.
    #[serde(default)]
    pub active_uv_layer: Option<String>,
}

/// A mesh with loop topology derived from its faces.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "MeshData", into = "MeshData")]
pub struct Mesh {
    data: MeshData,
    /// Owning face of each loop.
    loop_faces: Vec<usize>,
    /// Loops of each vertex.
    vertex_loops: Vec<Vec<usize>>,
    active_uv_layer: Option<usize>,
}

impl Mesh {
    /// Build loop topology and check every index in the mesh.
    pub fn from_data(data: MeshData) -> Result<Self> {
        let invalid = |msg: String| ExportError::InvalidScene(format!("mesh '{}': {}", data.name, msg));

        let mut loop_faces = Vec::new();
        let mut vertex_loops = vec![Vec::new(); data.vertices.len()];

        for (face_index, face) in data.faces.iter().enumerate() {
            if face.vertices.len() < 3 {
                return Err(invalid(format!(
                    "face {} has {} vertices",
                    face_index,
                    face.vertices.len()
                )));
            }
            for &vertex in &face.vertices {
                let loops = vertex_loops.get_mut(vertex).ok_or_else(|| {
                    invalid(format!("face {} refers to missing vertex {}", face_index, vertex))
                })?;
                loops.push(loop_faces.len());
                loop_faces.push(face_index);
            }
        }

        for layer in &data.uv_layers {
            if layer.uv.len() != loop_faces.len() {
                return Err(invalid(format!(
                    "UV layer '{}' has {} coordinates for {} loops",
                    layer.name,
                    layer.uv.len(),
                    loop_faces.len()
                )));
            }
        }

        let active_uv_layer = match &data.active_uv_layer {
            Some(name) => Some(
                data.uv_layers
                    .iter()
                    .position(|l| &l.name == name)
                    .ok_or_else(|| invalid(format!("active UV layer '{}' does not exist", name)))?,
            ),
            None if data.uv_layers.is_empty() => None,
            None => Some(0),
        };

        Ok(Self {
            data,
            loop_faces,
            vertex_loops,
            active_uv_layer,
        })
    }

    pub fn data(&self) -> &MeshData {
        &self.data
    }

    pub fn vertex_count(&self) -> usize {
        self.data.vertices.len()
    }

    pub fn loop_count(&self) -> usize {
        self.loop_faces.len()
    }
}

impl TryFrom<MeshData> for Mesh {
    type Error = ExportError;

    fn try_from(data: MeshData) -> Result<Self> {
        Self::from_data(data)
    }
}

impl From<Mesh> for MeshData {
    fn from(mesh: Mesh) -> Self {
        mesh.data
    }
}

impl MeshSource for Mesh {
    fn name(&self) -> &str {
        &self.data.name
    }

    fn face_count(&self) -> usize {
        self.data.faces.len()
    }

    fn face_vertices(&self, face: usize) -> &[usize] {
        &self.data.faces[face].vertices
    }

    fn face_material_index(&self, face: usize) -> usize {
        self.data.faces[face].material_index
    }

    fn vertex_position(&self, vertex: usize) -> DVec3 {
        self.data.vertices[vertex].co
    }

    fn vertex_normal(&self, vertex: usize) -> DVec3 {
        self.data.vertices[vertex].normal
    }

    fn vertex_loops(&self, vertex: usize) -> &[usize] {
        &self.vertex_loops[vertex]
    }

    fn loop_face(&self, loop_index: usize) -> usize {
        self.loop_faces[loop_index]
    }

    fn active_uv_layer(&self) -> Option<usize> {
        self.active_uv_layer
    }

    fn uv_layer_by_name(&self, name: &str) -> Option<usize> {
        self.data.uv_layers.iter().position(|l| l.name == name)
    }

    fn loop_uv(&self, layer: usize, loop_index: usize) -> Option<DVec2> {
        self.data.uv_layers.get(layer)?.uv.get(loop_index).copied()
    }
}

/// A unit quad split into two triangles sharing the 0-2 diagonal.
#[cfg(test)]
pub(crate) fn two_triangle_quad() -> Mesh {
    let up = [0.0, 0.0, 1.0];
    Mesh::from_data(MeshData {
        name: "Quad".to_string(),
        vertices: vec![
            MeshVertex::new([0.0, 0.0, 0.0], up),
            MeshVertex::new([1.0, 0.0, 0.0], up),
            MeshVertex::new([1.0, 1.0, 0.0], up),
            MeshVertex::new([0.0, 1.0, 0.0], up),
        ],
        faces: vec![
            MeshFace::new(vec![0, 1, 2]),
            MeshFace::new(vec![0, 2, 3]).with_material(1),
        ],
        uv_layers: vec![UvLayer::new(
            "UVMap",
            vec![
                [0.0, 0.0],
                [1.0, 0.0],
                [1.0, 1.0],
                // the second face maps the shared corners to different UVs
                [0.5, 0.0],
                [1.0, 0.5],
                [0.5, 1.0],
            ],
        )],
        active_uv_layer: None,
    })
    .unwrap()
}
