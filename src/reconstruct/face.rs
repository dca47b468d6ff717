use crate::types::{Vector2, Vector3};

/// One face as a block of corners.
///
/// The three lists are parallel and in the face's winding order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Face {
    pub vertices: Vec<Vector3>,
    pub uvs: Vec<Vector2>,
    pub normals: Vec<Vector3>,
    pub material_index: usize,
}

impl Face {
    pub fn with_capacity(corners: usize, material_index: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(corners),
            uvs: Vec::with_capacity(corners),
            normals: Vec::with_capacity(corners),
            material_index,
        }
    }
}
