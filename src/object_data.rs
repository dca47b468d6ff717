//! The exported per-object record.
//!
//! [`ObjectData`] holds flat, unindexed vertex attributes: every face
//! contributes its own copy of each of its corners, so the three vertex
//! arrays always have the same length. `material_indices` has one entry
//! per face.

use crate::encode::{Encodable, EncoderChain, Item, ToJson};
use crate::error::Result;
use crate::material::MaterialRecord;
use crate::reconstruct::Face;
use crate::types::{Vector2, Vector3};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectData {
    pub vertices: Vec<Vector3>,
    pub normals: Vec<Vector3>,
    pub uvs: Vec<Vector2>,
    /// Material slot index of each face.
    pub material_indices: Vec<usize>,
    pub materials: Vec<MaterialRecord>,
}

impl ObjectData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one face's corners and its material index.
    pub fn push_face(&mut self, face: Face) {
        let Face {
            vertices,
            uvs,
            normals,
            material_index,
        } = face;
        self.vertices.extend(vertices);
        self.normals.extend(normals);
        self.uvs.extend(uvs);
        self.material_indices.push(material_index);
    }

    pub fn with_materials(mut self, materials: Vec<MaterialRecord>) -> Self {
        self.materials = materials;
        self
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.material_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.material_indices.is_empty()
    }
}

impl ToJson for ObjectData {
    fn to_json(&self, chain: &EncoderChain) -> Result<Value> {
        let mut map = Map::new();
        map.insert("vertices".to_string(), chain.encode(&self.vertices)?);
        map.insert("normals".to_string(), chain.encode(&self.normals)?);
        map.insert("uvs".to_string(), chain.encode(&self.uvs)?);
        // The format is unindexed; the array is kept for readers that expect it.
        map.insert("indices".to_string(), Value::Array(Vec::new()));
        map.insert("material_indices".to_string(), chain.encode(&self.material_indices)?);
        map.insert("materials".to_string(), chain.encode(&self.materials)?);
        Ok(Value::Object(map))
    }
}

impl Encodable for ObjectData {
    fn item(&self) -> Item<'_> {
        Item::Record(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn triangle(z: f64, material_index: usize) -> Face {
        Face {
            vertices: vec![
                Vector3::new(0.0, 0.0, z),
                Vector3::new(1.0, 0.0, z),
                Vector3::new(0.0, 1.0, z),
            ],
            uvs: vec![Vector2::new(0.0, 0.0), Vector2::new(1.0, 0.0), Vector2::new(0.0, 1.0)],
            normals: vec![Vector3::new(0.0, 0.0, 1.0); 3],
            material_index,
        }
    }

    #[test]
    fn test_push_face() {
        let mut data = ObjectData::new();
        data.push_face(triangle(0.0, 0));
        data.push_face(triangle(1.0, 1));

        assert_eq!(data.vertex_count(), 6);
        assert_eq!(data.normals.len(), 6);
        assert_eq!(data.uvs.len(), 6);
        assert_eq!(data.face_count(), 2);
        assert_eq!(data.material_indices, vec![0, 1]);
        assert_eq!(data.vertices[3], Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_document_layout() {
        let mut data = ObjectData::new().with_materials(vec![MaterialRecord::default_slot(0)]);
        data.push_face(triangle(0.0, 0));

        let encoded = EncoderChain::standard().encode(&data).unwrap();
        assert_eq!(
            encoded,
            json!({
                "vertices": [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
                "normals": [[0.0, 0.0, 1.0], [0.0, 0.0, 1.0], [0.0, 0.0, 1.0]],
                "uvs": [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
                "indices": [],
                "material_indices": [0],
                "materials": [{"index": 0, "type": "DEFAULT", "name": "Default"}]
            })
        );

        let keys: Vec<_> = encoded.as_object().unwrap().keys().cloned().collect();
        assert_eq!(
            keys,
            vec!["vertices", "normals", "uvs", "indices", "material_indices", "materials"]
        );
    }
}
