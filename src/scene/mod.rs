//! Scene graph input.
//!
//! This is the exporter's view of the authoring tool's scene: objects with
//! meshes and material slots, materials with optional node graphs, and a
//! collection hierarchy carrying export path configuration. A scene can be
//! built in code or loaded from a JSON description.

pub mod material;
pub mod mesh;

pub use material::{Material, NodeKind, NodeLink, NodeTree, ShaderNode};
pub use mesh::{Mesh, MeshData, MeshFace, MeshSource, MeshVertex, UvLayer};

use crate::error::{ExportError, Result};
use crate::types::{CollectionId, MaterialId, ObjectId};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn yes() -> bool {
    true
}

/// Scene-wide export settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneSettings {
    /// Base directory all export paths are resolved against.
    #[serde(default)]
    pub export_dir: PathBuf,
}

/// Per-object export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectExportSettings {
    /// Output file name. Empty means the object is not exported.
    #[serde(default)]
    pub file_name: String,
    /// Inclusion toggle for batch exports.
    #[serde(default = "yes")]
    pub include: bool,
}

impl Default for ObjectExportSettings {
    fn default() -> Self {
        Self {
            file_name: String::new(),
            include: true,
        }
    }
}

/// Per-collection export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionExportSettings {
    /// Sub-directory segment contributed to the paths of contained objects.
    #[serde(default)]
    pub subdir: String,
    /// Inclusion toggle for recursive collection exports.
    #[serde(default = "yes")]
    pub include: bool,
}

impl Default for CollectionExportSettings {
    fn default() -> Self {
        Self {
            subdir: String::new(),
            include: true,
        }
    }
}

/// An object in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,
    #[serde(default = "yes")]
    pub visible: bool,
    /// Mesh datablock, `None` for non-mesh objects.
    #[serde(default)]
    pub mesh: Option<usize>,
    /// Material slots in slot order; `None` is an empty slot.
    #[serde(default)]
    pub material_slots: Vec<Option<MaterialId>>,
    #[serde(default)]
    pub export: ObjectExportSettings,
}

impl SceneObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visible: true,
            mesh: None,
            material_slots: Vec::new(),
            export: ObjectExportSettings::default(),
        }
    }

    pub fn with_mesh(mut self, mesh: usize) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.export.file_name = file_name.into();
        self
    }

    pub fn with_material_slots(mut self, slots: Vec<Option<MaterialId>>) -> Self {
        self.material_slots = slots;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Has a file name, is visible and is included.
    pub fn is_eligible(&self) -> bool {
        !self.export.file_name.is_empty() && self.visible && self.export.include
    }
}

/// A collection of objects and child collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub name: String,
    #[serde(default)]
    pub children: Vec<CollectionId>,
    #[serde(default)]
    pub objects: Vec<ObjectId>,
    #[serde(default)]
    pub export: CollectionExportSettings,
}

impl Collection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            objects: Vec::new(),
            export: CollectionExportSettings::default(),
        }
    }

    pub fn with_subdir(mut self, subdir: impl Into<String>) -> Self {
        self.export.subdir = subdir.into();
        self
    }
}

/// The whole scene.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub settings: SceneSettings,
    #[serde(default)]
    pub objects: Vec<SceneObject>,
    #[serde(default)]
    pub meshes: Vec<Mesh>,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub collections: Vec<Collection>,
    #[serde(default)]
    pub active_object: Option<ObjectId>,
    /// Defaults to the first collection, the scene root.
    #[serde(default)]
    pub active_collection: Option<CollectionId>,
}

impl Scene {
    /// Create an empty scene with a root collection.
    pub fn new() -> Self {
        Self {
            collections: vec![Collection::new("Scene Collection")],
            ..Default::default()
        }
    }

    /// Parse and validate a scene description.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let scene: Scene = serde_json::from_str(json)?;
        scene.validate()?;
        Ok(scene)
    }

    /// Load and validate a scene description from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> usize {
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        self.materials.len() - 1
    }

    /// Add an object and link it into `collection`.
    pub fn add_object(&mut self, object: SceneObject, collection: CollectionId) -> Result<ObjectId> {
        let id = self.objects.len();
        self.collection_mut(collection)?.objects.push(id);
        self.objects.push(object);
        Ok(id)
    }

    /// Add a collection as a child of `parent`.
    pub fn add_collection(&mut self, collection: Collection, parent: CollectionId) -> Result<CollectionId> {
        let id = self.collections.len();
        self.collection_mut(parent)?.children.push(id);
        self.collections.push(collection);
        Ok(id)
    }

    pub fn object(&self, id: ObjectId) -> Result<&SceneObject> {
        self.objects.get(id).ok_or(ExportError::UnknownObject(id))
    }

    pub fn collection(&self, id: CollectionId) -> Result<&Collection> {
        self.collections.get(id).ok_or(ExportError::UnknownCollection(id))
    }

    fn collection_mut(&mut self, id: CollectionId) -> Result<&mut Collection> {
        self.collections.get_mut(id).ok_or(ExportError::UnknownCollection(id))
    }

    /// The mesh of an object, if it is a mesh object.
    pub fn mesh_of(&self, id: ObjectId) -> Result<Option<&Mesh>> {
        self.object(id)?
            .mesh
            .map(|m| self.meshes.get(m).ok_or(ExportError::UnknownMesh(m)))
            .transpose()
    }

    /// Resolve an object's slots to materials; empty slots stay `None`.
    pub fn material_slots(&self, id: ObjectId) -> Result<Vec<Option<&Material>>> {
        self.object(id)?
            .material_slots
            .iter()
            .map(|slot| {
                slot.map(|m| self.materials.get(m).ok_or(ExportError::UnknownMaterial(m)))
                    .transpose()
            })
            .collect()
    }

    /// Collections that directly contain an object, in collection order.
    pub fn collections_containing(&self, id: ObjectId) -> impl Iterator<Item = CollectionId> + '_ {
        self.collections
            .iter()
            .enumerate()
            .filter(move |(_, c)| c.objects.contains(&id))
            .map(|(i, _)| i)
    }

    /// The collection that lists `id` as a child.
    pub fn parent_collection(&self, id: CollectionId) -> Option<CollectionId> {
        self.collections.iter().position(|c| c.children.contains(&id))
    }

    pub fn root_collection(&self) -> Option<CollectionId> {
        if self.collections.is_empty() {
            None
        } else {
            Some(0)
        }
    }

    pub fn active_collection(&self) -> Option<CollectionId> {
        self.active_collection.or_else(|| self.root_collection())
    }

    /// Replace the active object and return the previous one.
    pub fn set_active_object(&mut self, id: Option<ObjectId>) -> Option<ObjectId> {
        std::mem::replace(&mut self.active_object, id)
    }

    /// Check that every id in the scene refers to something that exists.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(ExportError::InvalidScene(msg));

        for object in &self.objects {
            if let Some(mesh) = object.mesh {
                if mesh >= self.meshes.len() {
                    return invalid(format!("object '{}' refers to missing mesh {}", object.name, mesh));
                }
            }
            for material in object.material_slots.iter().flatten() {
                if *material >= self.materials.len() {
                    return invalid(format!(
                        "object '{}' refers to missing material {}",
                        object.name, material
                    ));
                }
            }
        }

        for collection in &self.collections {
            if let Some(child) = collection.children.iter().find(|c| **c >= self.collections.len()) {
                return invalid(format!(
                    "collection '{}' refers to missing collection {}",
                    collection.name, child
                ));
            }
            if let Some(object) = collection.objects.iter().find(|o| **o >= self.objects.len()) {
                return invalid(format!(
                    "collection '{}' refers to missing object {}",
                    collection.name, object
                ));
            }
        }

        for material in &self.materials {
            if let Some(tree) = &material.node_tree {
                let count = tree.nodes.len();
                if tree.links.iter().any(|l| l.from_node >= count || l.to_node >= count) {
                    return invalid(format!("material '{}' has a dangling node link", material.name));
                }
            }
        }

        if let Some(active) = self.active_object {
            self.object(active)?;
        }
        if let Some(active) = self.active_collection {
            self.collection(active)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_scene() {
        let mut scene = Scene::new();
        let props = scene.add_collection(Collection::new("props").with_subdir("hard"), 0).unwrap();
        let cube = scene
            .add_object(SceneObject::new("Cube").with_file_name("cube"), props)
            .unwrap();

        assert_eq!(scene.collections_containing(cube).collect::<Vec<_>>(), vec![props]);
        assert_eq!(scene.parent_collection(props), Some(0));
        assert_eq!(scene.parent_collection(0), None);
        assert!(scene.validate().is_ok());
    }

    #[test]
    fn test_eligibility() {
        assert!(SceneObject::new("A").with_file_name("a").is_eligible());
        assert!(!SceneObject::new("B").is_eligible());
        assert!(!SceneObject::new("C").with_file_name("c").hidden().is_eligible());

        let mut excluded = SceneObject::new("D").with_file_name("d");
        excluded.export.include = false;
        assert!(!excluded.is_eligible());
    }

    #[test]
    fn test_set_active_object_returns_previous() {
        let mut scene = Scene::new();
        scene.active_object = Some(3);
        assert_eq!(scene.set_active_object(Some(5)), Some(3));
        assert_eq!(scene.active_object, Some(5));
    }

    #[test]
    fn test_load_scene_json() {
        let json = r#"{
            "settings": {"export_dir": "/out"},
            "objects": [
                {"name": "Cube", "mesh": 0, "material_slots": [0, null],
                 "export": {"file_name": "cube.json"}}
            ],
            "meshes": [{
                "name": "Cube",
                "vertices": [
                    {"co": [0, 0, 0], "normal": [0, 0, 1]},
                    {"co": [1, 0, 0], "normal": [0, 0, 1]},
                    {"co": [0, 1, 0], "normal": [0, 0, 1]}
                ],
                "faces": [{"vertices": [0, 1, 2]}],
                "uv_layers": [{"name": "UVMap", "uv": [[0, 0], [1, 0], [0, 1]]}]
            }],
            "materials": [{"name": "Red", "diffuse_color": [1, 0, 0, 1]}],
            "collections": [{"name": "Scene Collection", "objects": [0]}],
            "active_object": 0
        }"#;
        let scene = Scene::from_json_str(json).unwrap();

        assert_eq!(scene.settings.export_dir, PathBuf::from("/out"));
        assert!(scene.objects[0].visible);
        assert!(scene.objects[0].export.include);
        assert_eq!(scene.material_slots(0).unwrap().len(), 2);
        assert!(scene.mesh_of(0).unwrap().is_some());
        assert_eq!(scene.active_collection(), Some(0));
    }

    #[test]
    fn test_validate_dangling_ids() {
        let mut scene = Scene::new();
        scene.objects.push(SceneObject::new("Ghost").with_mesh(4));
        assert!(matches!(scene.validate(), Err(ExportError::InvalidScene(_))));

        let mut scene = Scene::new();
        scene.collections[0].objects.push(9);
        assert!(scene.validate().is_err());
    }

    #[test]
    fn test_dangling_lookups_are_errors() {
        let mut scene = Scene::new();
        let ghost = scene
            .add_object(
                SceneObject::new("Ghost").with_mesh(2).with_material_slots(vec![None, Some(9)]),
                0,
            )
            .unwrap();

        assert!(matches!(scene.mesh_of(ghost), Err(ExportError::UnknownMesh(2))));
        assert!(matches!(scene.material_slots(ghost), Err(ExportError::UnknownMaterial(9))));

        let empty = scene.add_object(SceneObject::new("Empty"), 0).unwrap();
        assert!(scene.mesh_of(empty).unwrap().is_none());
        assert!(scene.material_slots(empty).unwrap().is_empty());
    }
}
