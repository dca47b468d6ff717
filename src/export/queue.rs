//! Export queue and orchestration.

use super::path::resolve_export_path;
use super::ExportConfig;
use crate::encode::EncoderChain;
use crate::error::{ExportError, Result};
use crate::material::classify_slots;
use crate::object_data::ObjectData;
use crate::reconstruct::reconstruct;
use crate::scene::Scene;
use crate::types::{CollectionId, ObjectId};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

/// Where the exporter is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportState {
    /// Nothing pending.
    Idle,
    /// Tasks are waiting for [`Exporter::run`].
    Queued,
    /// A run is in progress.
    Exporting,
}

/// An object and the file it will be written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTask {
    pub object: ObjectId,
    pub path: PathBuf,
}

/// Result of a user-facing export command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandReport {
    /// The run completed and wrote these files.
    Finished { written: Vec<PathBuf> },
    /// The selection could not be exported; nothing was written.
    Cancelled { reason: String },
}

/// Collects export tasks and writes one JSON file per object.
pub struct Exporter {
    config: ExportConfig,
    chain: EncoderChain,
    queue: Vec<ExportTask>,
    state: ExportState,
}

impl Exporter {
    /// Create an exporter using the standard encoder chain.
    pub fn new(config: ExportConfig) -> Self {
        let chain = EncoderChain::standard().with_indent(config.indent);
        Self::with_chain(config, chain)
    }

    /// Create an exporter with a custom encoder chain.
    pub fn with_chain(config: ExportConfig, chain: EncoderChain) -> Self {
        Self {
            config,
            chain,
            queue: Vec::new(),
            state: ExportState::Idle,
        }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn state(&self) -> ExportState {
        self.state
    }

    pub fn queue(&self) -> &[ExportTask] {
        &self.queue
    }

    fn base_dir(&self, scene: &Scene) -> PathBuf {
        self.config
            .base_dir
            .clone()
            .unwrap_or_else(|| scene.settings.export_dir.clone())
    }

    fn push_task(&mut self, scene: &Scene, object: ObjectId) -> Result<()> {
        if self.queue.iter().any(|t| t.object == object) {
            return Ok(());
        }
        let path = resolve_export_path(scene, object, &self.base_dir(scene))?;
        log::debug!("Queued '{}' -> {}", scene.object(object)?.name, path.display());
        self.queue.push(ExportTask { object, path });
        self.state = ExportState::Queued;
        Ok(())
    }

    /// Queue a single object, failing with [`ExportError::Ineligible`] if it
    /// cannot be exported.
    pub fn enqueue_object(&mut self, scene: &Scene, object: ObjectId) -> Result<()> {
        let obj = scene.object(object)?;
        if obj.mesh.is_none() {
            return Err(ExportError::Ineligible(format!("'{}' is not a mesh object", obj.name)));
        }
        if obj.export.file_name.is_empty() {
            return Err(ExportError::Ineligible(format!("'{}' has no export file name", obj.name)));
        }
        if !obj.visible {
            return Err(ExportError::Ineligible(format!("'{}' is hidden", obj.name)));
        }
        self.push_task(scene, object)
    }

    /// Queue the scene's active object.
    pub fn enqueue_active_object(&mut self, scene: &Scene) -> Result<()> {
        let active = scene
            .active_object
            .ok_or_else(|| ExportError::Ineligible("no active object".to_string()))?;
        self.enqueue_object(scene, active)
    }

    fn enqueue_if_eligible(&mut self, scene: &Scene, object: ObjectId) -> Result<bool> {
        let obj = scene.object(object)?;
        if !obj.is_eligible() || obj.mesh.is_none() {
            log::debug!("Skipping '{}'", obj.name);
            return Ok(false);
        }
        let before = self.queue.len();
        self.push_task(scene, object)?;
        Ok(self.queue.len() > before)
    }

    /// Queue eligible objects of a collection and all included sub-collections.
    ///
    /// Returns the number of tasks added.
    pub fn enqueue_collection(&mut self, scene: &Scene, collection: CollectionId) -> Result<usize> {
        let mut added = 0;
        let mut visited = HashSet::new();
        let mut pending = vec![collection];

        while let Some(id) = pending.pop() {
            if !visited.insert(id) {
                continue;
            }
            let col = scene.collection(id)?;
            for &object in &col.objects {
                if self.enqueue_if_eligible(scene, object)? {
                    added += 1;
                }
            }
            // reversed so children are visited in listed order
            for &child in col.children.iter().rev() {
                if scene.collection(child)?.export.include {
                    pending.push(child);
                }
            }
        }

        Ok(added)
    }

    /// Queue the active collection recursively.
    pub fn enqueue_active_collection(&mut self, scene: &Scene) -> Result<usize> {
        let active = scene
            .active_collection()
            .ok_or_else(|| ExportError::Ineligible("no active collection".to_string()))?;
        self.enqueue_collection(scene, active)
    }

    /// Queue every eligible object in the scene, in scene order.
    pub fn enqueue_all(&mut self, scene: &Scene) -> Result<usize> {
        let mut added = 0;
        for object in 0..scene.objects.len() {
            if self.enqueue_if_eligible(scene, object)? {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Build the export record of one object.
    pub fn object_data(&self, scene: &Scene, object: ObjectId) -> Result<ObjectData> {
        let obj = scene.object(object)?;
        let mesh = scene
            .mesh_of(object)?
            .ok_or_else(|| ExportError::Ineligible(format!("'{}' is not a mesh object", obj.name)))?;

        let materials = classify_slots(&scene.material_slots(object)?);
        let data = reconstruct(mesh, &self.config.uv_layer)?;
        Ok(data.with_materials(materials))
    }

    /// Render one object's JSON document.
    pub fn render_object(&self, scene: &Scene, object: ObjectId) -> Result<String> {
        let data = self.object_data(scene, object)?;
        self.chain.to_string_pretty(&data)
    }

    /// Export every queued object.
    ///
    /// The first failure stops the run. Either way the queue is cleared,
    /// the previously active object is restored and the state returns to
    /// [`ExportState::Idle`].
    pub fn run(&mut self, scene: &mut Scene) -> Result<Vec<PathBuf>> {
        if self.queue.is_empty() {
            log::info!("Nothing to export");
            self.state = ExportState::Idle;
            return Ok(Vec::new());
        }

        self.state = ExportState::Exporting;
        log::info!("Exporting {} object(s)", self.queue.len());

        let previous = scene.active_object;
        let result = self.process_queue(scene);

        scene.set_active_object(previous);
        self.queue.clear();
        self.state = ExportState::Idle;

        match &result {
            Ok(written) => log::info!("Wrote {} file(s)", written.len()),
            Err(e) => log::error!("Export aborted: {}", e),
        }
        result
    }

    fn process_queue(&self, scene: &mut Scene) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(self.queue.len());

        for task in &self.queue {
            scene.set_active_object(Some(task.object));
            let json = self.render_object(scene, task.object)?;

            if self.config.create_dirs {
                if let Some(parent) = task.path.parent() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(&task.path, json)?;

            log::info!("  {} -> {}", scene.object(task.object)?.name, task.path.display());
            written.push(task.path.clone());
        }

        Ok(written)
    }

    /// Export the active object.
    ///
    /// An ineligible selection is reported, not returned as an error.
    pub fn export_single_object(&mut self, scene: &mut Scene) -> Result<CommandReport> {
        match self.enqueue_active_object(scene) {
            Ok(()) => {}
            Err(ExportError::Ineligible(reason)) => {
                log::warn!("Export cancelled: {}", reason);
                self.queue.clear();
                self.state = ExportState::Idle;
                return Ok(CommandReport::Cancelled { reason });
            }
            Err(e) => return Err(e),
        }
        let written = self.run(scene)?;
        Ok(CommandReport::Finished { written })
    }

    /// Export the active collection and its sub-collections.
    pub fn export_active_collection(&mut self, scene: &mut Scene) -> Result<CommandReport> {
        match self.enqueue_active_collection(scene) {
            Ok(_) => {}
            Err(ExportError::Ineligible(reason)) => {
                log::warn!("Export cancelled: {}", reason);
                return Ok(CommandReport::Cancelled { reason });
            }
            Err(e) => {
                self.queue.clear();
                self.state = ExportState::Idle;
                return Err(e);
            }
        }
        let written = self.run(scene)?;
        Ok(CommandReport::Finished { written })
    }

    /// Export every eligible object in the scene.
    pub fn export_all(&mut self, scene: &mut Scene) -> Result<CommandReport> {
        if let Err(e) = self.enqueue_all(scene) {
            self.queue.clear();
            self.state = ExportState::Idle;
            return Err(e);
        }
        let written = self.run(scene)?;
        Ok(CommandReport::Finished { written })
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new(ExportConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::mesh::two_triangle_quad;
    use crate::scene::{Collection, SceneObject};

    fn scene_with_quads() -> Scene {
        let mut scene = Scene::new();
        let mesh = scene.add_mesh(two_triangle_quad());
        let props = scene.add_collection(Collection::new("props").with_subdir("props"), 0).unwrap();
        scene
            .add_object(SceneObject::new("A").with_mesh(mesh).with_file_name("a.json"), 0)
            .unwrap();
        scene
            .add_object(SceneObject::new("B").with_mesh(mesh).with_file_name("b.json"), props)
            .unwrap();
        scene
            .add_object(SceneObject::new("Hidden").with_mesh(mesh).with_file_name("h.json").hidden(), props)
            .unwrap();
        scene.add_object(SceneObject::new("Unnamed").with_mesh(mesh), props).unwrap();
        scene
    }

    fn exporter() -> Exporter {
        Exporter::new(ExportConfig::default().with_base_dir("/out"))
    }

    #[test]
    fn test_enqueue_all_skips_ineligible() {
        let scene = scene_with_quads();
        let mut exporter = exporter();

        assert_eq!(exporter.enqueue_all(&scene).unwrap(), 2);
        assert_eq!(exporter.state(), ExportState::Queued);
        assert_eq!(
            exporter.queue().iter().map(|t| t.path.clone()).collect::<Vec<_>>(),
            vec![PathBuf::from("/out/a.json"), PathBuf::from("/out/props/b.json")]
        );
    }

    #[test]
    fn test_enqueue_collection_is_recursive() {
        let mut scene = scene_with_quads();
        let mesh = scene.objects[0].mesh.unwrap();
        let inner = scene.add_collection(Collection::new("inner"), 1).unwrap();
        scene
            .add_object(SceneObject::new("C").with_mesh(mesh).with_file_name("c.json"), inner)
            .unwrap();

        let mut exporter = exporter();
        assert_eq!(exporter.enqueue_collection(&scene, 1).unwrap(), 2);
        let objects: Vec<_> = exporter.queue().iter().map(|t| t.object).collect();
        assert_eq!(objects, vec![1, 4]);
    }

    #[test]
    fn test_excluded_sub_collection() {
        let mut scene = scene_with_quads();
        scene.collections[1].export.include = false;

        let mut exporter = exporter();
        assert_eq!(exporter.enqueue_collection(&scene, 0).unwrap(), 1);
    }

    #[test]
    fn test_object_in_two_collections_queued_once() {
        let mut scene = scene_with_quads();
        scene.collections[1].objects.push(0);

        let mut exporter = exporter();
        assert_eq!(exporter.enqueue_collection(&scene, 0).unwrap(), 2);
    }

    #[test]
    fn test_single_object_ineligible_is_cancelled() {
        let mut scene = scene_with_quads();
        let mut exporter = exporter();

        scene.active_object = Some(3);
        match exporter.export_single_object(&mut scene).unwrap() {
            CommandReport::Cancelled { reason } => assert!(reason.contains("file name")),
            other => panic!("unexpected report: {:?}", other),
        }

        scene.active_object = None;
        assert!(matches!(
            exporter.export_single_object(&mut scene).unwrap(),
            CommandReport::Cancelled { .. }
        ));
        assert!(exporter.queue().is_empty());
        assert_eq!(exporter.state(), ExportState::Idle);
    }

    #[test]
    fn test_run_empty_queue() {
        let mut scene = Scene::new();
        let mut exporter = exporter();
        assert!(exporter.run(&mut scene).unwrap().is_empty());
        assert_eq!(exporter.state(), ExportState::Idle);
    }

    #[test]
    fn test_object_data_has_materials() {
        let mut scene = scene_with_quads();
        scene.objects[0].material_slots = vec![None, None];
        let data = exporter().object_data(&scene, 0).unwrap();

        assert_eq!(data.materials.len(), 2);
        assert_eq!(data.materials[1].index(), 1);
        assert_eq!(data.face_count(), 2);
    }

    #[test]
    fn test_object_data_dangling_material() {
        let mut scene = scene_with_quads();
        scene.objects[0].material_slots = vec![Some(9)];

        assert!(matches!(
            exporter().object_data(&scene, 0),
            Err(ExportError::UnknownMaterial(9))
        ));
    }
}
