//! Export path resolution from the collection hierarchy.

use crate::error::{ExportError, Result};
use crate::scene::Scene;
use crate::types::ObjectId;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Sub-directory segments of an object's ancestor collections, topmost first.
///
/// Starts at the first collection containing the object and follows
/// parent links up to the root. An object also linked into the root
/// collection is placed by its first other collection. Collections
/// without a sub-directory contribute nothing.
pub fn collection_subdirs(scene: &Scene, object: ObjectId) -> Result<Vec<String>> {
    scene.object(object)?;

    let root = scene.root_collection();
    let mut segments = Vec::new();
    let mut visited = HashSet::new();
    let mut current = scene
        .collections_containing(object)
        .find(|&id| Some(id) != root)
        .or_else(|| scene.collections_containing(object).next());

    while let Some(id) = current {
        if !visited.insert(id) {
            log::warn!("Collection hierarchy loops back to '{}'", scene.collection(id)?.name);
            break;
        }
        let subdir = &scene.collection(id)?.export.subdir;
        if !subdir.is_empty() {
            segments.push(subdir.clone());
        }
        current = scene.parent_collection(id);
    }

    segments.reverse();
    Ok(segments)
}

/// Full output path: base directory, collection segments, file name.
pub fn resolve_export_path(scene: &Scene, object: ObjectId, base_dir: &Path) -> Result<PathBuf> {
    let file_name = &scene.object(object)?.export.file_name;
    if file_name.is_empty() {
        return Err(ExportError::Ineligible(format!(
            "object '{}' has no export file name",
            scene.object(object)?.name
        )));
    }

    let mut path = base_dir.to_path_buf();
    for segment in collection_subdirs(scene, object)? {
        path.push(segment);
    }
    path.push(file_name);
    Ok(path)
}
