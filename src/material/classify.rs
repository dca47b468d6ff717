//! Material slot classification.

use super::MaterialRecord;
use crate::scene::{Material, NodeKind, NodeTree};
use crate::types::Vector4;
use std::collections::HashSet;
use std::path::Path;

/// Classify one material slot.
pub fn classify_slot(index: usize, material: Option<&Material>) -> MaterialRecord {
    let Some(material) = material else {
        return MaterialRecord::default_slot(index);
    };

    match &material.node_tree {
        None => MaterialRecord::Basic {
            index,
            name: material.name.clone(),
            color: Vector4::from(material.diffuse_color),
        },
        Some(tree) => MaterialRecord::ImageFiles {
            index,
            name: material.name.clone(),
            filenames: output_image_filenames(tree),
        },
    }
}

/// Classify every slot of an object, in slot order.
pub fn classify_slots(slots: &[Option<&Material>]) -> Vec<MaterialRecord> {
    slots
        .iter()
        .enumerate()
        .map(|(index, material)| classify_slot(index, *material))
        .collect()
}

/// Basenames of image textures that feed a material output, in node order.
pub fn output_image_filenames(tree: &NodeTree) -> Vec<String> {
    let mut filenames = Vec::new();

    for (index, node) in tree.nodes.iter().enumerate() {
        if node.kind != NodeKind::TexImage {
            continue;
        }

        let reaches_output = end_nodes(tree, index)
            .into_iter()
            .any(|end| tree.nodes[end].kind == NodeKind::OutputMaterial);
        if !reaches_output {
            log::debug!("Texture node '{}' does not reach a material output", node.name);
            continue;
        }

        match node.image.as_deref().and_then(basename) {
            Some(name) => filenames.push(name),
            None => log::warn!("Texture node '{}' has no image file", node.name),
        }
    }

    filenames
}

/// Nodes reached by following output links forward until nothing links on.
///
/// A node with no outgoing links is its own end node.
pub fn end_nodes(tree: &NodeTree, start: usize) -> Vec<usize> {
    let mut visited = HashSet::new();
    let mut ends = Vec::new();
    collect_end_nodes(tree, start, &mut visited, &mut ends);
    ends
}

fn collect_end_nodes(tree: &NodeTree, node: usize, visited: &mut HashSet<usize>, ends: &mut Vec<usize>) {
    if !visited.insert(node) {
        return;
    }

    let mut linked = false;
    for next in tree.linked_output_nodes(node) {
        linked = true;
        collect_end_nodes(tree, next, visited, ends);
    }

    if !linked {
        ends.push(node);
    }
}

fn basename(path: &str) -> Option<String> {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}
