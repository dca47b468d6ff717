//! Materials and shader node graphs.

use glam::DVec4;
use serde::{Deserialize, Serialize};

/// A material datablock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    /// Flat viewport color, RGBA.
    #[serde(default = "default_diffuse_color")]
    pub diffuse_color: DVec4,
    /// Shader node graph. `None` when the material does not use nodes.
    #[serde(default)]
    pub node_tree: Option<NodeTree>,
}

fn default_diffuse_color() -> DVec4 {
    DVec4::new(0.8, 0.8, 0.8, 1.0)
}

impl Material {
    /// A material without a node graph.
    pub fn flat(name: impl Into<String>, color: [f64; 4]) -> Self {
        Self {
            name: name.into(),
            diffuse_color: DVec4::from_array(color),
            node_tree: None,
        }
    }

    /// A material shaded by a node graph.
    pub fn with_nodes(name: impl Into<String>, node_tree: NodeTree) -> Self {
        Self {
            name: name.into(),
            diffuse_color: default_diffuse_color(),
            node_tree: Some(node_tree),
        }
    }

    pub fn use_nodes(&self) -> bool {
        self.node_tree.is_some()
    }
}

/// The node types the exporter distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    /// An image texture lookup.
    TexImage,
    /// The material output the renderer reads from.
    OutputMaterial,
    /// Any other shader node.
    #[serde(other)]
    Other,
}

/// A node in a shader graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShaderNode {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// File path of the image, for image texture nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ShaderNode {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            image: None,
        }
    }

    pub fn image_texture(name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::TexImage,
            image: Some(image.into()),
        }
    }
}

/// A connection from one node's output to another node's input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeLink {
    pub from_node: usize,
    pub to_node: usize,
}

/// A shader node graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeTree {
    #[serde(default)]
    pub nodes: Vec<ShaderNode>,
    #[serde(default)]
    pub links: Vec<NodeLink>,
}

impl NodeTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and return its index.
    pub fn add_node(&mut self, node: ShaderNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn link(&mut self, from_node: usize, to_node: usize) {
        self.links.push(NodeLink { from_node, to_node });
    }

    /// Nodes fed by the outputs of `node`, in link order.
    pub fn linked_output_nodes(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.links
            .iter()
            .filter(move |l| l.from_node == node)
            .map(|l| l.to_node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_node_tree() {
        let json = r#"{
            "nodes": [
                {"name": "Image Texture", "type": "TEX_IMAGE", "image": "//tex/wood.png"},
                {"name": "Principled BSDF", "type": "BSDF_PRINCIPLED"},
                {"name": "Material Output", "type": "OUTPUT_MATERIAL"}
            ],
            "links": [
                {"from_node": 0, "to_node": 1},
                {"from_node": 1, "to_node": 2}
            ]
        }"#;
        let tree: NodeTree = serde_json::from_str(json).unwrap();

        assert_eq!(tree.nodes[0].kind, NodeKind::TexImage);
        assert_eq!(tree.nodes[1].kind, NodeKind::Other);
        assert_eq!(tree.nodes[2].kind, NodeKind::OutputMaterial);
        assert_eq!(tree.linked_output_nodes(0).collect::<Vec<_>>(), vec![1]);
        assert_eq!(tree.linked_output_nodes(2).count(), 0);
    }

    #[test]
    fn test_use_nodes() {
        assert!(!Material::flat("Red", [1.0, 0.0, 0.0, 1.0]).use_nodes());
        assert!(Material::with_nodes("Wood", NodeTree::new()).use_nodes());
    }
}
