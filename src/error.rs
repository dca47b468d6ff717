//! Error types for the raw exporter.

use thiserror::Error;

/// Result type alias using ExportError.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Main error type for export operations.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Failed to parse or render JSON data.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error while writing an export file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The selection cannot be exported (no mesh, no file name, hidden).
    #[error("Not exportable: {0}")]
    Ineligible(String),

    /// An object id does not exist in the scene.
    #[error("Unknown object id: {0}")]
    UnknownObject(usize),

    /// A collection id does not exist in the scene.
    #[error("Unknown collection id: {0}")]
    UnknownCollection(usize),

    #[error("Unknown mesh id: {0}")]
    UnknownMesh(usize),

    #[error("Unknown material id: {0}")]
    UnknownMaterial(usize),

    /// The scene description is structurally inconsistent.
    #[error("Invalid scene: {0}")]
    InvalidScene(String),

    /// The mesh has no active UV layer to read loop coordinates from.
    #[error("Mesh '{mesh}' has no active UV layer")]
    NoActiveUvLayer { mesh: String },

    /// A named UV layer was requested but does not exist.
    #[error("Mesh '{mesh}' has no UV layer named '{layer}'")]
    UnknownUvLayer { mesh: String, layer: String },

    /// A face vertex has no loop owned by that face (non-manifold topology).
    #[error("Vertex {vertex} has no loop belonging to face {face}")]
    UnmatchedLoop { face: usize, vertex: usize },

    /// The UV layer has no coordinate for a loop.
    #[error("UV layer has no coordinate for loop {loop_index}")]
    MissingUv { loop_index: usize },

    /// No encoder in the chain accepted the value.
    #[error("Cannot encode value of type {type_name}: no encoder matched")]
    Unencodable { type_name: &'static str },

    /// The encoder chain was built without any encoders.
    #[error("Encoder chain has no encoders registered")]
    EmptyEncoderChain,

    /// Cube diagnostics preconditions did not hold.
    #[error("Diagnostics error: {0}")]
    Diagnostics(String),
}
