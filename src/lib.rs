//! # Raw Export
//!
//! Export scene meshes to a flat JSON mesh format.
//!
//! ## Overview
//!
//! Authoring tools store meshes with shared vertices and per-loop UVs. This
//! library rebuilds every face as its own block of corners, each with one
//! position, one normal and one UV, and writes them together with a
//! per-face material index and a description of each material slot.
//!
//! ## Quick Start
//!
//! ```ignore
//! use raw_export::{ExportConfig, Exporter, Scene};
//!
//! // Load a scene description
//! let mut scene = Scene::load("scene.json")?;
//!
//! // Export every eligible object below the scene's export directory
//! let mut exporter = Exporter::new(ExportConfig::default());
//! let report = exporter.export_all(&mut scene)?;
//! ```
//!
//! ## Host Integration
//!
//! To export straight from another mesh representation, implement
//! [`MeshSource`] and call [`reconstruct`] directly:
//!
//! ```ignore
//! use raw_export::{reconstruct, EncoderChain, UvSelection};
//!
//! let data = reconstruct(&my_mesh, &UvSelection::Active)?;
//! let json = EncoderChain::standard().to_string_pretty(&data)?;
//! ```

pub mod error;
pub mod types;
pub mod encode;
pub mod scene;
pub mod material;
pub mod reconstruct;
pub mod object_data;
pub mod export;
pub mod debug;

// Re-export main types for convenience
pub use error::{ExportError, Result};
pub use types::{Vector2, Vector3, Vector4};
pub use encode::{Encodable, Encoder, EncoderChain, ToJson};
pub use scene::{Collection, Material, Mesh, MeshSource, Scene, SceneObject};
pub use material::{classify_slot, classify_slots, MaterialRecord};
pub use reconstruct::{reconstruct, Face, UvSelection};
pub use object_data::ObjectData;
pub use export::{CommandReport, ExportConfig, ExportState, ExportTask, Exporter};
