//! Shared types used throughout the library.

mod vector;

pub use vector::{Vector2, Vector3, Vector4};

/// Index of an object in a [`Scene`](crate::scene::Scene).
pub type ObjectId = usize;

/// Index of a collection in a [`Scene`](crate::scene::Scene).
pub type CollectionId = usize;

/// Index of a material in a [`Scene`](crate::scene::Scene).
pub type MaterialId = usize;
