//! Material classification.
//!
//! Every material slot on an object becomes one [`MaterialRecord`]: empty
//! slots are `Default`, materials without a node graph are `Basic` with
//! their flat color, and node-based materials are `ImageFiles` listing the
//! image textures that end up at the material output.

pub mod classify;
pub mod record;

pub use classify::{classify_slot, classify_slots, end_nodes, output_image_filenames};
pub use record::{MaterialRecord, DEFAULT_MATERIAL_NAME};
