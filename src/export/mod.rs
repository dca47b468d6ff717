//! Export orchestration.
//!
//! Objects are selected into a queue (one object, a collection tree, or the
//! whole scene), then [`Exporter::run`] writes one JSON document per object
//! to the path derived from its collection hierarchy.

pub mod path;
pub mod queue;

pub use path::{collection_subdirs, resolve_export_path};
pub use queue::{CommandReport, ExportState, ExportTask, Exporter};

use crate::encode::DEFAULT_INDENT;
use crate::reconstruct::UvSelection;
use std::path::PathBuf;

/// Exporter configuration.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Base directory override. Falls back to the scene's export directory.
    pub base_dir: Option<PathBuf>,
    /// Indentation width of written documents.
    pub indent: usize,
    /// UV layer read during reconstruction.
    pub uv_layer: UvSelection,
    /// Create missing parent directories before writing.
    pub create_dirs: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            base_dir: None,
            indent: DEFAULT_INDENT,
            uv_layer: UvSelection::Active,
            create_dirs: false,
        }
    }
}

impl ExportConfig {
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Read UVs from a named layer instead of the active one.
    pub fn with_uv_layer(mut self, name: impl Into<String>) -> Self {
        self.uv_layer = UvSelection::Named(name.into());
        self
    }

    pub fn with_create_dirs(mut self, create_dirs: bool) -> Self {
        self.create_dirs = create_dirs;
        self
    }
}
