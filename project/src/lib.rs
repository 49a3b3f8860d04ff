//! Project-side collaborators of the CD+G exporter: the `.cmp` binary
//! project format (reader and writer), asset path normalization, BMP
//! decoding, and transition-file loading. The [`assets`] module turns
//! parsed records into fully resident core clips.

pub mod assets;
pub mod bmp;
pub mod parser;
pub mod paths;
pub mod record;
pub mod transition_file;
pub mod writer;

pub use assets::{AssetError, AssetResolver, resolve_clips};
pub use parser::{ProjectError, parse};
pub use record::{ClipRecord, ClipRecordKind, ProjectFile};
pub use writer::write;

/// Read and parse a project file from disk.
pub fn load_project(path: &std::path::Path) -> Result<ProjectFile, ProjectError> {
    let bytes = std::fs::read(path)?;
    parse(&bytes)
}
