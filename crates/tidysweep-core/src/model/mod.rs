/// Data model for TidySweep scan results.
///
/// Re-exports the immutable record snapshots, the directory-aggregation
/// arena, and size formatting helpers.
pub mod record;
pub mod size;
pub mod tree;

pub use record::{FileRecord, FolderRecord};
pub use tree::{DirTree, NodeIndex};
