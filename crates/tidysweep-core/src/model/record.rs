/// Immutable file and folder snapshots captured at scan time.
///
/// Records are created fresh on every scan invocation and owned by the
/// caller that receives them; they are never mutated in place, only replaced
/// by the next scan's output. A record can go stale if the filesystem
/// changes after capture — no invariant ties it to the live disk.
use crate::analysis::categories::FileCategory;
use chrono::{DateTime, Utc};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A single file observed during a walk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Full path of the file.
    pub path: PathBuf,

    /// File name only (final path component).
    pub name: CompactString,

    /// Logical size in bytes at capture time.
    pub size_bytes: u64,

    /// Last-modified timestamp, when the filesystem reported one.
    pub modified: Option<DateTime<Utc>>,

    /// Category derived from the file name's extension.
    pub category: FileCategory,
}

/// A folder with its aggregated subtree totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderRecord {
    /// Full path of the folder.
    pub path: PathBuf,

    /// Folder name only.
    pub name: CompactString,

    /// Sum of all descendant file sizes.
    pub size_bytes: u64,

    /// Number of files anywhere in the subtree.
    pub file_count: u64,

    /// Number of folders anywhere in the subtree (not counting this one).
    pub folder_count: u64,
}
