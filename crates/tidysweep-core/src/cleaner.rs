/// Safe deletion and the reclaimable-space scan behind the cleaner surface.
///
/// Every deletion target passes the path policy before any filesystem
/// mutation: protected paths are never touched, and a target must carry a
/// transient-directory marker to be deleted at all. Failures are recorded
/// per item; the batch always runs to the end.
use crate::model::FileRecord;
use crate::policy;
use crate::scanner::{self, CancelFlag, ProgressSender, WalkEntry, WalkOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Depth for the reclaimable-space scan over temp roots, matching the
/// shallow sweep the cleaner exposes.
pub const RECLAIM_SCAN_DEPTH: usize = 2;

/// One item selected for deletion. `size_bytes` is the size reported by
/// the scan that produced the item and is what `bytes_freed` accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTarget {
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// A per-item deletion failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionError {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of a deletion batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletionResult {
    /// Echo of the request's dry-run flag.
    pub dry_run: bool,
    pub deleted_count: u64,
    pub failed_count: u64,
    pub bytes_freed: u64,
    pub errors: Vec<DeletionError>,
}

impl DeletionResult {
    fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            deleted_count: 0,
            failed_count: 0,
            bytes_freed: 0,
            errors: Vec::new(),
        }
    }

    fn fail(&mut self, path: &Path, reason: impl Into<String>) {
        self.failed_count += 1;
        self.errors.push(DeletionError {
            path: path.to_path_buf(),
            reason: reason.into(),
        });
    }
}

/// Delete (or dry-run) a batch of items.
///
/// A dry run performs every check and accumulates the counters exactly as
/// a real run would, issuing zero filesystem mutations. Missing paths are
/// vacuously successful no-ops — already clean. Existing files are
/// removed; existing directories are emptied but kept, so a watched cache
/// root survives its own cleaning.
pub fn delete_items(targets: &[DeleteTarget], dry_run: bool) -> DeletionResult {
    let mut result = DeletionResult::new(dry_run);

    for target in targets {
        if policy::is_protected(&target.path) {
            warn!("refusing protected path {}", target.path.display());
            result.fail(&target.path, "protected path skipped");
            continue;
        }
        if !policy::is_safe_to_delete(&target.path) {
            result.fail(&target.path, "unsafe path skipped");
            continue;
        }

        let metadata = match fs::symlink_metadata(&target.path) {
            Ok(meta) => meta,
            Err(_) => {
                // Already gone: nothing to free, nothing to report.
                debug!("target {} no longer exists", target.path.display());
                continue;
            }
        };

        if dry_run {
            result.deleted_count += 1;
            result.bytes_freed += target.size_bytes;
            continue;
        }

        let outcome = if metadata.is_dir() {
            empty_dir(&target.path)
        } else {
            fs::remove_file(&target.path).map_err(crate::Error::from)
        };
        match outcome {
            Ok(()) => {
                result.deleted_count += 1;
                result.bytes_freed += target.size_bytes;
            }
            Err(err) => {
                warn!("failed to delete {}: {err}", target.path.display());
                result.fail(&target.path, err.to_string());
            }
        }
    }

    info!(
        "deletion batch (dry_run={}): {} deleted, {} failed, {} bytes freed",
        dry_run, result.deleted_count, result.failed_count, result.bytes_freed
    );
    result
}

/// Remove a directory's contents without removing the directory itself.
fn empty_dir(dir: &Path) -> Result<(), crate::Error> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

/// Candidate files reclaimable from temp/cache locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReclaimableReport {
    pub items: Vec<FileRecord>,
    pub total_files: u64,
    pub total_size_bytes: u64,
}

/// Scan the given temp/cache roots for reclaimable files.
///
/// A shallow sweep ([`RECLAIM_SCAN_DEPTH`]): missing roots contribute
/// nothing, and the usual protected-path pruning applies. Roots usually
/// come from [`crate::platform::temp_roots`].
pub fn scan_reclaimable(
    roots: &[PathBuf],
    progress: Option<&ProgressSender>,
    cancel: &CancelFlag,
) -> ReclaimableReport {
    let opts = WalkOptions::with_max_depth(RECLAIM_SCAN_DEPTH);
    let mut items: Vec<FileRecord> = Vec::new();

    for root in roots {
        if cancel.is_cancelled() {
            break;
        }
        scanner::walk(root, &opts, progress, cancel, |entry| {
            if let WalkEntry::File(record) = entry {
                items.push(record);
            }
        });
    }

    let total_size_bytes = items.iter().map(|i| i.size_bytes).sum();
    let report = ReclaimableReport {
        total_files: items.len() as u64,
        total_size_bytes,
        items,
    };
    info!(
        "reclaimable scan: {} files, {} bytes across {} roots",
        report.total_files, report.total_size_bytes, roots.len()
    );
    report
}
