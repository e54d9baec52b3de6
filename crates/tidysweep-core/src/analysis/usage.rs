/// Disk usage analysis — size, category, and largest-entry breakdown for a
/// directory subtree.
///
/// The walk streams entries into a directory arena plus flat accumulators;
/// a single bottom-up pass then rolls folder totals up, and the top-50
/// lists are cut by partial selection. The top-50 cut is presentation
/// only: every visited file is counted in the aggregate totals.
use crate::analysis::categories::FileCategory;
use crate::model::{DirTree, FileRecord, FolderRecord, NodeIndex};
use crate::policy;
use crate::scanner::{self, CancelFlag, ProgressSender, ScanProgress, WalkEntry, WalkOptions};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Presentation cap for the largest-files and largest-folders lists.
pub const TOP_LIST_LIMIT: usize = 50;

/// Size and count totals for a single file category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub category: FileCategory,
    pub size_bytes: u64,
    pub count: u64,
}

/// One row of the nonzero-category percentage view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: FileCategory,
    pub size_bytes: u64,
    pub count: u64,
    /// Share of the total, rounded to one decimal.
    pub percent: f64,
}

/// The complete usage report for one scan root.
///
/// Created fresh on every scan and owned by the caller; never mutated in
/// place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// The root this report describes.
    pub root: PathBuf,

    /// Sum of all visited file sizes.
    pub total_size_bytes: u64,

    /// Number of files visited.
    pub total_files: u64,

    /// Number of folders visited (the root is not counted).
    pub total_folders: u64,

    /// Stats for every category, in enumeration order. Zero-size categories
    /// are present here; [`ScanReport::category_breakdown`] filters them for
    /// display.
    pub per_category: Vec<CategoryStats>,

    /// The largest individual files, descending by size, at most
    /// [`TOP_LIST_LIMIT`].
    pub largest_files: Vec<FileRecord>,

    /// The largest folders by subtree size, descending, at most
    /// [`TOP_LIST_LIMIT`]. Folders with zero subtree size are omitted.
    pub largest_folders: Vec<FolderRecord>,
}

impl ScanReport {
    /// The all-zero report returned for protected, missing, or
    /// non-directory roots.
    pub fn empty(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            total_size_bytes: 0,
            total_files: 0,
            total_folders: 0,
            per_category: zeroed_category_stats(),
            largest_files: Vec::new(),
            largest_folders: Vec::new(),
        }
    }

    /// Nonzero categories with their share of the total, largest first.
    ///
    /// A presentation view derived from the typed report, kept separate
    /// from it so human-facing rounding never leaks into the data model.
    pub fn category_breakdown(&self) -> Vec<CategoryShare> {
        let mut shares: Vec<CategoryShare> = self
            .per_category
            .iter()
            .filter(|stats| stats.size_bytes > 0)
            .map(|stats| CategoryShare {
                category: stats.category,
                size_bytes: stats.size_bytes,
                count: stats.count,
                percent: if self.total_size_bytes > 0 {
                    let raw = stats.size_bytes as f64 / self.total_size_bytes as f64 * 100.0;
                    (raw * 10.0).round() / 10.0
                } else {
                    0.0
                },
            })
            .collect();
        shares.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes));
        shares
    }
}

fn zeroed_category_stats() -> Vec<CategoryStats> {
    FileCategory::ALL
        .iter()
        .map(|&category| CategoryStats {
            category,
            size_bytes: 0,
            count: 0,
        })
        .collect()
}

/// Analyse disk usage under `root`.
///
/// Returns [`ScanReport::empty`] when the root is protected, missing, or
/// not a directory — degraded, never an error. Cancellation yields a
/// report over whatever was visited before the stop.
pub fn analyse_usage(
    root: &Path,
    opts: &WalkOptions,
    progress: Option<&ProgressSender>,
    cancel: &CancelFlag,
) -> ScanReport {
    let start = Instant::now();

    if policy::is_protected(root) || !root.is_dir() {
        debug!("usage scan of {} degraded to empty report", root.display());
        return ScanReport::empty(root);
    }

    let mut tree = DirTree::new(CompactString::new(root.to_string_lossy().as_ref()));
    let mut dir_map: HashMap<PathBuf, NodeIndex> = HashMap::new();
    dir_map.insert(root.to_path_buf(), tree.root());

    let mut files: Vec<FileRecord> = Vec::new();
    let mut per_category = zeroed_category_stats();

    let stats = scanner::walk(root, opts, progress, cancel, |entry| match entry {
        WalkEntry::Dir { path } => {
            // Already present only if the ancestor fallback created it.
            if !dir_map.contains_key(&path) {
                let parent = resolve_parent(&mut tree, &mut dir_map, &path, root);
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let idx = tree.add_dir(CompactString::new(&name), parent);
                dir_map.insert(path, idx);
            }
        }
        WalkEntry::File(record) => {
            let parent = resolve_parent(&mut tree, &mut dir_map, &record.path, root);
            tree.record_file(parent, record.size_bytes);
            let slot = &mut per_category[record.category.index()];
            slot.size_bytes += record.size_bytes;
            slot.count += 1;
            files.push(record);
        }
    });

    tree.aggregate();

    let largest_files = top_files(files, TOP_LIST_LIMIT);
    let largest_folders = tree
        .largest_dirs(TOP_LIST_LIMIT)
        .into_iter()
        .map(|idx| {
            let node = tree.node(idx);
            FolderRecord {
                path: tree.full_path(idx),
                name: node.name.clone(),
                size_bytes: node.size_bytes,
                file_count: node.file_count,
                folder_count: node.folder_count,
            }
        })
        .collect();

    let report = ScanReport {
        root: root.to_path_buf(),
        total_size_bytes: stats.bytes,
        total_files: stats.files,
        total_folders: stats.dirs,
        per_category,
        largest_files,
        largest_folders,
    };

    if let Some(tx) = progress {
        let message = if stats.cancelled {
            ScanProgress::Cancelled
        } else {
            ScanProgress::Complete {
                duration: start.elapsed(),
                error_count: stats.errors,
            }
        };
        let _ = tx.try_send(message);
    }
    info!(
        "usage scan of {}: {} files, {} folders, {} bytes in {:?}",
        root.display(),
        stats.files,
        stats.dirs,
        stats.bytes,
        start.elapsed()
    );

    report
}

/// Resolve the arena index of an entry's containing directory.
///
/// With parallel listing a directory is always yielded before its
/// contents, so the lookup normally hits. The ancestor-creation fallback
/// keeps the tree correct if that ordering ever fails to hold.
fn resolve_parent(
    tree: &mut DirTree,
    dir_map: &mut HashMap<PathBuf, NodeIndex>,
    entry_path: &Path,
    root: &Path,
) -> NodeIndex {
    let parent_path = match entry_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return tree.root(),
    };
    if let Some(&idx) = dir_map.get(&parent_path) {
        return idx;
    }
    ensure_ancestors(tree, dir_map, &parent_path, root)
}

/// Create any missing ancestor chain between `target` and the scan root,
/// registering each new directory in `dir_map`.
fn ensure_ancestors(
    tree: &mut DirTree,
    dir_map: &mut HashMap<PathBuf, NodeIndex>,
    target: &Path,
    root: &Path,
) -> NodeIndex {
    let mut missing: Vec<PathBuf> = Vec::new();
    let mut current = target.to_path_buf();

    while !dir_map.contains_key(&current) && current != *root {
        missing.push(current.clone());
        match current.parent() {
            Some(p) => current = p.to_path_buf(),
            None => break,
        }
    }

    let mut parent_idx = dir_map.get(&current).copied().unwrap_or(tree.root());

    for ancestor in missing.into_iter().rev() {
        let name = ancestor
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let idx = tree.add_dir(CompactString::new(&name), parent_idx);
        dir_map.insert(ancestor, idx);
        parent_idx = idx;
    }

    parent_idx
}

/// The `n` largest records by size, descending.
///
/// Partial selection (O(n) average) followed by a sort of only the kept
/// slice, the same cut the folder list uses.
fn top_files(mut files: Vec<FileRecord>, n: usize) -> Vec<FileRecord> {
    if files.len() > n {
        files.select_nth_unstable_by(n - 1, |a, b| b.size_bytes.cmp(&a.size_bytes));
        files.truncate(n);
    }
    files.sort_unstable_by(|a, b| b.size_bytes.cmp(&a.size_bytes));
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, size: u64) -> FileRecord {
        FileRecord {
            path: PathBuf::from(format!("/scan/{name}")),
            name: CompactString::new(name),
            size_bytes: size,
            modified: None,
            category: crate::analysis::categories::categorise(name),
        }
    }

    #[test]
    fn top_files_sorts_and_truncates() {
        let files: Vec<FileRecord> = (0..10)
            .map(|i| record(&format!("f{i}.bin"), (i as u64 + 1) * 10))
            .collect();
        let top = top_files(files, 3);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].size_bytes, 100);
        assert_eq!(top[1].size_bytes, 90);
        assert_eq!(top[2].size_bytes, 80);
    }

    #[test]
    fn empty_report_has_all_categories_zeroed() {
        let report = ScanReport::empty(Path::new("/nope"));
        assert_eq!(report.per_category.len(), FileCategory::ALL.len());
        assert!(report.per_category.iter().all(|c| c.size_bytes == 0));
        assert!(report.category_breakdown().is_empty());
    }

    #[test]
    fn breakdown_filters_zero_and_rounds_to_one_decimal() {
        let mut report = ScanReport::empty(Path::new("/scan"));
        report.total_size_bytes = 3_000;
        report.per_category[FileCategory::Images.index()] = CategoryStats {
            category: FileCategory::Images,
            size_bytes: 2_000,
            count: 2,
        };
        report.per_category[FileCategory::Code.index()] = CategoryStats {
            category: FileCategory::Code,
            size_bytes: 1_000,
            count: 1,
        };

        let shares = report.category_breakdown();
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].category, FileCategory::Images);
        assert_eq!(shares[0].percent, 66.7);
        assert_eq!(shares[1].percent, 33.3);
    }
}
