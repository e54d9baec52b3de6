/// Request/response entry points — the surface the GUI/IPC shell calls.
///
/// Each operation is a bounded, synchronous call: no persistent
/// connection, no background thread outlives it. Progress flows through
/// the bounded channel from [`crate::scanner::progress_channel`];
/// cancellation through a shared [`CancelFlag`].
///
/// Every request carries a `test_mode` flag. When set, the entry point
/// returns a fixed synthetic payload with the same field shapes as a real
/// scan and touches no filesystem at all, so the shell can be demoed and
/// tested without mutating a real machine. The payloads are documented on
/// [`fixtures`].
use crate::analysis::duplicates::{self, DuplicateScan, MatchMode};
use crate::analysis::usage::{self, ScanReport};
use crate::cleaner::{self, DeleteTarget, DeletionResult, ReclaimableReport};
use crate::platform;
use crate::scanner::{CancelFlag, ProgressSender, WalkOptions, DEFAULT_MAX_DEPTH};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

/// Parameters for [`analyse_disk`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyseRequest {
    pub root: PathBuf,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default)]
    pub test_mode: bool,
}

impl AnalyseRequest {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_depth: DEFAULT_MAX_DEPTH,
            test_mode: false,
        }
    }
}

/// Parameters for [`scan_duplicates`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateRequest {
    pub roots: Vec<PathBuf>,
    pub mode: MatchMode,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default)]
    pub test_mode: bool,
}

impl DuplicateRequest {
    pub fn new(roots: Vec<PathBuf>, mode: MatchMode) -> Self {
        Self {
            roots,
            mode,
            max_depth: DEFAULT_MAX_DEPTH,
            test_mode: false,
        }
    }
}

/// Parameters for [`clean_items`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanRequest {
    pub targets: Vec<DeleteTarget>,
    /// Defaults to `true`: deletion must be opted into.
    #[serde(default = "default_dry_run")]
    pub dry_run: bool,
    #[serde(default)]
    pub test_mode: bool,
}

fn default_dry_run() -> bool {
    true
}

impl CleanRequest {
    pub fn new(targets: Vec<DeleteTarget>, dry_run: bool) -> Self {
        Self {
            targets,
            dry_run,
            test_mode: false,
        }
    }
}

/// Parameters for [`scan_reclaimable`].
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReclaimRequest {
    /// Roots to sweep; empty means the platform temp roots.
    #[serde(default)]
    pub roots: Vec<PathBuf>,
    #[serde(default)]
    pub test_mode: bool,
}

/// Analyse disk usage under a root.
///
/// Degrades to an all-zero report for protected, missing, or
/// non-directory roots. In test mode, returns
/// [`fixtures::scan_report`].
pub fn analyse_disk(
    req: &AnalyseRequest,
    progress: Option<&ProgressSender>,
    cancel: &CancelFlag,
) -> ScanReport {
    if req.test_mode {
        info!("analyse_disk serving test-mode payload");
        return fixtures::scan_report(&req.root);
    }
    let opts = WalkOptions::with_max_depth(req.max_depth);
    usage::analyse_usage(&req.root, &opts, progress, cancel)
}

/// Find duplicate files under a set of roots.
///
/// In test mode, returns [`fixtures::duplicate_scan`].
pub fn scan_duplicates(
    req: &DuplicateRequest,
    progress: Option<&ProgressSender>,
    cancel: &CancelFlag,
) -> DuplicateScan {
    if req.test_mode {
        info!("scan_duplicates serving test-mode payload");
        return fixtures::duplicate_scan(req.mode);
    }
    let opts = WalkOptions::with_max_depth(req.max_depth);
    duplicates::find_duplicates(&req.roots, req.mode, &opts, progress, cancel)
}

/// Delete (or dry-run) a batch of selected items.
///
/// In test mode, returns [`fixtures::deletion_result`] and touches
/// nothing.
pub fn clean_items(req: &CleanRequest) -> DeletionResult {
    if req.test_mode {
        info!("clean_items serving test-mode payload");
        return fixtures::deletion_result(&req.targets, req.dry_run);
    }
    cleaner::delete_items(&req.targets, req.dry_run)
}

/// Scan temp/cache locations for reclaimable files.
///
/// In test mode, returns [`fixtures::reclaimable_report`].
pub fn scan_reclaimable(
    req: &ReclaimRequest,
    progress: Option<&ProgressSender>,
    cancel: &CancelFlag,
) -> ReclaimableReport {
    if req.test_mode {
        info!("scan_reclaimable serving test-mode payload");
        return fixtures::reclaimable_report();
    }
    if req.roots.is_empty() {
        let roots = platform::temp_roots();
        cleaner::scan_reclaimable(&roots, progress, cancel)
    } else {
        cleaner::scan_reclaimable(&req.roots, progress, cancel)
    }
}

/// Fixed synthetic payloads served when a request sets `test_mode`.
///
/// Field shapes match the real operations exactly, and every payload
/// obeys the same internal invariants as a real result (category counts
/// sum to the file total, group waste follows the keep-first rule, and so
/// on), so shell code exercised against fixtures behaves identically on
/// real scans.
pub mod fixtures {
    use super::*;
    use crate::analysis::categories::FileCategory;
    use crate::analysis::duplicates::DuplicateGroup;
    use crate::analysis::usage::CategoryStats;
    use crate::model::{FileRecord, FolderRecord};
    use compact_str::CompactString;
    use std::path::Path;

    /// (size, count) per category, in enumeration order.
    const CATEGORY_FIXTURE: [(u64, u64); 8] = [
        (2_345_678_901, 1_234), // Documents
        (4_567_890_123, 3_456), // Images
        (5_678_901_234, 234),   // Videos
        (1_234_567_890, 567),   // Audio
        (890_123_456, 123),     // Archives
        (456_789_012, 345),     // Executables
        (234_567_890, 2_345),   // Code
        (270_716_061, 4_239),   // Other
    ];

    fn demo_file(path: &Path, name: &str, size_bytes: u64) -> FileRecord {
        FileRecord {
            path: path.join(name),
            category: crate::analysis::categories::categorise(name),
            name: CompactString::new(name),
            size_bytes,
            modified: None,
        }
    }

    /// A populated usage report rooted at `root`.
    ///
    /// Totals are the sums of the per-category fixture values, so the
    /// categorisation-totality invariant holds exactly as it would for a
    /// real scan.
    pub fn scan_report(root: &Path) -> ScanReport {
        let per_category: Vec<CategoryStats> = FileCategory::ALL
            .iter()
            .zip(CATEGORY_FIXTURE)
            .map(|(&category, (size_bytes, count))| CategoryStats {
                category,
                size_bytes,
                count,
            })
            .collect();
        let total_size_bytes = per_category.iter().map(|c| c.size_bytes).sum();
        let total_files = per_category.iter().map(|c| c.count).sum();

        let largest_files = vec![
            demo_file(root, "video_project.mp4", 1_234_567_890),
            demo_file(root, "backup.zip", 987_654_321),
            demo_file(root, "presentation.pptx", 456_789_012),
            demo_file(root, "photo_album.zip", 345_678_901),
            demo_file(root, "game_installer.exe", 234_567_890),
        ];

        let folders = [
            ("Videos", 5_678_901_234u64, 234u64, 12u64),
            ("Pictures", 4_567_890_123, 3_456, 45),
            ("Documents", 2_345_678_901, 1_234, 67),
            ("Music", 1_234_567_890, 567, 23),
            ("Downloads", 890_123_456, 456, 34),
        ];
        let largest_folders = folders
            .iter()
            .map(|&(name, size_bytes, file_count, folder_count)| FolderRecord {
                path: root.join(name),
                name: CompactString::new(name),
                size_bytes,
                file_count,
                folder_count,
            })
            .collect();

        ScanReport {
            root: root.to_path_buf(),
            total_size_bytes,
            total_files,
            total_folders: 876,
            per_category,
            largest_files,
            largest_folders,
        }
    }

    /// Two demo duplicate groups: a photo pair and a document triple.
    ///
    /// Keys follow the requested mode (lowercased name, decimal size, or
    /// a digest of a fixed seed string), and the waste totals are computed
    /// by the same accounting as a real scan.
    pub fn duplicate_scan(mode: MatchMode) -> DuplicateScan {
        let photo_members = vec![
            demo_file(Path::new("C:\\Users\\Demo\\Documents"), "photo.jpg", 2_048_000),
            demo_file(Path::new("C:\\Users\\Demo\\Pictures"), "photo.jpg", 2_048_000),
        ];
        let doc_members = vec![
            demo_file(Path::new("C:\\Users\\Demo\\Downloads"), "document.pdf", 1_024_000),
            demo_file(Path::new("C:\\Users\\Demo\\Desktop"), "document.pdf", 1_024_000),
            demo_file(Path::new("C:\\Users\\Demo\\Backup"), "document.pdf", 1_024_000),
        ];

        let key_for = |name: &str, size: u64, seed: &[u8]| match mode {
            MatchMode::Name => name.to_string(),
            MatchMode::Size => size.to_string(),
            MatchMode::Checksum => blake3::hash(seed).to_hex().to_string(),
        };

        let groups: Vec<DuplicateGroup> = [
            (photo_members, "photo.jpg", 2_048_000u64, &b"tidysweep-demo-photo"[..]),
            (doc_members, "document.pdf", 1_024_000, &b"tidysweep-demo-document"[..]),
        ]
        .into_iter()
        .map(|(members, name, size, seed)| DuplicateGroup {
            key: key_for(name, size, seed),
            mode,
            total_size_bytes: members.iter().map(|m| m.size_bytes).sum(),
            members,
        })
        .collect();

        let total_files = groups.iter().map(|g| g.members.len() as u64).sum();
        let total_wasted_bytes = groups.iter().map(DuplicateGroup::wasted_bytes).sum();
        DuplicateScan {
            mode,
            groups,
            total_files,
            total_wasted_bytes,
        }
    }

    /// A deletion result reporting every target as deleted, with
    /// `bytes_freed` summing the requested sizes. No path is touched.
    pub fn deletion_result(targets: &[DeleteTarget], dry_run: bool) -> DeletionResult {
        DeletionResult {
            dry_run,
            deleted_count: targets.len() as u64,
            failed_count: 0,
            bytes_freed: targets.iter().map(|t| t.size_bytes).sum(),
            errors: Vec::new(),
        }
    }

    /// Three demo temp-file candidates totalling 450 MB.
    pub fn reclaimable_report() -> ReclaimableReport {
        const MB: u64 = 1024 * 1024;
        let temp = Path::new("C:\\Users\\Demo\\AppData\\Local\\Temp");
        let items = vec![
            demo_file(temp, "file1.tmp", 120 * MB),
            demo_file(Path::new("C:\\Windows\\Temp"), "cache.dat", 200 * MB),
            demo_file(temp, "session.log", 130 * MB),
        ];
        ReclaimableReport {
            total_files: items.len() as u64,
            total_size_bytes: items.iter().map(|i| i.size_bytes).sum(),
            items,
        }
    }
}
