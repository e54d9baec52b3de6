/// Duplicate file detection — grouping by name, size, or content digest.
///
/// Checksum mode pre-partitions candidates by size (files with a unique
/// size cannot be content duplicates), hashes the remaining candidates on
/// a bounded worker pool, then groups in the original discovery order so
/// results do not depend on hash completion order.
use crate::checksum;
use crate::model::FileRecord;
use crate::scanner::{
    self, CancelFlag, ProgressSender, ScanProgress, WalkEntry, WalkOptions, WalkStats,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, info};

/// How files are matched into duplicate groups.
///
/// `Checksum` is the recommended mode: name and size matches can pair
/// files whose contents differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchMode {
    Name,
    Size,
    Checksum,
}

/// A set of files sharing one grouping key.
///
/// Invariant: `members.len() >= 2` — groups of one are never materialised.
/// Members keep their discovery order; the first member is conventionally
/// the copy that would be kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// The shared key: lowercased name, decimal byte size, or digest hex.
    pub key: String,

    /// The mode that produced this group.
    pub mode: MatchMode,

    /// All files sharing the key, in discovery order.
    pub members: Vec<FileRecord>,

    /// Sum of all members' sizes.
    pub total_size_bytes: u64,
}

impl DuplicateGroup {
    /// Bytes reclaimable by keeping the first member and deleting the
    /// rest.
    pub fn wasted_bytes(&self) -> u64 {
        let kept = self.members.first().map(|m| m.size_bytes).unwrap_or(0);
        self.total_size_bytes - kept
    }
}

/// The result of one duplicate scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateScan {
    pub mode: MatchMode,

    /// Groups in first-seen key order.
    pub groups: Vec<DuplicateGroup>,

    /// Total members across all groups.
    pub total_files: u64,

    /// Sum of every group's reclaimable waste.
    pub total_wasted_bytes: u64,
}

impl DuplicateScan {
    fn from_groups(mode: MatchMode, groups: Vec<DuplicateGroup>) -> Self {
        let total_files = groups.iter().map(|g| g.members.len() as u64).sum();
        let total_wasted_bytes = groups.iter().map(DuplicateGroup::wasted_bytes).sum();
        Self {
            mode,
            groups,
            total_files,
            total_wasted_bytes,
        }
    }

    fn empty(mode: MatchMode) -> Self {
        Self::from_groups(mode, Vec::new())
    }
}

/// Find duplicate files under the given roots.
///
/// Files are collected in root-list order, then walk order within each
/// root. Missing or protected roots contribute nothing. Checksum failures
/// silently exclude the affected file; a would-be group whose members all
/// fail simply never forms.
pub fn find_duplicates(
    roots: &[PathBuf],
    mode: MatchMode,
    opts: &WalkOptions,
    progress: Option<&ProgressSender>,
    cancel: &CancelFlag,
) -> DuplicateScan {
    let start = Instant::now();

    let mut files: Vec<FileRecord> = Vec::new();
    let mut collected = WalkStats::default();
    for root in roots {
        if cancel.is_cancelled() {
            collected.cancelled = true;
            break;
        }
        let stats = scanner::walk(root, opts, progress, cancel, |entry| {
            if let WalkEntry::File(record) = entry {
                files.push(record);
            }
        });
        collected.merge(&stats);
    }
    let error_count = collected.errors;
    let mut cancelled = collected.cancelled;
    info!(
        "duplicate scan collected {} files across {} roots in {:?}",
        files.len(),
        roots.len(),
        start.elapsed()
    );

    if files.is_empty() {
        notify_done(progress, cancelled, start, error_count);
        return DuplicateScan::empty(mode);
    }

    let keys: Vec<Option<String>> = match mode {
        MatchMode::Name => files
            .iter()
            .map(|f| Some(f.name.as_str().to_lowercase()))
            .collect(),
        // Zero-length files are never wasteful duplicates in size mode.
        MatchMode::Size => files
            .iter()
            .map(|f| (f.size_bytes > 0).then(|| f.size_bytes.to_string()))
            .collect(),
        MatchMode::Checksum => {
            if cancelled {
                vec![None; files.len()]
            } else {
                let keys = checksum_keys(&files, opts, progress, cancel);
                cancelled |= cancel.is_cancelled();
                keys
            }
        }
    };

    let groups = collect_groups(mode, files, keys);
    debug!(
        "duplicate scan found {} groups ({:?} mode) in {:?}",
        groups.len(),
        mode,
        start.elapsed()
    );

    notify_done(progress, cancelled, start, error_count);
    DuplicateScan::from_groups(mode, groups)
}

fn notify_done(
    progress: Option<&ProgressSender>,
    cancelled: bool,
    start: Instant,
    error_count: u64,
) {
    if let Some(tx) = progress {
        let message = if cancelled {
            ScanProgress::Cancelled
        } else {
            ScanProgress::Complete {
                duration: start.elapsed(),
                error_count,
            }
        };
        let _ = tx.try_send(message);
    }
}

/// Compute digest keys for checksum mode.
///
/// Files are pre-partitioned by size so only files whose size repeats are
/// hashed at all. Hashing runs on a bounded pool sized by
/// `opts.threads`; per-file progress is pushed through the same channel
/// shape the walker uses. Cancellation skips the remaining files, which
/// then carry no key.
fn checksum_keys(
    files: &[FileRecord],
    opts: &WalkOptions,
    progress: Option<&ProgressSender>,
    cancel: &CancelFlag,
) -> Vec<Option<String>> {
    let mut by_size: HashMap<u64, Vec<usize>> = HashMap::new();
    for (i, record) in files.iter().enumerate() {
        by_size.entry(record.size_bytes).or_default().push(i);
    }
    let candidates: Vec<usize> = by_size
        .into_values()
        .filter(|indices| indices.len() >= 2)
        .flatten()
        .collect();
    debug!(
        "hashing {} of {} files (size-unique files skipped)",
        candidates.len(),
        files.len()
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opts.threads.max(1))
        .build()
        .expect("failed to build checksum thread pool");

    let hashed = AtomicU64::new(0);
    let hashed_bytes = AtomicU64::new(0);

    let results: Vec<(usize, Option<String>)> = pool.install(|| {
        candidates
            .par_iter()
            .map(|&i| {
                if cancel.is_cancelled() {
                    return (i, None);
                }
                let record = &files[i];
                let key = match checksum::checksum_file(&record.path) {
                    Ok(digest) => Some(digest.to_hex().to_string()),
                    Err(err) => {
                        debug!("checksum failed for {}: {err}", record.path.display());
                        if let Some(tx) = progress {
                            let _ = tx.try_send(ScanProgress::Error {
                                path: record.path.to_string_lossy().into_owned(),
                                message: format!("{err}"),
                            });
                        }
                        None
                    }
                };
                let done = hashed.fetch_add(1, Ordering::Relaxed) + 1;
                let bytes = hashed_bytes.fetch_add(record.size_bytes, Ordering::Relaxed)
                    + record.size_bytes;
                if let Some(tx) = progress {
                    let _ = tx.try_send(ScanProgress::Update {
                        files_scanned: done,
                        folders_scanned: 0,
                        bytes_scanned: bytes,
                        current_path: record.path.to_string_lossy().into_owned(),
                    });
                }
                (i, key)
            })
            .collect()
    });

    let mut keys: Vec<Option<String>> = vec![None; files.len()];
    for (i, key) in results {
        keys[i] = key;
    }
    keys
}

/// Group records by their key, preserving first-seen key order and
/// per-group discovery order, then keep only groups of two or more.
fn collect_groups(
    mode: MatchMode,
    files: Vec<FileRecord>,
    keys: Vec<Option<String>>,
) -> Vec<DuplicateGroup> {
    let mut index_of_key: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<(String, Vec<FileRecord>)> = Vec::new();

    for (record, key) in files.into_iter().zip(keys) {
        let Some(key) = key else { continue };
        match index_of_key.get(&key) {
            Some(&i) => buckets[i].1.push(record),
            None => {
                index_of_key.insert(key.clone(), buckets.len());
                buckets.push((key, vec![record]));
            }
        }
    }

    buckets
        .into_iter()
        .filter(|(_, members)| members.len() >= 2)
        .map(|(key, members)| {
            let total_size_bytes = members.iter().map(|m| m.size_bytes).sum();
            DuplicateGroup {
                key,
                mode,
                members,
                total_size_bytes,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use compact_str::CompactString;

    fn record(path: &str, size: u64) -> FileRecord {
        let path = PathBuf::from(path);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        FileRecord {
            category: crate::analysis::categories::categorise(&name),
            name: CompactString::new(&name),
            path,
            size_bytes: size,
            modified: None,
        }
    }

    fn name_keys(files: &[FileRecord]) -> Vec<Option<String>> {
        files
            .iter()
            .map(|f| Some(f.name.as_str().to_lowercase()))
            .collect()
    }

    #[test]
    fn groups_of_one_are_never_materialised() {
        let files = vec![
            record("/a/one.txt", 10),
            record("/a/two.txt", 20),
            record("/a/three.txt", 30),
        ];
        let keys = name_keys(&files);
        assert!(collect_groups(MatchMode::Name, files, keys).is_empty());
    }

    #[test]
    fn members_keep_discovery_order() {
        let files = vec![
            record("/a/photo.jpg", 100),
            record("/b/other.txt", 5),
            record("/c/PHOTO.JPG", 100),
        ];
        let keys = name_keys(&files);
        let groups = collect_groups(MatchMode::Name, files, keys);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "photo.jpg");
        assert_eq!(groups[0].members.len(), 2);
        assert_eq!(groups[0].members[0].path, PathBuf::from("/a/photo.jpg"));
        assert_eq!(groups[0].members[1].path, PathBuf::from("/c/PHOTO.JPG"));
    }

    #[test]
    fn groups_appear_in_first_seen_key_order() {
        let files = vec![
            record("/a/b.txt", 1),
            record("/a/a.txt", 1),
            record("/b/b.txt", 1),
            record("/b/a.txt", 1),
        ];
        let keys = name_keys(&files);
        let groups = collect_groups(MatchMode::Name, files, keys);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, "b.txt");
        assert_eq!(groups[1].key, "a.txt");
    }

    #[test]
    fn keyless_records_are_excluded() {
        let files = vec![
            record("/a/x.bin", 7),
            record("/b/x.bin", 7),
            record("/c/x.bin", 7),
        ];
        // Middle record failed to hash: it must drop out of the group.
        let keys = vec![Some("k".to_string()), None, Some("k".to_string())];
        let groups = collect_groups(MatchMode::Checksum, files, keys);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].members.len(), 2);
    }

    #[test]
    fn waste_keeps_the_first_member() {
        let members = vec![
            record("/a/f.bin", 2_048_000),
            record("/b/f.bin", 2_048_000),
            record("/c/f.bin", 2_048_000),
        ];
        let group = DuplicateGroup {
            key: "2048000".into(),
            mode: MatchMode::Size,
            total_size_bytes: members.iter().map(|m| m.size_bytes).sum(),
            members,
        };
        assert_eq!(group.wasted_bytes(), 2 * 2_048_000);

        let scan = DuplicateScan::from_groups(MatchMode::Size, vec![group]);
        assert_eq!(scan.total_files, 3);
        assert_eq!(scan.total_wasted_bytes, 2 * 2_048_000);
    }
}
