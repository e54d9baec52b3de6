/// Parallel directory walker built on `jwalk`.
///
/// Listing runs on a bounded rayon pool while the consuming loop stays
/// single-threaded, so callers accumulate results without any locking.
/// Protected paths are pruned inside `process_read_dir`, before they are
/// descended into or stat-ed. Any error reading one entry's metadata
/// (permission denied, race-deleted file) skips that entry; a directory
/// that cannot be listed is skipped whole. Neither aborts the walk.
use crate::analysis::categories;
use crate::model::FileRecord;
use crate::policy;
use crate::scanner::{CancelFlag, ProgressSender, ScanProgress, WalkOptions, WalkStats};
use chrono::{DateTime, Utc};
use compact_str::CompactString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One visited entry, in the order the walk yields it.
///
/// Within a directory, entries arrive in the order the underlying listing
/// returned them; no sort is imposed at this layer.
#[derive(Debug)]
pub enum WalkEntry {
    File(FileRecord),
    Dir { path: PathBuf },
}

/// Walk `root` to `opts.max_depth`, invoking `on_entry` for every visited
/// file and directory and pushing running totals into `progress`.
///
/// A protected, missing, or non-directory root returns zeroed stats
/// without visiting anything. Cancellation is honoured at every entry
/// boundary; partial totals are returned with `cancelled` set.
pub fn walk<F>(
    root: &Path,
    opts: &WalkOptions,
    progress: Option<&ProgressSender>,
    cancel: &CancelFlag,
    mut on_entry: F,
) -> WalkStats
where
    F: FnMut(WalkEntry),
{
    let mut stats = WalkStats::default();

    if policy::is_protected(root) {
        debug!("refusing to walk protected root {}", root.display());
        return stats;
    }
    if !root.is_dir() {
        debug!("walk root {} is missing or not a directory", root.display());
        return stats;
    }

    let threads = opts.threads.max(1);
    let walker = jwalk::WalkDir::new(root)
        .skip_hidden(false)
        .follow_links(false)
        .max_depth(opts.max_depth)
        .parallelism(jwalk::Parallelism::RayonNewPool(threads))
        .process_read_dir(|_depth, _dir_path, _state, children| {
            // Prune protected entries before they are descended or stat-ed.
            // Error placeholders are kept so the main loop can count them.
            children.retain(|entry| match entry {
                Ok(e) => !policy::is_protected(&e.path()),
                Err(_) => true,
            });
        });

    for entry_result in walker {
        if cancel.is_cancelled() {
            stats.cancelled = true;
            return stats;
        }

        let entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                // Typically access-denied on a directory listing: the
                // directory is skipped whole, the walk continues.
                stats.errors += 1;
                let path = err
                    .path()
                    .map(|p| p.to_string_lossy().into_owned())
                    .unwrap_or_default();
                if let Some(tx) = progress {
                    let _ = tx.try_send(ScanProgress::Error {
                        path,
                        message: format!("{err}"),
                    });
                }
                continue;
            }
        };

        let path = entry.path();

        // The root itself is not an entry.
        if path.as_path() == root {
            continue;
        }

        let file_type = entry.file_type();
        if file_type.is_symlink() {
            // Never followed, never recorded: counting a link's nominal
            // size would double-count its target.
            continue;
        }

        if file_type.is_dir() {
            stats.dirs += 1;
            on_entry(WalkEntry::Dir { path: path.clone() });
        } else {
            let (size, modified) = match std::fs::symlink_metadata(&path) {
                Ok(meta) => (meta.len(), meta.modified().ok()),
                Err(err) => {
                    stats.errors += 1;
                    if let Some(tx) = progress {
                        let _ = tx.try_send(ScanProgress::Error {
                            path: path.to_string_lossy().into_owned(),
                            message: format!("{err}"),
                        });
                    }
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy();
            let record = FileRecord {
                category: categories::categorise(&name),
                name: CompactString::new(name.as_ref()),
                size_bytes: size,
                modified: modified.map(DateTime::<Utc>::from),
                path: path.clone(),
            };
            stats.files += 1;
            stats.bytes += size;
            on_entry(WalkEntry::File(record));
        }

        if let Some(tx) = progress {
            let _ = tx.try_send(ScanProgress::Update {
                files_scanned: stats.files,
                folders_scanned: stats.dirs,
                bytes_scanned: stats.bytes,
                current_path: path.to_string_lossy().into_owned(),
            });
        }
    }

    stats
}
