/// Scanner module — depth-bounded directory traversal shared by the usage
/// analyser, the duplicate finder, and the reclaimable-space scan.
///
/// The walker is `jwalk`-based (rayon-backed parallel listing) with a
/// single sequential consumer, so accumulation stays deterministic without
/// locks. Protected paths are pruned before they are descended or stat-ed,
/// and per-entry errors skip the entry without failing the walk.
pub mod progress;
pub mod walker;

pub use progress::ScanProgress;
pub use walker::{walk, WalkEntry};

use crossbeam_channel::{Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Default traversal depth. `max_depth = 1` visits only the root's direct
/// children; 5 matches the depth the cleaner's original scans used.
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// Maximum number of progress messages that may queue in the channel.
///
/// Progress is pushed with `try_send`: when the consumer lags behind, the
/// newest update is dropped rather than blocking the walk. 4 096 queued
/// messages give a UI draining once per frame plenty of headroom before
/// any updates are lost.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 4_096;

pub type ProgressSender = Sender<ScanProgress>;
pub type ProgressReceiver = Receiver<ScanProgress>;

/// Create the bounded progress channel an operation pushes updates into.
pub fn progress_channel() -> (ProgressSender, ProgressReceiver) {
    crossbeam_channel::bounded(PROGRESS_CHANNEL_CAPACITY)
}

/// Cooperative cancellation flag shared between a caller and a running
/// operation. Checked once per file/directory unit of work, never mid-read
/// of a single file's bytes.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the operation to stop at its next unit boundary.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Tuning knobs for a walk.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Depth bound: `1` visits only the root's direct children. Directories
    /// at the bound are listed but not descended into.
    pub max_depth: usize,

    /// Worker threads for parallel listing and checksum passes. Always
    /// finite; defaults to the logical CPU count.
    pub threads: usize,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            threads: num_cpus::get(),
        }
    }
}

impl WalkOptions {
    /// Options with a specific depth bound and default parallelism.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth,
            ..Self::default()
        }
    }
}

/// Running totals returned by a completed (or cancelled) walk.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkStats {
    /// Files visited.
    pub files: u64,
    /// Directories visited (the root itself is not counted).
    pub dirs: u64,
    /// Sum of visited file sizes.
    pub bytes: u64,
    /// Entries skipped because their metadata or listing could not be read.
    pub errors: u64,
    /// `true` if the walk stopped early due to cancellation.
    pub cancelled: bool,
}

impl WalkStats {
    /// Merge another walk's totals into this one (multi-root scans).
    pub fn merge(&mut self, other: &WalkStats) {
        self.files += other.files;
        self.dirs += other.dirs;
        self.bytes += other.bytes;
        self.errors += other.errors;
        self.cancelled |= other.cancelled;
    }
}
