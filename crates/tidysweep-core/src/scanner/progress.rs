/// Scan progress reporting — lightweight messages pushed from a running
/// operation to the caller via a bounded crossbeam channel.
///
/// Both the tree walker and the duplicate finder's hashing pass emit the
/// same message shape, so a consumer can drive one progress display for
/// every long-running operation.
use std::time::Duration;

/// Progress updates pushed during a scan.
///
/// The actual results are in the operation's return value; these messages
/// carry only running counters and status flags.
#[derive(Debug, Clone)]
pub enum ScanProgress {
    /// Periodic update with running totals.
    Update {
        files_scanned: u64,
        folders_scanned: u64,
        bytes_scanned: u64,
        current_path: String,
    },
    /// A non-fatal error (e.g. permission denied on one entry). The entry
    /// was skipped; the operation continues.
    Error { path: String, message: String },
    /// The operation ran to completion.
    Complete {
        duration: Duration,
        error_count: u64,
    },
    /// The operation stopped early because the caller cancelled it.
    Cancelled,
}
