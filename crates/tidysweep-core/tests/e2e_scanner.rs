/// End-to-end walker integration tests.
///
/// These exercise the real `scanner::walk` against a real temporary
/// filesystem, verifying enumeration, depth bounding, protected-path
/// pruning, progress reporting, and cancellation with zero mocking.
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tidysweep_core::scanner::{
    progress_channel, walk, CancelFlag, ScanProgress, WalkEntry, WalkOptions,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Create a reproducible directory tree for scanner tests:
///
/// ```text
/// root/
///   alpha/
///     a.txt   (100 bytes)
///     b.rs    (200 bytes)
///   beta/
///     c.png   (300 bytes)
///   d.zip     (400 bytes)
/// ```
///
/// Total file bytes: 1 000.
fn build_test_tree(root: &Path) {
    let alpha = root.join("alpha");
    let beta = root.join("beta");
    fs::create_dir_all(&alpha).unwrap();
    fs::create_dir_all(&beta).unwrap();

    write_bytes(&alpha.join("a.txt"), 100);
    write_bytes(&alpha.join("b.rs"), 200);
    write_bytes(&beta.join("c.png"), 300);
    write_bytes(&root.join("d.zip"), 400);
}

fn write_bytes(path: &Path, n: usize) {
    let mut f = fs::File::create(path).unwrap();
    f.write_all(&vec![0u8; n]).unwrap();
}

/// Walk `root` collecting visited file names and dir paths.
fn collect(root: &Path, opts: &WalkOptions) -> (Vec<String>, Vec<PathBuf>) {
    let mut files = Vec::new();
    let mut dirs = Vec::new();
    walk(root, opts, None, &CancelFlag::new(), |entry| match entry {
        WalkEntry::File(record) => files.push(record.name.to_string()),
        WalkEntry::Dir { path } => dirs.push(path),
    });
    (files, dirs)
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// The walker must visit every file and directory and sum sizes exactly.
#[test]
fn walk_discovers_all_entries() {
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    build_test_tree(tmp.path());

    let mut file_count = 0u64;
    let stats = walk(
        tmp.path(),
        &WalkOptions::default(),
        None,
        &CancelFlag::new(),
        |entry| {
            if matches!(entry, WalkEntry::File(_)) {
                file_count += 1;
            }
        },
    );

    assert_eq!(stats.files, 4);
    assert_eq!(stats.dirs, 2);
    assert_eq!(stats.bytes, 1_000);
    assert_eq!(stats.errors, 0);
    assert!(!stats.cancelled);
    assert_eq!(file_count, stats.files);
}

/// `max_depth = 1` visits only the root's direct children; deeper levels
/// appear one per additional depth unit.
#[test]
fn walk_honours_depth_bound() {
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let d1 = tmp.path().join("d1");
    let d2 = d1.join("d2");
    fs::create_dir_all(&d2).unwrap();
    write_bytes(&tmp.path().join("top.txt"), 10);
    write_bytes(&d1.join("mid.txt"), 20);
    write_bytes(&d2.join("deep.txt"), 30);

    let (files, dirs) = collect(tmp.path(), &WalkOptions::with_max_depth(1));
    assert_eq!(files, vec!["top.txt".to_string()]);
    assert_eq!(dirs.len(), 1, "d1 is listed but not descended");

    let (mut files, _) = collect(tmp.path(), &WalkOptions::with_max_depth(2));
    files.sort();
    assert_eq!(files, vec!["mid.txt".to_string(), "top.txt".to_string()]);

    // Any bound at or beyond the tree's actual depth is equivalent.
    let (mut all_3, _) = collect(tmp.path(), &WalkOptions::with_max_depth(3));
    let (mut all_9, _) = collect(tmp.path(), &WalkOptions::with_max_depth(9));
    all_3.sort();
    all_9.sort();
    assert_eq!(all_3.len(), 3);
    assert_eq!(all_3, all_9);
}

/// Nothing inside a protected subtree may ever be visited.
#[test]
fn walk_skips_protected_subtrees() {
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let git = tmp.path().join(".git").join("objects");
    fs::create_dir_all(&git).unwrap();
    write_bytes(&git.join("blob.bin"), 512);
    let src = tmp.path().join("src");
    fs::create_dir_all(&src).unwrap();
    write_bytes(&src.join("main.rs"), 64);

    let (files, dirs) = collect(tmp.path(), &WalkOptions::default());
    assert_eq!(files, vec!["main.rs".to_string()]);
    assert!(
        dirs.iter().all(|d| !d.to_string_lossy().contains(".git")),
        "protected directories must not be yielded: {dirs:?}"
    );
}

/// A protected root returns zeroed stats without visiting anything.
#[test]
fn walk_refuses_protected_root() {
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let git = tmp.path().join(".git");
    fs::create_dir_all(&git).unwrap();
    write_bytes(&git.join("config"), 128);

    let stats = walk(
        &git,
        &WalkOptions::default(),
        None,
        &CancelFlag::new(),
        |_| panic!("no entry may be visited under a protected root"),
    );
    assert_eq!(stats.files, 0);
    assert_eq!(stats.bytes, 0);
}

/// Missing roots and file roots degrade to zeroed stats, never errors.
#[test]
fn walk_degrades_on_bad_roots() {
    let tmp = tempfile::tempdir().expect("failed to create temp dir");

    let missing = tmp.path().join("does-not-exist");
    let stats = walk(
        &missing,
        &WalkOptions::default(),
        None,
        &CancelFlag::new(),
        |_| {},
    );
    assert_eq!(stats.files + stats.dirs + stats.errors, 0);

    let file_root = tmp.path().join("plain.txt");
    write_bytes(&file_root, 10);
    let stats = walk(
        &file_root,
        &WalkOptions::default(),
        None,
        &CancelFlag::new(),
        |_| {},
    );
    assert_eq!(stats.files + stats.dirs, 0);
}

/// A pre-cancelled flag stops the walk at the first entry boundary.
#[test]
fn walk_stops_on_cancellation() {
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    build_test_tree(tmp.path());

    let cancel = CancelFlag::new();
    cancel.cancel();
    let stats = walk(tmp.path(), &WalkOptions::default(), None, &cancel, |_| {
        panic!("cancelled walk must not deliver entries")
    });
    assert!(stats.cancelled);
    assert_eq!(stats.files, 0);
}

/// Progress updates must arrive with increasing counters and real paths.
#[test]
fn walk_reports_progress() {
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    for i in 0..20 {
        write_bytes(&tmp.path().join(format!("file{i:02}.bin")), 64);
    }

    let (tx, rx) = progress_channel();
    let stats = walk(
        tmp.path(),
        &WalkOptions::default(),
        Some(&tx),
        &CancelFlag::new(),
        |_| {},
    );
    drop(tx);

    let mut last_files = 0u64;
    let mut saw_update = false;
    while let Ok(message) = rx.try_recv() {
        if let ScanProgress::Update { files_scanned, .. } = message {
            saw_update = true;
            assert!(files_scanned >= last_files, "counters must not regress");
            last_files = files_scanned;
        }
    }
    assert!(saw_update, "at least one Update must be pushed");
    assert_eq!(last_files, stats.files);
}

/// Symlinks are neither followed nor recorded.
#[cfg(unix)]
#[test]
fn walk_skips_symlinks() {
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    write_bytes(&tmp.path().join("real.bin"), 100);
    std::os::unix::fs::symlink(tmp.path().join("real.bin"), tmp.path().join("link.bin")).unwrap();

    let (files, _) = collect(tmp.path(), &WalkOptions::default());
    assert_eq!(files, vec!["real.bin".to_string()]);
}
