/// Scan-root discovery — the folders the shell offers as starting points.
///
/// Pure path assembly from the process environment. No shell commands, no
/// platform API calls; paths that do not exist are filtered out.
use serde::Serialize;
use std::env;
use std::path::PathBuf;

/// A named folder offered as a scan root.
#[derive(Debug, Clone, Serialize)]
pub struct CommonFolder {
    pub name: &'static str,
    pub path: PathBuf,
}

/// The user's home directory, if the environment names one.
pub fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

/// The well-known home subfolders that exist on this machine.
pub fn common_folders() -> Vec<CommonFolder> {
    const NAMES: [&str; 6] = [
        "Desktop",
        "Documents",
        "Downloads",
        "Pictures",
        "Videos",
        "Music",
    ];

    let Some(home) = home_dir() else {
        return Vec::new();
    };
    NAMES
        .iter()
        .map(|&name| CommonFolder {
            name,
            path: home.join(name),
        })
        .filter(|folder| folder.path.is_dir())
        .collect()
}

/// Candidate roots for the reclaimable-space scan: the process temp
/// directory plus the usual per-user and system temp locations.
/// Deduplicated, existing directories only.
pub fn temp_roots() -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = vec![env::temp_dir()];
    if let Some(dir) = env::var_os("TEMP") {
        candidates.push(PathBuf::from(dir));
    }
    if let Some(dir) = env::var_os("TMP") {
        candidates.push(PathBuf::from(dir));
    }
    if let Some(home) = home_dir() {
        candidates.push(home.join("AppData").join("Local").join("Temp"));
        candidates.push(home.join(".cache"));
    }
    candidates.push(PathBuf::from("C:\\Windows\\Temp"));
    candidates.push(PathBuf::from("/var/tmp"));

    let mut roots: Vec<PathBuf> = Vec::new();
    for candidate in candidates {
        if candidate.is_dir() && !roots.contains(&candidate) {
            roots.push(candidate);
        }
    }
    roots
}
