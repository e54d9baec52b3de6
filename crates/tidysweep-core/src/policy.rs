/// Path policy — static deny/allow tables gating scanning and deletion.
///
/// Both predicates are pure substring checks over the normalised, lowercased
/// path. Deliberately coarse: the deny-list must err on the side of refusing
/// to touch system locations, and the allow-list only admits locations that
/// are transient by convention.
use std::path::Path;

/// Locations that are never descended into and never deleted, regardless of
/// caller intent: OS system directories, recycle-bin equivalents,
/// package-manager metadata, and version-control internals.
const PROTECTED_PATHS: &[&str] = &[
    "c:\\windows",
    "c:\\program files",
    "c:\\program files (x86)",
    "c:\\programdata\\microsoft",
    "system volume information",
    "$recycle.bin",
    "node_modules",
    ".git",
];

/// Substrings marking a path as transient enough for the cleaner to delete.
/// Narrower than "not protected": a path must positively opt in.
const SAFE_DELETE_MARKERS: &[&str] = &["temp", "tmp", "cache"];

fn normalise(path: &Path) -> String {
    path.to_string_lossy().to_lowercase()
}

/// A protected path is excluded from both scanning and deletion.
pub fn is_protected(path: &Path) -> bool {
    let normalised = normalise(path);
    PROTECTED_PATHS.iter().any(|p| normalised.contains(p))
}

/// Coarse safety net for the cleaner: only paths containing a known
/// transient-directory marker may be deleted. The duplicate finder does not
/// use this gate; it relies on explicit selection plus dry-run instead.
pub fn is_safe_to_delete(path: &Path) -> bool {
    let normalised = normalise(path);
    SAFE_DELETE_MARKERS.iter().any(|m| normalised.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn protected_matches_vcs_and_package_dirs() {
        assert!(is_protected(&PathBuf::from("/home/user/project/.git/config")));
        assert!(is_protected(&PathBuf::from("/srv/app/node_modules/lodash")));
        assert!(is_protected(&PathBuf::from("C:\\Windows\\System32")));
        assert!(is_protected(&PathBuf::from("D:\\$Recycle.Bin\\S-1-5-21")));
    }

    #[test]
    fn protected_is_case_insensitive() {
        assert!(is_protected(&PathBuf::from("C:\\WINDOWS\\Temp")));
        assert!(is_protected(&PathBuf::from("/data/NODE_MODULES/pkg")));
    }

    #[test]
    fn ordinary_user_paths_are_not_protected() {
        assert!(!is_protected(&PathBuf::from("/home/user/Documents")));
        assert!(!is_protected(&PathBuf::from("C:\\Users\\Demo\\Pictures")));
    }

    #[test]
    fn safe_requires_a_transient_marker() {
        assert!(is_safe_to_delete(&PathBuf::from("/tmp/build-artifacts")));
        assert!(is_safe_to_delete(&PathBuf::from(
            "C:\\Users\\Demo\\AppData\\Local\\Temp\\file.tmp"
        )));
        assert!(is_safe_to_delete(&PathBuf::from(
            "/home/user/.cache/thumbnails"
        )));
        assert!(!is_safe_to_delete(&PathBuf::from(
            "/home/user/Documents/report.pdf"
        )));
    }

    #[test]
    fn protected_and_safe_can_overlap() {
        // The deletion gate must check is_protected first; the policy layer
        // itself reports both facts independently.
        let path = PathBuf::from("C:\\Windows\\Temp\\scratch");
        assert!(is_protected(&path));
        assert!(is_safe_to_delete(&path));
    }
}
