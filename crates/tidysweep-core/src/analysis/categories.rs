/// File categorisation based on file extensions.
///
/// Groups files into broad categories (Documents, Images, Videos, Audio,
/// Archives, Executables, Code, Other) for the usage breakdown. The
/// category tables are process-wide immutable configuration: a fixed,
/// ordered mapping from category to extension set, never mutated at
/// runtime. The first category whose set contains the file's lowercased
/// extension wins; unmatched files fall into `Other`.
use serde::{Deserialize, Serialize};

/// Broad file type categories for the usage breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileCategory {
    Documents,
    Images,
    Videos,
    Audio,
    Archives,
    Executables,
    Code,
    Other,
}

impl FileCategory {
    /// Every category, in the fixed enumeration (and match) order.
    pub const ALL: [FileCategory; 8] = [
        Self::Documents,
        Self::Images,
        Self::Videos,
        Self::Audio,
        Self::Archives,
        Self::Executables,
        Self::Code,
        Self::Other,
    ];

    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Documents => "Documents",
            Self::Images => "Images",
            Self::Videos => "Videos",
            Self::Audio => "Audio",
            Self::Archives => "Archives",
            Self::Executables => "Programs",
            Self::Code => "Code",
            Self::Other => "Other",
        }
    }

    /// Position in the fixed enumeration order, for indexed accumulators.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Ordered category tables. `Other` has no table; it is the fallback.
const CATEGORY_TABLE: &[(FileCategory, &[&str])] = &[
    (
        FileCategory::Documents,
        &[
            "pdf", "doc", "docx", "txt", "rtf", "odt", "xls", "xlsx", "ppt", "pptx", "csv", "md",
            "epub",
        ],
    ),
    (
        FileCategory::Images,
        &[
            "jpg", "jpeg", "png", "gif", "bmp", "svg", "webp", "ico", "tiff", "tif", "psd", "heic",
            "heif",
        ],
    ),
    (
        FileCategory::Videos,
        &[
            "mp4", "avi", "mkv", "mov", "wmv", "flv", "webm", "m4v", "mpg", "mpeg", "3gp",
        ],
    ),
    (
        FileCategory::Audio,
        &["mp3", "wav", "flac", "aac", "ogg", "wma", "m4a", "opus"],
    ),
    (
        FileCategory::Archives,
        &[
            "zip", "rar", "7z", "tar", "gz", "bz2", "xz", "zst", "iso", "cab", "dmg",
        ],
    ),
    (
        FileCategory::Executables,
        &[
            "exe", "msi", "dll", "sys", "bat", "cmd", "ps1", "so", "dylib", "app", "com", "scr",
        ],
    ),
    (
        FileCategory::Code,
        &[
            "rs", "js", "jsx", "ts", "tsx", "py", "java", "c", "cpp", "h", "hpp", "cs", "go", "rb",
            "php", "swift", "kt", "html", "css", "scss", "json", "xml", "yaml", "yml", "toml",
            "sql", "sh",
        ],
    ),
];

/// Categorise a file by the extension after its last `.`.
///
/// Zero-heap-allocation hot path: the extension is lowercased into a
/// fixed-size stack buffer rather than allocating a `String`. Extensions
/// longer than 16 bytes are treated as `Other`, as are names with no
/// extension at all.
pub fn categorise(file_name: &str) -> FileCategory {
    let ext = file_name.rsplit('.').next().unwrap_or("");
    if ext.len() == file_name.len() {
        // No `.` in the name at all.
        return FileCategory::Other;
    }

    let bytes = ext.as_bytes();
    if bytes.is_empty() || bytes.len() > 16 {
        return FileCategory::Other;
    }

    let mut lower = [0u8; 16];
    for (dest, &src) in lower.iter_mut().zip(bytes.iter()) {
        *dest = src.to_ascii_lowercase();
    }
    let lower_str = match std::str::from_utf8(&lower[..bytes.len()]) {
        Ok(s) => s,
        Err(_) => return FileCategory::Other,
    };

    for (category, extensions) in CATEGORY_TABLE {
        if extensions.contains(&lower_str) {
            return *category;
        }
    }
    FileCategory::Other
}
