/// Arena-backed directory tree with O(n) bottom-up size aggregation.
///
/// Only directories live in the arena. Files are folded into their parent
/// directory's totals as the walk streams past them, which keeps memory
/// proportional to the directory count rather than the file count.
/// Relationships use `NodeIndex` (a thin `u32` wrapper) rather than heap
/// pointers, giving cache-friendly traversal without recursion.
use compact_str::CompactString;
use std::path::PathBuf;

/// Lightweight index into the arena `Vec<DirNode>`.
///
/// `u32` keeps nodes small — supports ~4 billion directories, far beyond
/// any real filesystem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    /// Create a new `NodeIndex` from a `usize`.
    #[inline]
    pub fn new(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize, "NodeIndex overflow");
        Self(index as u32)
    }

    /// Return the index as a `usize` for Vec indexing.
    #[inline]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

/// A single directory in the arena.
///
/// During the walk, `size_bytes` and `file_count` hold only the direct
/// (non-recursive) totals; [`DirTree::aggregate`] rolls them up into
/// subtree totals.
#[derive(Debug, Clone)]
pub struct DirNode {
    /// Directory name only. The root node's name is the full root path so
    /// that [`DirTree::full_path`] can reconstruct absolute paths.
    pub name: CompactString,

    /// Index of the parent directory. `None` for the scan root.
    pub parent: Option<NodeIndex>,

    /// Direct file bytes during the walk; subtree bytes after aggregation.
    pub size_bytes: u64,

    /// Direct file count during the walk; subtree file count after
    /// aggregation.
    pub file_count: u64,

    /// Subtree directory count below this node. Zero until aggregation.
    pub folder_count: u64,
}

/// The directory tree accumulated by a usage scan.
#[derive(Debug, Clone)]
pub struct DirTree {
    /// Arena: every directory in a flat, cache-friendly vector.
    /// Index 0 is always the scan root.
    nodes: Vec<DirNode>,
}

impl DirTree {
    /// Create a tree containing only the scan root.
    ///
    /// `root_name` should be the full root path string, since descendant
    /// paths are reconstructed by joining names up to the root.
    pub fn new(root_name: CompactString) -> Self {
        Self {
            nodes: vec![DirNode {
                name: root_name,
                parent: None,
                size_bytes: 0,
                file_count: 0,
                folder_count: 0,
            }],
        }
    }

    /// Index of the scan root.
    #[inline]
    pub fn root(&self) -> NodeIndex {
        NodeIndex(0)
    }

    /// Append a directory under `parent` and return its index.
    pub fn add_dir(&mut self, name: CompactString, parent: NodeIndex) -> NodeIndex {
        let idx = NodeIndex::new(self.nodes.len());
        self.nodes.push(DirNode {
            name,
            parent: Some(parent),
            size_bytes: 0,
            file_count: 0,
            folder_count: 0,
        });
        idx
    }

    /// Fold a file's size into its containing directory's direct totals.
    pub fn record_file(&mut self, parent: NodeIndex, size_bytes: u64) {
        let node = &mut self.nodes[parent.idx()];
        node.size_bytes += size_bytes;
        node.file_count += 1;
    }

    /// Roll direct totals up into subtree totals in one bottom-up pass.
    ///
    /// Directories are always appended after their parent (walks yield a
    /// directory before its contents), so iterating the arena in *reverse*
    /// processes every child before its parent — O(n), no recursion, no
    /// stack. Call exactly once, after the walk completes.
    pub fn aggregate(&mut self) {
        for i in (1..self.nodes.len()).rev() {
            let (size, files, dirs) = {
                let node = &self.nodes[i];
                (node.size_bytes, node.file_count, node.folder_count)
            };
            if let Some(parent) = self.nodes[i].parent {
                let p = &mut self.nodes[parent.idx()];
                p.size_bytes += size;
                p.file_count += files;
                // The child itself counts as one folder for its parent.
                p.folder_count += dirs + 1;
            }
        }
    }

    /// Reconstruct the full path for a node by walking up to the root.
    pub fn full_path(&self, index: NodeIndex) -> PathBuf {
        let mut segments = Vec::new();
        let mut current = Some(index);
        while let Some(idx) = current {
            segments.push(self.nodes[idx.idx()].name.as_str());
            current = self.nodes[idx.idx()].parent;
        }
        // The last segment is the root's full path; join the rest onto it.
        let mut path = PathBuf::from(segments.pop().unwrap_or_default());
        for segment in segments.into_iter().rev() {
            path.push(segment);
        }
        path
    }

    /// Indices of the `n` largest directories by subtree size, descending,
    /// excluding the root itself and any directory with zero subtree size.
    ///
    /// Uses `select_nth_unstable_by` (O(n) average) to bring the top-n
    /// elements to the front, then sorts only those n — significantly
    /// faster than a full sort when the arena is large.
    pub fn largest_dirs(&self, n: usize) -> Vec<NodeIndex> {
        if n == 0 {
            return Vec::new();
        }

        let mut dir_indices: Vec<NodeIndex> = (1..self.nodes.len())
            .filter(|&i| self.nodes[i].size_bytes > 0)
            .map(NodeIndex::new)
            .collect();

        if dir_indices.len() > n {
            let pivot = n - 1;
            dir_indices.select_nth_unstable_by(pivot, |a, b| {
                self.nodes[b.idx()]
                    .size_bytes
                    .cmp(&self.nodes[a.idx()].size_bytes)
            });
            dir_indices.truncate(n);
        }
        dir_indices.sort_unstable_by(|a, b| {
            self.nodes[b.idx()]
                .size_bytes
                .cmp(&self.nodes[a.idx()].size_bytes)
        });
        dir_indices
    }

    /// Get the node at the given index.
    #[inline]
    pub fn node(&self, index: NodeIndex) -> &DirNode {
        &self.nodes[index.idx()]
    }

    /// Total number of directories in the tree (including the root).
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree holds only the root.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }
}
