/// Analysis modules — categorisation, usage reporting, and duplicate
/// detection over walked trees.

pub mod categories;
pub mod duplicates;
pub mod usage;

pub use categories::{categorise, FileCategory};
pub use duplicates::{find_duplicates, DuplicateGroup, DuplicateScan, MatchMode};
pub use usage::{analyse_usage, CategoryShare, CategoryStats, ScanReport, TOP_LIST_LIMIT};
