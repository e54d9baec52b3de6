/// Crate error type.
///
/// Only caller-level hard failures travel through this enum. Recoverable
/// conditions (per-entry I/O errors during a walk, missing roots, unsafe
/// deletion targets, checksum failures) degrade in place per the scanning
/// contract and never surface here.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a regular file: {0}")]
    NotAFile(PathBuf),
}
