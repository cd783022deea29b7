//! Packaging error type.

use thiserror::Error;

/// Failure building an archive.
#[derive(Error, Debug)]
pub enum PackageError {
    /// There was nothing to package.
    #[error("no artifacts to package")]
    Empty,

    /// The ZIP writer failed.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Writing entry bytes failed.
    #[error("archive I/O error: {0}")]
    Io(#[from] std::io::Error),
}
