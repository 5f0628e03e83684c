use std::path::PathBuf;

use thiserror::Error;

/// Core error types for enc-sync.
///
/// Every failure the reconciliation path can hit is an explicit variant,
/// consumed by exhaustive matching at the reconciliation boundary. With the
/// single exception of [`SyncError::Cancelled`], errors are caught there,
/// logged, and downgraded to a conservative "out of sync" verdict rather
/// than propagated to the caller.
///
/// # Examples
///
/// ```
/// use enc_core::error::{Result, SyncError};
/// use std::path::Path;
///
/// fn require_absolute(path: &Path) -> Result<()> {
///     if path.is_absolute() {
///         Ok(())
///     } else {
///         Err(SyncError::RelativePath(path.to_path_buf()))
///     }
/// }
///
/// assert!(require_absolute(Path::new("src/main.rs")).is_err());
/// ```
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("source file too large: {path} is {size} bytes (limit: {limit} bytes)")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        limit: u64,
    },

    #[error("checksum recorded against non-absolute path: {0}")]
    RelativePath(PathBuf),

    #[error("symbol metadata read failed: {0}")]
    SymbolRead(String),

    #[error("matching source is not valid UTF-8: {0}")]
    NonUtf8Source(PathBuf),

    #[error("operation cancelled")]
    Cancelled,
}

/// Convenience type alias for `Result<T, SyncError>`.
///
/// This is the standard `Result` type used throughout the enc-sync codebase.
pub type Result<T> = std::result::Result<T, SyncError>;
