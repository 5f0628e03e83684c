//! Source content loading from the filesystem.
//!
//! Reconciliation needs the bytes of a source file exactly as they sit on
//! disk right now, so they can be re-hashed with the algorithm recorded in
//! debug metadata and compared against the compiled checksum.
//!
//! # Error Handling
//!
//! Loader errors are returned, not swallowed, here; the reconciliation
//! layer catches them, logs path + reason, and degrades to a conservative
//! "out of sync" verdict. Nothing in this module can fail the caller of a
//! sync query.

use std::path::Path;

use async_trait::async_trait;

use crate::error::{Result, SyncError};
use crate::provider::SourceLoader;

/// Maximum allowed source file size in bytes (10MB).
///
/// Files larger than this are rejected to bound memory use. Source files
/// that take part in a compilation are far smaller in practice.
const MAX_FILE_SIZE: u64 = 10_000_000; // 10MB

/// Large file warning threshold (1MB).
///
/// Files larger than this log a warning, as typical sources are much smaller.
const LARGE_FILE_THRESHOLD: u64 = 1_000_000; // 1MB

/// Production [`SourceLoader`] reading through `tokio::fs`.
///
/// # Examples
///
/// ```no_run
/// use enc_core::{DiskSourceLoader, SourceLoader};
/// use std::path::Path;
///
/// # async fn example() -> enc_core::error::Result<()> {
/// let loader = DiskSourceLoader::default();
/// let bytes = loader.read(Path::new("/src/main.rs")).await?;
/// println!("read {} bytes", bytes.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskSourceLoader;

#[async_trait]
impl SourceLoader for DiskSourceLoader {
    async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        tracing::debug!("loading source from disk: {:?}", path);

        match tokio::fs::metadata(path).await {
            Ok(metadata) => {
                let size = metadata.len();

                if size > MAX_FILE_SIZE {
                    tracing::error!(
                        "source exceeds maximum size: {} bytes (limit: {} bytes)",
                        size,
                        MAX_FILE_SIZE
                    );
                    return Err(SyncError::FileTooLarge {
                        path: path.to_path_buf(),
                        size,
                        limit: MAX_FILE_SIZE,
                    });
                }

                if size > LARGE_FILE_THRESHOLD {
                    tracing::warn!("source is large: {} bytes for {:?}", size, path);
                }
            }
            Err(e) => {
                match e.kind() {
                    std::io::ErrorKind::NotFound => {
                        tracing::debug!("source not found: {:?}", path);
                    }
                    std::io::ErrorKind::PermissionDenied => {
                        tracing::warn!("permission denied: {:?}", path);
                    }
                    _ => {
                        tracing::error!("IO error reading metadata for {:?}: {}", path, e);
                    }
                }
                return Err(SyncError::Io(e));
            }
        }

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            tracing::error!("IO error reading source {:?}: {}", path, e);
            SyncError::Io(e)
        })?;

        tracing::trace!("loaded source: {:?} ({} bytes)", path, bytes.len());
        Ok(bytes)
    }
}
