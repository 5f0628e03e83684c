//! Checksum reconciliation against debug metadata.
//!
//! Decides how one document compares to the source its loaded module was
//! compiled from. Runs entirely outside the cache's critical section
//! because it performs I/O: a symbol-table lookup through the
//! [`DebugInfoProvider`] and, when a checksum is recorded, a disk read
//! through the [`SourceLoader`].
//!
//! # Error Handling
//!
//! Reconciliation must never fail the caller of a sync query. Every error
//! except cancellation is caught here, logged with the path and reason,
//! and degraded to [`ReconciliationOutcome::ContentMismatch`] - the worst
//! case is that a document is conservatively reported out of sync.
//! Cancellation is the exception: it propagates, and it aborts before the
//! cache's critical section is entered, so a cancelled query never leaves
//! the state map partially updated.

use std::future::Future;
use std::path::Path;

use tokio_util::sync::CancellationToken;

use enc_core::{ChecksumRecord, DebugInfoProvider, ProjectId, Result, SourceLoader, SyncError};

use crate::state::ReconciliationOutcome;

/// Compares the document at `path` against the checksum its owning
/// module's debug metadata records for it.
///
/// Infallible except for cancellation; see the module docs.
pub(crate) async fn reconcile_document(
    debug_info: &dyn DebugInfoProvider,
    loader: &dyn SourceLoader,
    project: ProjectId,
    path: &Path,
    cancel: &CancellationToken,
) -> Result<ReconciliationOutcome> {
    match try_reconcile(debug_info, loader, project, path, cancel).await {
        Ok(outcome) => Ok(outcome),
        Err(SyncError::Cancelled) => Err(SyncError::Cancelled),
        Err(e) => {
            tracing::warn!(
                "reconciliation failed for {:?}: {}; reporting document out of sync",
                path,
                e
            );
            Ok(ReconciliationOutcome::ContentMismatch)
        }
    }
}

async fn try_reconcile(
    debug_info: &dyn DebugInfoProvider,
    loader: &dyn SourceLoader,
    project: ProjectId,
    path: &Path,
    cancel: &CancellationToken,
) -> Result<ReconciliationOutcome> {
    if cancel.is_cancelled() {
        return Err(SyncError::Cancelled);
    }

    let Some(module) = with_cancellation(cancel, debug_info.resolve_module(project)).await?? else {
        tracing::debug!("no module loaded for {}; sync pending", project);
        return Ok(ReconciliationOutcome::MetadataMissingModuleNotLoaded);
    };

    let record = with_cancellation(cancel, debug_info.checksum_record(module, path)).await??;
    let (checksum, algorithm) = match record {
        ChecksumRecord::ModuleNotLoaded => {
            tracing::debug!("module {} not loaded for {:?}; sync pending", module, path);
            return Ok(ReconciliationOutcome::MetadataMissingModuleNotLoaded);
        }
        ChecksumRecord::NoEntry => {
            tracing::debug!(
                "module {} records no checksum for {:?}; design-time only",
                module,
                path
            );
            return Ok(ReconciliationOutcome::MetadataMissingDesignTimeOnly);
        }
        ChecksumRecord::Recorded {
            checksum,
            algorithm,
        } => (checksum, algorithm),
    };

    // A relative path cannot be safely re-read and re-hashed.
    if !path.is_absolute() {
        return Err(SyncError::RelativePath(path.to_path_buf()));
    }

    let bytes = with_cancellation(cancel, loader.read(path)).await??;
    let computed = algorithm.digest(&bytes);

    if computed != checksum {
        tracing::debug!(
            "checksum mismatch for {:?} ({}): disk content differs from compiled source",
            path,
            algorithm
        );
        return Ok(ReconciliationOutcome::ContentMismatch);
    }

    let text = String::from_utf8(bytes)
        .map_err(|_| SyncError::NonUtf8Source(path.to_path_buf()))?;

    tracing::debug!("checksum match for {:?} ({})", path, algorithm);
    Ok(ReconciliationOutcome::ContentMatches(text.into()))
}

/// Awaits `fut`, aborting with [`SyncError::Cancelled`] if the token fires
/// first.
async fn with_cancellation<F, T>(cancel: &CancellationToken, fut: F) -> Result<T>
where
    F: Future<Output = T>,
{
    tokio::select! {
        () = cancel.cancelled() => Err(SyncError::Cancelled),
        out = fut => Ok(out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use enc_core::{ChecksumAlgorithm, ModuleId};
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::NamedTempFile;

    struct FixedOracle {
        module: Option<ModuleId>,
        record: ChecksumRecord,
        lookups: AtomicUsize,
    }

    impl FixedOracle {
        fn recorded(checksum: Vec<u8>, algorithm: ChecksumAlgorithm) -> Self {
            Self {
                module: Some(ModuleId::new(1)),
                record: ChecksumRecord::Recorded {
                    checksum,
                    algorithm,
                },
                lookups: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl DebugInfoProvider for FixedOracle {
        async fn resolve_module(&self, _project: ProjectId) -> Result<Option<ModuleId>> {
            Ok(self.module)
        }

        async fn checksum_record(
            &self,
            _module: ModuleId,
            _path: &Path,
        ) -> Result<ChecksumRecord> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(self.record.clone())
        }
    }

    struct FailingOracle;

    #[async_trait]
    impl DebugInfoProvider for FailingOracle {
        async fn resolve_module(&self, _project: ProjectId) -> Result<Option<ModuleId>> {
            Err(SyncError::SymbolRead("native reader fault".into()))
        }

        async fn checksum_record(
            &self,
            _module: ModuleId,
            _path: &Path,
        ) -> Result<ChecksumRecord> {
            unreachable!("resolve_module already failed")
        }
    }

    struct BytesLoader(Vec<u8>);

    #[async_trait]
    impl SourceLoader for BytesLoader {
        async fn read(&self, _path: &Path) -> Result<Vec<u8>> {
            Ok(self.0.clone())
        }
    }

    fn token() -> CancellationToken {
        CancellationToken::new()
    }

    #[tokio::test]
    async fn test_no_module_resolves_to_pending() {
        let oracle = FixedOracle {
            module: None,
            record: ChecksumRecord::NoEntry,
            lookups: AtomicUsize::new(0),
        };
        let outcome = reconcile_document(
            &oracle,
            &BytesLoader(vec![]),
            ProjectId::new(1),
            Path::new("/src/a.rs"),
            &token(),
        )
        .await
        .unwrap();

        assert_eq!(outcome, ReconciliationOutcome::MetadataMissingModuleNotLoaded);
        assert_eq!(oracle.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_no_entry_resolves_to_design_time_only() {
        let oracle = FixedOracle {
            module: Some(ModuleId::new(1)),
            record: ChecksumRecord::NoEntry,
            lookups: AtomicUsize::new(0),
        };
        let outcome = reconcile_document(
            &oracle,
            &BytesLoader(vec![]),
            ProjectId::new(1),
            Path::new("/src/a.Designer.rs"),
            &token(),
        )
        .await
        .unwrap();

        assert_eq!(outcome, ReconciliationOutcome::MetadataMissingDesignTimeOnly);
    }

    #[tokio::test]
    async fn test_matching_checksum_yields_loaded_text() {
        let content = b"fn main() {}".to_vec();
        let checksum = ChecksumAlgorithm::Sha256.digest(&content);
        let oracle = FixedOracle::recorded(checksum, ChecksumAlgorithm::Sha256);

        let outcome = reconcile_document(
            &oracle,
            &BytesLoader(content),
            ProjectId::new(1),
            Path::new("/src/main.rs"),
            &token(),
        )
        .await
        .unwrap();

        assert_eq!(
            outcome,
            ReconciliationOutcome::ContentMatches("fn main() {}".into())
        );
    }

    #[tokio::test]
    async fn test_mismatched_checksum() {
        let checksum = ChecksumAlgorithm::Sha256.digest(b"compiled text");
        let oracle = FixedOracle::recorded(checksum, ChecksumAlgorithm::Sha256);

        let outcome = reconcile_document(
            &oracle,
            &BytesLoader(b"edited text".to_vec()),
            ProjectId::new(1),
            Path::new("/src/main.rs"),
            &token(),
        )
        .await
        .unwrap();

        assert_eq!(outcome, ReconciliationOutcome::ContentMismatch);
    }

    #[tokio::test]
    async fn test_recorded_algorithm_is_used() {
        // Oracle says SHA-1; hashing the same bytes with SHA-256 would not
        // match the recorded digest.
        let content = b"compiled with sha1".to_vec();
        let checksum = ChecksumAlgorithm::Sha1.digest(&content);
        let oracle = FixedOracle::recorded(checksum, ChecksumAlgorithm::Sha1);

        let outcome = reconcile_document(
            &oracle,
            &BytesLoader(content),
            ProjectId::new(1),
            Path::new("/src/main.rs"),
            &token(),
        )
        .await
        .unwrap();

        assert!(matches!(outcome, ReconciliationOutcome::ContentMatches(_)));
    }

    #[tokio::test]
    async fn test_relative_path_degrades_to_mismatch() {
        let checksum = ChecksumAlgorithm::Sha256.digest(b"anything");
        let oracle = FixedOracle::recorded(checksum, ChecksumAlgorithm::Sha256);

        let outcome = reconcile_document(
            &oracle,
            &BytesLoader(b"anything".to_vec()),
            ProjectId::new(1),
            Path::new("src/relative.rs"),
            &token(),
        )
        .await
        .unwrap();

        assert_eq!(outcome, ReconciliationOutcome::ContentMismatch);
    }

    #[tokio::test]
    async fn test_oracle_failure_degrades_to_mismatch() {
        let outcome = reconcile_document(
            &FailingOracle,
            &BytesLoader(vec![]),
            ProjectId::new(1),
            Path::new("/src/main.rs"),
            &token(),
        )
        .await
        .unwrap();

        assert_eq!(outcome, ReconciliationOutcome::ContentMismatch);
    }

    #[tokio::test]
    async fn test_non_utf8_match_degrades_to_mismatch() {
        let content = vec![0xFF, 0xFE, 0xFD];
        let checksum = ChecksumAlgorithm::Sha256.digest(&content);
        let oracle = FixedOracle::recorded(checksum, ChecksumAlgorithm::Sha256);

        let outcome = reconcile_document(
            &oracle,
            &BytesLoader(content),
            ProjectId::new(1),
            Path::new("/src/binary.rs"),
            &token(),
        )
        .await
        .unwrap();

        assert_eq!(outcome, ReconciliationOutcome::ContentMismatch);
    }

    #[tokio::test]
    async fn test_disk_read_failure_degrades_to_mismatch() {
        let checksum = ChecksumAlgorithm::Sha256.digest(b"anything");
        let oracle = FixedOracle::recorded(checksum, ChecksumAlgorithm::Sha256);

        let outcome = reconcile_document(
            &oracle,
            &enc_core::DiskSourceLoader,
            ProjectId::new(1),
            Path::new("/nonexistent/vanished.rs"),
            &token(),
        )
        .await
        .unwrap();

        assert_eq!(outcome, ReconciliationOutcome::ContentMismatch);
    }

    #[tokio::test]
    async fn test_pre_cancelled_token_propagates() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let oracle = FixedOracle::recorded(vec![0; 32], ChecksumAlgorithm::Sha256);
        let result = reconcile_document(
            &oracle,
            &BytesLoader(vec![]),
            ProjectId::new(1),
            Path::new("/src/main.rs"),
            &cancel,
        )
        .await;

        assert!(matches!(result, Err(SyncError::Cancelled)));
    }

    #[tokio::test]
    async fn test_disk_loader_end_to_end_match() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"let x = 1;").unwrap();
        temp_file.flush().unwrap();

        let checksum = ChecksumAlgorithm::Sha256.digest(b"let x = 1;");
        let oracle = FixedOracle::recorded(checksum, ChecksumAlgorithm::Sha256);

        let outcome = reconcile_document(
            &oracle,
            &enc_core::DiskSourceLoader,
            ProjectId::new(1),
            temp_file.path(),
            &token(),
        )
        .await
        .unwrap();

        assert_eq!(
            outcome,
            ReconciliationOutcome::ContentMatches("let x = 1;".into())
        );
    }
}
