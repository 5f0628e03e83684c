use std::path::Path;

use async_trait::async_trait;

use crate::checksum::ChecksumAlgorithm;
use crate::document::{ModuleId, ProjectId};
use crate::error::Result;

/// What the debug metadata of a loaded module records for a source path.
///
/// Transient lookup result; the sync engine consumes it immediately to
/// decide a document's next synchronization state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChecksumRecord {
    /// The owning module has not been loaded into the debuggee yet.
    ModuleNotLoaded,
    /// The module is loaded but its checksum table has no entry for this
    /// path: the file was not part of the compiled set (designer-generated
    /// or added after compilation).
    NoEntry,
    /// The checksum the source was compiled from, plus the algorithm that
    /// produced it.
    Recorded {
        checksum: Vec<u8>,
        algorithm: ChecksumAlgorithm,
    },
}

/// Checksum oracle over the debuggee's loaded modules and their debug
/// metadata.
///
/// Implemented by the host's module/symbol-loading subsystem. The sync
/// engine treats it as an opaque capability: it never sees binaries or
/// symbol tables, only the answers below.
///
/// # Execution context
///
/// Native symbol readers frequently carry a thread-affinity constraint
/// (single-threaded COM-style apartments and the like). Satisfying that
/// constraint is the implementation's obligation: if the native read must
/// run on a particular thread, the implementation dispatches there and
/// awaits the result. The engine calls these methods from arbitrary tasks
/// and never inspects ambient thread state.
///
/// # Errors
///
/// Failures (missing symbols, corrupt records, native reader exceptions)
/// surface as [`SyncError`](crate::SyncError) values. The engine catches
/// them at the reconciliation boundary and conservatively reports the
/// document out of sync, so an implementation should prefer returning an
/// error over panicking.
#[async_trait]
pub trait DebugInfoProvider: Send + Sync {
    /// Resolves the compilation unit to the binary module it was loaded
    /// as, or `None` when no module for the unit is loaded yet.
    async fn resolve_module(&self, project: ProjectId) -> Result<Option<ModuleId>>;

    /// Looks up the checksum recorded for `path` in the module's debug
    /// metadata.
    async fn checksum_record(&self, module: ModuleId, path: &Path) -> Result<ChecksumRecord>;
}

/// Content loader over the current on-disk state of source files.
///
/// Implemented by the host; [`DiskSourceLoader`](crate::DiskSourceLoader)
/// is the production implementation. Returns raw bytes because checksums
/// in debug metadata are computed over the file's bytes as the compiler
/// read them, not over decoded text.
#[async_trait]
pub trait SourceLoader: Send + Sync {
    /// Reads the current content of `path`.
    async fn read(&self, path: &Path) -> Result<Vec<u8>>;
}
