//! Committed-document synchronization engine for live debugging sessions.
//!
//! A debugger that supports live code edits must know, for every editable
//! document, whether its current text is byte-identical to the source that
//! produced the binary module loaded in the debuggee. Applying a patch
//! computed from mismatched source corrupts the running process, so this
//! mapping is correctness-critical.
//!
//! This crate maintains that mapping:
//!
//! - [`SyncState`]: the per-document state machine with monotonic
//!   transitions and terminal states.
//! - [`CommittedSolution`]: the concurrency-safe cache holding the
//!   committed solution snapshot and the state map under one exclusion
//!   domain.
//! - The checksum reconciliation algorithm, which lazily verifies
//!   documents against the checksums recorded in debug metadata, off any
//!   held lock, degrading to a conservative verdict when the binary or its symbols
//!   are unavailable.
//!
//! The editor surface, module/symbol loading, and source diffing live in
//! the host debugging engine, consumed here through the capability traits
//! in [`enc_core`] ([`DebugInfoProvider`](enc_core::DebugInfoProvider),
//! [`SourceLoader`](enc_core::SourceLoader)).
//!
//! # Examples
//!
//! ```no_run
//! use enc_core::{DiskSourceLoader, DocumentId, Solution};
//! use enc_sync::{CommittedSolution, SyncState};
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example(
//! #     solution: Solution,
//! #     oracle: Arc<dyn enc_core::DebugInfoProvider>,
//! # ) -> enc_core::Result<()> {
//! let committed = CommittedSolution::new(solution, oracle, Arc::new(DiskSourceLoader));
//!
//! let cancel = CancellationToken::new();
//! let (document, state) = committed
//!     .query_document_sync(DocumentId::new(1), false, &cancel)
//!     .await?;
//!
//! match state {
//!     SyncState::MatchesDebuggee => {
//!         // `document` is safe to compute a patch against.
//!     }
//!     SyncState::OutOfSync => {
//!         // Ask the user to save/restore the file, then retry.
//!     }
//!     _ => {}
//! }
//! # Ok(())
//! # }
//! ```

mod committed;
mod reconcile;
mod state;

pub use committed::CommittedSolution;
pub use state::{ReconciliationOutcome, SyncState};
