//! The committed-state cache: one guarded mapping from document identity
//! to synchronization state, plus the committed solution snapshot.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use enc_core::{DebugInfoProvider, Document, DocumentId, Result, Solution, SourceLoader};

use crate::reconcile::reconcile_document;
use crate::state::{ReconciliationOutcome, SyncState};

/// Tracks, for a live debugging session, whether each editable document is
/// byte-identical to the source its loaded module was compiled from.
///
/// Created when a debugging session begins, paired 1:1 with the solution
/// snapshot committed at that moment, and torn down when the session ends.
/// State entries are created on first query and advance monotonically; see
/// [`SyncState`] for the partial order.
///
/// # Concurrency
///
/// A single mutex guards both the committed snapshot and the state map, so
/// a commit atomically replaces the snapshot and bulk-advances states, and
/// per-document transitions are totally ordered. Reconciliation I/O runs
/// with the lock released; on re-acquire the engine double-checks that no
/// concurrent caller advanced the document past the point where this
/// outcome would still be valid, and discards it otherwise ("last writer
/// may lose"). That recheck is what prevents terminal-state flapping when
/// several callers reconcile the same document simultaneously.
///
/// # Examples
///
/// ```no_run
/// use enc_sync::CommittedSolution;
/// use enc_core::{DiskSourceLoader, DocumentId, Solution};
/// use std::sync::Arc;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example(
/// #     solution: Solution,
/// #     oracle: Arc<dyn enc_core::DebugInfoProvider>,
/// # ) -> enc_core::Result<()> {
/// let committed = CommittedSolution::new(solution, oracle, Arc::new(DiskSourceLoader));
///
/// let cancel = CancellationToken::new();
/// let (document, state) = committed
///     .query_document_sync(DocumentId::new(1), false, &cancel)
///     .await?;
/// println!("document is {state}");
/// # Ok(())
/// # }
/// ```
pub struct CommittedSolution {
    debug_info: Arc<dyn DebugInfoProvider>,
    loader: Arc<dyn SourceLoader>,
    inner: Mutex<Inner>,
}

struct Inner {
    /// The solution version currently treated as ground truth.
    solution: Solution,
    /// Per-document synchronization states; entries appear on first query.
    states: HashMap<DocumentId, SyncState>,
}

impl CommittedSolution {
    /// Creates the cache for a new debugging session.
    ///
    /// `solution` is the snapshot in effect when the debuggee was
    /// launched or attached to.
    #[must_use]
    pub fn new(
        solution: Solution,
        debug_info: Arc<dyn DebugInfoProvider>,
        loader: Arc<dyn SourceLoader>,
    ) -> Self {
        Self {
            debug_info,
            loader,
            inner: Mutex::new(Inner {
                solution,
                states: HashMap::new(),
            }),
        }
    }

    /// Answers "does this document match the debuggee?", reconciling
    /// against debug metadata when no usable cached answer exists.
    ///
    /// Returns the committed document alongside [`SyncState::MatchesDebuggee`]
    /// (the text proven safe to compute a patch against), and `None` for
    /// every other state.
    ///
    /// `allow_retry_if_out_of_sync` permits re-reconciliation of a document
    /// previously found [`SyncState::OutOfSync`]; callers pass `true` right
    /// after writing fresh content to disk. Without it, a cached negative
    /// answer is returned as-is, keeping repeated queries on hot paths
    /// (breakpoint hit-checks) free of checksum work. A cached
    /// [`SyncState::PendingModuleLoad`] is always re-checked, since that is
    /// the only way a document progresses once its module loads.
    ///
    /// # Errors
    ///
    /// Only [`SyncError::Cancelled`](enc_core::SyncError::Cancelled):
    /// every other failure is logged and conservatively folded into
    /// [`SyncState::OutOfSync`].
    pub async fn query_document_sync(
        &self,
        id: DocumentId,
        allow_retry_if_out_of_sync: bool,
        cancel: &CancellationToken,
    ) -> Result<(Option<Document>, SyncState)> {
        let (project, path) = {
            let mut inner = self.inner.lock().await;

            let Some(document) = inner.solution.document(&id).cloned() else {
                return Ok((None, SyncState::Unknown));
            };

            // Path-less documents can never be compiled from disk; classify
            // without consulting any external state. The first classification
            // sticks: a document already resolved terminal must not be
            // reclassified even if a later snapshot dropped its path.
            let Some(path) = document.path.clone() else {
                let state = *inner.states.entry(id).or_insert(SyncState::DesignTimeOnly);
                let document = (state == SyncState::MatchesDebuggee).then_some(document);
                return Ok((document, state));
            };

            match inner.states.get(&id).copied() {
                Some(SyncState::MatchesDebuggee) => {
                    return Ok((Some(document), SyncState::MatchesDebuggee));
                }
                Some(SyncState::DesignTimeOnly) => {
                    return Ok((None, SyncState::DesignTimeOnly));
                }
                Some(SyncState::OutOfSync) if !allow_retry_if_out_of_sync => {
                    return Ok((None, SyncState::OutOfSync));
                }
                _ => {}
            }

            (document.project, path)
        };

        // Reconciliation performs disk and symbol-table I/O; it must not
        // serialize other sync queries behind that latency.
        let outcome = reconcile_document(
            self.debug_info.as_ref(),
            self.loader.as_ref(),
            project,
            &path,
            cancel,
        )
        .await?;

        let mut inner = self.inner.lock().await;
        Ok(Self::apply_outcome(&mut inner, id, &outcome))
    }

    /// Applies a reconciliation outcome computed off-lock, unless a
    /// concurrent caller already advanced the document past the point
    /// where it would still be valid.
    fn apply_outcome(
        inner: &mut Inner,
        id: DocumentId,
        outcome: &ReconciliationOutcome,
    ) -> (Option<Document>, SyncState) {
        // The committed snapshot may have been replaced while unlocked.
        if !inner.solution.contains(&id) {
            return (None, SyncState::Unknown);
        }

        let previous = inner.states.get(&id).copied();
        match previous {
            None | Some(SyncState::Unknown | SyncState::OutOfSync | SyncState::PendingModuleLoad) => {}
            Some(current) => {
                // Lost the race to a caller that resolved the document; its
                // answer stands.
                let document = (current == SyncState::MatchesDebuggee)
                    .then(|| inner.solution.document(&id).cloned())
                    .flatten();
                return (document, current);
            }
        }

        let previous = previous.unwrap_or(SyncState::Unknown);
        let next = previous.advance(outcome.target_state());
        inner.states.insert(id, next);

        if next == SyncState::MatchesDebuggee {
            if let ReconciliationOutcome::ContentMatches(text) = outcome {
                // The freshly-read text is proven correct; it may differ
                // from the committed text (unsaved edits at session start).
                let differs = inner
                    .solution
                    .document(&id)
                    .is_some_and(|committed| committed.text.as_ref() != text.as_ref());
                if differs {
                    tracing::debug!(
                        "substituting on-disk text for {} into committed snapshot",
                        id
                    );
                    inner.solution = inner.solution.with_document_text(id, Arc::clone(text));
                }
                return (inner.solution.document(&id).cloned(), next);
            }
        }

        (None, next)
    }

    /// Commits the snapshot produced by applying edits to the debuggee.
    ///
    /// Every document in `updated` is forced to
    /// [`SyncState::MatchesDebuggee`]: the cache just learned ground truth
    /// from a completed write, so no re-read and re-hash round-trip is
    /// needed. The stored snapshot becomes `new_solution`. Both effects
    /// happen under one critical section; no partial update is observable.
    ///
    /// # Panics
    ///
    /// If a document in `updated` is already
    /// [`SyncState::DesignTimeOnly`]. Design-time-only documents must never
    /// be chosen for debuggee edits; this is a bug in the edit-application
    /// layer, not a recoverable condition.
    pub async fn commit(&self, new_solution: Solution, updated: &[DocumentId]) {
        let mut inner = self.inner.lock().await;

        for id in updated {
            let previous = inner.states.get(id).copied();
            assert!(
                previous != Some(SyncState::DesignTimeOnly),
                "attempted to commit design-time-only document {id}"
            );
            inner.states.insert(*id, SyncState::MatchesDebuggee);
        }

        inner.solution = new_solution;
    }

    /// Pure identity comparison against the stored snapshot.
    ///
    /// Lets callers short-circuit expensive recomputation when nothing has
    /// been committed since they last looked.
    pub async fn has_snapshot_changed(&self, candidate: &Solution) -> bool {
        let inner = self.inner.lock().await;
        !Solution::same_snapshot(&inner.solution, candidate)
    }

    /// The solution snapshot currently treated as ground truth.
    pub async fn committed_solution(&self) -> Solution {
        self.inner.lock().await.solution.clone()
    }

    /// The recorded state for a document, if it has been queried before.
    pub async fn document_state(&self, id: &DocumentId) -> Option<SyncState> {
        self.inner.lock().await.states.get(id).copied()
    }
}

impl std::fmt::Debug for CommittedSolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommittedSolution").finish_non_exhaustive()
    }
}
