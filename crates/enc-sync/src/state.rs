use std::sync::Arc;

/// Synchronization state of one document relative to the debuggee.
///
/// States advance monotonically along a partial order for the lifetime of a
/// debugging session:
///
/// - `Unknown` may become any other state.
/// - `PendingModuleLoad` may stay put or become `OutOfSync`,
///   `MatchesDebuggee`, or `DesignTimeOnly`.
/// - `OutOfSync` may only stay put or become `MatchesDebuggee`.
/// - `MatchesDebuggee` and `DesignTimeOnly` are terminal: once a document
///   is proven byte-identical to the compiled source, or proven irrelevant
///   to compilation, it is never re-checked. Re-checking would waste work
///   and risk flapping under concurrent queries.
///
/// # Examples
///
/// ```
/// use enc_sync::SyncState;
///
/// assert!(SyncState::MatchesDebuggee.is_terminal());
/// assert_eq!(
///     SyncState::OutOfSync.advance(SyncState::PendingModuleLoad),
///     SyncState::OutOfSync,
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncState {
    /// No record for this identity; also returned for identities absent
    /// from the committed snapshot.
    Unknown,
    /// The owning module has not been loaded into the debuggee yet;
    /// re-checked on every query.
    PendingModuleLoad,
    /// Committed text does not match the compiled source; re-checked only
    /// on explicit request.
    OutOfSync,
    /// Committed text is byte-identical to the source the loaded module
    /// was compiled from. Terminal.
    MatchesDebuggee,
    /// The document is not part of any compiled module (path-less, or no
    /// checksum entry recorded). Terminal.
    DesignTimeOnly,
}

impl SyncState {
    /// Returns whether this state never changes again for the session.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::MatchesDebuggee | Self::DesignTimeOnly)
    }

    /// Applies `proposed` if the partial order permits it, otherwise keeps
    /// `self`.
    ///
    /// This clamp is what keeps concurrent reconciliations monotonic: a
    /// stale outcome can never move a document to an "earlier" state.
    #[must_use]
    pub const fn advance(self, proposed: Self) -> Self {
        let allowed = match self {
            Self::Unknown => true,
            Self::PendingModuleLoad => !matches!(proposed, Self::Unknown),
            Self::OutOfSync => matches!(proposed, Self::OutOfSync | Self::MatchesDebuggee),
            Self::MatchesDebuggee | Self::DesignTimeOnly => false,
        };
        if allowed { proposed } else { self }
    }
}

impl std::fmt::Display for SyncState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Unknown => "unknown",
            Self::PendingModuleLoad => "pending module load",
            Self::OutOfSync => "out of sync",
            Self::MatchesDebuggee => "matches debuggee",
            Self::DesignTimeOnly => "design-time only",
        };
        f.write_str(name)
    }
}

/// Result of comparing one document against debug metadata.
///
/// Transient: consumed immediately to compute the next [`SyncState`],
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconciliationOutcome {
    /// The oracle reported the owning module is not loaded.
    MetadataMissingModuleNotLoaded,
    /// The module is loaded but records no checksum for this path; the
    /// file is not part of the compiled set.
    MetadataMissingDesignTimeOnly,
    /// On-disk content hashes to the recorded checksum; carries the
    /// freshly-loaded text, now proven correct.
    ContentMatches(Arc<str>),
    /// On-disk content does not hash to the recorded checksum, or the
    /// comparison could not be performed.
    ContentMismatch,
}

impl ReconciliationOutcome {
    /// The state this outcome maps to, before the monotonicity clamp.
    #[must_use]
    pub const fn target_state(&self) -> SyncState {
        match self {
            Self::MetadataMissingModuleNotLoaded => SyncState::PendingModuleLoad,
            Self::MetadataMissingDesignTimeOnly => SyncState::DesignTimeOnly,
            Self::ContentMatches(_) => SyncState::MatchesDebuggee,
            Self::ContentMismatch => SyncState::OutOfSync,
        }
    }
}
