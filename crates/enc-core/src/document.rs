use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Opaque identifier for a document within a solution snapshot.
///
/// Stable across snapshot versions for as long as the document is not
/// removed. The host debugging engine assigns the underlying value; the
/// sync engine only ever compares and hashes it.
///
/// # Examples
///
/// ```
/// use enc_core::DocumentId;
///
/// let a = DocumentId::new(1);
/// let b = DocumentId::new(1);
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(u64);

impl DocumentId {
    /// Creates a document identifier from a host-assigned value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "doc#{}", self.0)
    }
}

/// Opaque identifier for the compilation unit that owns a document.
///
/// The debug-info provider resolves this to the loaded binary module the
/// unit was compiled into, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectId(u64);

impl ProjectId {
    /// Creates a project identifier from a host-assigned value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "proj#{}", self.0)
    }
}

/// Opaque identifier for a binary module loaded into the debuggee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(u64);

impl ModuleId {
    /// Creates a module identifier from a host-assigned value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for ModuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "mod#{}", self.0)
    }
}

/// A single editable source document within a solution snapshot.
///
/// Documents are immutable; replacing a document's text produces a new
/// [`Solution`](crate::Solution) version. Text is shared via `Arc<str>`,
/// so cloning a document (or a whole solution) is cheap.
///
/// A document without a file path is a design-time-only artifact: it can
/// never have been compiled from disk, and the sync engine classifies it
/// without consulting any external state.
#[derive(Debug, Clone)]
pub struct Document {
    /// Identity, stable across snapshot versions.
    pub id: DocumentId,
    /// Owning compilation unit.
    pub project: ProjectId,
    /// On-disk location, absent for generated/scratch documents.
    pub path: Option<PathBuf>,
    /// Current in-memory text.
    pub text: Arc<str>,
}

impl Document {
    /// Creates a document backed by a file on disk.
    #[must_use]
    pub fn new(
        id: DocumentId,
        project: ProjectId,
        path: impl Into<PathBuf>,
        text: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            id,
            project,
            path: Some(path.into()),
            text: text.into(),
        }
    }

    /// Creates a design-time-only document with no backing file.
    #[must_use]
    pub fn pathless(id: DocumentId, project: ProjectId, text: impl Into<Arc<str>>) -> Self {
        Self {
            id,
            project,
            path: None,
            text: text.into(),
        }
    }

    /// Returns the backing file path, if the document has one.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns a copy of this document with replaced text.
    #[must_use]
    pub fn with_text(&self, text: Arc<str>) -> Self {
        Self {
            id: self.id,
            project: self.project,
            path: self.path.clone(),
            text,
        }
    }
}
