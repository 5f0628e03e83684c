use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::document::{Document, DocumentId};

static NEXT_VERSION: AtomicU64 = AtomicU64::new(1);

/// An immutable, versioned snapshot of the editable document set.
///
/// A `Solution` is never mutated in place: replacing a document's text via
/// [`Solution::with_document_text`] produces a new snapshot with a fresh
/// version number while the original remains valid. Cloning is cheap (the
/// document table is behind an `Arc`), which lets the sync engine hand out
/// snapshots without holding any lock.
///
/// Identity, not content, is what callers compare: [`Solution::same_snapshot`]
/// answers "is this the exact snapshot object I committed earlier", which is
/// how expensive recomputation is short-circuited.
///
/// # Examples
///
/// ```
/// use enc_core::{Document, DocumentId, ProjectId, Solution};
///
/// let doc = Document::new(DocumentId::new(1), ProjectId::new(1), "/src/a.rs", "one");
/// let solution = Solution::new(vec![doc]);
///
/// let next = solution.with_document_text(DocumentId::new(1), "two".into());
/// assert!(!Solution::same_snapshot(&solution, &next));
/// assert_eq!(&*next.document(&DocumentId::new(1)).unwrap().text, "two");
/// assert_eq!(&*solution.document(&DocumentId::new(1)).unwrap().text, "one");
/// ```
#[derive(Debug, Clone)]
pub struct Solution {
    inner: Arc<SolutionInner>,
}

#[derive(Debug)]
struct SolutionInner {
    version: u64,
    documents: HashMap<DocumentId, Document>,
    by_path: HashMap<PathBuf, DocumentId>,
}

impl Solution {
    /// Creates a snapshot from the given documents.
    ///
    /// Later documents win if two share a `DocumentId`. Path lookups index
    /// only documents that have a path.
    #[must_use]
    pub fn new(documents: impl IntoIterator<Item = Document>) -> Self {
        let documents: HashMap<DocumentId, Document> =
            documents.into_iter().map(|doc| (doc.id, doc)).collect();
        let by_path = documents
            .values()
            .filter_map(|doc| doc.path.clone().map(|path| (path, doc.id)))
            .collect();

        Self {
            inner: Arc::new(SolutionInner {
                version: NEXT_VERSION.fetch_add(1, Ordering::Relaxed),
                documents,
                by_path,
            }),
        }
    }

    /// Point lookup by document identity.
    #[must_use]
    pub fn document(&self, id: &DocumentId) -> Option<&Document> {
        self.inner.documents.get(id)
    }

    /// Point lookup by backing file path.
    #[must_use]
    pub fn document_by_path(&self, path: &Path) -> Option<&Document> {
        self.inner
            .by_path
            .get(path)
            .and_then(|id| self.inner.documents.get(id))
    }

    /// Returns whether the snapshot contains the given identity.
    #[must_use]
    pub fn contains(&self, id: &DocumentId) -> bool {
        self.inner.documents.contains_key(id)
    }

    /// Number of documents in the snapshot.
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.inner.documents.len()
    }

    /// Monotonically increasing snapshot version.
    ///
    /// Versions are unique per process; they order snapshots by creation
    /// time, not by lineage.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.version
    }

    /// Produces a new snapshot with the document's text replaced.
    ///
    /// Returns a clone of `self` unchanged if the identity is absent.
    #[must_use]
    pub fn with_document_text(&self, id: DocumentId, text: Arc<str>) -> Self {
        let Some(existing) = self.inner.documents.get(&id) else {
            return self.clone();
        };

        let mut documents = self.inner.documents.clone();
        documents.insert(id, existing.with_text(text));

        Self {
            inner: Arc::new(SolutionInner {
                version: NEXT_VERSION.fetch_add(1, Ordering::Relaxed),
                documents,
                by_path: self.inner.by_path.clone(),
            }),
        }
    }

    /// Pure identity comparison: true when both handles refer to the same
    /// snapshot object.
    #[must_use]
    pub fn same_snapshot(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }
}
