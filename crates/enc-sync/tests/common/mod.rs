//! Common test utilities for the sync-session integration tests.
//!
//! Provides scripted implementations of the debug-info and source-loader
//! capabilities whose answers can be changed mid-test, plus call counters
//! so tests can assert which external state was (or was not) consulted.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use enc_core::{
    ChecksumAlgorithm, ChecksumRecord, DebugInfoProvider, Document, DocumentId, ModuleId,
    ProjectId, Result, Solution, SourceLoader,
};

/// Scripted checksum oracle: per-project module resolution and per-path
/// checksum records, both mutable between queries.
#[derive(Default)]
pub(crate) struct ScriptedOracle {
    modules: Mutex<HashMap<ProjectId, ModuleId>>,
    records: Mutex<HashMap<PathBuf, ChecksumRecord>>,
    resolve_calls: AtomicUsize,
    record_calls: AtomicUsize,
}

#[allow(dead_code)] // Not every test exercises every helper
impl ScriptedOracle {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Marks the project's module as loaded.
    pub(crate) fn load_module(&self, project: ProjectId, module: ModuleId) {
        self.modules.lock().unwrap().insert(project, module);
    }

    /// Scripts the checksum record returned for a path.
    pub(crate) fn set_record(&self, path: impl Into<PathBuf>, record: ChecksumRecord) {
        self.records.lock().unwrap().insert(path.into(), record);
    }

    /// Scripts a recorded checksum computed from `content`.
    pub(crate) fn record_checksum_of(
        &self,
        path: impl Into<PathBuf>,
        content: &[u8],
        algorithm: ChecksumAlgorithm,
    ) {
        self.set_record(
            path,
            ChecksumRecord::Recorded {
                checksum: algorithm.digest(content),
                algorithm,
            },
        );
    }

    pub(crate) fn resolve_calls(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn record_calls(&self) -> usize {
        self.record_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DebugInfoProvider for ScriptedOracle {
    async fn resolve_module(&self, project: ProjectId) -> Result<Option<ModuleId>> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.modules.lock().unwrap().get(&project).copied())
    }

    async fn checksum_record(&self, _module: ModuleId, path: &Path) -> Result<ChecksumRecord> {
        self.record_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .records
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .unwrap_or(ChecksumRecord::NoEntry))
    }
}

/// Scripted content loader: an in-memory "disk" keyed by path.
#[derive(Default)]
pub(crate) struct ScriptedLoader {
    files: Mutex<HashMap<PathBuf, Vec<u8>>>,
    reads: AtomicUsize,
}

#[allow(dead_code)]
impl ScriptedLoader {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_content(&self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        self.files.lock().unwrap().insert(path.into(), content.into());
    }

    pub(crate) fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceLoader for ScriptedLoader {
    async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.files.lock().unwrap().get(path).cloned().ok_or_else(|| {
            enc_core::SyncError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no scripted content for {}", path.display()),
            ))
        })
    }
}

/// A file-backed document under the canonical test project.
#[allow(dead_code)]
pub(crate) fn file_document(id: u64, path: &str, text: &str) -> Document {
    Document::new(DocumentId::new(id), ProjectId::new(1), path, text)
}

/// A one-document solution under the canonical test project.
#[allow(dead_code)]
pub(crate) fn single_document_solution(id: u64, path: &str, text: &str) -> Solution {
    Solution::new(vec![file_document(id, path, text)])
}
