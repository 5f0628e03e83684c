//! Core abstractions for enc-sync.
//!
//! This crate provides the foundational types and capability traits used by
//! the committed-document synchronization engine in `enc-sync`:
//!
//! - **Data model**: [`Document`], [`Solution`] (immutable, versioned
//!   snapshots), and the opaque [`DocumentId`]/[`ProjectId`]/[`ModuleId`]
//!   identities.
//! - **Capability traits**: [`DebugInfoProvider`] (the checksum oracle over
//!   the debuggee's loaded modules) and [`SourceLoader`] (on-disk content),
//!   implemented by the host debugging engine and injected as trait
//!   objects.
//! - **Checksums**: [`ChecksumAlgorithm`] covering the hash functions debug
//!   metadata records for compiled sources.
//! - **Error types**: [`SyncError`] with an explicit variant per failure
//!   path.
//!
//! # Examples
//!
//! Implementing the checksum oracle for a host:
//!
//! ```
//! use async_trait::async_trait;
//! use enc_core::{ChecksumRecord, DebugInfoProvider, ModuleId, ProjectId};
//! use std::path::Path;
//!
//! struct NoModulesLoaded;
//!
//! #[async_trait]
//! impl DebugInfoProvider for NoModulesLoaded {
//!     async fn resolve_module(
//!         &self,
//!         _project: ProjectId,
//!     ) -> enc_core::error::Result<Option<ModuleId>> {
//!         Ok(None)
//!     }
//!
//!     async fn checksum_record(
//!         &self,
//!         _module: ModuleId,
//!         _path: &Path,
//!     ) -> enc_core::error::Result<ChecksumRecord> {
//!         Ok(ChecksumRecord::ModuleNotLoaded)
//!     }
//! }
//! ```

pub mod checksum;
pub mod document;
pub mod error;
pub mod loader;
pub mod provider;
pub mod solution;

// Re-export commonly used types
pub use checksum::ChecksumAlgorithm;
pub use document::{Document, DocumentId, ModuleId, ProjectId};
pub use error::{Result, SyncError};
pub use loader::DiskSourceLoader;
pub use provider::{ChecksumRecord, DebugInfoProvider, SourceLoader};
pub use solution::Solution;
