//! List metadata storage for the Persistent List Manager.
//!
//! The registry keeps its working set in memory but every list it publishes
//! has a durable [`ListMetadata`](plm_types::ListMetadata) record behind it.
//! This crate defines the storage interface those records go through and the
//! backends that implement it.
//!
//! # Storage Backends
//!
//! All backends implement the [`MetadataStore`] trait:
//!
//! - [`InMemoryMetadataStore`] -- `BTreeMap`-based store for tests and embedding
//! - [`FileMetadataStore`] -- single JSON document, rewritten atomically
//!
//! # Design Rules
//!
//! 1. Keys are unique: inserting an existing key fails, it never overwrites.
//! 2. Records are immutable once written; there is no update operation.
//! 3. Every call is synchronous and durable when it returns `Ok`.
//! 4. Backends never retry. Retry policy belongs to the caller.

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::FileMetadataStore;
pub use memory::InMemoryMetadataStore;
pub use traits::MetadataStore;
