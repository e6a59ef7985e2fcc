//! The persistent list registry.
//!
//! A process keeps one [`PersistentListRegistry`]: an in-memory directory of
//! named lists, each backed by durable storage through a provider. The
//! registry guarantees that a key is created at most once under concurrent
//! access, serves reads without locking, and rebuilds its working set at
//! startup from the [`ListMetadata`](plm_types::ListMetadata) records in a
//! [`MetadataStore`](plm_store::MetadataStore).
//!
//! # Architecture
//!
//! - **Lists** ([`PersistentList`]) own their identity and delegate payload
//!   operations to a **provider** ([`PersistentListProvider`]).
//! - The **type registry** ([`TypeRegistry`]) maps the type names stored in
//!   metadata records to constructors registered at process start.
//! - Types that need a one-time setup step implement [`Initializable`] and
//!   are tagged as such when constructed ([`ListInstance`],
//!   [`ProviderInstance`]).
//!
//! # Modules
//!
//! - [`error`]: Error types for registry, resolution and payload operations
//! - [`list`]: The list/provider traits and the capability tags
//! - [`resolver`]: The [`TypeRegistry`]
//! - [`registry`]: The [`PersistentListRegistry`]

pub mod error;
pub mod list;
pub mod registry;
pub mod resolver;

#[cfg(test)]
mod testing;

pub use error::{
    BoxError, ListError, ListResult, RegistryError, RegistryResult, ResolutionError, TypeRole,
};
pub use list::{
    Initializable, InitializableList, InitializableProvider, ListInstance, PersistentList,
    PersistentListProvider, Position, ProviderInstance,
};
pub use registry::{LoadReport, PersistentListRegistry, SkippedRecord};
pub use resolver::{TypeRegistry, TypeRegistryBuilder};
