//! Foundation types for the Persistent List Manager (PLM).
//!
//! This crate provides the value types shared by every other PLM crate: the
//! durable description of a registered list and the items a list carries.
//!
//! # Key Types
//!
//! - [`ListId`]: UUID v7 identifier assigned to a list when it is first created
//! - [`ListMetadata`]: Durable record used to reconstruct a list at startup
//! - [`ListItem`]: One entry in a list's payload
//! - [`validate_list_key`]: The single rule every list key must satisfy

pub mod error;
pub mod identity;
pub mod item;
pub mod metadata;

pub use error::TypeError;
pub use identity::ListId;
pub use item::ListItem;
pub use metadata::{validate_list_key, ListMetadata};
