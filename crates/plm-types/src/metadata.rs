//! The durable description of a registered list.
//!
//! A [`ListMetadata`] record is everything needed to rebuild a list after a
//! restart: its key, the registered type names of its provider and list
//! implementations, and a human-readable description. Records are created
//! when a list is first ensured and deleted when it is removed; there is no
//! update path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::identity::ListId;

/// Validate a list key, returning `Ok(())` if it can be registered.
///
/// Keys are otherwise free-form: any non-empty string is accepted.
///
/// # Examples
///
/// ```
/// use plm_types::validate_list_key;
///
/// assert!(validate_list_key("waiting-room").is_ok());
/// assert!(validate_list_key("").is_err());
/// ```
pub fn validate_list_key(key: &str) -> Result<(), TypeError> {
    if key.is_empty() {
        return Err(TypeError::EmptyKey);
    }
    Ok(())
}

/// Durable description of one registered list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMetadata {
    /// Identity assigned when the list was created.
    pub id: ListId,
    /// Unique, non-empty key. Never changes once the record exists.
    pub key: String,
    /// Registered type name of the provider implementation.
    pub provider_type: String,
    /// Registered type name of the list implementation.
    pub list_type: String,
    /// Free-form description.
    pub description: String,
    /// When the record was written.
    pub modified_at: DateTime<Utc>,
}

impl ListMetadata {
    /// Build a record for a list being created now.
    pub fn new(
        id: ListId,
        key: impl Into<String>,
        provider_type: impl Into<String>,
        list_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            key: key.into(),
            provider_type: provider_type.into(),
            list_type: list_type.into(),
            description: description.into(),
            modified_at: Utc::now(),
        }
    }
}
