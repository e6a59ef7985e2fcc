use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry in a persistent list.
///
/// The registry never looks inside items; they are produced by callers and
/// stored by whichever provider backs the list. `cargo` is an opaque string
/// payload (typically an identifier or a serialized document).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    /// Identity of this entry, used for targeted removal.
    pub id: uuid::Uuid,
    /// Opaque payload.
    pub cargo: String,
    /// When the item was created.
    pub created_at: DateTime<Utc>,
}

impl ListItem {
    /// Create a new item carrying `cargo`, stamped with the current time.
    pub fn new(cargo: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::now_v7(),
            cargo: cargo.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_items_get_distinct_ids() {
        let a = ListItem::new("a");
        let b = ListItem::new("a");
        assert_ne!(a.id, b.id);
        assert_eq!(a.cargo, b.cargo);
    }

    #[test]
    fn json_shape_is_stable() {
        let item = ListItem::new("patient-42");
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["cargo"], "patient-42");
        assert!(value.get("id").is_some());
        assert!(value.get("created_at").is_some());
    }
}
