//! Vector operations shared by the built-in providers.

use plm_registry::{ListError, ListResult, Position};
use plm_types::ListItem;

pub(crate) fn insert_at(
    items: &mut Vec<ListItem>,
    key: &str,
    index: usize,
    item: ListItem,
) -> ListResult<()> {
    if index > items.len() {
        return Err(ListError::IndexOutOfRange {
            key: key.to_string(),
            index,
            len: items.len(),
        });
    }
    items.insert(index, item);
    Ok(())
}

pub(crate) fn remove_id(items: &mut Vec<ListItem>, item_id: &uuid::Uuid) -> bool {
    match items.iter().position(|i| &i.id == item_id) {
        Some(idx) => {
            items.remove(idx);
            true
        }
        None => false,
    }
}

pub(crate) fn take_at(items: &mut Vec<ListItem>, position: Position) -> Option<ListItem> {
    match position {
        Position::Front if !items.is_empty() => Some(items.remove(0)),
        Position::Front => None,
        Position::Back => items.pop(),
    }
}
