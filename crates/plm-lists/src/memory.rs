//! In-memory provider. Items are lost when the process exits.

use std::collections::HashMap;
use std::sync::RwLock;

use plm_registry::{ListError, ListResult, PersistentListProvider, Position};
use plm_types::ListItem;

use crate::builtin::MEMORY_PROVIDER;
use crate::items::{insert_at, remove_id, take_at};

/// A [`PersistentListProvider`] keeping items in a `HashMap` behind a
/// `RwLock`.
#[derive(Debug, Default)]
pub struct MemoryProvider {
    lists: RwLock<HashMap<String, Vec<ListItem>>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> ListError {
    ListError::Storage(format!("lock poisoned: {e}"))
}

impl PersistentListProvider for MemoryProvider {
    fn type_name(&self) -> &str {
        MEMORY_PROVIDER
    }

    fn add(&self, key: &str, item: ListItem) -> ListResult<()> {
        let mut lists = self.lists.write().map_err(poisoned)?;
        lists.entry(key.to_string()).or_default().push(item);
        Ok(())
    }

    fn insert(&self, key: &str, index: usize, item: ListItem) -> ListResult<()> {
        let mut lists = self.lists.write().map_err(poisoned)?;
        insert_at(lists.entry(key.to_string()).or_default(), key, index, item)
    }

    fn remove(&self, key: &str, item_id: &uuid::Uuid) -> ListResult<bool> {
        let mut lists = self.lists.write().map_err(poisoned)?;
        Ok(lists.get_mut(key).is_some_and(|items| remove_id(items, item_id)))
    }

    fn items(&self, key: &str) -> ListResult<Vec<ListItem>> {
        let lists = self.lists.read().map_err(poisoned)?;
        Ok(lists.get(key).cloned().unwrap_or_default())
    }

    fn clear(&self, key: &str) -> ListResult<()> {
        let mut lists = self.lists.write().map_err(poisoned)?;
        lists.remove(key);
        Ok(())
    }

    fn take(&self, key: &str, position: Position) -> ListResult<Option<ListItem>> {
        let mut lists = self.lists.write().map_err(poisoned)?;
        Ok(lists.get_mut(key).and_then(|items| take_at(items, position)))
    }

    fn count(&self, key: &str) -> ListResult<usize> {
        let lists = self.lists.read().map_err(poisoned)?;
        Ok(lists.get(key).map_or(0, Vec::len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_are_isolated_by_key() {
        let provider = MemoryProvider::new();
        provider.add("a", ListItem::new("x")).unwrap();
        provider.add("b", ListItem::new("y")).unwrap();

        assert_eq!(provider.count("a").unwrap(), 1);
        assert_eq!(provider.items("b").unwrap()[0].cargo, "y");
    }

    #[test]
    fn unknown_key_is_empty() {
        let provider = MemoryProvider::new();
        assert!(provider.items("none").unwrap().is_empty());
        assert_eq!(provider.count("none").unwrap(), 0);
        assert!(provider.take("none", Position::Front).unwrap().is_none());
        assert!(!provider.remove("none", &uuid::Uuid::nil()).unwrap());
    }

    #[test]
    fn clear_drops_items() {
        let provider = MemoryProvider::new();
        provider.add("a", ListItem::new("x")).unwrap();
        provider.clear("a").unwrap();
        assert_eq!(provider.count("a").unwrap(), 0);
    }

    #[test]
    fn peek_does_not_remove() {
        let provider = MemoryProvider::new();
        provider.add("a", ListItem::new("x")).unwrap();
        provider.add("a", ListItem::new("y")).unwrap();

        assert_eq!(provider.peek("a", Position::Back).unwrap().unwrap().cargo, "y");
        assert_eq!(provider.count("a").unwrap(), 2);
    }
}
