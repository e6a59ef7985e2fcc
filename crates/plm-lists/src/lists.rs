//! FIFO and LIFO list types.
//!
//! Both keep only identity and the provider; items live in the provider. They
//! differ in which end [`PersistentList::next`] reads from.

use std::sync::Arc;

use plm_registry::{PersistentList, PersistentListProvider, Position};
use plm_types::{ListId, ListMetadata};

use crate::builtin::{FIFO_LIST, LIFO_LIST};

/// Identity and wiring shared by the built-in lists.
#[derive(Clone, Default)]
struct ListState {
    id: ListId,
    key: String,
    description: String,
    provider: Option<Arc<dyn PersistentListProvider>>,
}

impl ListState {
    fn new(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: ListId::new(),
            key: key.into(),
            description: description.into(),
            provider: None,
        }
    }

    fn load(&mut self, record: &ListMetadata) {
        self.id = record.id;
        self.key = record.key.clone();
        self.description = record.description.clone();
    }
}

/// First in, first out: items are handed out oldest first.
#[derive(Clone, Default)]
pub struct FifoList {
    state: ListState,
}

impl FifoList {
    pub fn new(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            state: ListState::new(key, description),
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn PersistentListProvider>) -> Self {
        self.state.provider = Some(provider);
        self
    }
}

impl PersistentList for FifoList {
    fn id(&self) -> ListId {
        self.state.id
    }

    fn key(&self) -> &str {
        &self.state.key
    }

    fn description(&self) -> &str {
        &self.state.description
    }

    fn type_name(&self) -> &str {
        FIFO_LIST
    }

    fn provider(&self) -> Option<&Arc<dyn PersistentListProvider>> {
        self.state.provider.as_ref()
    }

    fn set_provider(&mut self, provider: Arc<dyn PersistentListProvider>) {
        self.state.provider = Some(provider);
    }

    fn load(&mut self, record: &ListMetadata) {
        self.state.load(record);
    }

    fn next_position(&self) -> Position {
        Position::Front
    }
}

/// Last in, first out: items are handed out newest first.
#[derive(Clone, Default)]
pub struct LifoList {
    state: ListState,
}

impl LifoList {
    pub fn new(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            state: ListState::new(key, description),
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn PersistentListProvider>) -> Self {
        self.state.provider = Some(provider);
        self
    }
}

impl PersistentList for LifoList {
    fn id(&self) -> ListId {
        self.state.id
    }

    fn key(&self) -> &str {
        &self.state.key
    }

    fn description(&self) -> &str {
        &self.state.description
    }

    fn type_name(&self) -> &str {
        LIFO_LIST
    }

    fn provider(&self) -> Option<&Arc<dyn PersistentListProvider>> {
        self.state.provider.as_ref()
    }

    fn set_provider(&mut self, provider: Arc<dyn PersistentListProvider>) {
        self.state.provider = Some(provider);
    }

    fn load(&mut self, record: &ListMetadata) {
        self.state.load(record);
    }

    fn next_position(&self) -> Position {
        Position::Back
    }
}
