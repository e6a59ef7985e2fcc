//! Small list and provider types shared by the unit tests in this crate.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use plm_types::{ListId, ListItem, ListMetadata};

use crate::error::{BoxError, ListError, ListResult};
use crate::list::{Initializable, PersistentList, PersistentListProvider, Position};

pub const TEST_PROVIDER: &str = "P1";
pub const TEST_LIST: &str = "L1";
pub const COUNTING_PROVIDER: &str = "P-init";
pub const COUNTING_LIST: &str = "L-init";

/// Shared record of which initialization hooks ran, in order.
pub type HookJournal = Arc<Mutex<Vec<&'static str>>>;

/// Provider keeping items in a `HashMap`.
#[derive(Default)]
pub struct TestProvider {
    items: Mutex<HashMap<String, Vec<ListItem>>>,
}

impl TestProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PersistentListProvider for TestProvider {
    fn type_name(&self) -> &str {
        TEST_PROVIDER
    }

    fn add(&self, key: &str, item: ListItem) -> ListResult<()> {
        self.items.lock().unwrap().entry(key.to_string()).or_default().push(item);
        Ok(())
    }

    fn insert(&self, key: &str, index: usize, item: ListItem) -> ListResult<()> {
        let mut items = self.items.lock().unwrap();
        let list = items.entry(key.to_string()).or_default();
        if index > list.len() {
            return Err(ListError::IndexOutOfRange {
                key: key.to_string(),
                index,
                len: list.len(),
            });
        }
        list.insert(index, item);
        Ok(())
    }

    fn remove(&self, key: &str, item_id: &uuid::Uuid) -> ListResult<bool> {
        let mut items = self.items.lock().unwrap();
        let Some(list) = items.get_mut(key) else {
            return Ok(false);
        };
        let before = list.len();
        list.retain(|i| &i.id != item_id);
        Ok(list.len() != before)
    }

    fn items(&self, key: &str) -> ListResult<Vec<ListItem>> {
        Ok(self.items.lock().unwrap().get(key).cloned().unwrap_or_default())
    }

    fn clear(&self, key: &str) -> ListResult<()> {
        self.items.lock().unwrap().remove(key);
        Ok(())
    }

    fn take(&self, key: &str, position: Position) -> ListResult<Option<ListItem>> {
        let mut items = self.items.lock().unwrap();
        let Some(list) = items.get_mut(key) else {
            return Ok(None);
        };
        Ok(match position {
            Position::Front if !list.is_empty() => Some(list.remove(0)),
            Position::Front => None,
            Position::Back => list.pop(),
        })
    }
}

/// Provider that counts how often it was initialized.
pub struct CountingProvider {
    inner: TestProvider,
    initialized: Arc<AtomicUsize>,
    journal: Option<HookJournal>,
}

impl CountingProvider {
    pub fn new(initialized: Arc<AtomicUsize>) -> Self {
        Self {
            inner: TestProvider::new(),
            initialized,
            journal: None,
        }
    }

    pub fn with_journal(mut self, journal: HookJournal) -> Self {
        self.journal = Some(journal);
        self
    }
}

impl PersistentListProvider for CountingProvider {
    fn type_name(&self) -> &str {
        COUNTING_PROVIDER
    }

    fn add(&self, key: &str, item: ListItem) -> ListResult<()> {
        self.inner.add(key, item)
    }

    fn insert(&self, key: &str, index: usize, item: ListItem) -> ListResult<()> {
        self.inner.insert(key, index, item)
    }

    fn remove(&self, key: &str, item_id: &uuid::Uuid) -> ListResult<bool> {
        self.inner.remove(key, item_id)
    }

    fn items(&self, key: &str) -> ListResult<Vec<ListItem>> {
        self.inner.items(key)
    }

    fn clear(&self, key: &str) -> ListResult<()> {
        self.inner.clear(key)
    }

    fn take(&self, key: &str, position: Position) -> ListResult<Option<ListItem>> {
        self.inner.take(key, position)
    }
}

impl Initializable for CountingProvider {
    fn initialize(&self) -> Result<(), BoxError> {
        self.initialized.fetch_add(1, Ordering::SeqCst);
        if let Some(journal) = &self.journal {
            journal.lock().unwrap().push("provider");
        }
        Ok(())
    }
}

/// Plain FIFO list.
pub struct TestList {
    id: ListId,
    key: String,
    description: String,
    provider: Option<Arc<dyn PersistentListProvider>>,
}

impl TestList {
    pub fn new(key: &str) -> Self {
        Self {
            id: ListId::new(),
            key: key.to_string(),
            description: format!("{key} test list"),
            provider: None,
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn PersistentListProvider>) -> Self {
        self.provider = Some(provider);
        self
    }
}

impl PersistentList for TestList {
    fn id(&self) -> ListId {
        self.id
    }

    fn key(&self) -> &str {
        &self.key
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn type_name(&self) -> &str {
        TEST_LIST
    }

    fn provider(&self) -> Option<&Arc<dyn PersistentListProvider>> {
        self.provider.as_ref()
    }

    fn set_provider(&mut self, provider: Arc<dyn PersistentListProvider>) {
        self.provider = Some(provider);
    }

    fn load(&mut self, record: &ListMetadata) {
        self.id = record.id;
        self.key = record.key.clone();
        self.description = record.description.clone();
    }

    fn next_position(&self) -> Position {
        Position::Front
    }
}

/// List that counts initializations and refuses to initialize before a
/// provider is attached.
pub struct CountingList {
    inner: TestList,
    initialized: Arc<AtomicUsize>,
    journal: Option<HookJournal>,
    fail: bool,
}

impl CountingList {
    pub fn new(key: &str) -> Self {
        Self {
            inner: TestList::new(key),
            initialized: Arc::new(AtomicUsize::new(0)),
            journal: None,
            fail: false,
        }
    }

    pub fn failing(key: &str) -> Self {
        Self {
            fail: true,
            ..Self::new(key)
        }
    }

    pub fn with_counter(mut self, counter: Arc<AtomicUsize>) -> Self {
        self.initialized = counter;
        self
    }

    pub fn with_journal(mut self, journal: HookJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn with_provider(mut self, provider: Arc<dyn PersistentListProvider>) -> Self {
        self.inner = self.inner.with_provider(provider);
        self
    }

    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.initialized)
    }
}

impl PersistentList for CountingList {
    fn id(&self) -> ListId {
        self.inner.id()
    }

    fn key(&self) -> &str {
        self.inner.key()
    }

    fn description(&self) -> &str {
        self.inner.description()
    }

    fn type_name(&self) -> &str {
        COUNTING_LIST
    }

    fn provider(&self) -> Option<&Arc<dyn PersistentListProvider>> {
        self.inner.provider()
    }

    fn set_provider(&mut self, provider: Arc<dyn PersistentListProvider>) {
        self.inner.set_provider(provider);
    }

    fn load(&mut self, record: &ListMetadata) {
        self.inner.load(record);
    }

    fn next_position(&self) -> Position {
        Position::Front
    }
}

impl Initializable for CountingList {
    fn initialize(&self) -> Result<(), BoxError> {
        if self.fail {
            return Err(format!("list '{}' refused to initialize", self.key()).into());
        }
        if self.provider().is_none() {
            let reason = format!("list '{}' initialized before a provider was attached", self.key());
            return Err(reason.into());
        }
        self.initialized.fetch_add(1, Ordering::SeqCst);
        if let Some(journal) = &self.journal {
            journal.lock().unwrap().push("list");
        }
        Ok(())
    }
}
