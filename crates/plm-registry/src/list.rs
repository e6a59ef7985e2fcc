//! The list and provider abstractions managed by the registry.
//!
//! A [`PersistentList`] is one named list; it holds the
//! [`PersistentListProvider`] that stores its items. Both are trait objects
//! so that new list and storage types can be plugged in by registering them
//! with a [`TypeRegistry`](crate::TypeRegistry).
//!
//! Some implementations need a one-time setup step after they are wired up
//! (opening a pool, creating a directory). They implement [`Initializable`]
//! and are wrapped in the `Initializable` variant of [`ListInstance`] or
//! [`ProviderInstance`] when constructed. The variant is the capability tag:
//! whoever finishes the instance runs the hook exactly once by consuming it
//! through `into_initialized`.

use std::sync::Arc;

use plm_types::{ListId, ListItem, ListMetadata};

use crate::error::{BoxError, ListError, ListResult};

/// Which end of a list an operation reads from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    /// The oldest item.
    Front,
    /// The newest item.
    Back,
}

/// Storage access for the items of one or more lists.
///
/// Providers hold no registry state. Every operation names the list it acts
/// on by key.
pub trait PersistentListProvider: Send + Sync {
    /// Registered type name of this provider implementation.
    fn type_name(&self) -> &str;

    /// Append an item to the back of the list.
    fn add(&self, key: &str, item: ListItem) -> ListResult<()>;

    /// Insert an item at `index`. `index == len` appends.
    fn insert(&self, key: &str, index: usize, item: ListItem) -> ListResult<()>;

    /// Remove the item with `item_id`. Returns `true` if it was present.
    fn remove(&self, key: &str, item_id: &uuid::Uuid) -> ListResult<bool>;

    /// All items, front to back.
    fn items(&self, key: &str) -> ListResult<Vec<ListItem>>;

    /// Remove every item.
    fn clear(&self, key: &str) -> ListResult<()>;

    /// Remove and return the item at `position`, if any.
    fn take(&self, key: &str, position: Position) -> ListResult<Option<ListItem>>;

    /// Number of items.
    fn count(&self, key: &str) -> ListResult<usize> {
        Ok(self.items(key)?.len())
    }

    /// The item at `position` without removing it.
    fn peek(&self, key: &str, position: Position) -> ListResult<Option<ListItem>> {
        let mut items = self.items(key)?;
        Ok(match position {
            Position::Front if !items.is_empty() => Some(items.swap_remove(0)),
            Position::Front => None,
            Position::Back => items.pop(),
        })
    }
}

/// One named list.
///
/// Identity and wiring are implemented by each list type; payload operations
/// have default implementations that delegate to the attached provider.
pub trait PersistentList: Send + Sync {
    /// Identity stored in the list's metadata record.
    fn id(&self) -> ListId;

    /// The unique key this list is registered under.
    fn key(&self) -> &str;

    /// Free-form description.
    fn description(&self) -> &str;

    /// Registered type name of this list implementation.
    fn type_name(&self) -> &str;

    /// The attached provider, if wired.
    fn provider(&self) -> Option<&Arc<dyn PersistentListProvider>>;

    /// Attach the provider that stores this list's items.
    fn set_provider(&mut self, provider: Arc<dyn PersistentListProvider>);

    /// Take identity (id, key, description) from a stored record.
    fn load(&mut self, record: &ListMetadata);

    /// The end [`Self::next`] and [`Self::take_next`] read from.
    fn next_position(&self) -> Position;

    /// The attached provider, or [`ListError::NoProvider`].
    fn backing(&self) -> ListResult<&Arc<dyn PersistentListProvider>> {
        self.provider().ok_or_else(|| ListError::NoProvider {
            key: self.key().to_string(),
        })
    }

    fn add(&self, item: ListItem) -> ListResult<()> {
        self.backing()?.add(self.key(), item)
    }

    fn insert(&self, index: usize, item: ListItem) -> ListResult<()> {
        self.backing()?.insert(self.key(), index, item)
    }

    fn remove(&self, item_id: &uuid::Uuid) -> ListResult<bool> {
        self.backing()?.remove(self.key(), item_id)
    }

    fn items(&self) -> ListResult<Vec<ListItem>> {
        self.backing()?.items(self.key())
    }

    fn size(&self) -> ListResult<usize> {
        self.backing()?.count(self.key())
    }

    fn clear(&self) -> ListResult<()> {
        self.backing()?.clear(self.key())
    }

    /// The next item this list would hand out, without removing it.
    fn next(&self) -> ListResult<Option<ListItem>> {
        self.backing()?.peek(self.key(), self.next_position())
    }

    /// Remove and return the next item.
    fn take_next(&self) -> ListResult<Option<ListItem>> {
        self.backing()?.take(self.key(), self.next_position())
    }
}

/// Optional one-time setup run after wiring and before publication.
pub trait Initializable {
    fn initialize(&self) -> Result<(), BoxError>;
}

/// A list type that carries the [`Initializable`] capability.
///
/// Implemented for every such type; only exists so the capability survives
/// type erasure.
pub trait InitializableList: PersistentList + Initializable {
    fn as_list(&self) -> &dyn PersistentList;
    fn as_list_mut(&mut self) -> &mut dyn PersistentList;
    fn into_list(self: Box<Self>) -> Box<dyn PersistentList>;
}

impl<T: PersistentList + Initializable + 'static> InitializableList for T {
    fn as_list(&self) -> &dyn PersistentList {
        self
    }

    fn as_list_mut(&mut self) -> &mut dyn PersistentList {
        self
    }

    fn into_list(self: Box<Self>) -> Box<dyn PersistentList> {
        self
    }
}

/// A provider type that carries the [`Initializable`] capability.
pub trait InitializableProvider: PersistentListProvider + Initializable {
    fn into_provider(self: Box<Self>) -> Box<dyn PersistentListProvider>;
}

impl<T: PersistentListProvider + Initializable + 'static> InitializableProvider for T {
    fn into_provider(self: Box<Self>) -> Box<dyn PersistentListProvider> {
        self
    }
}

/// A constructed list that has not been published yet, tagged with whether
/// it needs initialization.
pub enum ListInstance {
    Plain(Box<dyn PersistentList>),
    Initializable(Box<dyn InitializableList>),
}

impl ListInstance {
    /// Wrap a list type with no initialization step.
    pub fn plain(list: impl PersistentList + 'static) -> Self {
        Self::Plain(Box::new(list))
    }

    /// Wrap a list type whose [`Initializable::initialize`] must run before
    /// it is published.
    pub fn initializable(list: impl PersistentList + Initializable + 'static) -> Self {
        Self::Initializable(Box::new(list))
    }

    pub fn as_list(&self) -> &dyn PersistentList {
        match self {
            Self::Plain(list) => list.as_ref(),
            Self::Initializable(list) => list.as_list(),
        }
    }

    pub fn as_list_mut(&mut self) -> &mut dyn PersistentList {
        match self {
            Self::Plain(list) => list.as_mut(),
            Self::Initializable(list) => list.as_list_mut(),
        }
    }

    pub fn key(&self) -> &str {
        self.as_list().key()
    }

    pub fn needs_initialization(&self) -> bool {
        matches!(self, Self::Initializable(_))
    }

    /// Run the initialization hook if tagged, and hand back the shareable
    /// list. Consuming `self` makes a second call impossible.
    pub fn into_initialized(self) -> Result<Arc<dyn PersistentList>, BoxError> {
        match self {
            Self::Plain(list) => Ok(Arc::from(list)),
            Self::Initializable(list) => {
                list.initialize()?;
                Ok(Arc::from(list.into_list()))
            }
        }
    }
}

/// A constructed provider, tagged with whether it needs initialization.
pub enum ProviderInstance {
    Plain(Box<dyn PersistentListProvider>),
    Initializable(Box<dyn InitializableProvider>),
}

impl ProviderInstance {
    pub fn plain(provider: impl PersistentListProvider + 'static) -> Self {
        Self::Plain(Box::new(provider))
    }

    pub fn initializable(provider: impl PersistentListProvider + Initializable + 'static) -> Self {
        Self::Initializable(Box::new(provider))
    }

    pub fn type_name(&self) -> &str {
        match self {
            Self::Plain(provider) => provider.type_name(),
            Self::Initializable(provider) => provider.type_name(),
        }
    }

    pub fn needs_initialization(&self) -> bool {
        matches!(self, Self::Initializable(_))
    }

    /// Run the initialization hook if tagged, and hand back the shareable
    /// provider.
    pub fn into_initialized(self) -> Result<Arc<dyn PersistentListProvider>, BoxError> {
        match self {
            Self::Plain(provider) => Ok(Arc::from(provider)),
            Self::Initializable(provider) => {
                provider.initialize()?;
                Ok(Arc::from(provider.into_provider()))
            }
        }
    }
}
