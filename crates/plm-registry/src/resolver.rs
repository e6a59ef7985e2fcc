//! Resolution of stored type names into live list and provider instances.
//!
//! Metadata records only name their implementations. The [`TypeRegistry`]
//! maps those names to constructor functions registered at process start.
//! There is no scanning or reflection: a name that was never registered is a
//! [`ResolutionError::UnknownType`].
//!
//! Factories are called on every resolution; nothing is cached, so each
//! list gets its own provider instance unless the factory itself shares
//! state.

use std::collections::HashMap;
use std::sync::Arc;

use plm_types::{ListId, ListMetadata};
use tracing::{debug, warn};

use crate::error::{BoxError, ResolutionError, TypeRole};
use crate::list::{
    Initializable, ListInstance, PersistentList, PersistentListProvider, ProviderInstance,
};

type ProviderFactory = Arc<dyn Fn() -> Result<ProviderInstance, BoxError> + Send + Sync>;
type ListFactory = Arc<dyn Fn() -> Result<ListInstance, BoxError> + Send + Sync>;

/// A factory and the initialization tag it was registered with.
struct Registration<F> {
    factory: F,
    initializable: bool,
}

/// Collects factories before the [`TypeRegistry`] is frozen.
#[derive(Default)]
pub struct TypeRegistryBuilder {
    providers: HashMap<String, Registration<ProviderFactory>>,
    lists: HashMap<String, Registration<ListFactory>>,
}

impl TypeRegistryBuilder {
    /// Register a provider type with no initialization step.
    pub fn register_provider<P, F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        P: PersistentListProvider + 'static,
        F: Fn() -> Result<P, BoxError> + Send + Sync + 'static,
    {
        let factory: ProviderFactory = Arc::new(move || factory().map(ProviderInstance::plain));
        self.insert_provider(name.into(), factory, false)
    }

    /// Register a provider type that must be initialized before use.
    pub fn register_initializable_provider<P, F>(
        &mut self,
        name: impl Into<String>,
        factory: F,
    ) -> &mut Self
    where
        P: PersistentListProvider + Initializable + 'static,
        F: Fn() -> Result<P, BoxError> + Send + Sync + 'static,
    {
        let factory: ProviderFactory =
            Arc::new(move || factory().map(ProviderInstance::initializable));
        self.insert_provider(name.into(), factory, true)
    }

    /// Register a list type with no initialization step.
    pub fn register_list<L, F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        L: PersistentList + 'static,
        F: Fn() -> Result<L, BoxError> + Send + Sync + 'static,
    {
        let factory: ListFactory = Arc::new(move || factory().map(ListInstance::plain));
        self.insert_list(name.into(), factory, false)
    }

    /// Register a list type that must be initialized before publication.
    pub fn register_initializable_list<L, F>(
        &mut self,
        name: impl Into<String>,
        factory: F,
    ) -> &mut Self
    where
        L: PersistentList + Initializable + 'static,
        F: Fn() -> Result<L, BoxError> + Send + Sync + 'static,
    {
        let factory: ListFactory = Arc::new(move || factory().map(ListInstance::initializable));
        self.insert_list(name.into(), factory, true)
    }

    /// Freeze the registrations.
    pub fn build(self) -> TypeRegistry {
        debug!(
            providers = self.providers.len(),
            lists = self.lists.len(),
            "type registry built"
        );
        TypeRegistry {
            providers: self.providers,
            lists: self.lists,
        }
    }

    fn insert_provider(
        &mut self,
        name: String,
        factory: ProviderFactory,
        initializable: bool,
    ) -> &mut Self {
        let registration = Registration {
            factory,
            initializable,
        };
        if self.providers.insert(name.clone(), registration).is_some() {
            warn!(type_name = %name, "provider type registered twice; keeping the later factory");
        }
        self
    }

    fn insert_list(&mut self, name: String, factory: ListFactory, initializable: bool) -> &mut Self {
        let registration = Registration {
            factory,
            initializable,
        };
        if self.lists.insert(name.clone(), registration).is_some() {
            warn!(type_name = %name, "list type registered twice; keeping the later factory");
        }
        self
    }
}

/// Immutable map from type name to constructor, one namespace per role.
pub struct TypeRegistry {
    providers: HashMap<String, Registration<ProviderFactory>>,
    lists: HashMap<String, Registration<ListFactory>>,
}

impl TypeRegistry {
    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder::default()
    }

    /// Registered provider type names, sorted.
    pub fn provider_types(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Registered list type names, sorted.
    pub fn list_types(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.lists.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Construct a fresh provider of type `name`. The initialization hook
    /// has not run yet.
    pub fn resolve_provider(&self, name: &str) -> Result<ProviderInstance, ResolutionError> {
        let Some(entry) = self.providers.get(name) else {
            return Err(self.miss(name, TypeRole::Provider));
        };
        (entry.factory)().map_err(|e| ResolutionError::Construction {
            role: TypeRole::Provider,
            name: name.to_string(),
            reason: e.to_string(),
        })
    }

    /// Construct a fresh, unwired list of type `name`.
    pub fn resolve_list(&self, name: &str) -> Result<ListInstance, ResolutionError> {
        let Some(entry) = self.lists.get(name) else {
            return Err(self.miss(name, TypeRole::List));
        };
        (entry.factory)().map_err(|e| ResolutionError::Construction {
            role: TypeRole::List,
            name: name.to_string(),
            reason: e.to_string(),
        })
    }

    /// Check that `list`, built outside this registry, could be rebuilt
    /// from its metadata record: its provider and list type names are
    /// registered in the right roles, and the list carries the same
    /// initialization tag its type was registered with.
    pub fn check_restorable(&self, list: &ListInstance) -> Result<(), ResolutionError> {
        if let Some(provider) = list.as_list().provider() {
            let name = provider.type_name();
            if !self.providers.contains_key(name) {
                return Err(self.miss(name, TypeRole::Provider));
            }
        }

        let name = list.as_list().type_name();
        let Some(entry) = self.lists.get(name) else {
            return Err(self.miss(name, TypeRole::List));
        };
        if entry.initializable != list.needs_initialization() {
            return Err(ResolutionError::CapabilityMismatch {
                role: TypeRole::List,
                name: name.to_string(),
                registered_initializable: entry.initializable,
            });
        }
        Ok(())
    }

    /// Rebuild a stored list: resolve and initialize its provider, resolve
    /// the list, load the record, attach the provider, and initialize the
    /// list. The result is ready to publish.
    pub fn materialize(
        &self,
        record: &ListMetadata,
    ) -> Result<Arc<dyn PersistentList>, ResolutionError> {
        let instance = self.wire(record)?;
        instance
            .into_initialized()
            .map_err(|e| ResolutionError::Initialization {
                role: TypeRole::List,
                name: record.list_type.clone(),
                reason: e.to_string(),
            })
    }

    /// Build a brand-new list of the given types, wired to an initialized
    /// provider. The list's own hook is left for the registry to run when
    /// the list is ensured.
    pub fn instantiate(
        &self,
        key: &str,
        description: &str,
        provider_type: &str,
        list_type: &str,
    ) -> Result<ListInstance, ResolutionError> {
        let draft = ListMetadata::new(ListId::new(), key, provider_type, list_type, description);
        self.wire(&draft)
    }

    fn wire(&self, record: &ListMetadata) -> Result<ListInstance, ResolutionError> {
        let provider = self
            .resolve_provider(&record.provider_type)?
            .into_initialized()
            .map_err(|e| ResolutionError::Initialization {
                role: TypeRole::Provider,
                name: record.provider_type.clone(),
                reason: e.to_string(),
            })?;

        let mut instance = self.resolve_list(&record.list_type)?;
        let list = instance.as_list_mut();
        list.load(record);
        list.set_provider(provider);
        Ok(instance)
    }

    fn miss(&self, name: &str, expected: TypeRole) -> ResolutionError {
        let registered_elsewhere = match expected {
            TypeRole::Provider => self.lists.contains_key(name),
            TypeRole::List => self.providers.contains_key(name),
        };
        if registered_elsewhere {
            let registered = match expected {
                TypeRole::Provider => TypeRole::List,
                TypeRole::List => TypeRole::Provider,
            };
            ResolutionError::WrongRole {
                name: name.to_string(),
                expected,
                registered,
            }
        } else {
            ResolutionError::UnknownType {
                role: expected,
                name: name.to_string(),
            }
        }
    }
}
