use std::path::PathBuf;

use plm_registry::TypeRegistryBuilder;

use crate::file::FileProvider;
use crate::lists::{FifoList, LifoList};
use crate::memory::MemoryProvider;

pub const FIFO_LIST: &str = "plm.list.fifo";
pub const LIFO_LIST: &str = "plm.list.lifo";
pub const MEMORY_PROVIDER: &str = "plm.provider.memory";
pub const FILE_PROVIDER: &str = "plm.provider.file";

/// Settings the built-in types need at construction time.
#[derive(Clone, Debug)]
pub struct BuiltinConfig {
    /// Directory used by [`FileProvider`].
    pub items_dir: PathBuf,
}

impl Default for BuiltinConfig {
    fn default() -> Self {
        Self {
            items_dir: PathBuf::from(".plm/items"),
        }
    }
}

/// Register every built-in list and provider type.
pub fn register_builtin_types<'a>(
    builder: &'a mut TypeRegistryBuilder,
    config: &BuiltinConfig,
) -> &'a mut TypeRegistryBuilder {
    let items_dir = config.items_dir.clone();
    builder
        .register_list(FIFO_LIST, || Ok(FifoList::default()))
        .register_list(LIFO_LIST, || Ok(LifoList::default()))
        .register_provider(MEMORY_PROVIDER, || Ok(MemoryProvider::new()))
        .register_initializable_provider(FILE_PROVIDER, move || {
            Ok(FileProvider::new(items_dir.clone()))
        })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use plm_registry::{ListInstance, PersistentListRegistry, TypeRegistry};
    use plm_store::{InMemoryMetadataStore, MetadataStore};
    use plm_types::{ListId, ListItem, ListMetadata};

    use super::*;

    fn types(dir: &std::path::Path) -> TypeRegistry {
        let mut builder = TypeRegistry::builder();
        register_builtin_types(
            &mut builder,
            &BuiltinConfig {
                items_dir: dir.join("items"),
            },
        );
        builder.build()
    }

    #[test]
    fn registers_all_builtin_names() {
        let dir = tempfile::tempdir().unwrap();
        let types = types(dir.path());
        assert_eq!(types.list_types(), vec![FIFO_LIST, LIFO_LIST]);
        assert_eq!(types.provider_types(), vec![FILE_PROVIDER, MEMORY_PROVIDER]);
    }

    #[test]
    fn file_provider_is_initialized_on_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let types = types(dir.path());

        let instance = types.instantiate("A", "", FILE_PROVIDER, FIFO_LIST).unwrap();

        assert!(dir.path().join("items").is_dir());
        assert!(!instance.needs_initialization());
    }

    #[test]
    fn file_backed_lists_keep_items_across_restart() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(InMemoryMetadataStore::new());

        {
            let registry = PersistentListRegistry::new(store.clone(), types(dir.path()));
            registry.on_startup().unwrap();
            let instance = registry
                .types()
                .instantiate("triage", "walk-ins", FILE_PROVIDER, LIFO_LIST)
                .unwrap();
            let list = registry.ensure_list(instance).unwrap();
            list.add(ListItem::new("p1")).unwrap();
            list.add(ListItem::new("p2")).unwrap();
        }

        let registry = PersistentListRegistry::new(store, types(dir.path()));
        registry.on_startup().unwrap();
        let list = registry.get_list("triage").unwrap().unwrap();
        assert_eq!(list.type_name(), LIFO_LIST);
        assert_eq!(list.description(), "walk-ins");
        assert_eq!(list.take_next().unwrap().unwrap().cargo, "p2");
    }

    #[test]
    fn startup_with_one_bad_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(InMemoryMetadataStore::new());
        store
            .insert(&ListMetadata::new(ListId::new(), "A", MEMORY_PROVIDER, FIFO_LIST, ""))
            .unwrap();
        store
            .insert(&ListMetadata::new(ListId::new(), "B", MEMORY_PROVIDER, "BadType", ""))
            .unwrap();

        let registry = PersistentListRegistry::new(store, types(dir.path()));
        let report = registry.on_startup().unwrap();

        let keys: Vec<String> = registry.get_lists().iter().map(|l| l.key().to_string()).collect();
        assert_eq!(keys, vec!["A"]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].key, "B");
    }

    #[test]
    fn plain_builtin_lists_can_be_ensured_directly() {
        let dir = tempfile::tempdir().unwrap();
        let registry =
            PersistentListRegistry::new(Arc::new(InMemoryMetadataStore::new()), types(dir.path()));
        registry.on_startup().unwrap();

        let list = FifoList::new("A", "direct").with_provider(Arc::new(MemoryProvider::new()));
        let published = registry.ensure_list(ListInstance::plain(list)).unwrap();

        assert_eq!(published.provider().unwrap().type_name(), MEMORY_PROVIDER);
    }
}
