//! Built-in list and provider types.
//!
//! | type name              | kind     | behavior                               |
//! |------------------------|----------|----------------------------------------|
//! | `plm.list.fifo`        | list     | next item is the oldest                |
//! | `plm.list.lifo`        | list     | next item is the newest                |
//! | `plm.provider.memory`  | provider | items in process memory                |
//! | `plm.provider.file`    | provider | one JSON file per list in a directory  |
//!
//! [`register_builtin_types`] adds all of them to a
//! [`TypeRegistryBuilder`](plm_registry::TypeRegistryBuilder).

pub mod builtin;
pub mod file;
mod items;
pub mod lists;
pub mod memory;

pub use builtin::{
    register_builtin_types, BuiltinConfig, FIFO_LIST, FILE_PROVIDER, LIFO_LIST, MEMORY_PROVIDER,
};
pub use file::FileProvider;
pub use lists::{FifoList, LifoList};
pub use memory::MemoryProvider;
