// Adapters layer: concrete CategoryStore implementations (in-memory snapshot, JSON file).

pub mod file_store;
pub mod memory_store;

pub use file_store::JsonFileCategoryStore;
pub use memory_store::InMemoryCategoryStore;
