pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{InMemoryCategoryStore, JsonFileCategoryStore};
pub use config::MappingConfig;
pub use crate::core::{
    f24::F24Period, guard::RelationshipGuard, import::SupplierImporter, mapping::resolve_row,
};
pub use utils::error::{AdminError, FieldError, Result, RowErrors};
