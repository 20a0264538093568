#[cfg(feature = "cli")]
pub mod cli;
pub mod mapping_config;

#[cfg(feature = "cli")]
pub use cli::{CategoryAction, CliConfig, Command};
pub use mapping_config::{ImportSettings, MappingConfig, SupplierInfo};
