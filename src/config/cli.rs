use crate::domain::model::CategoryId;
use crate::utils::error::{AdminError, Result};
use crate::utils::validation::{validate_file_extension, validate_path, Validate};
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "backoffice")]
#[command(about = "Back-office tools: supplier CSV imports and guarded category deletion")]
pub struct CliConfig {
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Resolve a supplier CSV file through its field mappings
    Import {
        /// Path to the supplier mapping TOML file
        #[arg(short, long)]
        mappings: String,

        /// Path to the CSV file to import
        #[arg(short, long)]
        csv: String,

        /// Write the JSON report here instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        /// Exit with an error when any row is rejected
        #[arg(long)]
        strict: bool,
    },

    /// Inspect or delete categories in a JSON catalog
    Categories {
        /// Path to the catalog JSON file
        #[arg(long, default_value = "./catalog.json")]
        catalog: String,

        #[command(subcommand)]
        action: CategoryAction,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum CategoryAction {
    /// Count components and subcategories that reference a category
    Check { id: CategoryId },
    /// Delete a category unless something still references it
    Delete { id: CategoryId },
    /// Delete every unreferenced category among the given ids
    BulkDelete {
        #[arg(value_delimiter = ',', required = true)]
        ids: Vec<CategoryId>,
    },
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        match &self.command {
            Command::Import {
                mappings,
                csv,
                output,
                ..
            } => {
                validate_path("mappings", mappings)?;
                validate_file_extension("mappings", mappings, &["toml"])?;
                validate_path("csv", csv)?;
                validate_file_extension("csv", csv, &["csv", "txt"])?;
                if let Some(output) = output {
                    validate_path("output", output)?;
                }
                Ok(())
            }
            Command::Categories { catalog, action } => {
                validate_path("catalog", catalog)?;
                validate_file_extension("catalog", catalog, &["json"])?;
                if let CategoryAction::BulkDelete { ids } = action {
                    if ids.is_empty() {
                        return Err(AdminError::MissingConfigError {
                            field: "ids".to_string(),
                        });
                    }
                }
                Ok(())
            }
        }
    }
}
