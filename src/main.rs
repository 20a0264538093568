use backoffice_core::config::{CategoryAction, Command};
use backoffice_core::domain::model::DeleteOutcome;
use backoffice_core::utils::error::ErrorSeverity;
use backoffice_core::utils::{logger, validation::Validate};
use backoffice_core::{
    AdminError, CliConfig, JsonFileCategoryStore, MappingConfig, RelationshipGuard,
    SupplierImporter,
};
use clap::Parser;

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting backoffice CLI");
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = run(config.command).await {
        tracing::error!("❌ Command failed: {} (Severity: {:?})", e, e.severity());
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 4,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}

async fn run(command: Command) -> Result<(), AdminError> {
    match command {
        Command::Import {
            mappings,
            csv,
            output,
            strict,
        } => {
            let mapping_config = MappingConfig::from_file(&mappings)?;
            mapping_config.validate()?;
            tracing::info!(
                "📁 Loaded {} mapping(s) for supplier '{}'",
                mapping_config.mappings.len(),
                mapping_config.supplier.name
            );

            let data = tokio::fs::read(&csv).await?;
            let report = SupplierImporter::from_config(&mapping_config).import_bytes(&data)?;
            let json = serde_json::to_string_pretty(&report)?;

            match output {
                Some(path) => {
                    tokio::fs::write(&path, json).await?;
                    tracing::info!("📁 Report saved to: {}", path);
                }
                None => println!("{}", json),
            }

            if strict && !report.is_clean() {
                return Err(AdminError::ValidationError {
                    message: format!("{} row(s) rejected", report.rejected.len()),
                });
            }
            Ok(())
        }
        Command::Categories { catalog, action } => {
            let store = JsonFileCategoryStore::open(&catalog).await?;
            let guard = RelationshipGuard::new(store);

            match action {
                CategoryAction::Check { id } => {
                    let counts = guard.check_dependents(id).await?;
                    println!("{}", serde_json::to_string_pretty(&counts)?);
                }
                CategoryAction::Delete { id } => {
                    let outcome = guard.guarded_delete(id).await?;
                    println!("{}", serde_json::to_string_pretty(&outcome)?);
                    if let DeleteOutcome::Blocked { counts } = outcome {
                        eprintln!(
                            "🚫 Category {} is still used by {} component(s) and {} subcategory(ies)",
                            id, counts.component_count, counts.subcategory_count
                        );
                    }
                }
                CategoryAction::BulkDelete { ids } => {
                    let outcome = guard.guarded_bulk_delete(&ids).await?;
                    println!("{}", serde_json::to_string_pretty(&outcome)?);
                }
            }
            Ok(())
        }
    }
}
