use serde::Serialize;

use crate::config::mapping_config::{ImportSettings, MappingConfig};
use crate::core::mapping::resolve_row;
use crate::domain::model::{FieldValues, SupplierFieldMapping};
use crate::utils::error::{FieldError, Result};

#[derive(Debug, Clone, Serialize)]
pub struct ImportedRow {
    pub line: usize,
    pub values: FieldValues,
}

#[derive(Debug, Clone, Serialize)]
pub struct RejectedRow {
    pub line: usize,
    pub errors: Vec<String>,
    #[serde(skip)]
    pub field_errors: Vec<FieldError>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub supplier_id: u64,
    pub total_rows: usize,
    pub imported: Vec<ImportedRow>,
    pub rejected: Vec<RejectedRow>,
}

impl ImportReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// 使用某供應商的欄位對應規則讀取整份 CSV
pub struct SupplierImporter {
    supplier_id: u64,
    mappings: Vec<SupplierFieldMapping>,
    settings: ImportSettings,
}

impl SupplierImporter {
    pub fn new(
        supplier_id: u64,
        mappings: Vec<SupplierFieldMapping>,
        settings: ImportSettings,
    ) -> Self {
        Self {
            supplier_id,
            mappings,
            settings,
        }
    }

    pub fn from_config(config: &MappingConfig) -> Self {
        Self::new(
            config.supplier.id,
            config.mappings.clone(),
            config.import.clone().unwrap_or_default(),
        )
    }

    pub fn import_str(&self, content: &str) -> Result<ImportReport> {
        self.import_bytes(content.as_bytes())
    }

    pub fn import_bytes(&self, data: &[u8]) -> Result<ImportReport> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.settings.delimiter_byte()?)
            .from_reader(data);

        let mut header: Option<Vec<String>> = None;
        let mut report = ImportReport {
            supplier_id: self.supplier_id,
            total_rows: 0,
            imported: Vec::new(),
            rejected: Vec::new(),
        };

        for (index, result) in reader.records().enumerate() {
            let record = result?;
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(index + 1);

            if index < self.settings.skip_rows() {
                tracing::debug!("Skipping line {}", line);
                continue;
            }

            let cells: Vec<String> = record.iter().map(|c| c.to_string()).collect();

            if self.settings.has_header() && header.is_none() {
                tracing::debug!("Header on line {}: {:?}", line, cells);
                header = Some(cells);
                continue;
            }

            if cells.iter().all(|c| c.trim().is_empty()) {
                continue;
            }

            report.total_rows += 1;
            match resolve_row(&cells, header.as_deref(), &self.mappings) {
                Ok(values) => report.imported.push(ImportedRow { line, values }),
                Err(errors) => {
                    tracing::debug!("Line {} rejected: {}", line, errors);
                    let field_errors = errors.into_errors();
                    report.rejected.push(RejectedRow {
                        line,
                        errors: field_errors.iter().map(|e| e.to_string()).collect(),
                        field_errors,
                    });
                }
            }
        }

        tracing::info!(
            "📥 Supplier {}: {} row(s), {} imported, {} rejected",
            self.supplier_id,
            report.total_rows,
            report.imported.len(),
            report.rejected.len()
        );

        Ok(report)
    }
}
