use crate::domain::model::{DataType, TargetField};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Category store error: {message}")]
    StoreError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AdminError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AdminError::ValidationError { .. } => ErrorSeverity::Low,
            AdminError::CsvError(_) | AdminError::SerializationError(_) => ErrorSeverity::Medium,
            AdminError::ConfigError { .. }
            | AdminError::InvalidConfigValueError { .. }
            | AdminError::MissingConfigError { .. } => ErrorSeverity::High,
            AdminError::IoError(_) | AdminError::StoreError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AdminError::CsvError(_) => "Check the CSV delimiter and that every row is well formed",
            AdminError::IoError(_) => "Check that the file exists and is readable/writable",
            AdminError::SerializationError(_) => "Check that the catalog file is valid JSON",
            AdminError::ConfigError { .. }
            | AdminError::InvalidConfigValueError { .. }
            | AdminError::MissingConfigError { .. } => {
                "Fix the mapping configuration file and run again"
            }
            AdminError::ValidationError { .. } => "Review the reported rows and correct the input",
            AdminError::StoreError { .. } => "Verify the category store is reachable and retry",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AdminError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration field '{}' is invalid: {}", field, reason)
            }
            AdminError::MissingConfigError { field } => {
                format!("Configuration field '{}' is required", field)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AdminError>;

/// 單一欄位在解析 CSV 列時的失敗
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("missing required field '{field}' (mapping #{mapping_id})")]
    MissingRequiredField { field: TargetField, mapping_id: u64 },

    #[error("field '{field}': cannot read '{raw_value}' as {expected}")]
    InvalidFieldType {
        field: TargetField,
        raw_value: String,
        expected: DataType,
    },
}

impl FieldError {
    pub fn field(&self) -> TargetField {
        match self {
            FieldError::MissingRequiredField { field, .. }
            | FieldError::InvalidFieldType { field, .. } => *field,
        }
    }
}

/// 一列中收集到的所有欄位錯誤，保證非空
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{} field error(s): {}", .0.len(), join_errors(.0))]
pub struct RowErrors(Vec<FieldError>);

impl RowErrors {
    pub(crate) fn new(errors: Vec<FieldError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self(errors))
        }
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.0
    }
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_errors_never_empty() {
        assert!(RowErrors::new(vec![]).is_none());

        let errors = RowErrors::new(vec![FieldError::MissingRequiredField {
            field: TargetField::Price,
            mapping_id: 7,
        }])
        .unwrap();
        assert_eq!(errors.errors().len(), 1);
        assert_eq!(errors.errors()[0].field(), TargetField::Price);
        assert!(errors.to_string().contains("mapping #7"));
    }

    #[test]
    fn test_severity_and_messages() {
        let err = AdminError::MissingConfigError {
            field: "supplier.id".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(
            err.user_friendly_message(),
            "Configuration field 'supplier.id' is required"
        );

        let err = AdminError::StoreError {
            message: "locked".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }
}
