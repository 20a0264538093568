use crate::core::coercion::coerce;
use crate::domain::model::{SupplierFieldMapping, TargetField};
use crate::utils::error::{AdminError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// 單一供應商的 CSV 欄位對應設定檔（TOML）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingConfig {
    pub supplier: SupplierInfo,
    pub import: Option<ImportSettings>,
    #[serde(default)]
    pub mappings: Vec<SupplierFieldMapping>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierInfo {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportSettings {
    pub delimiter: Option<String>,
    pub has_header: Option<bool>,
    pub skip_rows: Option<usize>,
}

impl ImportSettings {
    pub fn delimiter_byte(&self) -> Result<u8> {
        let delimiter = self.delimiter.as_deref().unwrap_or(",");
        let delimiter = if delimiter == "\\t" { "\t" } else { delimiter };

        match delimiter.as_bytes() {
            [byte] => Ok(*byte),
            _ => Err(AdminError::InvalidConfigValueError {
                field: "import.delimiter".to_string(),
                value: delimiter.to_string(),
                reason: "Delimiter must be a single ASCII character".to_string(),
            }),
        }
    }

    pub fn has_header(&self) -> bool {
        self.has_header.unwrap_or(true)
    }

    pub fn skip_rows(&self) -> usize {
        self.skip_rows.unwrap_or(0)
    }
}

impl MappingConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AdminError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        let mut config: Self =
            toml::from_str(&processed_content).map_err(|e| AdminError::ConfigError {
                message: format!("TOML parsing error: {}", e),
            })?;

        // 未指定 supplier_id 的規則屬於檔案中的供應商
        for mapping in &mut config.mappings {
            if mapping.supplier_id == 0 {
                mapping.supplier_id = config.supplier.id;
            }
        }

        Ok(config)
    }

    /// 替換環境變數 (例如 ${SUPPLIER_ID})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AdminError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn active_mappings(&self) -> impl Iterator<Item = &SupplierFieldMapping> {
        self.mappings.iter().filter(|m| m.is_active)
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_positive_number("supplier.id", self.supplier.id, 1)?;
        validate_non_empty_string("supplier.name", &self.supplier.name)?;

        if let Some(import) = &self.import {
            import.delimiter_byte()?;
        }

        if self.active_mappings().next().is_none() {
            return Err(AdminError::MissingConfigError {
                field: "mappings".to_string(),
            });
        }

        let mut targets: HashSet<TargetField> = HashSet::new();
        for mapping in &self.mappings {
            let field = format!("mappings[{}]", mapping.id);

            if mapping.supplier_id != self.supplier.id {
                return Err(AdminError::InvalidConfigValueError {
                    field: format!("{}.supplier_id", field),
                    value: mapping.supplier_id.to_string(),
                    reason: format!("Mapping belongs to supplier {}", self.supplier.id),
                });
            }

            validate_non_empty_string(
                &format!("{}.source_column_name", field),
                &mapping.source_column_name,
            )?;

            if let Some(default) = &mapping.default_value {
                if coerce(default, mapping.data_type).is_none() {
                    return Err(AdminError::InvalidConfigValueError {
                        field: format!("{}.default_value", field),
                        value: default.clone(),
                        reason: format!("Default is not a valid {}", mapping.data_type),
                    });
                }
            }

            if mapping.is_active && !targets.insert(mapping.target_field) {
                tracing::warn!(
                    "⚠️ Target field '{}' is mapped more than once; mapping #{} will be ignored",
                    mapping.target_field,
                    mapping.id
                );
            }
        }

        Ok(())
    }
}

impl Validate for MappingConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::DataType;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[supplier]
id = 3
name = "Ferramenta Rossi"

[import]
delimiter = ";"

[[mappings]]
id = 1
supplier_id = 3
target_field = "price"
source_column_name = "Price"
data_type = "decimal"
is_required = true

[[mappings]]
id = 2
supplier_id = 3
target_field = "unit"
source_column_name = "UoM"
source_column_index = 4
data_type = "string"
default_value = "pz"
is_active = false
"#;

    #[test]
    fn test_parse_basic_mapping_config() {
        let config = MappingConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.supplier.id, 3);
        assert_eq!(config.mappings.len(), 2);
        assert_eq!(config.mappings[0].target_field, TargetField::Price);
        assert_eq!(config.mappings[0].data_type, DataType::Decimal);
        assert_eq!(config.mappings[1].source_column_index, Some(4));
        assert_eq!(config.active_mappings().count(), 1);
        assert_eq!(config.import.as_ref().unwrap().delimiter_byte().unwrap(), b';');
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_SUPPLIER_NAME", "Grossista Bianchi");

        let config = MappingConfig::from_toml_str(
            r#"
[supplier]
id = 4
name = "${TEST_SUPPLIER_NAME}"
"#,
        )
        .unwrap();
        assert_eq!(config.supplier.name, "Grossista Bianchi");

        std::env::remove_var("TEST_SUPPLIER_NAME");
    }

    #[test]
    fn test_validation_rejects_bad_default() {
        let content = BASIC.replace("data_type = \"string\"", "data_type = \"integer\"");
        let config = MappingConfig::from_toml_str(&content).unwrap();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("default_value"));
    }

    #[test]
    fn test_validation_rejects_foreign_supplier_mapping() {
        let content = BASIC.replacen("supplier_id = 3", "supplier_id = 9", 1);
        let config = MappingConfig::from_toml_str(&content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_supplier_id_checked_without_truncation() {
        let with_id = |id: &str| {
            BASIC
                .replacen("id = 3\n", &format!("id = {}\n", id), 1)
                .replace("supplier_id = 3", &format!("supplier_id = {}", id))
        };

        // 2^32 在 32 位元平台轉成 usize 會變成 0
        let config = MappingConfig::from_toml_str(&with_id("4294967296")).unwrap();
        assert_eq!(config.supplier.id, 1 << 32);
        assert!(config.validate().is_ok());

        let config = MappingConfig::from_toml_str(&with_id("0")).unwrap();
        match config.validate() {
            Err(AdminError::InvalidConfigValueError { field, .. }) => assert_eq!(field, "supplier.id"),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_mapping_inherits_supplier_id() {
        let content = BASIC.replace("supplier_id = 3\n", "");
        let config = MappingConfig::from_toml_str(&content).unwrap();
        assert!(config.mappings.iter().all(|m| m.supplier_id == 3));
    }

    #[test]
    fn test_validation_requires_an_active_mapping() {
        let config = MappingConfig::from_toml_str(
            r#"
[supplier]
id = 4
name = "Vuoto"
"#,
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(AdminError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_unknown_transformation_rule_fails_parsing() {
        let content = format!("{}\n[mappings.transformation_rules]\nshout = \"\"\n", BASIC);
        assert!(MappingConfig::from_toml_str(&content).is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = MappingConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.supplier.name, "Ferramenta Rossi");
    }
}
