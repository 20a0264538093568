use anyhow::Result;
use backoffice_core::domain::model::{DataType, FieldValue, TargetField};
use backoffice_core::utils::validation::Validate;
use backoffice_core::{FieldError, MappingConfig, SupplierImporter};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::str::FromStr;
use tempfile::TempDir;

const MAPPINGS: &str = r#"
[supplier]
id = 12
name = "Componenti Nord"

[import]
delimiter = ";"
has_header = true

[[mappings]]
id = 1
target_field = "supplier_code"
source_column_name = "Codice"
data_type = "string"
is_required = true

[mappings.transformation_rules]
trim = ""
strip_prefix = "CN-"

[[mappings]]
id = 2
target_field = "price"
source_column_name = "Prezzo"
data_type = "decimal"
is_required = true

[mappings.transformation_rules]
strip_suffix = " EUR"
replace_text = ",|."

[[mappings]]
id = 3
target_field = "quantity"
source_column_name = "Giacenza"
data_type = "integer"
default_value = "0"

[[mappings]]
id = 4
target_field = "available_from"
source_column_name = "Disponibile dal"
data_type = "date"

[[mappings]]
id = 5
target_field = "is_available"
source_column_name = "Attivo"
data_type = "boolean"
default_value = "yes"

[[mappings]]
id = 6
target_field = "brand"
source_column_name = "Marca"
data_type = "string"
is_active = false
"#;

const CSV: &str = "Codice;Prezzo;Giacenza;Disponibile dal;Attivo;Marca
 CN-0001 ;19,99 EUR;042;2024-03-01;SI;Acme
CN-0002;;5;;no;Acme
CN-0003;7.50;;;;
;abc;x;01/02/2024;;
";

fn load_config(dir: &TempDir) -> Result<MappingConfig> {
    let path = dir.path().join("componenti_nord.toml");
    std::fs::write(&path, MAPPINGS)?;
    Ok(MappingConfig::from_file(&path)?)
}

/// 整份檔案：成功列與失敗列分開回報，失敗列列出所有欄位錯誤
#[test]
fn test_import_supplier_file_end_to_end() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = load_config(&temp_dir)?;
    config.validate()?;

    let report = SupplierImporter::from_config(&config).import_str(CSV)?;

    assert_eq!(report.supplier_id, 12);
    assert_eq!(report.total_rows, 4);
    assert_eq!(report.imported.len(), 1);
    assert_eq!(report.rejected.len(), 3);

    // 第 2 行：Attivo = "SI" 不是可辨識的布林值
    let line2 = &report.rejected[0];
    assert_eq!(line2.line, 2);
    assert_eq!(
        line2.field_errors,
        vec![FieldError::InvalidFieldType {
            field: TargetField::IsAvailable,
            raw_value: "SI".to_string(),
            expected: DataType::Boolean,
        }]
    );

    // 第 3 行：價格空白視為缺少
    let line3 = &report.rejected[1];
    assert_eq!(line3.line, 3);
    assert_eq!(
        line3.field_errors,
        vec![FieldError::MissingRequiredField {
            field: TargetField::Price,
            mapping_id: 2,
        }]
    );

    // 第 5 行：一次回報所有問題
    let line5 = &report.rejected[2];
    assert_eq!(line5.line, 5);
    assert_eq!(line5.field_errors.len(), 4);
    assert_eq!(line5.errors.len(), 4);

    let imported = &report.imported[0];
    assert_eq!(imported.line, 4);
    assert_eq!(
        imported.values.get(&TargetField::SupplierCode),
        Some(&FieldValue::String("0003".to_string()))
    );
    assert_eq!(
        imported.values.get(&TargetField::Price),
        Some(&FieldValue::Decimal(BigDecimal::from_str("7.5")?))
    );
    assert_eq!(imported.values.get(&TargetField::Quantity), Some(&FieldValue::Integer(0)));
    assert_eq!(imported.values.get(&TargetField::IsAvailable), Some(&FieldValue::Boolean(true)));
    assert!(!imported.values.contains_key(&TargetField::AvailableFrom));
    assert!(!imported.values.contains_key(&TargetField::Brand));

    Ok(())
}

#[test]
fn test_transformed_row_resolves_all_types() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = load_config(&temp_dir)?;

    let csv = "Codice;Prezzo;Giacenza;Disponibile dal;Attivo\n CN-0001 ;19,99 EUR;042;2024-03-01;TRUE\n";
    let report = SupplierImporter::from_config(&config).import_str(csv)?;
    assert!(report.is_clean());

    let values = &report.imported[0].values;
    assert_eq!(values.get(&TargetField::SupplierCode), Some(&FieldValue::String("0001".to_string())));
    assert_eq!(
        values.get(&TargetField::Price),
        Some(&FieldValue::Decimal(BigDecimal::from_str("19.99")?))
    );
    assert_eq!(values.get(&TargetField::Quantity), Some(&FieldValue::Integer(42)));
    assert_eq!(
        values.get(&TargetField::AvailableFrom),
        Some(&FieldValue::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()))
    );

    let json = serde_json::to_value(&report)?;
    assert_eq!(json["imported"][0]["values"]["quantity"], serde_json::json!(42));
    assert_eq!(json["imported"][0]["values"]["available_from"], serde_json::json!("2024-03-01"));

    Ok(())
}

#[test]
fn test_malformed_mapping_file_is_rejected() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("broken.toml");
    std::fs::write(&path, MAPPINGS.replace("data_type = \"date\"", "data_type = \"datetime\""))?;

    assert!(MappingConfig::from_file(&path).is_err());
    Ok(())
}
