use std::collections::HashSet;

use crate::core::coercion::coerce;
use crate::domain::model::{FieldValues, SupplierFieldMapping, TargetField};
use crate::utils::error::{FieldError, RowErrors};

/// 依供應商的欄位對應規則，把一列原始 CSV 轉成 目標欄位 → 型別值。
///
/// 欄位查找順序：標題名稱（大小寫敏感的完全比對）、欄位索引、預設值。
/// 空白或只有空白字元的儲存格，以及套用轉換規則後變成空白的儲存格，都視為不存在。
/// 同一目標欄位有多條啟用中的規則時，以宣告順序的第一條為準。
///
/// 所有欄位錯誤都會被收集，讓呼叫端一次回報整列的問題。
pub fn resolve_row(
    raw_row: &[String],
    header_names: Option<&[String]>,
    mappings: &[SupplierFieldMapping],
) -> Result<FieldValues, RowErrors> {
    let mut values = FieldValues::new();
    let mut errors = Vec::new();
    let mut seen: HashSet<TargetField> = HashSet::new();

    for mapping in mappings.iter().filter(|m| m.is_active) {
        if !seen.insert(mapping.target_field) {
            tracing::debug!(
                "Skipping mapping #{}: '{}' already mapped earlier",
                mapping.id,
                mapping.target_field
            );
            continue;
        }

        // 轉換後變成空白的儲存格與空儲存格同樣視為不存在
        let located = locate_cell(raw_row, header_names, mapping)
            .map(|cell| (cell.to_string(), mapping.transformation_rules.apply(cell)))
            .filter(|(_, transformed)| !transformed.trim().is_empty());

        let (raw, transformed) = match located {
            Some(cell) => cell,
            None => match &mapping.default_value {
                Some(default) => (default.clone(), default.clone()),
                None => {
                    if mapping.is_required {
                        errors.push(FieldError::MissingRequiredField {
                            field: mapping.target_field,
                            mapping_id: mapping.id,
                        });
                    }
                    continue;
                }
            },
        };

        match coerce(&transformed, mapping.data_type) {
            Some(value) => {
                values.insert(mapping.target_field, value);
            }
            None => errors.push(FieldError::InvalidFieldType {
                field: mapping.target_field,
                raw_value: raw,
                expected: mapping.data_type,
            }),
        }
    }

    match RowErrors::new(errors) {
        Some(errors) => Err(errors),
        None => Ok(values),
    }
}

fn locate_cell<'a>(
    raw_row: &'a [String],
    header_names: Option<&[String]>,
    mapping: &SupplierFieldMapping,
) -> Option<&'a str> {
    let by_name = header_names.and_then(|headers| {
        headers
            .iter()
            .position(|h| h == &mapping.source_column_name)
    });

    by_name
        .or(mapping.source_column_index)
        .and_then(|index| raw_row.get(index))
        .map(String::as_str)
        .filter(|cell| !cell.trim().is_empty())
}
