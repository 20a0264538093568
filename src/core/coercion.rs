use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::str::FromStr;

use crate::domain::model::{DataType, FieldValue};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

const TRUTHY: [&str; 3] = ["1", "true", "yes"];
const FALSY: [&str; 3] = ["0", "false", "no"];

/// 將儲存格文字轉成宣告的型別，失敗時回傳 None
pub fn coerce(raw: &str, data_type: DataType) -> Option<FieldValue> {
    match data_type {
        DataType::String => Some(FieldValue::String(raw.to_string())),
        DataType::Integer => raw.trim().parse::<i64>().ok().map(FieldValue::Integer),
        DataType::Decimal => parse_decimal(raw.trim()).map(FieldValue::Decimal),
        DataType::Boolean => parse_bool(raw.trim()).map(FieldValue::Boolean),
        DataType::Date => NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
            .ok()
            .map(FieldValue::Date),
    }
}

fn parse_decimal(value: &str) -> Option<BigDecimal> {
    // BigDecimal 也接受科學記號與 `_` 分隔；千分位與數字分隔符號一律拒絕
    if value.is_empty() || value.contains(',') || value.contains('_') {
        return None;
    }
    BigDecimal::from_str(value).ok()
}

fn parse_bool(value: &str) -> Option<bool> {
    let lowered = value.to_ascii_lowercase();
    if TRUTHY.contains(&lowered.as_str()) {
        Some(true)
    } else if FALSY.contains(&lowered.as_str()) {
        Some(false)
    } else {
        None
    }
}
