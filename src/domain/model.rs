use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::core::rules::TransformationRules;

pub type CategoryId = u64;

/// 系統內可被供應商 CSV 欄位對應的目標欄位
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetField {
    SupplierCode,
    Name,
    Description,
    Price,
    CostPrice,
    Quantity,
    Unit,
    Brand,
    Category,
    Barcode,
    Weight,
    LeadTimeDays,
    AvailableFrom,
    IsAvailable,
}

impl TargetField {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetField::SupplierCode => "supplier_code",
            TargetField::Name => "name",
            TargetField::Description => "description",
            TargetField::Price => "price",
            TargetField::CostPrice => "cost_price",
            TargetField::Quantity => "quantity",
            TargetField::Unit => "unit",
            TargetField::Brand => "brand",
            TargetField::Category => "category",
            TargetField::Barcode => "barcode",
            TargetField::Weight => "weight",
            TargetField::LeadTimeDays => "lead_time_days",
            TargetField::AvailableFrom => "available_from",
            TargetField::IsAvailable => "is_available",
        }
    }
}

impl fmt::Display for TargetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    String,
    Integer,
    Decimal,
    Boolean,
    Date,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::String => "string",
            DataType::Integer => "integer",
            DataType::Decimal => "decimal",
            DataType::Boolean => "boolean",
            DataType::Date => "date",
        };
        f.write_str(name)
    }
}

/// 供應商 CSV 欄位對應規則（持久化的扁平紀錄）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierFieldMapping {
    pub id: u64,
    #[serde(default)]
    pub supplier_id: u64,
    pub target_field: TargetField,
    pub source_column_name: String,
    #[serde(default)]
    pub source_column_index: Option<usize>,
    pub data_type: DataType,
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub transformation_rules: TransformationRules,
}

fn default_active() -> bool {
    true
}

/// 轉型後的欄位值
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Boolean(bool),
    Integer(i64),
    Decimal(BigDecimal),
    Date(NaiveDate),
    String(String),
}

pub type FieldValues = BTreeMap<TargetField, FieldValue>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub id: u64,
    pub name: String,
    pub category_id: CategoryId,
}

/// 分類與元件的快照，檔案型 store 以 JSON 保存
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub components: Vec<Component>,
}

impl CatalogSnapshot {
    pub fn contains(&self, category_id: CategoryId) -> bool {
        self.categories.iter().any(|c| c.id == category_id)
    }

    pub fn count_components(&self, category_id: CategoryId) -> u64 {
        self.components
            .iter()
            .filter(|c| c.category_id == category_id)
            .count() as u64
    }

    pub fn count_subcategories(&self, category_id: CategoryId) -> u64 {
        self.categories
            .iter()
            .filter(|c| c.parent_id == Some(category_id))
            .count() as u64
    }

    /// 移除分類；不存在時回傳 `false`
    pub fn remove_category(&mut self, category_id: CategoryId) -> bool {
        let before = self.categories.len();
        self.categories.retain(|c| c.id != category_id);
        self.categories.len() < before
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependentKind {
    Components,
    Subcategories,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependentCounts {
    pub component_count: u64,
    pub subcategory_count: u64,
}

impl DependentCounts {
    pub fn is_clear(&self) -> bool {
        self.component_count == 0 && self.subcategory_count == 0
    }

    pub fn blocking_kinds(&self) -> Vec<DependentKind> {
        let mut kinds = Vec::new();
        if self.component_count > 0 {
            kinds.push(DependentKind::Components);
        }
        if self.subcategory_count > 0 {
            kinds.push(DependentKind::Subcategories);
        }
        kinds
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeleteOutcome {
    Deleted,
    Blocked { counts: DependentCounts },
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedCategory {
    pub id: CategoryId,
    pub counts: DependentCounts,
    pub blocked_by: Vec<DependentKind>,
}

/// 沒有依賴、但 store 刪除失敗的分類
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedDeletion {
    pub id: CategoryId,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkDeleteOutcome {
    pub deleted: Vec<CategoryId>,
    pub blocked: Vec<BlockedCategory>,
    pub missing: Vec<CategoryId>,
    pub failed: Vec<FailedDeletion>,
}
