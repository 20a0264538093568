pub mod coercion;
pub mod f24;
pub mod guard;
pub mod import;
pub mod mapping;
pub mod rules;

pub use crate::domain::model::{
    DataType, FieldValue, FieldValues, SupplierFieldMapping, TargetField,
};
pub use crate::domain::ports::CategoryStore;
pub use crate::utils::error::Result;
