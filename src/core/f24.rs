use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::{AdminError, Result};
use crate::utils::validation::validate_range;

pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2999;

/// F24 繳款單的參考期間：月繳為 `MM/YYYY`，年繳只有 `YYYY`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct F24Period {
    pub month: Option<u32>,
    pub year: i32,
}

impl F24Period {
    pub fn monthly(month: u32, year: i32) -> Result<Self> {
        let period = Self {
            month: Some(month),
            year,
        };
        period.check()?;
        Ok(period)
    }

    pub fn annual(year: i32) -> Result<Self> {
        let period = Self { month: None, year };
        period.check()?;
        Ok(period)
    }

    pub fn is_annual(&self) -> bool {
        self.month.is_none()
    }

    fn check(&self) -> Result<()> {
        if let Some(month) = self.month {
            validate_range("f24.month", month, 1, 12)?;
        }
        validate_range("f24.year", self.year, MIN_YEAR, MAX_YEAR)
    }
}

impl fmt::Display for F24Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.month {
            Some(month) => write!(f, "{:02}/{:04}", month, self.year),
            None => write!(f, "{:04}", self.year),
        }
    }
}

impl FromStr for F24Period {
    type Err = AdminError;

    /// 接受 `MM/YYYY`、`MMYYYY` 與 `YYYY`
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || AdminError::InvalidConfigValueError {
            field: "f24.period".to_string(),
            value: s.to_string(),
            reason: "expected MM/YYYY, MMYYYY or YYYY".to_string(),
        };

        if !s.chars().all(|c| c.is_ascii_digit() || c == '/') {
            return Err(invalid());
        }

        let (month, year) = match (s.split_once('/'), s.len()) {
            (Some((m, y)), _) if m.len() == 2 && y.len() == 4 => (Some(m), y),
            (None, 6) => (Some(&s[..2]), &s[2..]),
            (None, 4) => (None, s),
            _ => return Err(invalid()),
        };

        let year: i32 = year.parse().map_err(|_| invalid())?;
        match month {
            Some(m) => Self::monthly(m.parse().map_err(|_| invalid())?, year),
            None => Self::annual(year),
        }
    }
}
