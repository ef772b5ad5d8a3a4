//! Calibration range records
//!
//! Each record states the CMC a laboratory claims for one equipment kind over
//! an inclusive interval of nominal values.

use serde::{Deserialize, Serialize};

use super::NumericCell;

/// Inclusive `[Min, Max]` interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RangeBounds {
    pub min: NumericCell,
    pub max: NumericCell,
}

impl RangeBounds {
    /// Whether `min <= value <= max`, or `None` when a bound is not numeric
    pub fn contains(&self, value: f64) -> Option<bool> {
        let min = self.min.as_f64()?;
        let max = self.max.as_f64()?;
        Some(min <= value && value <= max)
    }
}

/// One row of a range table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationRangeRecord {
    /// Equipment kind tag (e.g. "Balances & Scales", "°C", "%RH")
    #[serde(rename = "Equipment")]
    pub equipment: String,

    #[serde(rename = "Range")]
    pub range: RangeBounds,

    #[serde(rename = "ID")]
    pub id: String,

    /// CMC expression text, e.g. "5 µg + 2 µg/g"
    #[serde(rename = "CMC")]
    pub cmc: String,
}
