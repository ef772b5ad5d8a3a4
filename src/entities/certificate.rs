//! Certificate entity - a calibration certificate and its datasheet
//!
//! A certificate carries descriptive metadata about the calibrated asset, the
//! reference standards used, and one datasheet group per measured quantity.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::NumericCell;

/// Date format used by `CalDate` / `DueDate`
pub const STANDARD_DATE_FORMAT: &str = "%m/%d/%Y";

/// A single measurement point on a datasheet
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Measurement {
    /// Nominal (target) value
    pub nominal: NumericCell,

    /// Unit the nominal and uncertainty are expressed in
    pub units: String,

    /// Measured uncertainty of the reference standard at this point
    pub meas_uncert: NumericCell,

    /// Test uncertainty ratio, carried through as recorded
    #[serde(rename = "TUR", default)]
    pub tur: serde_json::Value,
}

impl Measurement {
    /// TUR rendered for display ("-" when absent)
    pub fn tur_display(&self) -> String {
        match &self.tur {
            serde_json::Value::Null => "-".to_string(),
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// A named group of measurements (e.g. "Mass", "Temperature")
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DatasheetGroup {
    pub group: String,

    #[serde(default)]
    pub measurements: Vec<Measurement>,
}

/// Reference standard used during a calibration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Standard {
    pub description: String,
    pub serial_no: String,
    pub cal_date: String,
    pub due_date: String,
}

/// Validity of a standard's calibration relative to a given day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExpirationStatus {
    Valid { days_remaining: i64 },
    ExpiresToday,
    Expired { days_ago: i64 },
    InvalidDate,
}

impl std::fmt::Display for ExpirationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpirationStatus::Valid { days_remaining } => {
                write!(f, "Valid ({} days remaining)", days_remaining)
            }
            ExpirationStatus::ExpiresToday => write!(f, "Expires today"),
            ExpirationStatus::Expired { days_ago } => write!(f, "Expired ({} days ago)", days_ago),
            ExpirationStatus::InvalidDate => write!(f, "Invalid date"),
        }
    }
}

impl Standard {
    /// Parsed due date, if it is in `MM/DD/YYYY` form
    pub fn due(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.due_date.trim(), STANDARD_DATE_FORMAT).ok()
    }

    /// Expiration status of this standard as of `today`
    pub fn expiration_status(&self, today: NaiveDate) -> ExpirationStatus {
        let Some(due) = self.due() else {
            return ExpirationStatus::InvalidDate;
        };

        let days = (due - today).num_days();
        match days {
            d if d < 0 => ExpirationStatus::Expired { days_ago: -d },
            0 => ExpirationStatus::ExpiresToday,
            d => ExpirationStatus::Valid { days_remaining: d },
        }
    }
}

/// Ambient conditions recorded during calibration
#[derive(Debug, Clone, Default, Serialize)]
pub struct EnvironmentalConditions<'a> {
    pub temperature: &'a str,
    pub relative_humidity: &'a str,
    pub barometric_pressure: Option<&'a str>,
}

/// A calibration certificate
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Certificate {
    /// Certificate number (unique key)
    pub cert_no: String,

    #[serde(default)]
    pub equipment_type: String,

    #[serde(default)]
    pub asset_description: String,

    #[serde(default)]
    pub manufacturer: String,

    #[serde(default)]
    pub model: String,

    #[serde(default)]
    pub operating_range: String,

    #[serde(default)]
    pub environmental_temperature: String,

    #[serde(default)]
    pub environmental_relative_humidity: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environmental_barometric_pressure: Option<String>,

    #[serde(default)]
    pub standards: Vec<Standard>,

    #[serde(default)]
    pub customer_requirements: String,

    #[serde(default)]
    pub remarks: String,

    /// Datasheet groups, in certificate order
    pub datasheet: Vec<DatasheetGroup>,
}

impl Certificate {
    pub fn environmental_conditions(&self) -> EnvironmentalConditions<'_> {
        EnvironmentalConditions {
            temperature: &self.environmental_temperature,
            relative_humidity: &self.environmental_relative_humidity,
            barometric_pressure: self
                .environmental_barometric_pressure
                .as_deref()
                .filter(|p| !p.trim().is_empty()),
        }
    }

    /// The first listed standard, used as the certificate's due date summary
    pub fn primary_standard(&self) -> Option<&Standard> {
        self.standards.first()
    }
}
