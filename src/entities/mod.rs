//! Reference data entities
//!
//! These mirror the JSON datasets a laboratory maintains: calibration
//! certificates with their datasheets, and CMC range tables.

pub mod certificate;
pub mod numeric;
pub mod range;

pub use certificate::{
    Certificate, DatasheetGroup, EnvironmentalConditions, ExpirationStatus, Measurement, Standard,
};
pub use numeric::NumericCell;
pub use range::{CalibrationRangeRecord, RangeBounds};
