//! cala: calibration assistant
//!
//! Computes the combined measurement uncertainty of a calibration target
//! from certificate datasheets and CMC range tables.

pub mod cli;
pub mod core;
pub mod entities;
pub mod json;
