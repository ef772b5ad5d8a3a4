//! Core module - reference data, conversions and the uncertainty pipeline

pub mod catalog;
pub mod cmc;
pub mod config;
pub mod dataset;
pub mod error;
pub mod lookup;
pub mod project;
pub mod range;
pub mod uncertainty;
pub mod units;

pub use catalog::NominalEntry;
pub use cmc::CmcExpression;
pub use config::{Config, DataPaths};
pub use dataset::ReferenceData;
pub use error::CalcError;
pub use project::{Project, ProjectError};
pub use range::{RangeTable, ResolvedRange};
pub use uncertainty::{process_target, resolve_target, CombinedUncertainty, TargetRange, UncertaintyResult};
pub use units::{Unit, UnitFamily};
