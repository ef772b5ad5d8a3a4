//! Reference data context
//!
//! The three datasets are loaded once and then passed by reference into every
//! query. Nothing in the core mutates them after load.

use crate::core::config::{DataPaths, DEFAULT_MASS_EQUIPMENT};
use crate::core::range::RangeTable;
use crate::entities::certificate::Certificate;
use crate::json::{parse_json_file, JsonError};

/// Immutable reference data shared by all queries of a session
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub certificates: Vec<Certificate>,
    pub mass_ranges: RangeTable,
    pub thermo_ranges: RangeTable,
    mass_equipment: String,
}

impl ReferenceData {
    pub fn new(certificates: Vec<Certificate>, mass_ranges: RangeTable, thermo_ranges: RangeTable) -> Self {
        Self {
            certificates,
            mass_ranges,
            thermo_ranges,
            mass_equipment: DEFAULT_MASS_EQUIPMENT.to_string(),
        }
    }

    /// Override the equipment tag used to resolve mass targets
    pub fn with_mass_equipment(mut self, equipment: impl Into<String>) -> Self {
        self.mass_equipment = equipment.into();
        self
    }

    pub fn mass_equipment(&self) -> &str {
        &self.mass_equipment
    }

    /// Load all three datasets from disk
    pub fn load(paths: &DataPaths) -> Result<Self, JsonError> {
        let certificates: Vec<Certificate> = parse_json_file(&paths.certificates)?;
        let mass_ranges: RangeTable = parse_json_file(&paths.mass_ranges)?;
        let thermo_ranges: RangeTable = parse_json_file(&paths.thermo_ranges)?;

        tracing::info!(
            certificates = certificates.len(),
            mass_ranges = mass_ranges.len(),
            thermo_ranges = thermo_ranges.len(),
            "reference data loaded"
        );

        Ok(Self::new(certificates, mass_ranges, thermo_ranges))
    }
}
