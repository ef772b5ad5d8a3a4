//! Range tables and CMC resolution

use serde::{Deserialize, Serialize};

use crate::core::error::CalcError;
use crate::entities::range::CalibrationRangeRecord;

/// The range record selected for a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRange<'a> {
    pub id: &'a str,
    pub cmc: &'a str,
}

/// An ordered collection of range records for one equipment family
///
/// Resolution is first-match-wins in table order, so overlapping intervals
/// resolve to whichever record appears first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RangeTable(Vec<CalibrationRangeRecord>);

impl RangeTable {
    pub fn records(&self) -> &[CalibrationRangeRecord] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Find the first record for `equipment` whose interval contains `value`
    ///
    /// Only records of that equipment kind have their bounds read, so a bad
    /// bound elsewhere in the table does not affect this lookup.
    pub fn resolve(&self, equipment: &str, value: f64) -> Result<ResolvedRange<'_>, CalcError> {
        for record in self.0.iter().filter(|r| r.equipment == equipment) {
            let inside = record
                .range
                .contains(value)
                .ok_or_else(|| CalcError::InvalidRangeBound {
                    id: record.id.clone(),
                    min: record.range.min.to_string(),
                    max: record.range.max.to_string(),
                })?;

            if inside {
                tracing::debug!(equipment, value, id = %record.id, cmc = %record.cmc, "resolved range");
                return Ok(ResolvedRange {
                    id: &record.id,
                    cmc: &record.cmc,
                });
            }
        }

        Err(CalcError::NoApplicableRange {
            equipment: equipment.to_string(),
            value,
        })
    }
}
