//! CMC expression parsing
//!
//! A CMC (Calibration and Measurement Capability) is written as a fixed term
//! optionally followed by a term proportional to the nominal:
//!
//! ```text
//! 5 µg
//! 5 µg + 2 µg/g
//! 0.05 °C ± 0.1 µg/g
//! ```
//!
//! Only the leading number of each term is read. Units are implied by the
//! range table the expression came from.

use serde::{Deserialize, Serialize};

use crate::core::error::CalcError;

/// Fixed and proportional components of a CMC
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CmcExpression {
    /// Fixed term (µg for mass tables)
    pub fixed: f64,
    /// Proportional term (µg per g for mass tables)
    pub proportional: f64,
}

impl CmcExpression {
    /// Parse a CMC expression string
    pub fn parse(cmc: &str) -> Result<Self, CalcError> {
        let parts: Vec<&str> = cmc.split(['+', '±']).collect();

        let (fixed, proportional) = match parts.as_slice() {
            [fixed] => (leading_number(cmc, fixed)?, 0.0),
            [fixed, proportional] => (
                leading_number(cmc, fixed)?,
                leading_number(cmc, proportional)?,
            ),
            _ => {
                return Err(CalcError::malformed_cmc(
                    cmc,
                    format!("expected at most 2 terms, found {}", parts.len()),
                ))
            }
        };

        if fixed < 0.0 || proportional < 0.0 {
            return Err(CalcError::malformed_cmc(cmc, "components must be non-negative"));
        }

        tracing::debug!(cmc, fixed, proportional, "parsed CMC");
        Ok(Self {
            fixed,
            proportional,
        })
    }

    /// Total CMC at a nominal value, in the fixed term's unit scale
    pub fn total_at(&self, nominal: f64) -> f64 {
        self.fixed + self.proportional * nominal
    }
}

impl std::str::FromStr for CmcExpression {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Read the first whitespace-delimited token of a term as a float
fn leading_number(cmc: &str, term: &str) -> Result<f64, CalcError> {
    let token = term
        .split_whitespace()
        .next()
        .ok_or_else(|| CalcError::malformed_cmc(cmc, "empty term"))?;

    token
        .parse::<f64>()
        .map_err(|_| CalcError::malformed_cmc(cmc, format!("'{}' is not a number", token)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_only() {
        let cmc = CmcExpression::parse("5 µg").unwrap();
        assert_eq!(cmc.fixed, 5.0);
        assert_eq!(cmc.proportional, 0.0);
    }

    #[test]
    fn test_fixed_and_proportional() {
        let cmc = CmcExpression::parse("5 µg + 2 µg/g").unwrap();
        assert_eq!(cmc.fixed, 5.0);
        assert_eq!(cmc.proportional, 2.0);
    }

    #[test]
    fn test_plus_minus_separator() {
        let cmc: CmcExpression = "0.3 mg ± 1.5 µg/g".parse().unwrap();
        assert_eq!(cmc.fixed, 0.3);
        assert_eq!(cmc.proportional, 1.5);
    }

    #[test]
    fn test_tight_spacing() {
        let cmc = CmcExpression::parse("12µg+3 µg/g").unwrap_err();
        // "12µg" is a single token and not a number
        assert!(matches!(cmc, CalcError::MalformedCmc { .. }));

        let cmc = CmcExpression::parse("12 µg+3 µg/g").unwrap();
        assert_eq!(cmc.fixed, 12.0);
        assert_eq!(cmc.proportional, 3.0);
    }

    #[test]
    fn test_malformed_inputs() {
        for input in ["", "a+b+c", "1 + 2 + 3", "µg 5", "5 µg +", "-1 µg"] {
            let err = CmcExpression::parse(input).unwrap_err();
            assert!(
                matches!(err, CalcError::MalformedCmc { .. }),
                "{:?} should be malformed",
                input
            );
        }
    }

    #[test]
    fn test_total_at() {
        let cmc = CmcExpression::parse("5 µg + 2 µg/g").unwrap();
        assert_eq!(cmc.total_at(100.0), 205.0);
    }
}
