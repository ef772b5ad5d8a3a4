//! Error taxonomy for uncertainty queries
//!
//! Every failure is scoped to a single query and carries the keys or values
//! that caused it, so a front end can render a precise message.

use miette::Diagnostic;
use thiserror::Error;

/// Errors produced by the uncertainty pipeline and catalog queries
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum CalcError {
    #[error("nominal value '{nominal}' is not a number")]
    #[diagnostic(
        code(cala::nominal::invalid),
        help("Nominal values must be plain decimal numbers, e.g. 100 or 0.5")
    )]
    InvalidNominal { nominal: String },

    #[error("no measurement found for certificate {cert_no}, group {group}, nominal {nominal}, unit {unit}")]
    #[diagnostic(
        code(cala::lookup::no_match),
        help("Use `cala list nominals <CERT_NO> <GROUP>` to see the recorded nominals and units")
    )]
    NoMatchFound {
        cert_no: String,
        group: String,
        nominal: String,
        unit: String,
    },

    #[error("certificate {cert_no}, group {group}: {field} '{value}' is not a number")]
    #[diagnostic(
        code(cala::lookup::invalid_value),
        help("Fix the recorded value in the certificates dataset")
    )]
    InvalidDatasheetValue {
        cert_no: String,
        group: String,
        field: String,
        value: String,
    },

    #[error("range {id} has a non-numeric bound (Min '{min}', Max '{max}')")]
    #[diagnostic(
        code(cala::range::invalid_bound),
        help("Fix the Range of this record in the range table")
    )]
    InvalidRangeBound { id: String, min: String, max: String },

    #[error("no calibration range for {value} on equipment '{equipment}'")]
    #[diagnostic(
        code(cala::range::not_found),
        help("Use `cala range list` to inspect the configured range tables")
    )]
    NoApplicableRange { equipment: String, value: f64 },

    #[error("malformed CMC expression '{cmc}': {reason}")]
    #[diagnostic(
        code(cala::cmc::malformed),
        help("Expected '<fixed> <unit>' or '<fixed> <unit> + <proportional> <unit>'")
    )]
    MalformedCmc { cmc: String, reason: String },

    #[error("unsupported conversion from '{from}' to '{to}'")]
    #[diagnostic(code(cala::units::conversion))]
    UnsupportedConversion { from: String, to: String },

    #[error("unsupported unit '{unit}'")]
    #[diagnostic(
        code(cala::units::unsupported),
        help("Supported units: g, kg, lb, °C, °F, %RH")
    )]
    UnsupportedUnit { unit: String },

    #[error("certificate {cert_no} not found")]
    #[diagnostic(
        code(cala::certificate::not_found),
        help("Use `cala cert list` to see the loaded certificates")
    )]
    CertificateNotFound { cert_no: String },
}

impl CalcError {
    pub(crate) fn malformed_cmc(cmc: &str, reason: impl Into<String>) -> Self {
        CalcError::MalformedCmc {
            cmc: cmc.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn datasheet_value(
        cert_no: &str,
        group: &str,
        field: &str,
        value: impl std::fmt::Display,
    ) -> Self {
        CalcError::InvalidDatasheetValue {
            cert_no: cert_no.to_string(),
            group: group.to_string(),
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    pub(crate) fn conversion(from: impl Into<String>, to: impl Into<String>) -> Self {
        CalcError::UnsupportedConversion {
            from: from.into(),
            to: to.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_match_message_carries_all_keys() {
        let err = CalcError::NoMatchFound {
            cert_no: "C-100".to_string(),
            group: "Mass".to_string(),
            nominal: "100".to_string(),
            unit: "g".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("C-100"));
        assert!(msg.contains("Mass"));
        assert!(msg.contains("100"));
        assert!(msg.contains("unit g"));
    }

    #[test]
    fn test_invalid_datasheet_value_names_the_cell() {
        let msg = CalcError::datasheet_value("C-100", "Mass", "MeasUncert", "N/A").to_string();
        assert_eq!(msg, "certificate C-100, group Mass: MeasUncert 'N/A' is not a number");
    }

    #[test]
    fn test_diagnostic_codes() {
        let err = CalcError::UnsupportedUnit {
            unit: "psi".to_string(),
        };
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("cala::units::unsupported"));
    }
}
