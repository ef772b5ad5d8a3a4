//! Measurement lookup across certificates

use crate::core::error::CalcError;
use crate::entities::certificate::{Certificate, Measurement};

/// Absolute tolerance when matching a requested nominal to a recorded one
pub const NOMINAL_TOLERANCE: f64 = 1e-6;

/// Parse nominal text as entered by a user or a UI selection
pub fn parse_nominal(nominal: &str) -> Result<f64, CalcError> {
    nominal
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| CalcError::InvalidNominal {
            nominal: nominal.to_string(),
        })
}

/// Find the measurement recorded for `(cert_no, group, nominal, unit)`
///
/// Certificates, groups and measurements are scanned in order and the first
/// match is returned. Duplicate entries are not reported. A recorded nominal
/// is only read for rows in the requested unit; a non-numeric one fails the
/// lookup with [`CalcError::InvalidDatasheetValue`].
pub fn find_measurement<'a>(
    certificates: &'a [Certificate],
    cert_no: &str,
    group: &str,
    nominal: &str,
    unit: &str,
) -> Result<&'a Measurement, CalcError> {
    let target = parse_nominal(nominal)?;

    let candidates = certificates
        .iter()
        .filter(|c| c.cert_no == cert_no)
        .flat_map(|c| c.datasheet.iter())
        .filter(|g| g.group == group)
        .flat_map(|g| g.measurements.iter())
        .filter(|m| m.units == unit);

    for measurement in candidates {
        let recorded = measurement
            .nominal
            .as_f64()
            .ok_or_else(|| CalcError::datasheet_value(cert_no, group, "Nominal", &measurement.nominal))?;

        if (recorded - target).abs() < NOMINAL_TOLERANCE {
            tracing::debug!(
                cert_no,
                group,
                nominal = target,
                unit,
                meas_uncert = %measurement.meas_uncert,
                "measurement found"
            );
            return Ok(measurement);
        }
    }

    Err(CalcError::NoMatchFound {
        cert_no: cert_no.to_string(),
        group: group.to_string(),
        nominal: nominal.to_string(),
        unit: unit.to_string(),
    })
}

/// Numeric measured uncertainty of a measurement found in `(cert_no, group)`
pub fn measured_uncertainty(measurement: &Measurement, cert_no: &str, group: &str) -> Result<f64, CalcError> {
    measurement
        .meas_uncert
        .as_f64()
        .ok_or_else(|| CalcError::datasheet_value(cert_no, group, "MeasUncert", &measurement.meas_uncert))
}

/// Measured uncertainty recorded for `(cert_no, group, nominal, unit)`
pub fn find_measured_uncertainty(
    certificates: &[Certificate],
    cert_no: &str,
    group: &str,
    nominal: &str,
    unit: &str,
) -> Result<f64, CalcError> {
    let measurement = find_measurement(certificates, cert_no, group, nominal, unit)?;
    measured_uncertainty(measurement, cert_no, group)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn certificates() -> Vec<Certificate> {
        serde_json::from_str(
            r#"[
                {"CertNo": "C-100", "Model": "XS205", "Datasheet": [
                    {"Group": "Mass", "Measurements": [
                        {"Nominal": 100, "Units": "g", "MeasUncert": 0.01, "TUR": 4},
                        {"Nominal": 100, "Units": "g", "MeasUncert": 0.5, "TUR": 1},
                        {"Nominal": 1, "Units": "kg", "MeasUncert": 0.0002, "TUR": 4}
                    ]},
                    {"Group": "Eccentricity", "Measurements": [
                        {"Nominal": 100, "Units": "g", "MeasUncert": 0.03, "TUR": 4}
                    ]}
                ]},
                {"CertNo": "C-200", "Datasheet": [
                    {"Group": "Mass", "Measurements": [
                        {"Nominal": "100", "Units": "g", "MeasUncert": "0.07", "TUR": 4}
                    ]}
                ]}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_exact_match() {
        let certs = certificates();
        assert_eq!(
            find_measured_uncertainty(&certs, "C-100", "Mass", "100", "g").unwrap(),
            0.01
        );
        assert_eq!(
            find_measured_uncertainty(&certs, "C-100", "Eccentricity", "100", "g").unwrap(),
            0.03
        );
        assert_eq!(
            find_measured_uncertainty(&certs, "C-200", "Mass", "100.0", "g").unwrap(),
            0.07
        );
    }

    #[test]
    fn test_first_match_wins_for_duplicates() {
        let certs = certificates();
        let m = find_measurement(&certs, "C-100", "Mass", "100", "g").unwrap();
        assert_eq!(m.meas_uncert.as_f64(), Some(0.01));
    }

    #[test]
    fn test_nominal_tolerance() {
        let certs = certificates();
        assert!(find_measured_uncertainty(&certs, "C-100", "Mass", "100.0000005", "g").is_ok());
        assert!(find_measured_uncertainty(&certs, "C-100", "Mass", "99.9999995", "g").is_ok());

        let err = find_measured_uncertainty(&certs, "C-100", "Mass", "100.00001", "g").unwrap_err();
        assert!(matches!(err, CalcError::NoMatchFound { .. }));
    }

    #[test]
    fn test_unit_must_match_exactly() {
        let certs = certificates();
        let err = find_measured_uncertainty(&certs, "C-100", "Mass", "1000", "g").unwrap_err();
        assert_eq!(
            err,
            CalcError::NoMatchFound {
                cert_no: "C-100".to_string(),
                group: "Mass".to_string(),
                nominal: "1000".to_string(),
                unit: "g".to_string(),
            }
        );
        assert!(find_measured_uncertainty(&certs, "C-100", "Mass", "1", "kg").is_ok());
    }

    #[test]
    fn test_unknown_certificate_or_group() {
        let certs = certificates();
        assert!(find_measured_uncertainty(&certs, "C-999", "Mass", "100", "g").is_err());
        assert!(find_measured_uncertainty(&certs, "C-100", "Linearity", "100", "g").is_err());
    }

    #[test]
    fn test_invalid_nominal() {
        let certs = certificates();
        for nominal in ["abc", "", "1,5", "NaN", "inf"] {
            let err = find_measured_uncertainty(&certs, "C-100", "Mass", nominal, "g").unwrap_err();
            assert_eq!(
                err,
                CalcError::InvalidNominal {
                    nominal: nominal.to_string()
                }
            );
        }
    }

    #[test]
    fn test_bad_cell_only_fails_its_own_row() {
        let certs: Vec<Certificate> = serde_json::from_str(
            r#"[{"CertNo": "C-500", "Datasheet": [
                {"Group": "Mass", "Measurements": [
                    {"Nominal": 100, "Units": "g", "MeasUncert": 0.01},
                    {"Nominal": 200, "Units": "g", "MeasUncert": "N/A"},
                    {"Nominal": "TBD", "Units": "kg", "MeasUncert": 0.1}
                ]}
            ]}]"#,
        )
        .unwrap();

        assert_eq!(
            find_measured_uncertainty(&certs, "C-500", "Mass", "100", "g").unwrap(),
            0.01
        );
        assert_eq!(
            find_measured_uncertainty(&certs, "C-500", "Mass", "200", "g").unwrap_err(),
            CalcError::InvalidDatasheetValue {
                cert_no: "C-500".to_string(),
                group: "Mass".to_string(),
                field: "MeasUncert".to_string(),
                value: "N/A".to_string(),
            }
        );
        assert!(matches!(
            find_measured_uncertainty(&certs, "C-500", "Mass", "1", "kg"),
            Err(CalcError::InvalidDatasheetValue { ref field, .. }) if field == "Nominal"
        ));
    }
}
