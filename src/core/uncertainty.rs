//! Combined uncertainty calculation
//!
//! A target is resolved in four steps:
//! 1. look up the measured uncertainty on the certificate datasheet
//! 2. convert the nominal into the unit the range tables are keyed in
//! 3. resolve the CMC expression for that value
//! 4. combine CMC and measured uncertainty by root-sum-of-squares
//!
//! Mass results are reported in g, mg and μg. Temperature and humidity
//! results are reported once, in °C or %RH.

use serde::Serialize;

use crate::core::cmc::CmcExpression;
use crate::core::dataset::ReferenceData;
use crate::core::error::CalcError;
use crate::core::lookup::{find_measurement, measured_uncertainty, parse_nominal};
use crate::core::range::ResolvedRange;
use crate::core::units::{convert, convert_difference, to_grams, Unit, UnitFamily};

/// Unit of the fixed CMC component in the mass table
pub const CMC_FIXED_UNIT: &str = "µg";
/// Unit of the proportional CMC component in the mass table
pub const CMC_PROPORTIONAL_UNIT: &str = "µg/g";

/// A combined uncertainty in the base unit of its family
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedUncertainty {
    pub value: f64,
    pub unit: Unit,
    /// Formatted values, 4 decimals each
    pub total_uncertainty: Vec<String>,
}

/// Everything a front end needs to present one calculated target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UncertaintyResult {
    pub cert_no: String,
    pub group: String,
    pub nominal: f64,
    pub unit: Unit,
    pub meas_uncert: f64,
    pub tur: String,
    pub cmc_id: String,
    pub cmc_used: String,
    pub combined: CombinedUncertainty,
}

fn rss(a: f64, b: f64) -> f64 {
    (a.powi(2) + b.powi(2)).sqrt()
}

/// Combine a mass CMC with a measured uncertainty
///
/// `nominal` and `meas_uncert` are in `unit`; `cmc_fixed` is in µg and
/// `cmc_proportional` in µg/g. The result is in grams.
pub fn compute_combined_uncertainty(
    nominal: f64,
    cmc_fixed: f64,
    cmc_proportional: f64,
    meas_uncert: f64,
    unit: &str,
) -> Result<CombinedUncertainty, CalcError> {
    let nominal_g = to_grams(nominal, unit)?;
    let meas_uncert_g = to_grams(meas_uncert, unit)?;
    let fixed_g = to_grams(cmc_fixed, CMC_FIXED_UNIT)?;
    let proportional = to_grams(cmc_proportional, CMC_PROPORTIONAL_UNIT)?;

    let cmc_total = fixed_g + proportional * nominal_g;
    let combined = rss(cmc_total, meas_uncert_g);

    tracing::debug!(nominal_g, cmc_total, meas_uncert_g, combined, "combined mass uncertainty");

    Ok(CombinedUncertainty {
        value: combined,
        unit: Unit::Gram,
        total_uncertainty: vec![
            format!("{:.4} g", combined),
            format!("{:.4} mg", combined * 1e3),
            format!("{:.4} μg", combined * 1e6),
        ],
    })
}

/// Combine a temperature or humidity CMC with a measured uncertainty
///
/// All inputs are already in `base`. The proportional component is a plain
/// ratio of the nominal.
pub fn compute_thermo_uncertainty(
    nominal: f64,
    cmc: CmcExpression,
    meas_uncert: f64,
    base: Unit,
) -> CombinedUncertainty {
    let cmc_total = cmc.total_at(nominal);
    let combined = rss(cmc_total, meas_uncert);

    tracing::debug!(nominal, cmc_total, meas_uncert, combined, unit = %base, "combined thermodynamic uncertainty");

    CombinedUncertainty {
        value: combined,
        unit: base,
        total_uncertainty: vec![format!("{:.4} {}", combined, base)],
    }
}

/// The range record governing a target value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetRange<'a> {
    /// Target value in the unit calculations run in
    pub value: f64,
    pub base: Unit,
    /// Equipment tag the record was resolved under
    pub equipment: &'a str,
    pub range: ResolvedRange<'a>,
}

/// Route a target to its range table and resolve the governing record
///
/// Mass targets resolve in grams under the configured mass equipment tag.
/// Temperature and humidity targets resolve under the tag of the unit they
/// were given in (`°C`, `°F` or `%RH`). A °F value is converted to °C before
/// it is compared against the record's bounds.
pub fn resolve_target(data: &ReferenceData, unit: Unit, nominal: f64) -> Result<TargetRange<'_>, CalcError> {
    let base = unit.base();
    let value = convert(nominal, unit, base)?;

    let (table, equipment) = match unit.family() {
        UnitFamily::Mass => (&data.mass_ranges, data.mass_equipment()),
        UnitFamily::Thermodynamic => (&data.thermo_ranges, unit.symbol()),
    };
    let range = table.resolve(equipment, value)?;

    Ok(TargetRange {
        value,
        base,
        equipment,
        range,
    })
}

/// Full pipeline for one target
///
/// The datasheet lookup runs first, so an unknown unit is only reported for
/// a measurement that actually exists.
pub fn process_target(
    data: &ReferenceData,
    cert_no: &str,
    group: &str,
    nominal: &str,
    unit: &str,
) -> Result<UncertaintyResult, CalcError> {
    let measurement = find_measurement(&data.certificates, cert_no, group, nominal, unit)?;
    let meas_uncert = measured_uncertainty(measurement, cert_no, group)?;
    let target_unit: Unit = unit.parse()?;
    let nominal_value = parse_nominal(nominal)?;
    let target = resolve_target(data, target_unit, nominal_value)?;
    let resolved = target.range;
    let cmc = CmcExpression::parse(resolved.cmc)?;

    let combined = match target_unit.family() {
        UnitFamily::Mass => compute_combined_uncertainty(
            nominal_value,
            cmc.fixed,
            cmc.proportional,
            meas_uncert,
            target_unit.symbol(),
        )?,
        UnitFamily::Thermodynamic => {
            let meas_uncert = convert_difference(meas_uncert, target_unit, target.base)?;
            compute_thermo_uncertainty(target.value, cmc, meas_uncert, target.base)
        }
    };

    tracing::info!(
        cert_no,
        group,
        nominal = nominal_value,
        unit = %target_unit,
        cmc_id = resolved.id,
        combined = combined.value,
        "uncertainty calculated"
    );

    Ok(UncertaintyResult {
        cert_no: cert_no.to_string(),
        group: group.to_string(),
        nominal: nominal_value,
        unit: target_unit,
        meas_uncert,
        tur: measurement.tur_display(),
        cmc_id: resolved.id.to_string(),
        cmc_used: resolved.cmc.to_string(),
        combined,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::range::RangeTable;

    fn reference_data() -> ReferenceData {
        let certificates = serde_json::from_str(
            r#"[{
                "CertNo": "C-100",
                "Datasheet": [
                    {"Group": "Mass", "Measurements": [
                        {"Nominal": 100, "Units": "g", "MeasUncert": 0.01, "TUR": "4:1"},
                        {"Nominal": "1", "Units": "kg", "MeasUncert": 0.0002},
                        {"Nominal": 2, "Units": "lb", "MeasUncert": 0.001},
                        {"Nominal": 50000, "Units": "g", "MeasUncert": 0.5},
                        {"Nominal": 150, "Units": "g", "MeasUncert": "N/A"}
                    ]},
                    {"Group": "Temperature", "Measurements": [
                        {"Nominal": 77, "Units": "°F", "MeasUncert": 0.18},
                        {"Nominal": 25, "Units": "°C", "MeasUncert": 0.1}
                    ]},
                    {"Group": "Humidity", "Measurements": [
                        {"Nominal": 50, "Units": "%RH", "MeasUncert": 0.8}
                    ]},
                    {"Group": "Pressure", "Measurements": [
                        {"Nominal": 10, "Units": "psi", "MeasUncert": 0.1}
                    ]}
                ]
            }]"#,
        )
        .unwrap();
        let mass_ranges: RangeTable = serde_json::from_str(
            r#"[
                {"Equipment": "Balances & Scales", "Range": {"Min": 0, "Max": 200}, "ID": "BS-1", "CMC": "5 µg + 2 µg/g"},
                {"Equipment": "Balances & Scales", "Range": {"Min": 200, "Max": 5000}, "ID": "BS-2", "CMC": "50 µg + 3 µg/g"}
            ]"#,
        )
        .unwrap();
        let thermo_ranges: RangeTable = serde_json::from_str(
            r#"[
                {"Equipment": "°C", "Range": {"Min": -20, "Max": 150}, "ID": "T-1", "CMC": "0.05 °C"},
                {"Equipment": "°F", "Range": {"Min": -20, "Max": 150}, "ID": "TF-1", "CMC": "0.05 °C"},
                {"Equipment": "%RH", "Range": {"Min": 10, "Max": 90}, "ID": "H-1", "CMC": "1.5 %RH"}
            ]"#,
        )
        .unwrap();
        ReferenceData::new(certificates, mass_ranges, thermo_ranges)
    }

    #[test]
    fn test_compute_combined_uncertainty() {
        let combined = compute_combined_uncertainty(100.0, 5.0, 2.0, 0.01, "g").unwrap();
        assert!((combined.value - 0.010002101).abs() < 1e-9);
        assert_eq!(
            combined.total_uncertainty,
            vec!["0.0100 g", "10.0021 mg", "10002.1010 μg"]
        );
    }

    #[test]
    fn test_compute_combined_rejects_unknown_unit() {
        assert!(matches!(
            compute_combined_uncertainty(1.0, 5.0, 0.0, 0.1, "psi"),
            Err(CalcError::UnsupportedConversion { .. })
        ));
    }

    #[test]
    fn test_process_target_grams() {
        let data = reference_data();
        let result = process_target(&data, "C-100", "Mass", "100", "g").unwrap();

        assert_eq!(result.cmc_id, "BS-1");
        assert_eq!(result.cmc_used, "5 µg + 2 µg/g");
        assert_eq!(result.meas_uncert, 0.01);
        assert_eq!(result.tur, "4:1");
        assert_eq!(result.combined.unit, Unit::Gram);
        assert_eq!(
            result.combined.total_uncertainty,
            vec!["0.0100 g", "10.0021 mg", "10002.1010 μg"]
        );
    }

    #[test]
    fn test_process_target_kilograms_resolve_in_grams() {
        let data = reference_data();
        let result = process_target(&data, "C-100", "Mass", "1", "kg").unwrap();

        assert_eq!(result.cmc_id, "BS-2");
        assert_eq!(result.tur, "-");
        assert_eq!(
            result.combined.total_uncertainty,
            vec!["0.2000 g", "200.0233 mg", "200023.2549 μg"]
        );
    }

    #[test]
    fn test_process_target_pounds() {
        let data = reference_data();
        let result = process_target(&data, "C-100", "Mass", "2", "lb").unwrap();

        assert_eq!(result.cmc_id, "BS-2");
        assert_eq!(result.combined.total_uncertainty[0], "0.4536 g");
        assert_eq!(result.combined.total_uncertainty[1], "453.6008 mg");
    }

    #[test]
    fn test_process_target_fahrenheit_uses_fahrenheit_records() {
        let data = reference_data();
        let result = process_target(&data, "C-100", "Temperature", "77", "°F").unwrap();

        assert_eq!(result.cmc_id, "TF-1");
        assert_eq!(result.unit, Unit::Fahrenheit);
        assert_eq!(result.combined.unit, Unit::Celsius);
        assert_eq!(result.combined.total_uncertainty, vec!["0.1118 °C"]);
    }

    #[test]
    fn test_process_target_humidity() {
        let data = reference_data();
        let result = process_target(&data, "C-100", "Humidity", "50", "%RH").unwrap();

        assert_eq!(result.cmc_id, "H-1");
        assert_eq!(result.combined.total_uncertainty, vec!["1.7000 %RH"]);
    }

    #[test]
    fn test_resolve_target_routes_by_family() {
        let data = reference_data();

        let mass = resolve_target(&data, Unit::Kilogram, 1.0).unwrap();
        assert_eq!(mass.value, 1000.0);
        assert_eq!(mass.equipment, "Balances & Scales");
        assert_eq!(mass.range.id, "BS-2");

        // 212 °F is compared as 100 °C against the °F records
        let temperature = resolve_target(&data, Unit::Fahrenheit, 212.0).unwrap();
        assert_eq!(temperature.base, Unit::Celsius);
        assert!((temperature.value - 100.0).abs() < 1e-9);
        assert_eq!(temperature.equipment, "°F");
        assert_eq!(temperature.range.id, "TF-1");

        let celsius = resolve_target(&data, Unit::Celsius, 25.0).unwrap();
        assert_eq!(celsius.equipment, "°C");
        assert_eq!(celsius.range.id, "T-1");
    }

    #[test]
    fn test_fahrenheit_without_fahrenheit_records() {
        let mut data = reference_data();
        data.thermo_ranges = serde_json::from_str(
            r#"[{"Equipment": "°C", "Range": {"Min": -20, "Max": 150}, "ID": "T-1", "CMC": "0.05 °C"}]"#,
        )
        .unwrap();
        match process_target(&data, "C-100", "Temperature", "77", "°F") {
            Err(CalcError::NoApplicableRange { equipment, value }) => {
                assert_eq!(equipment, "°F");
                assert!((value - 25.0).abs() < 1e-9);
            }
            other => panic!("expected NoApplicableRange, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_measurement_does_not_affect_neighbours() {
        let data = reference_data();
        assert!(process_target(&data, "C-100", "Mass", "100", "g").is_ok());
        assert_eq!(
            process_target(&data, "C-100", "Mass", "150", "g").unwrap_err(),
            CalcError::InvalidDatasheetValue {
                cert_no: "C-100".to_string(),
                group: "Mass".to_string(),
                field: "MeasUncert".to_string(),
                value: "N/A".to_string(),
            }
        );
    }

    #[test]
    fn test_process_target_unknown_unit_after_lookup() {
        let data = reference_data();
        assert!(matches!(
            process_target(&data, "C-100", "Pressure", "10", "psi"),
            Err(CalcError::UnsupportedUnit { .. })
        ));
    }

    #[test]
    fn test_process_target_no_match() {
        let data = reference_data();
        assert!(matches!(
            process_target(&data, "C-100", "Mass", "100", "kg"),
            Err(CalcError::NoMatchFound { .. })
        ));
        assert!(matches!(
            process_target(&data, "C-999", "Mass", "100", "g"),
            Err(CalcError::NoMatchFound { .. })
        ));
    }

    #[test]
    fn test_process_target_outside_ranges() {
        let data = reference_data();
        match process_target(&data, "C-100", "Mass", "50000", "g") {
            Err(CalcError::NoApplicableRange { equipment, value }) => {
                assert_eq!(equipment, "Balances & Scales");
                assert_eq!(value, 50000.0);
            }
            other => panic!("expected NoApplicableRange, got {:?}", other),
        }
    }

    #[test]
    fn test_process_target_custom_mass_equipment() {
        let data = reference_data().with_mass_equipment("Scales");
        assert!(matches!(
            process_target(&data, "C-100", "Mass", "100", "g"),
            Err(CalcError::NoApplicableRange { .. })
        ));
    }

    #[test]
    fn test_process_target_malformed_cmc() {
        let mut data = reference_data();
        data.mass_ranges = serde_json::from_str(
            r#"[{"Equipment": "Balances & Scales", "Range": {"Min": 0, "Max": 200}, "ID": "BAD", "CMC": "a + b + c"}]"#,
        )
        .unwrap();
        assert!(matches!(
            process_target(&data, "C-100", "Mass", "100", "g"),
            Err(CalcError::MalformedCmc { .. })
        ));
    }
}
