//! Read-only catalog queries
//!
//! These enumerate what is available to pick from (models, certificates,
//! groups, nominals) so a front end can present choices before calling
//! [`process_target`](crate::core::uncertainty::process_target).

use serde::Serialize;

use crate::core::error::CalcError;
use crate::entities::certificate::Certificate;

/// A nominal value offered for selection, with the unit it was recorded in
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NominalEntry<'a> {
    pub nominal: f64,
    pub unit: &'a str,
}

impl NominalEntry<'_> {
    /// Nominal as text suitable for passing back into a lookup
    pub fn nominal_text(&self) -> String {
        self.nominal.to_string()
    }
}

/// Distinct models, in first-appearance order, optionally filtered by a
/// case-insensitive substring
pub fn list_models<'a>(certificates: &'a [Certificate], search: Option<&str>) -> Vec<&'a str> {
    let search = search.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty());
    let mut models: Vec<&str> = Vec::new();

    for cert in certificates {
        let model = cert.model.as_str();
        if model.is_empty() || models.contains(&model) {
            continue;
        }
        if let Some(ref needle) = search {
            if !model.to_lowercase().contains(needle) {
                continue;
            }
        }
        models.push(model);
    }

    models
}

/// Certificates whose model is exactly `model`
pub fn certificates_for_model<'a>(certificates: &'a [Certificate], model: &str) -> Vec<&'a Certificate> {
    certificates.iter().filter(|c| c.model == model).collect()
}

/// The first certificate with the given number
pub fn certificate_info<'a>(
    certificates: &'a [Certificate],
    cert_no: &str,
) -> Result<&'a Certificate, CalcError> {
    certificates
        .iter()
        .find(|c| c.cert_no == cert_no)
        .ok_or_else(|| CalcError::CertificateNotFound {
            cert_no: cert_no.to_string(),
        })
}

/// Distinct datasheet group names of a certificate, in datasheet order
pub fn list_groups<'a>(certificates: &'a [Certificate], cert_no: &str) -> Vec<&'a str> {
    let mut groups: Vec<&str> = Vec::new();
    for group in certificates
        .iter()
        .filter(|c| c.cert_no == cert_no)
        .flat_map(|c| c.datasheet.iter())
    {
        if !groups.contains(&group.group.as_str()) {
            groups.push(&group.group);
        }
    }
    groups
}

/// Distinct `(nominal, unit)` pairs recorded in a certificate's group
///
/// Rows whose nominal is not numeric cannot be selected and are left out.
pub fn list_nominals<'a>(
    certificates: &'a [Certificate],
    cert_no: &str,
    group: &str,
) -> Vec<NominalEntry<'a>> {
    let mut nominals: Vec<NominalEntry<'a>> = Vec::new();
    for m in certificates
        .iter()
        .filter(|c| c.cert_no == cert_no)
        .flat_map(|c| c.datasheet.iter())
        .filter(|g| g.group == group)
        .flat_map(|g| g.measurements.iter())
    {
        let Some(nominal) = m.nominal.as_f64() else {
            tracing::debug!(cert_no, group, nominal = %m.nominal, "skipping non-numeric nominal");
            continue;
        };
        let entry = NominalEntry {
            nominal,
            unit: &m.units,
        };
        if !nominals.contains(&entry) {
            nominals.push(entry);
        }
    }
    nominals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn certificates() -> Vec<Certificate> {
        serde_json::from_str(
            r#"[
                {"CertNo": "C-100", "Model": "XS205", "Datasheet": [
                    {"Group": "Mass", "Measurements": [
                        {"Nominal": 100, "Units": "g", "MeasUncert": 0.01},
                        {"Nominal": 100, "Units": "g", "MeasUncert": 0.02},
                        {"Nominal": 200, "Units": "g", "MeasUncert": 0.02},
                        {"Nominal": 200, "Units": "lb", "MeasUncert": 0.02},
                        {"Nominal": "N/A", "Units": "g", "MeasUncert": 0.02}
                    ]},
                    {"Group": "Repeatability", "Measurements": []}
                ]},
                {"CertNo": "C-101", "Model": "XS205", "Datasheet": []},
                {"CertNo": "C-300", "Model": "HMP110", "Datasheet": [
                    {"Group": "Temperature", "Measurements": [
                        {"Nominal": 23, "Units": "°C", "MeasUncert": 0.1}
                    ]}
                ]},
                {"CertNo": "C-400", "Datasheet": []}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_list_models() {
        let certs = certificates();
        assert_eq!(list_models(&certs, None), vec!["XS205", "HMP110"]);
        assert_eq!(list_models(&certs, Some("xs")), vec!["XS205"]);
        assert_eq!(list_models(&certs, Some("  ")), vec!["XS205", "HMP110"]);
        assert!(list_models(&certs, Some("zzz")).is_empty());
    }

    #[test]
    fn test_certificates_for_model() {
        let certs = certificates();
        let found: Vec<&str> = certificates_for_model(&certs, "XS205")
            .iter()
            .map(|c| c.cert_no.as_str())
            .collect();
        assert_eq!(found, vec!["C-100", "C-101"]);
    }

    #[test]
    fn test_certificate_info() {
        let certs = certificates();
        assert_eq!(certificate_info(&certs, "C-300").unwrap().model, "HMP110");
        assert_eq!(
            certificate_info(&certs, "C-999").unwrap_err(),
            CalcError::CertificateNotFound {
                cert_no: "C-999".to_string()
            }
        );
    }

    #[test]
    fn test_list_groups() {
        let certs = certificates();
        assert_eq!(list_groups(&certs, "C-100"), vec!["Mass", "Repeatability"]);
        assert!(list_groups(&certs, "C-101").is_empty());
        assert!(list_groups(&certs, "missing").is_empty());
    }

    #[test]
    fn test_list_nominals_deduplicates() {
        let certs = certificates();
        let nominals = list_nominals(&certs, "C-100", "Mass");
        assert_eq!(
            nominals,
            vec![
                NominalEntry { nominal: 100.0, unit: "g" },
                NominalEntry { nominal: 200.0, unit: "g" },
                NominalEntry { nominal: 200.0, unit: "lb" },
            ]
        );
        assert_eq!(nominals[0].nominal_text(), "100");
    }
}
