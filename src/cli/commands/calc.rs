//! `cala calc` command - Combined uncertainty of a calibration target

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::commands::utils::Session;
use crate::cli::helpers::{print_serialized, print_table};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::catalog::{
    certificate_info, certificates_for_model, list_groups, list_models, list_nominals,
};
use crate::core::dataset::ReferenceData;
use crate::core::lookup::{parse_nominal, NOMINAL_TOLERANCE};
use crate::core::uncertainty::{process_target, UncertaintyResult};

#[derive(clap::Args, Debug)]
pub struct CalcArgs {
    /// Certificate number
    #[arg(long, short = 'c')]
    pub cert: Option<String>,

    /// Datasheet group (e.g. "Mass")
    #[arg(long, short = 'g')]
    pub group: Option<String>,

    /// Nominal value as recorded on the datasheet
    #[arg(long, short = 'n', allow_negative_numbers = true)]
    pub nominal: Option<String>,

    /// Unit of the nominal (default: the unit recorded for that nominal)
    #[arg(long, short = 'u')]
    pub unit: Option<String>,

    /// Prompt for anything not given on the command line
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

/// A fully specified target
#[derive(Debug, Clone, PartialEq, Eq)]
struct Target {
    cert_no: String,
    group: String,
    nominal: String,
    unit: String,
}

pub fn run(args: CalcArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::load(global)?;

    let target = if args.interactive {
        prompt_target(&session.data, args)?
    } else {
        target_from_args(&session.data, args)?
    };

    let result = process_target(
        &session.data,
        &target.cert_no,
        &target.group,
        &target.nominal,
        &target.unit,
    )?;

    let format = session.format(global, OutputFormat::Auto);
    if print_serialized(&result, format)? {
        return Ok(());
    }

    match format {
        OutputFormat::Auto if global.quiet => {
            for line in &result.combined.total_uncertainty {
                println!("{}", line);
            }
            Ok(())
        }
        OutputFormat::Auto => {
            print_result(&result);
            Ok(())
        }
        _ => print_table(
            format,
            &[
                "cert_no",
                "group",
                "nominal",
                "unit",
                "meas_uncert",
                "tur",
                "cmc_id",
                "cmc",
                "total_uncertainty",
            ],
            &[vec![
                result.cert_no.clone(),
                result.group.clone(),
                result.nominal.to_string(),
                result.unit.to_string(),
                result.meas_uncert.to_string(),
                result.tur.clone(),
                result.cmc_id.clone(),
                result.cmc_used.clone(),
                result.combined.total_uncertainty.join("; "),
            ]],
        ),
    }
}

fn print_result(result: &UncertaintyResult) {
    println!(
        "{} {} / {} / {} {}",
        style("Certificate").bold(),
        style(&result.cert_no).cyan(),
        result.group,
        result.nominal,
        result.unit
    );
    println!("  {:<22} {} {}", style("Measured uncertainty").dim(), result.meas_uncert, result.unit);
    println!("  {:<22} {}", style("TUR").dim(), result.tur);
    println!(
        "  {:<22} {} ({})",
        style("CMC").dim(),
        result.cmc_used,
        style(&result.cmc_id).cyan()
    );
    for (i, line) in result.combined.total_uncertainty.iter().enumerate() {
        let label = if i == 0 { "Combined uncertainty" } else { "" };
        println!("  {:<22} {}", style(label).dim(), style(line).green().bold());
    }
}

fn target_from_args(data: &ReferenceData, args: CalcArgs) -> Result<Target> {
    let cert_no = args
        .cert
        .ok_or_else(|| miette::miette!("Certificate is required (use --cert or -i)"))?;
    let group = args
        .group
        .ok_or_else(|| miette::miette!("Group is required (use --group or -i)"))?;
    let nominal = args
        .nominal
        .ok_or_else(|| miette::miette!("Nominal is required (use --nominal or -i)"))?;

    let unit = match args.unit {
        Some(unit) => unit,
        None => recorded_unit(data, &cert_no, &group, &nominal)?,
    };

    Ok(Target {
        cert_no,
        group,
        nominal,
        unit,
    })
}

/// The unit recorded for a nominal, when exactly one unit was used
fn recorded_unit(data: &ReferenceData, cert_no: &str, group: &str, nominal: &str) -> Result<String> {
    let value = parse_nominal(nominal)?;
    let units: Vec<&str> = list_nominals(&data.certificates, cert_no, group)
        .into_iter()
        .filter(|n| (n.nominal - value).abs() < NOMINAL_TOLERANCE)
        .map(|n| n.unit)
        .collect();

    match units.as_slice() {
        [unit] => Ok(unit.to_string()),
        [] => Err(miette::miette!(
            "No nominal {} recorded for certificate {}, group {}",
            nominal,
            cert_no,
            group
        )),
        _ => Err(miette::miette!(
            "Nominal {} is recorded in several units ({}); pass --unit",
            nominal,
            units.join(", ")
        )),
    }
}

fn prompt_target(data: &ReferenceData, args: CalcArgs) -> Result<Target> {
    use dialoguer::{theme::ColorfulTheme, Input, Select};

    let theme = ColorfulTheme::default();
    let certificates = &data.certificates;

    let cert_no = match args.cert {
        Some(cert_no) => cert_no,
        None => {
            let search: String = Input::with_theme(&theme)
                .with_prompt("Search model (empty for all)")
                .allow_empty(true)
                .interact_text()
                .into_diagnostic()?;
            let models = list_models(certificates, Some(search.as_str()));
            if models.is_empty() {
                return Err(miette::miette!("No model matches '{}'", search));
            }
            let model_idx = Select::with_theme(&theme)
                .with_prompt("Model")
                .items(&models)
                .default(0)
                .interact()
                .into_diagnostic()?;

            let certs: Vec<&str> = certificates_for_model(certificates, models[model_idx])
                .iter()
                .map(|c| c.cert_no.as_str())
                .collect();
            let cert_idx = Select::with_theme(&theme)
                .with_prompt("Certificate")
                .items(&certs)
                .default(0)
                .interact()
                .into_diagnostic()?;
            certs[cert_idx].to_string()
        }
    };
    certificate_info(certificates, &cert_no)?;

    let group = match args.group {
        Some(group) => group,
        None => {
            let groups = list_groups(certificates, &cert_no);
            if groups.is_empty() {
                return Err(miette::miette!("Certificate {} has no datasheet groups", cert_no));
            }
            let idx = Select::with_theme(&theme)
                .with_prompt("Group")
                .items(&groups)
                .default(0)
                .interact()
                .into_diagnostic()?;
            groups[idx].to_string()
        }
    };

    let (nominal, unit) = match args.nominal {
        Some(nominal) => {
            let unit = match args.unit {
                Some(unit) => unit,
                None => recorded_unit(data, &cert_no, &group, &nominal)?,
            };
            (nominal, unit)
        }
        None => {
            let nominals = list_nominals(certificates, &cert_no, &group);
            if nominals.is_empty() {
                return Err(miette::miette!("Group {} has no measurements", group));
            }
            let labels: Vec<String> = nominals
                .iter()
                .map(|n| format!("{} {}", n.nominal_text(), n.unit))
                .collect();
            let idx = Select::with_theme(&theme)
                .with_prompt("Nominal")
                .items(&labels)
                .default(0)
                .interact()
                .into_diagnostic()?;
            let chosen = &nominals[idx];
            (
                chosen.nominal_text(),
                args.unit.unwrap_or_else(|| chosen.unit.to_string()),
            )
        }
    };

    Ok(Target {
        cert_no,
        group,
        nominal,
        unit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::range::RangeTable;

    fn data() -> ReferenceData {
        let certificates = serde_json::from_str(
            r#"[{"CertNo": "C-100", "Datasheet": [
                {"Group": "Mass", "Measurements": [
                    {"Nominal": 100, "Units": "g", "MeasUncert": 0.01},
                    {"Nominal": 200, "Units": "g", "MeasUncert": 0.02},
                    {"Nominal": 200, "Units": "lb", "MeasUncert": 0.02}
                ]}
            ]}]"#,
        )
        .unwrap();
        ReferenceData::new(certificates, RangeTable::default(), RangeTable::default())
    }

    fn args(nominal: &str, unit: Option<&str>) -> CalcArgs {
        CalcArgs {
            cert: Some("C-100".to_string()),
            group: Some("Mass".to_string()),
            nominal: Some(nominal.to_string()),
            unit: unit.map(str::to_string),
            interactive: false,
        }
    }

    #[test]
    fn test_unit_defaults_to_recorded_unit() {
        let target = target_from_args(&data(), args("100", None)).unwrap();
        assert_eq!(target.unit, "g");
    }

    #[test]
    fn test_ambiguous_unit_requires_flag() {
        assert!(target_from_args(&data(), args("200", None)).is_err());
        let target = target_from_args(&data(), args("200", Some("lb"))).unwrap();
        assert_eq!(target.unit, "lb");
    }

    #[test]
    fn test_missing_certificate_without_prompt() {
        let mut missing = args("100", None);
        missing.cert = None;
        assert!(target_from_args(&data(), missing).is_err());
    }
}
