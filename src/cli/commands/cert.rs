//! `cala cert` command - Certificate details and listings

use chrono::NaiveDate;
use clap::Subcommand;
use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::commands::utils::Session;
use crate::cli::helpers::{print_serialized, print_summary, print_table, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::catalog::{certificate_info, certificates_for_model};
use crate::entities::certificate::{Certificate, ExpirationStatus};

#[derive(Subcommand, Debug)]
pub enum CertCommands {
    /// Show a certificate with its standards and datasheet groups
    Show(ShowArgs),

    /// List certificates
    List(ListArgs),
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Certificate number
    pub cert_no: String,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only certificates for this exact model
    #[arg(long, short = 'm')]
    pub model: Option<String>,

    /// Case-insensitive search in number, model, manufacturer and description
    #[arg(long, short = 's')]
    pub search: Option<String>,
}

/// Certificate plus the status of each standard, aligned by index
#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct CertificateView<'a> {
    #[serde(flatten)]
    certificate: &'a Certificate,
    standard_status: Vec<ExpirationStatus>,
}

#[derive(Serialize)]
struct CertificateSummary<'a> {
    cert_no: &'a str,
    model: &'a str,
    manufacturer: &'a str,
    description: &'a str,
    due_date: Option<&'a str>,
    status: Option<ExpirationStatus>,
}

impl<'a> CertificateSummary<'a> {
    fn new(cert: &'a Certificate, today: NaiveDate) -> Self {
        let standard = cert.primary_standard();
        Self {
            cert_no: &cert.cert_no,
            model: &cert.model,
            manufacturer: &cert.manufacturer,
            description: &cert.asset_description,
            due_date: standard.map(|s| s.due_date.as_str()),
            status: standard.map(|s| s.expiration_status(today)),
        }
    }
}

pub fn run(cmd: CertCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        CertCommands::Show(args) => run_show(args, global),
        CertCommands::List(args) => run_list(args, global),
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::load(global)?;
    let cert = certificate_info(&session.data.certificates, &args.cert_no)?;
    let today = today();
    let statuses: Vec<ExpirationStatus> = cert
        .standards
        .iter()
        .map(|s| s.expiration_status(today))
        .collect();

    let format = session.format(global, OutputFormat::Auto);
    let view = CertificateView {
        certificate: cert,
        standard_status: statuses.clone(),
    };
    if print_serialized(&view, format)? {
        return Ok(());
    }

    if format != OutputFormat::Auto {
        let env = cert.environmental_conditions();
        let mut rows = vec![
            field("CertNo", &cert.cert_no),
            field("EquipmentType", &cert.equipment_type),
            field("AssetDescription", &cert.asset_description),
            field("Manufacturer", &cert.manufacturer),
            field("Model", &cert.model),
            field("OperatingRange", &cert.operating_range),
            field("Temperature", env.temperature),
            field("RelativeHumidity", env.relative_humidity),
        ];
        if let Some(pressure) = env.barometric_pressure {
            rows.push(field("BarometricPressure", pressure));
        }
        for (standard, status) in cert.standards.iter().zip(&statuses) {
            rows.push(field(
                "Standard",
                &format!("{} ({}) due {}: {}", standard.description, standard.serial_no, standard.due_date, status),
            ));
        }
        for group in &cert.datasheet {
            rows.push(field("Group", &group.group));
        }
        rows.push(field("CustomerRequirements", &cert.customer_requirements));
        rows.push(field("Remarks", &cert.remarks));
        return print_table(format, &["field", "value"], &rows);
    }

    println!("{}", style(format!("Certificate {}", cert.cert_no)).bold());
    println!("{}", "─".repeat(50));
    print_field("Equipment", &cert.equipment_type);
    print_field("Description", &cert.asset_description);
    print_field("Manufacturer", &cert.manufacturer);
    print_field("Model", &cert.model);
    print_field("Operating range", &cert.operating_range);

    let env = cert.environmental_conditions();
    println!();
    println!("{}", style("Environmental conditions").bold());
    print_field("Temperature", env.temperature);
    print_field("Humidity", env.relative_humidity);
    if let Some(pressure) = env.barometric_pressure {
        print_field("Pressure", pressure);
    }

    if !cert.standards.is_empty() {
        println!();
        println!("{}", style("Standards").bold());
        for (standard, status) in cert.standards.iter().zip(&statuses) {
            let status_styled = match status {
                ExpirationStatus::Valid { .. } => style(status.to_string()).green(),
                ExpirationStatus::ExpiresToday => style(status.to_string()).yellow(),
                ExpirationStatus::Expired { .. } => style(status.to_string()).red(),
                ExpirationStatus::InvalidDate => style(status.to_string()).dim(),
            };
            println!(
                "  {} ({}) cal {} due {}  {}",
                standard.description,
                style(&standard.serial_no).cyan(),
                standard.cal_date,
                standard.due_date,
                status_styled
            );
        }
    }

    println!();
    println!("{}", style("Datasheet").bold());
    for group in &cert.datasheet {
        println!(
            "  {} {}",
            style(&group.group).cyan(),
            style(format!("({} point(s))", group.measurements.len())).dim()
        );
    }

    if !cert.customer_requirements.trim().is_empty() {
        println!();
        print_field("Requirements", &cert.customer_requirements);
    }
    if !cert.remarks.trim().is_empty() {
        print_field("Remarks", &cert.remarks);
    }

    Ok(())
}

fn field(name: &str, value: &str) -> Vec<String> {
    vec![name.to_string(), value.to_string()]
}

fn print_field(label: &str, value: &str) {
    let value = if value.trim().is_empty() { "-" } else { value };
    println!("  {:<16} {}", style(label).dim(), value);
}

fn matches_search(cert: &Certificate, needle: &str) -> bool {
    [
        cert.cert_no.as_str(),
        cert.model.as_str(),
        cert.manufacturer.as_str(),
        cert.asset_description.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::load(global)?;
    let certificates = &session.data.certificates;

    let mut selected: Vec<&Certificate> = match &args.model {
        Some(model) => certificates_for_model(certificates, model),
        None => certificates.iter().collect(),
    };
    if let Some(search) = &args.search {
        let needle = search.trim().to_lowercase();
        selected.retain(|c| matches_search(c, &needle));
    }

    let today = today();
    let summaries: Vec<CertificateSummary> = selected
        .iter()
        .map(|c| CertificateSummary::new(c, today))
        .collect();

    let format = session.format(global, OutputFormat::Tsv);
    if print_serialized(&summaries, format)? {
        return Ok(());
    }

    let rows: Vec<Vec<String>> = summaries
        .iter()
        .map(|s| {
            vec![
                s.cert_no.to_string(),
                s.model.to_string(),
                s.manufacturer.to_string(),
                truncate_str(s.description, 30),
                s.due_date.unwrap_or("-").to_string(),
                s.status
                    .map(|status| status.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();

    print_table(
        format,
        &["cert_no", "model", "manufacturer", "description", "due", "status"],
        &rows,
    )?;
    print_summary(format, global.quiet, rows.len(), "certificate");
    Ok(())
}
