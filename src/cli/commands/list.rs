//! `cala list` command - Enumerate models, datasheet groups and nominals

use clap::Subcommand;
use miette::Result;
use serde::Serialize;

use crate::cli::commands::utils::Session;
use crate::cli::helpers::{print_serialized, print_summary, print_table};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::catalog::{
    certificate_info, certificates_for_model, list_groups, list_models, list_nominals,
};

#[derive(Subcommand, Debug)]
pub enum ListCommands {
    /// Distinct equipment models, optionally filtered
    Models(ModelsArgs),

    /// Datasheet groups of a certificate
    Groups(GroupsArgs),

    /// Nominal values recorded in a datasheet group
    Nominals(NominalsArgs),
}

#[derive(clap::Args, Debug)]
pub struct ModelsArgs {
    /// Case-insensitive substring to match
    pub search: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct GroupsArgs {
    /// Certificate number
    pub cert_no: String,
}

#[derive(clap::Args, Debug)]
pub struct NominalsArgs {
    /// Certificate number
    pub cert_no: String,

    /// Datasheet group (e.g. "Mass")
    pub group: String,
}

#[derive(Serialize)]
struct ModelEntry<'a> {
    model: &'a str,
    certificates: Vec<&'a str>,
}

pub fn run(cmd: ListCommands, global: &GlobalOpts) -> Result<()> {
    let session = Session::load(global)?;
    let certificates = &session.data.certificates;
    let format = session.format(global, OutputFormat::Tsv);

    match cmd {
        ListCommands::Models(args) => {
            let models: Vec<ModelEntry> = list_models(certificates, args.search.as_deref())
                .into_iter()
                .map(|model| ModelEntry {
                    model,
                    certificates: certificates_for_model(certificates, model)
                        .iter()
                        .map(|c| c.cert_no.as_str())
                        .collect(),
                })
                .collect();

            if print_serialized(&models, format)? {
                return Ok(());
            }
            let rows: Vec<Vec<String>> = models
                .iter()
                .map(|m| vec![m.model.to_string(), m.certificates.join(", ")])
                .collect();
            print_table(format, &["model", "certificates"], &rows)?;
            print_summary(format, global.quiet, rows.len(), "model");
        }
        ListCommands::Groups(args) => {
            certificate_info(certificates, &args.cert_no)?;
            let groups = list_groups(certificates, &args.cert_no);

            if print_serialized(&groups, format)? {
                return Ok(());
            }
            let rows: Vec<Vec<String>> = groups.iter().map(|g| vec![g.to_string()]).collect();
            print_table(format, &["group"], &rows)?;
            print_summary(format, global.quiet, rows.len(), "group");
        }
        ListCommands::Nominals(args) => {
            certificate_info(certificates, &args.cert_no)?;
            let nominals = list_nominals(certificates, &args.cert_no, &args.group);

            if print_serialized(&nominals, format)? {
                return Ok(());
            }
            let rows: Vec<Vec<String>> = nominals
                .iter()
                .map(|n| vec![n.nominal_text(), n.unit.to_string()])
                .collect();
            print_table(format, &["nominal", "unit"], &rows)?;
            print_summary(format, global.quiet, rows.len(), "nominal");
        }
    }

    Ok(())
}
