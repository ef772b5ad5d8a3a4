//! `cala range` command - Inspect CMC range tables

use clap::{Subcommand, ValueEnum};
use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::commands::utils::Session;
use crate::cli::helpers::{print_serialized, print_summary, print_table};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::cmc::CmcExpression;
use crate::core::uncertainty::resolve_target;
use crate::core::units::Unit;
use crate::entities::range::CalibrationRangeRecord;

#[derive(Subcommand, Debug)]
pub enum RangeCommands {
    /// List range records
    List(ListArgs),

    /// Find the range record and CMC that govern a value
    Find(FindArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableKind {
    /// Balances and scales
    Mass,
    /// Temperature and humidity
    Thermo,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only list one table
    #[arg(long, short = 't', value_enum)]
    pub table: Option<TableKind>,
}

#[derive(clap::Args, Debug)]
pub struct FindArgs {
    /// Target value
    #[arg(allow_negative_numbers = true)]
    pub value: f64,

    /// Unit of the value (g, kg, lb, °C, °F, %RH)
    pub unit: String,
}

#[derive(Serialize)]
struct RangeRow<'a> {
    table: &'static str,
    #[serde(flatten)]
    record: &'a CalibrationRangeRecord,
}

#[derive(Serialize)]
struct RangeMatch<'a> {
    value: f64,
    unit: Unit,
    table_value: f64,
    table_unit: Unit,
    equipment: &'a str,
    id: &'a str,
    cmc: &'a str,
    cmc_at_value: f64,
}

pub fn run(cmd: RangeCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        RangeCommands::List(args) => run_list(args, global),
        RangeCommands::Find(args) => run_find(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::load(global)?;
    let data = &session.data;

    let mut rows: Vec<RangeRow> = Vec::new();
    if args.table != Some(TableKind::Thermo) {
        rows.extend(data.mass_ranges.records().iter().map(|record| RangeRow {
            table: "mass",
            record,
        }));
    }
    if args.table != Some(TableKind::Mass) {
        rows.extend(data.thermo_ranges.records().iter().map(|record| RangeRow {
            table: "thermo",
            record,
        }));
    }

    let format = session.format(global, OutputFormat::Tsv);
    if print_serialized(&rows, format)? {
        return Ok(());
    }

    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.table.to_string(),
                r.record.equipment.clone(),
                r.record.id.clone(),
                r.record.range.min.to_string(),
                r.record.range.max.to_string(),
                r.record.cmc.clone(),
            ]
        })
        .collect();
    print_table(format, &["table", "equipment", "id", "min", "max", "cmc"], &table)?;
    print_summary(format, global.quiet, table.len(), "range");
    Ok(())
}

fn run_find(args: FindArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::load(global)?;
    let unit: Unit = args.unit.parse()?;

    let target = resolve_target(&session.data, unit, args.value)?;
    let cmc = CmcExpression::parse(target.range.cmc)?;

    let found = RangeMatch {
        value: args.value,
        unit,
        table_value: target.value,
        table_unit: target.base,
        equipment: target.equipment,
        id: target.range.id,
        cmc: target.range.cmc,
        cmc_at_value: cmc.total_at(target.value),
    };

    let format = session.format(global, OutputFormat::Auto);
    if print_serialized(&found, format)? {
        return Ok(());
    }

    if format == OutputFormat::Auto {
        println!(
            "{} {} {} resolves to {} on {}",
            style("✓").green(),
            found.value,
            found.unit,
            style(found.id).cyan(),
            found.equipment
        );
        if found.unit != found.table_unit {
            println!("  table value: {:.4} {}", found.table_value, found.table_unit);
        }
        println!("  CMC: {}", style(found.cmc).yellow());
        return Ok(());
    }

    print_table(
        format,
        &["value", "unit", "equipment", "id", "cmc"],
        &[vec![
            found.value.to_string(),
            found.unit.to_string(),
            found.equipment.to_string(),
            found.id.to_string(),
            found.cmc.to_string(),
        ]],
    )
}
