//! `ficelle use` command - take thread from a lot

use clap::ValueEnum;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{display_id, format_length, parse_id, Session};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::RecordPrefix;
use crate::entities::stock_lot::LengthUnit;

/// CLI-friendly length unit
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum CliLengthUnit {
    Cm,
    #[default]
    M,
}

impl From<CliLengthUnit> for LengthUnit {
    fn from(cli: CliLengthUnit) -> Self {
        match cli {
            CliLengthUnit::Cm => LengthUnit::Centimeters,
            CliLengthUnit::M => LengthUnit::Meters,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct UseArgs {
    /// Lot to take from (LOT@N or N)
    pub lot: String,

    /// Amount used
    pub amount: f64,

    /// Unit of the amount
    #[arg(long, short = 'u', value_enum, default_value = "m")]
    pub unit: CliLengthUnit,

    /// Project the thread went into
    #[arg(long, short = 'p')]
    pub project: Option<String>,
}

pub fn run(args: UseArgs, global: &GlobalOpts) -> Result<()> {
    let lot_id = parse_id(&args.lot, RecordPrefix::Lot)?;
    let session = Session::open(global)?;
    let format = session.format(global, OutputFormat::Auto);
    let threshold = session.config.low_stock_threshold();
    let mut ledger = session.ledger();

    let consumption = ledger.consume(lot_id, args.amount, args.unit.into(), args.project)?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&consumption).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&consumption).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Id => println!("{}", display_id(RecordPrefix::Use, consumption.usage.id)),
        _ => {
            if global.quiet {
                return Ok(());
            }
            println!(
                "{} Used {} from {} ({} left)",
                style("✓").green(),
                style(format_length(consumption.usage.quantity_used)).yellow(),
                style(display_id(RecordPrefix::Lot, Some(lot_id))).cyan(),
                format_length(consumption.new_remaining)
            );
            if let Some(project) = &consumption.usage.project {
                println!("   {} {}", style("→").dim(), project);
            }

            let lot = ledger.get_lot(lot_id)?;
            if lot.is_low_stock(&threshold) {
                println!(
                    "{} {} is running low ({:.0}% left)",
                    style("⚠").yellow(),
                    display_id(RecordPrefix::Lot, Some(lot_id)),
                    lot.remaining_pct() * 100.0
                );
            }
        }
    }

    Ok(())
}
