//! `ficelle history` command - the consumption ledger

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{display_id, escape_csv, escape_md, format_length, parse_id, Session};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::RecordPrefix;

#[derive(clap::Args, Debug)]
pub struct HistoryArgs {
    /// Only show usage of this lot (LOT@N or N)
    #[arg(long, short = 'l')]
    pub lot: Option<String>,

    /// Show only the most recent N entries
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

pub fn run(args: HistoryArgs, global: &GlobalOpts) -> Result<()> {
    let lot_id = args
        .lot
        .as_deref()
        .map(|lot| parse_id(lot, RecordPrefix::Lot))
        .transpose()?;
    let session = Session::open(global)?;
    let format = session.format(global, OutputFormat::Tsv);
    let ledger = session.ledger();

    let mut records = ledger.history(lot_id)?;
    if let Some(limit) = args.limit {
        let skip = records.len().saturating_sub(limit);
        records.drain(..skip);
    }

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&records).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&records).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Csv => {
            println!("short_id,lot,quantity_m,used_at,project");
            for usage in &records {
                println!(
                    "{},{},{:.2},{},{}",
                    display_id(RecordPrefix::Use, usage.id),
                    display_id(RecordPrefix::Lot, Some(usage.stock_lot_id)),
                    usage.quantity_used,
                    usage.used_at.to_rfc3339(),
                    escape_csv(usage.project.as_deref().unwrap_or(""))
                );
            }
        }
        OutputFormat::Md => {
            println!("| Short | Lot | Used | Date | Project |");
            println!("|---|---|---|---|---|");
            for usage in &records {
                println!(
                    "| {} | {} | {} | {} | {} |",
                    display_id(RecordPrefix::Use, usage.id),
                    display_id(RecordPrefix::Lot, Some(usage.stock_lot_id)),
                    format_length(usage.quantity_used),
                    usage.used_at.format("%Y-%m-%d %H:%M"),
                    escape_md(usage.project.as_deref().unwrap_or("-"))
                );
            }
        }
        OutputFormat::Id => {
            for usage in &records {
                println!("{}", display_id(RecordPrefix::Use, usage.id));
            }
        }
        _ => {
            if records.is_empty() {
                println!("No usage recorded.");
                return Ok(());
            }
            println!(
                "{:<8} {:<8} {:>10} {:<17} {}",
                style("SHORT").bold().dim(),
                style("LOT").bold(),
                style("USED").bold(),
                style("DATE").bold(),
                style("PROJECT").bold()
            );
            println!("{}", "-".repeat(64));
            for usage in &records {
                println!(
                    "{:<8} {:<8} {:>10} {:<17} {}",
                    style(display_id(RecordPrefix::Use, usage.id)).cyan(),
                    display_id(RecordPrefix::Lot, Some(usage.stock_lot_id)),
                    format_length(usage.quantity_used),
                    usage.used_at.format("%Y-%m-%d %H:%M"),
                    usage.project.as_deref().unwrap_or("-")
                );
            }
            println!();
            println!("{} usage record(s).", style(records.len()).cyan());
        }
    }

    Ok(())
}
