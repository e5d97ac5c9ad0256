//! `ficelle alerts` command - lots running low

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{display_id, format_length, Session};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::RecordPrefix;

pub fn run(global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let format = session.format(global, OutputFormat::Tsv);
    let threshold = session.config.low_stock_threshold();
    let ledger = session.ledger();

    let mut low = ledger.low_stock_items(&threshold)?;

    match format {
        OutputFormat::Json | OutputFormat::Yaml => {
            for lot in &mut low {
                lot.photo = None;
            }
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&low).into_diagnostic()?);
            } else {
                print!("{}", serde_yml::to_string(&low).into_diagnostic()?);
            }
        }
        OutputFormat::Id => {
            for lot in &low {
                println!("{}", display_id(RecordPrefix::Lot, lot.id));
            }
        }
        _ => {
            if low.is_empty() {
                if !global.quiet {
                    println!("{} All stock levels are fine.", style("✓").green());
                }
                return Ok(());
            }
            for lot in &low {
                println!(
                    "{} {} {} {}: {} left ({:.0}%)",
                    style("⚠").yellow(),
                    style(display_id(RecordPrefix::Lot, lot.id)).cyan(),
                    lot.thread_type,
                    lot.material,
                    style(format_length(lot.remaining_length)).yellow(),
                    lot.remaining_pct() * 100.0
                );
            }
            if !global.quiet {
                println!();
                println!(
                    "Threshold: under {} or under {:.0}% of the initial length",
                    format_length(threshold.absolute_m),
                    threshold.ratio * 100.0
                );
            }
        }
    }

    Ok(())
}
