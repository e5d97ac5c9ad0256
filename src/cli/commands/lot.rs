//! `ficelle lot` command - stock lot intake and inventory

use clap::Subcommand;
use console::style;
use dialoguer::{theme::ColorfulTheme, Input};
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::helpers::{
    display_id, escape_csv, escape_md, format_length, format_money, parse_id, truncate_str,
    Session,
};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::RecordPrefix;
use crate::entities::stock_lot::{LotIntake, LowStockThreshold, StockLot};

#[derive(Subcommand, Debug)]
pub enum LotCommands {
    /// Record a newly bought lot
    Add(AddArgs),

    /// List lots with filtering
    List(ListArgs),

    /// Show a lot's details
    Show(ShowArgs),

    /// Write a lot's photo to a file
    Photo(PhotoArgs),
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Thread type (e.g. wool, cotton, silk)
    #[arg(long = "type", short = 't')]
    pub thread_type: Option<String>,

    /// Precise material (e.g. alpaca, merino)
    #[arg(long, short = 'm')]
    pub material: Option<String>,

    /// Color as a hex string
    #[arg(long, short = 'c', default_value = "#ffffff")]
    pub color: String,

    /// Length of one skein or spool, in meters
    #[arg(long, short = 'l')]
    pub length: Option<f64>,

    /// Number of skeins or spools in the lot
    #[arg(long, short = 'n', default_value_t = 1)]
    pub count: u32,

    /// Price paid for the whole lot
    #[arg(long, short = 'p')]
    pub price: Option<f64>,

    /// Brand or shop
    #[arg(long, short = 's', default_value = "")]
    pub source: String,

    /// Texture photo to attach (image file)
    #[arg(long)]
    pub photo: Option<PathBuf>,

    /// Interactive mode (prompt for fields)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Case-insensitive match on type or material
    #[arg(long)]
    pub search: Option<String>,

    /// Only lots with thread left
    #[arg(long)]
    pub available: bool,

    /// Only lots below the low-stock threshold
    #[arg(long)]
    pub low: bool,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Lot ID (LOT@N or N)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct PhotoArgs {
    /// Lot ID (LOT@N or N)
    pub id: String,

    /// File to write the image to
    #[arg(long, short = 'o')]
    pub output: PathBuf,
}

/// Run a lot subcommand
pub fn run(cmd: LotCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        LotCommands::Add(args) => run_add(args, global),
        LotCommands::List(args) => run_list(args, global),
        LotCommands::Show(args) => run_show(args, global),
        LotCommands::Photo(args) => run_photo(args, global),
    }
}

fn run_add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let format = session.format(global, OutputFormat::Auto);
    let currency = session.config.currency().to_string();

    let photo = match &args.photo {
        Some(path) => Some(std::fs::read(path).into_diagnostic()?),
        None => None,
    };

    let intake = if args.interactive {
        prompt_intake(&args, photo)?
    } else {
        LotIntake {
            thread_type: args
                .thread_type
                .ok_or_else(|| miette::miette!("--type is required (or use -i)"))?,
            material: args
                .material
                .ok_or_else(|| miette::miette!("--material is required (or use -i)"))?,
            color: args.color,
            unit_length: args
                .length
                .ok_or_else(|| miette::miette!("--length is required (or use -i)"))?,
            lot_count: args.count,
            total_price: args.price.unwrap_or(0.0),
            source: args.source,
            photo,
        }
    };

    let mut ledger = session.ledger();
    let lot = ledger.add_lot(intake)?;
    let short_id = display_id(RecordPrefix::Lot, lot.id);

    match format {
        OutputFormat::Id => println!("{}", short_id),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&without_photo(lot)).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&without_photo(lot)).into_diagnostic()?;
            print!("{}", yaml);
        }
        _ => {
            if global.quiet {
                return Ok(());
            }
            println!(
                "{} Recorded lot {}",
                style("✓").green(),
                style(&short_id).cyan()
            );
            println!(
                "   {} {} | {} x{} | {}",
                style(&lot.thread_type).yellow(),
                style(&lot.material).white(),
                format_length(lot.initial_length),
                lot.lot_count,
                format_money(lot.price, &currency)
            );
        }
    }

    Ok(())
}

fn prompt_intake(args: &AddArgs, photo: Option<Vec<u8>>) -> Result<LotIntake> {
    let theme = ColorfulTheme::default();

    println!("{} New stock lot", style("◆").cyan());

    let thread_type: String = Input::with_theme(&theme)
        .with_prompt("Thread type")
        .default(args.thread_type.clone().unwrap_or_else(|| "wool".to_string()))
        .interact_text()
        .into_diagnostic()?;
    let material: String = Input::with_theme(&theme)
        .with_prompt("Material")
        .default(args.material.clone().unwrap_or_default())
        .allow_empty(true)
        .interact_text()
        .into_diagnostic()?;
    let color: String = Input::with_theme(&theme)
        .with_prompt("Color (hex)")
        .default(args.color.clone())
        .interact_text()
        .into_diagnostic()?;
    let unit_length: f64 = Input::with_theme(&theme)
        .with_prompt("Length per skein (m)")
        .default(args.length.unwrap_or(100.0))
        .interact_text()
        .into_diagnostic()?;
    let lot_count: u32 = Input::with_theme(&theme)
        .with_prompt("Number of skeins")
        .default(args.count)
        .interact_text()
        .into_diagnostic()?;
    let total_price: f64 = Input::with_theme(&theme)
        .with_prompt("Total price")
        .default(args.price.unwrap_or(0.0))
        .interact_text()
        .into_diagnostic()?;
    let source: String = Input::with_theme(&theme)
        .with_prompt("Brand / shop")
        .default(args.source.clone())
        .allow_empty(true)
        .interact_text()
        .into_diagnostic()?;

    Ok(LotIntake {
        thread_type,
        material,
        color,
        unit_length,
        lot_count,
        total_price,
        source,
        photo,
    })
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let format = session.format(global, OutputFormat::Tsv);
    let threshold = session.config.low_stock_threshold();
    let currency = session.config.currency().to_string();
    let ledger = session.ledger();

    let mut lots = match &args.search {
        Some(text) => ledger.search(text),
        None => ledger.lots(),
    }?;

    if args.available {
        lots.retain(StockLot::is_available);
    }
    if args.low {
        lots.retain(|lot| lot.is_low_stock(&threshold));
    }

    if args.count {
        println!("{}", lots.len());
        return Ok(());
    }

    if lots.is_empty() && matches!(format, OutputFormat::Tsv) {
        println!("No lots found.");
        return Ok(());
    }

    print_lots(lots, format, &threshold, &currency)
}

fn print_lots(
    lots: Vec<StockLot>,
    format: OutputFormat,
    threshold: &LowStockThreshold,
    currency: &str,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let lots: Vec<StockLot> = lots.into_iter().map(without_photo).collect();
            let json = serde_json::to_string_pretty(&lots).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let lots: Vec<StockLot> = lots.into_iter().map(without_photo).collect();
            let yaml = serde_yml::to_string(&lots).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Csv => {
            println!("short_id,type,material,color,initial_m,remaining_m,lot_count,price,source");
            for lot in &lots {
                println!(
                    "{},{},{},{},{:.2},{:.2},{},{:.2},{}",
                    display_id(RecordPrefix::Lot, lot.id),
                    escape_csv(&lot.thread_type),
                    escape_csv(&lot.material),
                    escape_csv(&lot.color),
                    lot.initial_length,
                    lot.remaining_length,
                    lot.lot_count,
                    lot.price,
                    escape_csv(&lot.source)
                );
            }
        }
        OutputFormat::Md => {
            println!("| Short | Type | Material | Color | Remaining | Left | Price | Source |");
            println!("|---|---|---|---|---|---|---|---|");
            for lot in &lots {
                println!(
                    "| {} | {} | {} | {} | {} | {:.0}% | {} | {} |",
                    display_id(RecordPrefix::Lot, lot.id),
                    escape_md(&lot.thread_type),
                    escape_md(&lot.material),
                    lot.color,
                    format_length(lot.remaining_length),
                    lot.remaining_pct() * 100.0,
                    format_money(lot.price, currency),
                    escape_md(&lot.source)
                );
            }
        }
        OutputFormat::Id => {
            for lot in &lots {
                println!("{}", display_id(RecordPrefix::Lot, lot.id));
            }
        }
        _ => {
            println!(
                "{:<8} {:<12} {:<14} {:<8} {:>11} {:>5} {:>11} {:<16}",
                style("SHORT").bold().dim(),
                style("TYPE").bold(),
                style("MATERIAL").bold(),
                style("COLOR").bold(),
                style("REMAINING").bold(),
                style("LEFT").bold(),
                style("PRICE").bold(),
                style("SOURCE").bold()
            );
            println!("{}", "-".repeat(92));

            for lot in &lots {
                let remaining = format_length(lot.remaining_length);
                let remaining = if lot.is_low_stock(threshold) {
                    style(remaining).yellow()
                } else {
                    style(remaining).green()
                };
                println!(
                    "{:<8} {:<12} {:<14} {:<8} {:>11} {:>4.0}% {:>11} {:<16}",
                    style(display_id(RecordPrefix::Lot, lot.id)).cyan(),
                    truncate_str(&lot.thread_type, 12),
                    truncate_str(&lot.material, 14),
                    truncate_str(&lot.color, 8),
                    remaining,
                    lot.remaining_pct() * 100.0,
                    format_money(lot.price, currency),
                    truncate_str(&lot.source, 16)
                );
            }

            println!();
            println!(
                "{} lot(s) found. Use {} to reference by short ID.",
                style(lots.len()).cyan(),
                style("LOT@N").cyan()
            );
        }
    }

    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let id = parse_id(&args.id, RecordPrefix::Lot)?;
    let session = Session::open(global)?;
    let format = session.format(global, OutputFormat::Auto);
    let threshold = session.config.low_stock_threshold();
    let currency = session.config.currency().to_string();
    let ledger = session.ledger();

    let lot = ledger.get_lot(id)?;
    let uses = ledger.history(Some(id))?;

    match format {
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&without_photo(lot)).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&without_photo(lot)).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Id => println!("{}", display_id(RecordPrefix::Lot, lot.id)),
        _ => {
            println!("{}", style("─".repeat(60)).dim());
            println!(
                "{}: {}",
                style("ID").bold(),
                style(display_id(RecordPrefix::Lot, lot.id)).cyan()
            );
            println!(
                "{}: {} / {}",
                style("Thread").bold(),
                style(&lot.thread_type).yellow(),
                lot.material
            );
            println!("{}: {}", style("Color").bold(), lot.color);
            println!(
                "{}: {} of {} ({:.0}%)",
                style("Remaining").bold(),
                format_length(lot.remaining_length),
                format_length(lot.initial_length),
                lot.remaining_pct() * 100.0
            );
            if lot.is_low_stock(&threshold) {
                println!("   {} running low", style("⚠").yellow());
            }
            println!("{}: {}", style("Skeins").bold(), lot.lot_count);
            println!(
                "{}: {}",
                style("Price").bold(),
                format_money(lot.price, &currency)
            );
            if !lot.source.is_empty() {
                println!("{}: {}", style("Source").bold(), lot.source);
            }
            if let Some(photo) = &lot.photo {
                println!(
                    "{}: {} bytes (export with {})",
                    style("Photo").bold(),
                    photo.len(),
                    style("ficelle lot photo").yellow()
                );
            }
            println!("{}", style("─".repeat(60)).dim());
            println!(
                "{}: {}",
                style("Added").dim(),
                style(lot.created_at.format("%Y-%m-%d %H:%M")).dim()
            );

            if !uses.is_empty() {
                println!();
                println!("{}", style("Usage").bold());
                for usage in &uses {
                    println!(
                        "  {} {} {:>10}  {}",
                        style(display_id(RecordPrefix::Use, usage.id)).cyan(),
                        usage.used_at.format("%Y-%m-%d"),
                        format_length(usage.quantity_used),
                        usage.project.as_deref().unwrap_or("-")
                    );
                }
            }
        }
    }

    Ok(())
}

fn run_photo(args: PhotoArgs, global: &GlobalOpts) -> Result<()> {
    let id = parse_id(&args.id, RecordPrefix::Lot)?;
    let ledger = Session::open(global)?.ledger();

    let photo = ledger.photo(id)?;
    let Some(bytes) = photo else {
        return Err(miette::miette!(
            "{} has no photo",
            display_id(RecordPrefix::Lot, Some(id))
        ));
    };

    std::fs::write(&args.output, &bytes).into_diagnostic()?;
    if !global.quiet {
        println!(
            "{} Wrote {} bytes to {}",
            style("✓").green(),
            bytes.len(),
            style(args.output.display()).cyan()
        );
    }
    Ok(())
}

/// Structured output carries no image bytes
fn without_photo(mut lot: StockLot) -> StockLot {
    lot.photo = None;
    lot
}
