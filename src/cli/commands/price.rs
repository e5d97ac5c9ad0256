//! `ficelle price` command - suggested sale price for a finished piece

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{format_money, resolve_format};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::pricing::suggested_price;
use crate::core::{Config, Project};

#[derive(clap::Args, Debug)]
pub struct PriceArgs {
    /// Hours of work
    #[arg(long = "hours", short = 'H')]
    pub hours: f64,

    /// Hourly rate (default: config hourly_rate, else 15)
    #[arg(long, short = 'r')]
    pub rate: Option<f64>,

    /// Cost of materials used
    #[arg(long, short = 'm', default_value_t = 0.0)]
    pub material: f64,

    /// Margin in percent (default: config margin_pct, else 20)
    #[arg(long)]
    pub margin: Option<f64>,
}

pub fn run(args: PriceArgs, global: &GlobalOpts) -> Result<()> {
    // Pricing works outside an inventory too; only the config is wanted
    let project = Project::locate(global.root.as_deref()).ok();
    let config = Config::load(project.as_ref().map(|p| p.root()));
    let format = resolve_format(
        global.format,
        config.default_format.as_deref(),
        OutputFormat::Auto,
    );

    let rate = args.rate.unwrap_or_else(|| config.hourly_rate());
    let margin = args.margin.unwrap_or_else(|| config.margin_pct());
    let quote = suggested_price(args.hours, rate, args.material, margin);
    tracing::debug!(hours = args.hours, rate, margin, sale = quote.sale_price, "price computed");

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&quote).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&quote).into_diagnostic()?);
        }
        OutputFormat::Id | OutputFormat::Tsv | OutputFormat::Csv => {
            println!("{:.2}", quote.sale_price);
        }
        _ => {
            let currency = config.currency();
            println!(
                "{}: {}",
                style("Production cost").bold(),
                format_money(quote.production_cost, currency)
            );
            println!(
                "{}: {}",
                style("Suggested price").bold(),
                style(format_money(quote.sale_price, currency)).green()
            );
            if quote.is_premium() && !global.quiet {
                println!(
                    "{} Premium piece: worth highlighting the work that went into it",
                    style("★").yellow()
                );
            }
        }
    }

    Ok(())
}
