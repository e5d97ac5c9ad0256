//! `ficelle config` command - inspect configuration

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::project::Project;
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration values
    Show(ShowArgs),

    /// Show paths to configuration files
    Path,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,
}

/// Keys understood in config.yaml
const VALID_KEYS: &[(&str, &str)] = &[
    ("hourly_rate", "Hourly rate for `ficelle price`"),
    ("margin_pct", "Default margin (%) for `ficelle price`"),
    ("currency", "Currency symbol shown next to prices"),
    ("low_stock_absolute", "Low-stock floor in meters"),
    ("low_stock_ratio", "Low-stock fraction of the initial length"),
    ("default_format", "Default output format (yaml, json, tsv, etc.)"),
];

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    let project = Project::locate(global.root.as_deref()).ok();
    match cmd {
        ConfigCommands::Show(args) => run_show(args, project.as_ref(), global),
        ConfigCommands::Path => run_path(project.as_ref()),
    }
}

fn run_show(args: ShowArgs, project: Option<&Project>, global: &GlobalOpts) -> Result<()> {
    let config = Config::load(project.map(|p| p.root()));

    if let Some(key) = &args.key {
        return match effective_value(&config, key) {
            Some(v) => {
                println!("{}", v);
                Ok(())
            }
            None => Err(miette::miette!(
                "Unknown config key '{}'. Known keys: {}",
                key,
                VALID_KEYS
                    .iter()
                    .map(|(k, _)| *k)
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        };
    }

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&config).into_diagnostic()?);
        }
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(&config).into_diagnostic()?),
        _ => {
            println!("{}", style("Effective Configuration").bold().underlined());
            println!();
            for (key, description) in VALID_KEYS {
                let value = effective_value(&config, key).unwrap_or_default();
                println!(
                    "  {:<20} {:<10} {}",
                    style(key).cyan(),
                    style(value).yellow(),
                    style(description).dim()
                );
            }

            println!();
            println!("{}", style("Config Sources (in priority order):").dim());
            println!("  1. Environment variables (FICELLE_HOURLY_RATE, FICELLE_CURRENCY)");
            println!("  2. Inventory config (.ficelle/config.yaml)");
            println!("  3. Global config (~/.config/ficelle/config.yaml)");
        }
    }

    Ok(())
}

fn run_path(project: Option<&Project>) -> Result<()> {
    let global_path = Config::global_config_path()
        .ok_or_else(|| miette::miette!("Could not determine global config directory"))?;

    println!("{}", style("Configuration file paths:").bold());
    println!();
    println!("  {} {}", style("Global:").cyan(), global_path.display());
    print_exists(global_path.exists(), 9);

    println!();
    match project {
        Some(project) => {
            let path = Config::project_config_path(project.root());
            println!("  {} {}", style("Inventory:").cyan(), path.display());
            print_exists(path.exists(), 12);
        }
        None => println!(
            "  {} {}",
            style("Inventory:").cyan(),
            style("(not in a ficelle inventory)").dim()
        ),
    }

    Ok(())
}

fn print_exists(exists: bool, indent: usize) {
    let note = if exists {
        style("(exists)").green()
    } else {
        style("(not created)").dim()
    };
    println!("{:indent$}{}", "", note, indent = indent);
}

/// Value in effect for a key, defaults included
fn effective_value(config: &Config, key: &str) -> Option<String> {
    let threshold = config.low_stock_threshold();
    match key {
        "hourly_rate" => Some(config.hourly_rate().to_string()),
        "margin_pct" => Some(config.margin_pct().to_string()),
        "currency" => Some(config.currency().to_string()),
        "low_stock_absolute" => Some(threshold.absolute_m.to_string()),
        "low_stock_ratio" => Some(threshold.ratio.to_string()),
        "default_format" => Some(
            config
                .default_format
                .clone()
                .unwrap_or_else(|| "auto".to_string()),
        ),
        _ => None,
    }
}
