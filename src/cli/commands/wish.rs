//! `ficelle wish` command - purchase wishlist

use clap::{Subcommand, ValueEnum};
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{display_id, escape_csv, escape_md, parse_id, truncate_str, Session};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::RecordPrefix;
use crate::entities::wishlist::{WishPriority, WishlistItem};

#[derive(Subcommand, Debug)]
pub enum WishCommands {
    /// Add something to buy
    Add(AddArgs),

    /// List the wishlist
    List,

    /// Remove an entry
    Remove(RemoveArgs),
}

/// CLI-friendly priority enum
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CliWishPriority {
    Low,
    Needed,
    Urgent,
}

impl From<CliWishPriority> for WishPriority {
    fn from(cli: CliWishPriority) -> Self {
        match cli {
            CliWishPriority::Low => WishPriority::Low,
            CliWishPriority::Needed => WishPriority::Needed,
            CliWishPriority::Urgent => WishPriority::Urgent,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Product name
    pub product: String,

    /// Wanted color
    #[arg(long, short = 'c')]
    pub color: Option<String>,

    /// How badly it is needed
    #[arg(long, short = 'p', value_enum, default_value = "low")]
    pub priority: CliWishPriority,

    /// Shop or product link
    #[arg(long, short = 'l')]
    pub link: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    /// Entry ID (WISH@N or N)
    pub id: String,
}

/// Run a wish subcommand
pub fn run(cmd: WishCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        WishCommands::Add(args) => run_add(args, global),
        WishCommands::List => run_list(global),
        WishCommands::Remove(args) => run_remove(args, global),
    }
}

fn run_add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let format = session.format(global, OutputFormat::Auto);
    let mut wishlist = session.wishlist();

    let item = wishlist.add_item(args.product, args.color, args.priority.into(), args.link)?;

    match format {
        OutputFormat::Id => println!("{}", display_id(RecordPrefix::Wish, item.id)),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&item).into_diagnostic()?);
        }
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(&item).into_diagnostic()?),
        _ => {
            if !global.quiet {
                println!(
                    "{} Added {} to the wishlist as {}",
                    style("✓").green(),
                    style(&item.product).yellow(),
                    style(display_id(RecordPrefix::Wish, item.id)).cyan()
                );
            }
        }
    }
    Ok(())
}

fn run_list(global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let format = session.format(global, OutputFormat::Tsv);
    let items = session.wishlist().items()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&items).into_diagnostic()?);
        }
        OutputFormat::Yaml => print!("{}", serde_yml::to_string(&items).into_diagnostic()?),
        OutputFormat::Csv => {
            println!("short_id,product,color,priority,link,status");
            for item in &items {
                println!(
                    "{},{},{},{},{},{}",
                    display_id(RecordPrefix::Wish, item.id),
                    escape_csv(&item.product),
                    escape_csv(item.color.as_deref().unwrap_or("")),
                    item.priority,
                    escape_csv(item.link.as_deref().unwrap_or("")),
                    item.status
                );
            }
        }
        OutputFormat::Md => {
            println!("| Short | Product | Color | Priority | Link | Status |");
            println!("|---|---|---|---|---|---|");
            for item in &items {
                println!(
                    "| {} | {} | {} | {} | {} | {} |",
                    display_id(RecordPrefix::Wish, item.id),
                    escape_md(&item.product),
                    escape_md(item.color.as_deref().unwrap_or("-")),
                    item.priority,
                    escape_md(item.link.as_deref().unwrap_or("-")),
                    item.status
                );
            }
        }
        OutputFormat::Id => {
            for item in &items {
                println!("{}", display_id(RecordPrefix::Wish, item.id));
            }
        }
        _ => print_table(&items),
    }
    Ok(())
}

fn print_table(items: &[WishlistItem]) {
    if items.is_empty() {
        println!("Wishlist is empty.");
        return;
    }

    println!(
        "{:<8} {:<24} {:<10} {:<8} {:<8} {}",
        style("SHORT").bold().dim(),
        style("PRODUCT").bold(),
        style("COLOR").bold(),
        style("PRIORITY").bold(),
        style("STATUS").bold(),
        style("LINK").bold()
    );
    println!("{}", "-".repeat(80));

    for item in items {
        let priority = match item.priority {
            WishPriority::Urgent => style(item.priority.to_string()).red(),
            WishPriority::Needed => style(item.priority.to_string()).yellow(),
            WishPriority::Low => style(item.priority.to_string()).dim(),
        };
        println!(
            "{:<8} {:<24} {:<10} {:<8} {:<8} {}",
            style(display_id(RecordPrefix::Wish, item.id)).cyan(),
            truncate_str(&item.product, 24),
            truncate_str(item.color.as_deref().unwrap_or("-"), 10),
            priority,
            item.status,
            item.link.as_deref().unwrap_or("")
        );
    }

    println!();
    println!("{} item(s) on the wishlist.", style(items.len()).cyan());
}

fn run_remove(args: RemoveArgs, global: &GlobalOpts) -> Result<()> {
    let id = parse_id(&args.id, RecordPrefix::Wish)?;
    let mut wishlist = Session::open(global)?.wishlist();
    let short_id = display_id(RecordPrefix::Wish, Some(id));

    if wishlist.remove_item(id)? {
        if !global.quiet {
            println!("{} Removed {}", style("✓").green(), style(&short_id).cyan());
        }
    } else if !global.quiet {
        println!(
            "{} {} was not on the wishlist; nothing to remove",
            style("!").yellow(),
            style(&short_id).cyan()
        );
    }
    Ok(())
}
