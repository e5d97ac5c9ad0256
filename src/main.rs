use clap::Parser;
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ficelle::cli::{Cli, Commands, GlobalOpts};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior so piping to `head` does not panic.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    init_tracing(&global);

    match cli.command {
        Commands::Init(args) => ficelle::cli::commands::init::run(args),
        Commands::Lot(cmd) => ficelle::cli::commands::lot::run(cmd, &global),
        Commands::Use(args) => ficelle::cli::commands::consume::run(args, &global),
        Commands::History(args) => ficelle::cli::commands::history::run(args, &global),
        Commands::Alerts => ficelle::cli::commands::alerts::run(&global),
        Commands::Status => ficelle::cli::commands::status::run(&global),
        Commands::Price(args) => ficelle::cli::commands::price::run(args, &global),
        Commands::Wish(cmd) => ficelle::cli::commands::wish::run(cmd, &global),
        Commands::Config(cmd) => ficelle::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => ficelle::cli::commands::completions::run(args),
    }
}

/// Log to stderr; `FICELLE_LOG` overrides the level picked from the flags
fn init_tracing(global: &GlobalOpts) {
    let default_filter = if global.verbose {
        "ficelle=debug"
    } else if global.quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("FICELLE_LOG")
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
