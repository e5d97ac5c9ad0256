//! Shared helper functions for CLI commands
//!
//! Opening the inventory, resolving the output format and formatting
//! lengths, prices and ids the same way across every command.

use clap::ValueEnum;
use miette::Result;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::{format_ref, parse_ref, RecordId, RecordPrefix};
use crate::core::{Config, Ledger, Project, SqliteStore, Wishlist};

/// An opened inventory: its location, merged config and database
pub struct Session {
    pub project: Project,
    pub config: Config,
    store: SqliteStore,
}

impl Session {
    /// Locate the inventory (honoring `--root`), load config, open the database
    pub fn open(global: &GlobalOpts) -> Result<Self> {
        let project =
            Project::locate(global.root.as_deref()).map_err(|e| miette::miette!("{}", e))?;
        let config = Config::load(Some(project.root()));
        let store = project
            .open_store()
            .map_err(|e| miette::miette!("{}", e))?;
        tracing::debug!(root = %project.root().display(), "inventory opened");
        Ok(Self {
            project,
            config,
            store,
        })
    }

    /// Resolve `--format`, using the configured default and then `fallback` for auto
    pub fn format(&self, global: &GlobalOpts, fallback: OutputFormat) -> OutputFormat {
        resolve_format(global.format, self.config.default_format.as_deref(), fallback)
    }

    pub fn ledger(self) -> Ledger<SqliteStore> {
        Ledger::new(self.store)
    }

    pub fn wishlist(self) -> Wishlist<SqliteStore> {
        Wishlist::new(self.store)
    }
}

/// Pick the effective output format
///
/// An explicit flag wins; `auto` defers to the configured default, and an
/// unset or unparseable default falls back to the command's own choice.
pub fn resolve_format(
    requested: OutputFormat,
    configured: Option<&str>,
    fallback: OutputFormat,
) -> OutputFormat {
    if requested != OutputFormat::Auto {
        return requested;
    }
    match configured.and_then(|s| OutputFormat::from_str(s, true).ok()) {
        Some(OutputFormat::Auto) | None => fallback,
        Some(format) => format,
    }
}

/// Parse a user-typed reference like `LOT@3` or `3`
pub fn parse_id(input: &str, prefix: RecordPrefix) -> Result<RecordId> {
    parse_ref(input, prefix).map_err(|e| miette::miette!("{}", e))
}

/// Display form of an optional store id
pub fn display_id(prefix: RecordPrefix, id: Option<RecordId>) -> String {
    id.map(|id| format_ref(prefix, id)).unwrap_or_default()
}

/// Meters with two decimals
pub fn format_length(meters: f64) -> String {
    format!("{:.2} m", meters)
}

/// Amount with two decimals followed by the currency symbol
pub fn format_money(amount: f64, currency: &str) -> String {
    format!("{:.2} {}", amount, currency)
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Escape a string for CSV output
///
/// Handles commas, quotes, and newlines according to RFC 4180.
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Markdown cells cannot contain a bare pipe
pub fn escape_md(s: &str) -> String {
    s.replace('|', "\\|")
}
