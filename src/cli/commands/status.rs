//! `ficelle status` command - inventory dashboard

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{display_id, format_length, format_money, Session};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::RecordPrefix;
use crate::core::ledger::{DashboardMetrics, MaterialShare};

/// A lot under the low-stock threshold, as reported on the dashboard
#[derive(Debug, Serialize)]
struct LowStockLine {
    id: String,
    thread_type: String,
    material: String,
    remaining_m: f64,
    remaining_pct: f64,
}

#[derive(Debug, Serialize)]
struct StatusReport {
    #[serde(flatten)]
    metrics: DashboardMetrics,
    currency: String,
    low_stock: Vec<LowStockLine>,
    materials: Vec<MaterialShare>,
}

pub fn run(global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let format = session.format(global, OutputFormat::Auto);
    let threshold = session.config.low_stock_threshold();
    let currency = session.config.currency().to_string();
    let ledger = session.ledger();

    let report = StatusReport {
        metrics: ledger.dashboard_metrics()?,
        low_stock: ledger
            .low_stock_items(&threshold)?
            .into_iter()
            .map(|lot| LowStockLine {
                id: display_id(RecordPrefix::Lot, lot.id),
                remaining_pct: lot.remaining_pct() * 100.0,
                remaining_m: lot.remaining_length,
                thread_type: lot.thread_type,
                material: lot.material,
            })
            .collect(),
        materials: ledger.material_breakdown()?,
        currency,
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&report).into_diagnostic()?);
        }
        OutputFormat::Md => print!("{}", render(&report, true)),
        _ => print!("{}", render(&report, false)),
    }

    Ok(())
}

fn render(report: &StatusReport, markdown: bool) -> String {
    let metrics = &report.metrics;
    let mut output = String::new();

    output.push_str(&heading("Inventory", markdown));
    let mut summary = Builder::default();
    summary.push_record(["Metric", "Value"]);
    summary.push_record(["Lots", &metrics.lot_count.to_string()]);
    summary.push_record(["Thread left", &format_length(metrics.total_remaining_m)]);
    summary.push_record([
        "Stock value (bought)",
        &format_money(metrics.total_value, &report.currency),
    ]);
    summary.push_record(["Thread used", &format_length(metrics.total_consumed_m)]);
    output.push_str(&table(summary, markdown));
    output.push('\n');

    output.push_str(&heading("Low stock", markdown));
    if report.low_stock.is_empty() {
        output.push_str(&format!("{} All stock levels are fine.\n", style("✓").green()));
    } else {
        let mut alerts = Builder::default();
        alerts.push_record(["Lot", "Type", "Material", "Remaining", "Left"]);
        for line in &report.low_stock {
            alerts.push_record([
                line.id.clone(),
                line.thread_type.clone(),
                line.material.clone(),
                format_length(line.remaining_m),
                format!("{:.0}%", line.remaining_pct),
            ]);
        }
        output.push_str(&table(alerts, markdown));
    }
    output.push('\n');

    if !report.materials.is_empty() {
        output.push_str(&heading("By material", markdown));
        let mut materials = Builder::default();
        materials.push_record(["Material", "Lots", "Remaining", "Share"]);
        for share in &report.materials {
            let pct = if metrics.total_remaining_m > 0.0 {
                share.remaining_m / metrics.total_remaining_m * 100.0
            } else {
                0.0
            };
            materials.push_record([
                share.material.clone(),
                share.lots.to_string(),
                format_length(share.remaining_m),
                format!("{:.0}%", pct),
            ]);
        }
        output.push_str(&table(materials, markdown));
    }

    output
}

fn heading(title: &str, markdown: bool) -> String {
    if markdown {
        format!("## {}\n\n", title)
    } else {
        format!("{}\n", style(title).bold().cyan())
    }
}

fn table(builder: Builder, markdown: bool) -> String {
    let mut table = builder.build();
    if markdown {
        table.with(Style::markdown());
    } else {
        table.with(Style::rounded());
    }
    format!("{}\n", table)
}
