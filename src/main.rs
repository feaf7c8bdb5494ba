use analyzer::Analyzer;
use anyhow::{Context, bail};
use clap::Parser;
use std::path::PathBuf;

mod printers;

/// Analyzes an order table: client risk and gain, bad orders, and a shift plan.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML config file. Defaults to `order-insight.toml` if present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Order table (.ods, .xlsx, .xls or .csv). Overrides `input.path`.
    #[arg(long, short)]
    input: Option<PathBuf>,

    /// Worksheet to read. Overrides `input.sheet`.
    #[arg(long)]
    sheet: Option<String>,

    /// Print the full report as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = configuration::load_config(cli.config.as_deref())
        .context("Failed to load configuration")?;
    // The guard flushes the file writer on drop, so it lives until main returns.
    let _log_guard =
        configuration::logging::init(&config.logging).context("Failed to initialize logging")?;

    let Some(input) = cli.input.or(config.input.path.clone()) else {
        bail!("No order table given. Pass --input or set input.path in the config file.");
    };
    let sheet = cli.sheet.or(config.input.sheet.clone());

    let orders = file_reader::read_orders(&input, sheet.as_deref())
        .with_context(|| format!("Failed to read orders from {}", input.display()))?;
    if orders.is_empty() {
        tracing::warn!(path = %input.display(), "Order table is empty.");
    }

    let analyzer = Analyzer::new(config.analysis).context("Invalid analysis settings")?;
    let report = analyzer.run(&orders).context("Analysis failed")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    printers::print_margin_drivers(&report);
    printers::print_clients(&report);
    printers::print_bad_orders(&report);
    printers::print_correlations(&report);
    printers::print_shift(&report);
    Ok(())
}
