mod cli;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use cli::{formatters, Cli, Commands};
use colored::Colorize;
use ipo_commission::config::CommissionConfig;
use ipo_commission::importers;
use ipo_commission::reports::{self, Report};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Report file name used when neither `--output` nor the config names one
const DEFAULT_OUTPUT: &str = "report_data.json";

fn main() -> Result<()> {
    // Initialize logging; stdout is reserved for results
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => CommissionConfig::default_path()
            .ok_or_else(|| anyhow!("Could not determine config directory; pass --config"))?,
    };
    let config = CommissionConfig::load(&config_path)?;
    let config_dir = config_path.parent().unwrap_or(Path::new("."));

    let input = cli
        .command
        .input()
        .cloned()
        .or_else(|| config.input.as_ref().map(|p| relative_to(config_dir, p)))
        .ok_or_else(|| anyhow!("No workbook given: pass --input or set `input` in {}", config_path.display()))?;

    let report = generate(&input, &config)?;

    match &cli.command {
        Commands::Report { output, stdout, .. } => {
            if *stdout {
                reports::write_report(&report, std::io::stdout().lock())?;
                println!();
                return Ok(());
            }
            let output = output
                .clone()
                .or_else(|| config.output.as_ref().map(|p| relative_to(config_dir, p)))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
            reports::write_report_file(&report, &output)?;

            print!("{}", formatters::format_headline(&report));
            println!("\n{} Report written to {}", "✓".green().bold(), output.display());
        }
        Commands::Summary { .. } => {
            print!("{}", formatters::format_headline(&report));
            print!("{}", formatters::format_accounts_table(&report));
            print!("{}", formatters::format_range_table(&report.special_range));
        }
        Commands::Missing { .. } => {
            print!("{}", formatters::format_missing_table(&report.missing_records));
        }
    }

    Ok(())
}

/// Load the workbook and run the allocation pipeline once
fn generate(input: &Path, config: &CommissionConfig) -> Result<Report> {
    info!("Generating commission report from {:?}", input);
    let grid = importers::load_workbook(input)
        .with_context(|| format!("Failed to load workbook {}", input.display()))?;
    let generated_at = chrono::Local::now().naive_local();
    reports::build_report(&grid, config, generated_at)
}

/// Paths in the config file are relative to the file itself
fn relative_to(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
