use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod formatters;

#[derive(Parser)]
#[command(name = "ipo-commission")]
#[command(version, about = "Commission allocation for IPO subscription accounts")]
#[command(
    long_about = "Reads the per-stock profit/loss workbook, allocates commission per account \
                  (rate tiers, fixed overrides, range re-sums) and writes the JSON report \
                  consumed by the dashboard."
)]
pub struct Cli {
    /// Config file (default: <config dir>/ipo-commission/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute commissions and write the JSON report
    Report {
        /// Workbook to read (overrides `input` in the config)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// JSON destination (overrides `output` in the config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the JSON to stdout instead of writing a file
        #[arg(long, conflicts_with = "output")]
        stdout: bool,
    },

    /// Print totals and the per-account commission table
    Summary {
        /// Workbook to read (overrides `input` in the config)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// List allotted subscriptions without a sale price
    Missing {
        /// Workbook to read (overrides `input` in the config)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

impl Commands {
    pub fn input(&self) -> Option<&PathBuf> {
        match self {
            Commands::Report { input, .. }
            | Commands::Summary { input }
            | Commands::Missing { input } => input.as_ref(),
        }
    }
}
