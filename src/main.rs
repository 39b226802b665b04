use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use spamguard::cli;

#[derive(Debug, Parser)]
#[command(name = "spamguard")]
#[command(about = "Terminal dashboard for a remote spam classification service")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scan email text and print the verdict
    Scan {
        /// File containing the raw email content; reads stdin if omitted
        file: Option<PathBuf>,
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Show the scan audit log
    History {
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Show the verdict distribution
    Analytics {
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Interactive dashboard session
    Dash,
    /// Check config and service reachability
    Health,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Scan { file, format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_scan(file.as_deref(), fmt)
        }
        Commands::History { format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_history(fmt)
        }
        Commands::Analytics { format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_analytics(fmt)
        }
        Commands::Dash => cli::run_dash(),
        Commands::Health => cli::run_health(),
    }
}
