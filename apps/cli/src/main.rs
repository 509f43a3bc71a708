use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use daawa_config::load as load_config;
use daawa_invitations::utils::PhoneNormalizer;
use tracing::info;

mod scenario;

#[derive(Parser)]
#[command(name = "daawa")]
#[command(about = "Drive the Daawa invitation engine from the command line")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the canonical form of a phone number
    Normalize {
        phone: String,
        /// Calling code used when the number has none
        #[arg(long)]
        country_code: Option<String>,
    },
    /// Run a JSON scenario and print the resulting ledger and stats
    Simulate {
        scenario: PathBuf,
        /// Print a short summary instead of the full JSON report
        #[arg(long)]
        summary: bool,
    },
}

mod telemetry {
    use anyhow::Result;
    use tracing::Level;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    /// Logs go to stderr so stdout stays machine readable
    pub fn init_tracing() -> Result<()> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = SubscriberBuilder::default()
            .with_max_level(Level::INFO)
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

fn main() -> Result<()> {
    telemetry::init_tracing()?;

    let cli = Cli::parse();
    let config = load_config().context("failed to load configuration")?;

    match cli.command {
        Commands::Normalize {
            phone,
            country_code,
        } => {
            let normalizer = match country_code {
                Some(code) => PhoneNormalizer::new(code, config.contacts.min_digits),
                None => PhoneNormalizer::from_config(&config.contacts),
            };
            match normalizer.normalize(&phone) {
                Ok(normalized) => println!("{}", normalized),
                Err(error) => {
                    eprintln!("{} {}", "✗".red(), error);
                    std::process::exit(1);
                }
            }
        }
        Commands::Simulate {
            scenario: path,
            summary,
        } => {
            let loaded = scenario::load(&path)?;
            info!(path = %path.display(), "running scenario");
            let report = scenario::run(&config, loaded)?;

            if summary {
                let stats = report.stats;
                println!("{} {}", "Event".bold(), report.event_id);
                println!(
                    "  invited {}  accepted {}  maybe {}  declined {}  pending {}",
                    stats.total_invited,
                    stats.accepted.to_string().green(),
                    stats.maybe.to_string().yellow(),
                    stats.declined.to_string().red(),
                    stats.pending,
                );
                println!("  expected headcount {}", stats.expected_headcount());
                for rejection in &report.rejections {
                    println!("  {} {}", "✗".red(), rejection);
                }
            } else {
                let json = serde_json::to_string_pretty(&report)
                    .context("failed to serialize report")?;
                println!("{}", json);
            }
        }
    }

    Ok(())
}
