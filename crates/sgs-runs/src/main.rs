//! sgs-runs CLI
//!
//! Encode flag selections into run codes and decode them back.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sgs_runs::{CodecConfig, Group, RunConfiguration, Selection};

#[derive(Parser)]
#[command(name = "sgs-runs", version, about = "Encode and decode rule-catalog run codes")]
struct Cli {
    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log codec activity
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the code for a selection
    Encode {
        #[arg(long = "category")]
        categories: Vec<String>,
        #[arg(long = "language")]
        languages: Vec<String>,
        #[arg(long = "severity")]
        severities: Vec<String>,
        #[arg(long = "feature")]
        features: Vec<String>,
        /// Drop trailing zero bytes
        #[arg(long, conflicts_with = "no_trim")]
        trim: bool,
        /// Keep every group at full width
        #[arg(long)]
        no_trim: bool,
    },
    /// Print the selection a code stands for
    Decode {
        code: String,
        /// Print JSON instead of one line per group
        #[arg(long)]
        json: bool,
    },
    /// List the flags of a group
    Vocab { group: Group },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = match &cli.config {
        Some(path) => CodecConfig::load(path)?,
        None => CodecConfig::load_default()?,
    };

    match cli.command {
        Command::Encode {
            categories,
            languages,
            severities,
            features,
            trim,
            no_trim,
        } => {
            let selection = Selection {
                categories,
                languages,
                severities,
                features,
            };
            let trim = if trim || no_trim { trim } else { settings.trim };
            let config = RunConfiguration::from_selection(&selection, trim)?;
            println!("{}", config.code());
        }
        Command::Decode { code, json } => {
            let config = RunConfiguration::from_code(&code)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config.selection())?);
            } else {
                for group in Group::ORDER {
                    let flags = config.group(group);
                    println!("{}: {}", group, flags.get_set_flags().join(", "));
                    let unknown = flags.unknown_indices();
                    if !unknown.is_empty() {
                        println!("  unknown indices: {:?}", unknown);
                    }
                }
            }
        }
        Command::Vocab { group } => {
            for entry in group.vocabulary().entries() {
                println!("{:>3}  {:<16} {}", entry.index, entry.name, entry.label);
            }
        }
    }

    Ok(())
}
