//! `ddk`: operator CLI over the holiday calendar and reminder engine.
//!
//! Output is `key=value` lines on stdout (or JSON with `--json`); logs go to
//! stderr so stdout stays machine-readable.

mod commands;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ddk")]
#[command(about = "DueDesk holiday calendar and deadline engine", long_about = None)]
struct Cli {
    /// Config layers in merge order (repeatable). Falls back to DDK_CONFIG
    /// (comma-separated) when not given.
    #[arg(long = "config", global = true)]
    config_paths: Vec<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the holiday table for a year
    Holidays {
        #[arg(long)]
        year: i32,

        /// Print JSON instead of key=value lines
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Business-day arithmetic
    BusinessDay {
        #[command(subcommand)]
        cmd: BusinessDayCmd,
    },

    /// List available templates (built-in + configured files)
    Templates,

    /// Preview the reminders a template produces for a year
    Generate {
        /// Template key (see `ddk templates`)
        #[arg(long, required_unless_present = "file", conflicts_with = "file")]
        template: Option<String>,

        /// Path to a YAML template file
        #[arg(long)]
        file: Option<PathBuf>,

        #[arg(long)]
        year: i32,

        /// Print JSON instead of key=value lines
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> overrides)
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

#[derive(Subcommand)]
enum BusinessDayCmd {
    /// The date itself if it is a business day, otherwise the next one
    Next {
        #[arg(long)]
        date: NaiveDate,
    },

    /// The date itself if it is a business day, otherwise the previous one
    Prev {
        #[arg(long)]
        date: NaiveDate,
    },

    /// Move N business days (negative = backwards)
    Add {
        #[arg(long)]
        date: NaiveDate,

        #[arg(long, allow_negative_numbers = true)]
        days: i32,
    },

    /// Last business day of a month
    LastOfMonth {
        #[arg(long)]
        year: i32,

        #[arg(long)]
        month: u32,
    },
}

fn main() -> Result<()> {
    // Silent if the file does not exist.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cli = Cli::parse();

    let config_paths = cli.config_paths;
    let ctx = || commands::Context::load(&config_paths);

    match cli.cmd {
        Commands::Holidays { year, json } => commands::holidays::list(&ctx()?, year, json)?,

        Commands::BusinessDay { cmd } => {
            let ctx = ctx()?;
            match cmd {
                BusinessDayCmd::Next { date } => commands::business::next(&ctx, date)?,
                BusinessDayCmd::Prev { date } => commands::business::prev(&ctx, date)?,
                BusinessDayCmd::Add { date, days } => commands::business::add(&ctx, date, days)?,
                BusinessDayCmd::LastOfMonth { year, month } => {
                    commands::business::last_of_month(&ctx, year, month)?
                }
            }
        }

        Commands::Templates => commands::templates::list(&ctx()?)?,

        Commands::Generate {
            template,
            file,
            year,
            json,
        } => {
            let source = match (template, file) {
                (_, Some(path)) => commands::templates::Source::File(path),
                (Some(key), None) => commands::templates::Source::Key(key),
                (None, None) => anyhow::bail!("must provide --template or --file"),
            };
            commands::templates::generate(&ctx()?, source, year, json)?
        }

        // Hashes arbitrary layers; does not need an engine config.
        Commands::ConfigHash { paths } => {
            let loaded = ddk_config::load_layered_yaml(&paths)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}
