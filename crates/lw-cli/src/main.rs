//! CLI frontend for the Lootwright loot and trade engines.

mod campaign;
mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "lw",
    about = "Lootwright: roll loot tables, populate actors, and settle trades",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log engine internals at debug level (overrides LW_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw from a roll table and print the raw results
    Roll {
        /// Table id or name
        table: String,

        /// Number of draws
        #[arg(short = 'n', long, default_value = "1")]
        times: u32,

        /// RNG seed for deterministic rolls
        #[arg(short, long)]
        seed: Option<u64>,

        /// Campaign file
        #[arg(short, long, default_value = "campaign.json")]
        campaign: PathBuf,
    },

    /// Fill actors' inventories and purses from a loot table
    Populate {
        /// Actor names (case-insensitive)
        #[arg(required = true)]
        actors: Vec<String>,

        /// Table to roll (default: the configured loot table)
        #[arg(short, long)]
        table: Option<String>,

        /// RNG seed for deterministic rolls
        #[arg(short, long)]
        seed: Option<u64>,

        /// Write the updated campaign here (default: print only)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the reports as JSON
        #[arg(long)]
        json: bool,

        /// Campaign file
        #[arg(short, long, default_value = "campaign.json")]
        campaign: PathBuf,
    },

    /// Roll a currency formula such as "2d6[gp], 1d20[sp]"
    Currency {
        /// Comma-separated dice[denomination] clauses
        formula: String,

        /// RNG seed for deterministic rolls
        #[arg(short, long)]
        seed: Option<u64>,

        /// Campaign file supplying exchange rates
        #[arg(short, long)]
        campaign: Option<PathBuf>,
    },

    /// Break coins down across denominations
    Exchange {
        /// Amount such as "1000cp" or "5gp 3sp"
        amount: String,

        /// Only use these denominations (comma-separated, e.g. "gp,sp")
        #[arg(long)]
        only: Option<String>,

        /// Campaign file supplying exchange rates
        #[arg(short, long)]
        campaign: Option<PathBuf>,
    },

    /// Move items between actors: buy, sell, loot, or give
    Trade {
        /// buy, sell, loot, or give
        kind: String,

        /// Actor giving up the items
        source: String,

        /// Actor receiving the items
        destination: String,

        /// Items by name, optionally with a count: "Rope:3"
        #[arg(required = true)]
        items: Vec<String>,

        /// Price multiplier for this trade
        #[arg(short, long)]
        modifier: Option<f64>,

        /// Write the updated campaign here (default: print only)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export the trade log as markdown to this file
        #[arg(long)]
        log: Option<PathBuf>,

        /// Campaign file
        #[arg(short, long, default_value = "campaign.json")]
        campaign: PathBuf,
    },

    /// Share a loot pile's coins, or hand them all to one looter
    Split {
        /// The loot pile
        pile: String,

        /// Actors sharing the coins
        #[arg(required = true)]
        observers: Vec<String>,

        /// Give every coin to the single named observer instead of splitting
        #[arg(long)]
        take: bool,

        /// Write the updated campaign here (default: print only)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export the trade log as markdown to this file
        #[arg(long)]
        log: Option<PathBuf>,

        /// Campaign file
        #[arg(short, long, default_value = "campaign.json")]
        campaign: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("LW_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Roll {
            table,
            times,
            seed,
            campaign,
        } => commands::roll::run(&campaign, &table, times, seed),
        Commands::Populate {
            actors,
            table,
            seed,
            output,
            json,
            campaign,
        } => commands::populate::run(
            &campaign,
            &actors,
            table.as_deref(),
            seed,
            output.as_deref(),
            json,
        ),
        Commands::Currency {
            formula,
            seed,
            campaign,
        } => commands::currency::run(campaign.as_deref(), &formula, seed),
        Commands::Exchange {
            amount,
            only,
            campaign,
        } => commands::exchange::run(campaign.as_deref(), &amount, only.as_deref()),
        Commands::Trade {
            kind,
            source,
            destination,
            items,
            modifier,
            output,
            log,
            campaign,
        } => commands::trade::run(
            &campaign,
            &kind,
            &source,
            &destination,
            &items,
            modifier,
            commands::Outputs {
                campaign: output.as_deref(),
                log: log.as_deref(),
            },
        ),
        Commands::Split {
            pile,
            observers,
            take,
            output,
            log,
            campaign,
        } => commands::split::run(
            &campaign,
            &pile,
            &observers,
            take,
            commands::Outputs {
                campaign: output.as_deref(),
                log: log.as_deref(),
            },
        ),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
