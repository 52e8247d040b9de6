//! Command-line definitions for the `brag` binary.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "brag",
    version,
    about = "Three Card Brag scoring and round simulation"
)]
pub struct BragCli {
    /// Emit engine logs to stderr (filter with RUST_LOG)
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the resolved configuration and where each value came from
    Cfg,
    /// Deal one round and print every hand with its score
    Deal {
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value_t = 2)]
        players: usize,
    },
    /// Score a literal hand, e.g. `brag eval JS JD JC`
    Eval {
        #[arg(required = true, num_args = 1..)]
        cards: Vec<String>,
        /// Trump rank for this evaluation (overrides BRAG_TRUMP)
        #[arg(long)]
        trump: Option<String>,
    },
    /// Play full rounds with scripted bots through the turn timer
    Sim {
        #[arg(long, default_value_t = 10)]
        rounds: u32,
        #[arg(long, default_value_t = 3)]
        players: usize,
        #[arg(long)]
        seed: Option<u64>,
        /// Write one JSON settlement per line to this file
        #[arg(long)]
        output: Option<String>,
    },
}
