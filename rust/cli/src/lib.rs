//! # Brag CLI Library
//!
//! Command-line front end for the `brag_engine` crate: inspect the resolved
//! configuration, deal and score hands, and simulate whole rounds through the
//! timed turn machine.
//!
//! ## Main Entry Point
//!
//! The primary entry point is the [`run`] function, which parses command-line
//! arguments and executes the appropriate subcommand.
//!
//! ## Available Subcommands
//!
//! - `cfg`: Display the resolved configuration with value sources
//! - `deal`: Deal one round and show every hand with its score
//! - `eval`: Score a literal hand
//! - `sim`: Play rounds with scripted bots, optionally writing JSONL

use clap::Parser;
use std::io::Write;
pub mod cli;
mod commands;
mod config;
mod error;
pub mod formatters;
pub mod io_utils;
pub mod ui;

use cli::{BragCli, Commands};
use commands::{handle_cfg_command, handle_deal_command, handle_eval_command, handle_sim_command};

pub use error::CliError;

/// Main entry point for the CLI application.
///
/// Returns the process exit code: `0` for success, `2` for errors.
///
/// # Example
///
/// ```
/// let mut out = Vec::new();
/// let mut err = Vec::new();
/// let code = brag_cli::run(["brag", "eval", "JS", "JD", "JC"], &mut out, &mut err);
/// assert_eq!(code, 0);
/// assert!(String::from_utf8_lossy(&out).contains("Total: 63"));
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    const COMMANDS: &[&str] = &["cfg", "deal", "eval", "sim"];
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match BragCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;

            // Help and version should print to stdout and exit 0
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    if write!(out, "{}", e).is_err() {
                        return 2;
                    }
                    0
                }
                _ => {
                    if writeln!(err, "{}", e).is_err()
                        || writeln!(err).is_err()
                        || writeln!(err, "Three Card Brag CLI").is_err()
                        || writeln!(err, "Usage: brag <command> [options]\n").is_err()
                        || writeln!(err, "Commands:").is_err()
                    {
                        return 2;
                    }
                    for c in COMMANDS {
                        if writeln!(err, "  {}", c).is_err() {
                            return 2;
                        }
                    }
                    if writeln!(err, "\nFor full help, run: brag --help").is_err() {
                        return 2;
                    }
                    2
                }
            };
        }
    };

    if cli.verbose {
        brag_engine::logging::init_logging();
    }

    match dispatch(cli.cmd, out, err) {
        Ok(()) => 0,
        Err(e) => {
            if ui::write_error(err, &e.to_string()).is_err() {
                return 2;
            }
            2
        }
    }
}

fn dispatch(cmd: Commands, out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
    match cmd {
        Commands::Cfg => handle_cfg_command(out),
        Commands::Deal { seed, players } => {
            handle_deal_command(seed, players, &config::load()?, out)
        }
        Commands::Eval { cards, trump } => {
            handle_eval_command(&cards, trump.as_deref(), &config::load()?, out)
        }
        Commands::Sim {
            rounds,
            players,
            seed,
            output,
        } => handle_sim_command(
            rounds,
            players,
            seed,
            output.as_deref(),
            &config::load()?,
            out,
            err,
        ),
    }
}
