//! Configuration command handler.
//!
//! Prints the resolved configuration as pretty JSON, each value paired with
//! the layer it came from (`default`, `file` or `env`).
//!
//! # Example Output
//!
//! ```json
//! {
//!   "cards": {
//!     "value": 3,
//!     "source": "default"
//!   },
//!   ...
//! }
//! ```

use crate::config;
use crate::error::CliError;
use crate::formatters::format_trump;
use std::io::Write;

/// Handle the cfg command.
///
/// # Errors
///
/// Returns `CliError::Config` if configuration loading fails.
/// Returns `CliError::Io` if writing to output stream fails.
pub fn handle_cfg_command(out: &mut dyn Write) -> Result<(), CliError> {
    let config::ConfigResolved { config, sources } = config::load_with_sources()?;
    let display = serde_json::json!({
        "seed": {
            "value": config.seed,
            "source": sources.seed,
        },
        "cards": {
            "value": config.cards,
            "source": sources.cards,
        },
        "turn_secs": {
            "value": config.turn_secs,
            "source": sources.turn_secs,
        },
        "trump": {
            "value": format_trump(config.trump),
            "source": sources.trump,
        },
        "initial_coins": {
            "value": config.initial_coins,
            "source": sources.initial_coins,
        },
        "boot_amount": {
            "value": config.boot_amount,
            "source": sources.boot_amount,
        },
        "pot_limit": {
            "value": config.pot_limit,
            "source": sources.pot_limit,
        }
    });
    let json_str = serde_json::to_string_pretty(&display)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}
