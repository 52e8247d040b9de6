//! Deal command handler.
//!
//! Deals one round from a seeded deck and prints every seat's hand with its
//! evaluation. Nothing is played; the boot is collected and the pot shown.

use crate::config::Config;
use crate::error::CliError;
use crate::formatters::{format_hand, format_trump};
use brag_engine::engine::Engine;
use brag_engine::player::PlayerId;
use std::io::Write;

pub fn handle_deal_command(
    seed: Option<u64>,
    players: usize,
    cfg: &Config,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let base_seed = seed.or(cfg.seed).unwrap_or_else(rand::random);
    let mode = cfg.game_mode()?;
    let mut eng = Engine::new(mode, Some(base_seed))?;
    let seats: Vec<(PlayerId, u32)> = (0..players)
        .map(|id| (id, eng.mode().initial_coins))
        .collect();
    let round = eng.deal_round(&seats)?;

    writeln!(out, "Seed: {}", base_seed)?;
    writeln!(out, "Trump: {}", format_trump(round.trump()))?;
    writeln!(out, "Pot: {}", round.pot())?;
    for seat in round.seats() {
        let eval = eng
            .bonus()
            .evaluate_hand_with_trump(seat.hand(), round.trump())?;
        writeln!(
            out,
            "P{}: {}  {}",
            seat.id(),
            format_hand(seat.hand()),
            eval.description()
        )?;
    }
    Ok(())
}
