//! Eval command handler: scores a literal hand.
//!
//! The hand size sets the mode's card count, so any 3 to 9 card hand can be
//! scored against the standard rule table.

use std::io::Write;
use std::sync::Arc;

use brag_engine::bonus::BonusEngine;
use brag_engine::cards::Card;
use brag_engine::hand::Hand;

use crate::config::{self, Config};
use crate::error::CliError;
use crate::formatters::{format_evaluation, format_hand, format_trump};

pub fn handle_eval_command(
    cards: &[String],
    trump: Option<&str>,
    cfg: &Config,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let parsed = cards
        .iter()
        .map(|s| s.parse::<Card>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(CliError::InvalidInput)?;
    let hand = Hand::from_cards(parsed).map_err(|e| CliError::InvalidInput(e.to_string()))?;

    let trump = match trump {
        Some(s) => config::parse_trump(s)?,
        None => cfg.trump,
    };
    let mut cfg = cfg.clone();
    cfg.cards = hand.len();
    cfg.trump = trump;
    let mode = cfg.game_mode()?;
    let engine = BonusEngine::new(Arc::new(mode))?;
    let eval = engine.evaluate_hand(&hand)?;

    writeln!(out, "Hand: {}", format_hand(&hand))?;
    writeln!(out, "Trump: {}", format_trump(trump))?;
    for line in format_evaluation(&eval) {
        writeln!(out, "{}", line)?;
    }
    writeln!(out, "{}", eval.description())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(cards: &[&str]) -> Vec<String> {
        cards.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn three_jacks_total_63() {
        let mut out = Vec::new();
        handle_eval_command(&args(&["JS", "JD", "JC"]), None, &Config::default(), &mut out)
            .unwrap();
        let s = String::from_utf8(out).unwrap();
        assert!(s.contains("Three Of A Kind: +30"), "{}", s);
        assert!(s.contains("Rank sum: 33"));
        assert!(s.contains("Total: 63"));
    }

    #[test]
    fn duplicate_cards_are_invalid_input() {
        let mut out = Vec::new();
        let r = handle_eval_command(&args(&["JS", "JS", "2C"]), None, &Config::default(), &mut out);
        assert!(matches!(r, Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn two_cards_are_a_config_error() {
        let mut out = Vec::new();
        let r = handle_eval_command(&args(&["JS", "QS"]), None, &Config::default(), &mut out);
        assert!(matches!(r, Err(CliError::Config(_))));
    }
}
