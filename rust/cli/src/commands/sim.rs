//! Sim command handler.
//!
//! Plays whole rounds through the engine's turn machine on a single-threaded
//! tokio runtime. Seat decisions come from a seeded bot task that listens on
//! the event bus: it answers every `TurnStarted` and falls back to a safer
//! decision when one is rejected. Coins carry over between rounds and the
//! button rotates; players who cannot pay the boot sit out.

use std::io::Write;
use std::path::Path;

use brag_engine::engine::Engine;
use brag_engine::events::{EventSubscription, GameEvent};
use brag_engine::game::GameState;
use brag_engine::player::{Decision, PlayerId};
use brag_engine::round::Settlement;
use brag_engine::turn::PlayerDecision;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::Serialize;
use tokio::sync::mpsc;

use crate::config::Config;
use crate::error::CliError;
use crate::io_utils::{create_jsonl, write_jsonl};
use crate::ui;

/// Pot limit applied when the configuration leaves it open, in boots.
const SIM_POT_LIMIT_BOOTS: u32 = 40;
const BOT_SEED_SALT: u64 = 0x5EED_B075;
const DECISION_BUFFER: usize = 16;

#[derive(Debug, Serialize)]
struct SimRecord<'a> {
    round: u32,
    seed: u64,
    settlement: &'a Settlement,
}

pub fn handle_sim_command(
    rounds: u32,
    players: usize,
    seed: Option<u64>,
    output: Option<&str>,
    cfg: &Config,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if rounds == 0 {
        return Err(CliError::InvalidInput("--rounds must be at least 1".into()));
    }
    let seed = seed.or(cfg.seed).unwrap_or_else(rand::random);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(simulate(rounds, players, seed, output, cfg, out, err))
}

async fn simulate(
    rounds: u32,
    players: usize,
    seed: u64,
    output: Option<&str>,
    cfg: &Config,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let mut mode = cfg.game_mode()?;
    if mode.pot_limit.is_none() {
        mode.pot_limit = Some(mode.boot_amount.saturating_mul(SIM_POT_LIMIT_BOOTS));
    }
    mode.validate_table(players)?;
    let boot = mode.boot_amount;
    let cards = mode.number_of_cards;

    let mut engine = Engine::new(mode, Some(seed))?;
    let mut game = GameState::new(players, engine.mode().initial_coins);
    let mut writer = output.map(|p| create_jsonl(Path::new(p))).transpose()?;

    let (tx, mut rx) = mpsc::channel(DECISION_BUFFER);
    let bots = ScriptedBots::new(seed ^ BOT_SEED_SALT, boot, cards);
    let bot_task = tokio::spawn(drive_bots(engine.bus().subscribe(), tx, bots));

    tracing::info!(rounds, players, seed, "simulation started");
    writeln!(out, "Seed: {}", seed)?;

    let mut wins = vec![0u32; players];
    let mut played = 0;
    for round_no in 1..=rounds {
        let seats = game.seating_order(boot);
        if seats.len() < 2 {
            ui::display_warning(
                err,
                &format!(
                    "stopping after {} rounds: fewer than two players can pay the boot",
                    played
                ),
            )?;
            break;
        }
        let mut round = engine.deal_round(&seats)?;
        let settlement = engine.play_round(&mut round, &mut rx).await?;
        game.apply_settlement(&settlement);
        game.rotate_button();
        played += 1;
        if let Some(w) = wins.get_mut(settlement.winner) {
            *w += 1;
        }

        let description = settlement
            .result_for(settlement.winner)
            .and_then(|r| r.evaluation.as_ref())
            .map(|e| e.description())
            .unwrap_or_else(|| "no showdown".to_string());
        writeln!(
            out,
            "Round {}: P{} wins {} coins with {}",
            round_no, settlement.winner, settlement.pot, description
        )?;
        if let Some(w) = writer.as_mut() {
            write_jsonl(
                w,
                &SimRecord {
                    round: round_no,
                    seed,
                    settlement: &settlement,
                },
            )?;
        }
    }
    bot_task.abort();

    if let Some(mut w) = writer {
        w.flush()?;
    }
    writeln!(out, "Rounds played: {}", played)?;
    for &(id, coins) in game.players() {
        writeln!(out, "P{}: wins {}, coins {}", id, wins[id], coins)?;
    }
    Ok(())
}

async fn drive_bots(
    mut events: EventSubscription,
    decisions: mpsc::Sender<PlayerDecision>,
    mut bots: ScriptedBots,
) {
    while let Some(event) = events.receiver().recv().await {
        if let Some(reply) = bots.respond(&event)
            && decisions.send(reply).await.is_err()
        {
            break;
        }
    }
}

/// Seeded decision maker shared by every seat.
#[derive(Debug)]
struct ScriptedBots {
    rng: ChaCha20Rng,
    boot: u32,
    stake: u32,
    cards: usize,
}

impl ScriptedBots {
    fn new(seed: u64, boot: u32, cards: usize) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            boot,
            stake: boot,
            cards,
        }
    }

    fn respond(&mut self, event: &GameEvent) -> Option<PlayerDecision> {
        match event {
            GameEvent::TurnStarted { player, .. } => Some(self.decide(*player)),
            GameEvent::DecisionRejected {
                player, decision, ..
            } => {
                // Bet can only fail on coins; Fold never fails.
                let fallback = if *decision == Decision::Bet {
                    Decision::Fold
                } else {
                    Decision::Bet
                };
                Some(PlayerDecision {
                    player: *player,
                    decision: fallback,
                })
            }
            GameEvent::DecisionResolved {
                decision: Decision::Raise(amount),
                ..
            } => {
                self.stake = *amount;
                None
            }
            GameEvent::RoundSettled(_) => {
                self.stake = self.boot;
                None
            }
            _ => None,
        }
    }

    fn decide(&mut self, player: PlayerId) -> PlayerDecision {
        let decision = match self.rng.random_range(0..100u32) {
            0..=54 => Decision::Bet,
            55..=64 => Decision::Raise(self.stake.saturating_add(self.boot)),
            65..=72 => Decision::See,
            73..=82 => Decision::Swap {
                index: self.rng.random_range(0..self.cards),
            },
            83..=90 => Decision::Show,
            _ => Decision::Fold,
        };
        PlayerDecision { player, decision }
    }
}
