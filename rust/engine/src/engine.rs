use std::sync::Arc;

use tokio::sync::mpsc;

use crate::bonus::BonusEngine;
use crate::deck::Deck;
use crate::errors::{ConfigError, GameError, TurnError};
use crate::events::{EventBus, GameEvent};
use crate::mode::GameMode;
use crate::player::PlayerId;
use crate::round::{DecisionEffect, Round, RoundPhase, Settlement};
use crate::turn::{PlayerDecision, TurnMachine};

const DEFAULT_SEED: u64 = 0xB7A6_0003;

/// Core engine that deals rounds, drives turns and settles the pot.
///
/// Each round gets its own deck seeded from the engine seed and the round
/// counter, so a seed reproduces a whole session.
///
/// # Examples
///
/// ```
/// use brag_engine::engine::Engine;
/// use brag_engine::mode::GameMode;
///
/// let mut engine = Engine::new(GameMode::three_card(), Some(42)).unwrap();
/// let mut round = engine.deal_round(&[(0, 100), (1, 100)]).unwrap();
/// assert_eq!(round.pot(), 20);
///
/// let settlement = engine.settle_round(&mut round).unwrap();
/// assert_eq!(settlement.pot, 20);
/// ```
#[derive(Debug)]
pub struct Engine {
    mode: Arc<GameMode>,
    bonus: BonusEngine,
    seed: u64,
    rounds_dealt: u64,
    bus: EventBus,
    turns: TurnMachine,
}

impl Engine {
    pub fn new(mode: GameMode, seed: Option<u64>) -> Result<Self, ConfigError> {
        let mode = Arc::new(mode);
        let bonus = BonusEngine::new(Arc::clone(&mode))?;
        let bus = EventBus::new();
        Ok(Self {
            mode,
            bonus,
            seed: seed.unwrap_or(DEFAULT_SEED),
            rounds_dealt: 0,
            turns: TurnMachine::new(bus.clone()),
            bus,
        })
    }

    pub fn mode(&self) -> &GameMode {
        &self.mode
    }
    pub fn bonus(&self) -> &BonusEngine {
        &self.bonus
    }
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }
    pub fn turns(&mut self) -> &mut TurnMachine {
        &mut self.turns
    }
    pub fn rounds_dealt(&self) -> u64 {
        self.rounds_dealt
    }

    /// Shuffles a fresh deck and deals a round to `players` (id, coins) in turn order.
    pub fn deal_round(&mut self, players: &[(PlayerId, u32)]) -> Result<Round, GameError> {
        let mut deck = Deck::new_with_seed(self.seed.wrapping_add(self.rounds_dealt));
        deck.shuffle();
        let round = Round::deal(Arc::clone(&self.mode), players, Box::new(deck))?;
        self.rounds_dealt += 1;
        tracing::info!(
            round = self.rounds_dealt,
            players = players.len(),
            trump = ?round.trump(),
            "round dealt"
        );
        Ok(round)
    }

    /// Runs turns until the round ends, then settles it.
    ///
    /// Each turn waits up to the mode's turn duration for a decision on
    /// `decisions` before the timeout decision is applied.
    pub async fn play_round(
        &mut self,
        round: &mut Round,
        decisions: &mut mpsc::Receiver<PlayerDecision>,
    ) -> Result<Settlement, TurnError> {
        let duration = self.mode.turn_duration_secs;
        while round.phase() == RoundPhase::InProgress {
            let player = round.current_player();
            let resolution = self.turns.run_turn(round, player, duration, decisions).await?;
            if let DecisionEffect::RoundOver(reason) = resolution.effect {
                tracing::debug!(reason = ?reason, "round over");
                break;
            }
        }
        Ok(self.settle_round(round)?)
    }

    /// Settles `round` with this engine's rules and publishes the result.
    pub fn settle_round(&mut self, round: &mut Round) -> Result<Settlement, GameError> {
        if self.turns.phase() != crate::turn::TurnPhase::Idle {
            self.turns.stop_timer();
        }
        let settlement = round.settle(&self.bonus)?;
        self.bus.publish(GameEvent::RoundSettled(settlement.clone()));
        Ok(settlement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_deals_same_hands() {
        let players = [(0, 100), (1, 100), (2, 100)];
        let mut a = Engine::new(GameMode::three_card(), Some(9)).unwrap();
        let mut b = Engine::new(GameMode::three_card(), Some(9)).unwrap();
        let ra = a.deal_round(&players).unwrap();
        let rb = b.deal_round(&players).unwrap();
        for (sa, sb) in ra.seats().iter().zip(rb.seats()) {
            assert_eq!(sa.hand(), sb.hand());
        }
    }

    #[test]
    fn successive_rounds_use_fresh_decks() {
        let players = [(0, 100), (1, 100)];
        let mut e = Engine::new(GameMode::three_card(), Some(9)).unwrap();
        let r1 = e.deal_round(&players).unwrap();
        let r2 = e.deal_round(&players).unwrap();
        assert_eq!(e.rounds_dealt(), 2);
        assert_ne!(r1.seats()[0].hand(), r2.seats()[0].hand());
    }

    #[test]
    fn rejects_invalid_mode() {
        let mut mode = GameMode::three_card();
        mode.rules.clear();
        assert_eq!(
            Engine::new(mode, None).unwrap_err(),
            ConfigError::EmptyRuleSet
        );
    }
}
