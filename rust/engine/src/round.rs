//! One dealt round: seats, pot, stake, turn order and settlement.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::bonus::{BonusEngine, HandEvaluation};
use crate::cards::Rank;
use crate::deck::CardSource;
use crate::errors::{ConfigError, GameError};
use crate::mode::{GameMode, TimeoutAction};
use crate::player::{Decision, PlayerId, Seat};
use crate::rules::{DecisionPolicy, SeatView, StandardPolicy, ValidatedDecision};
use crate::turn::DecisionTarget;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    InProgress,
    Settling,
    Complete,
}

/// Why a round stopped taking decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEnd {
    /// Every other player folded
    LastPlayerStanding,
    Show,
    PotLimit,
}

/// What applying one decision did to the round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionEffect {
    /// The named player acts next (may be the same player after a `See`)
    NextTurn(PlayerId),
    RoundOver(RoundEnd),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatResult {
    pub player: PlayerId,
    /// `None` for folded seats, which are never evaluated
    pub evaluation: Option<HandEvaluation>,
    pub folded: bool,
    /// Coins after the pot was paid out
    pub coins: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub winner: PlayerId,
    pub pot: u32,
    pub trump: Option<Rank>,
    pub results: Vec<SeatResult>,
}

impl Settlement {
    pub fn result_for(&self, player: PlayerId) -> Option<&SeatResult> {
        self.results.iter().find(|r| r.player == player)
    }
}

pub struct Round {
    mode: Arc<GameMode>,
    seats: Vec<Seat>,
    deck: Box<dyn CardSource + Send>,
    trump: Option<Rank>,
    pot: u32,
    stake: u32,
    turn: usize,
    phase: RoundPhase,
    policy: Arc<dyn DecisionPolicy>,
}

impl fmt::Debug for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Round")
            .field("seats", &self.seats)
            .field("trump", &self.trump)
            .field("pot", &self.pot)
            .field("stake", &self.stake)
            .field("turn", &self.turn)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl Round {
    /// Seats `players` (id, coins) in turn order, collects the boot from each
    /// and deals `number_of_cards` to every seat from `deck`.
    pub fn deal(
        mode: Arc<GameMode>,
        players: &[(PlayerId, u32)],
        mut deck: Box<dyn CardSource + Send>,
    ) -> Result<Self, GameError> {
        mode.validate()?;
        mode.validate_table(players.len())?;

        let mut seats = Vec::with_capacity(players.len());
        let mut pot = 0;
        for &(id, coins) in players {
            if seats.iter().any(|s: &Seat| s.id() == id) {
                return Err(ConfigError::DuplicatePlayer(id).into());
            }
            let mut seat = Seat::new(id, coins);
            seat.pay(mode.boot_amount)?;
            pot += mode.boot_amount;
            seats.push(seat);
        }

        for _ in 0..mode.number_of_cards {
            for seat in &mut seats {
                let card = deck.draw_card().ok_or(GameError::DeckExhausted)?;
                seat.give_card(card)?;
            }
        }

        tracing::debug!(players = seats.len(), pot, "round dealt");
        Ok(Self {
            trump: mode.trump_rank(),
            stake: mode.boot_amount,
            mode,
            seats,
            deck,
            pot,
            turn: 0,
            phase: RoundPhase::InProgress,
            policy: Arc::new(StandardPolicy),
        })
    }

    /// Overrides the trump rank for this round only.
    pub fn with_trump(mut self, trump: Option<Rank>) -> Self {
        self.trump = trump;
        self
    }

    pub fn with_policy(mut self, policy: Arc<dyn DecisionPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn mode(&self) -> &GameMode {
        &self.mode
    }
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }
    pub fn pot(&self) -> u32 {
        self.pot
    }
    pub fn stake(&self) -> u32 {
        self.stake
    }
    pub fn trump(&self) -> Option<Rank> {
        self.trump
    }
    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn seat(&self, player: PlayerId) -> Option<&Seat> {
        self.seats.iter().find(|s| s.id() == player)
    }

    fn seat_index(&self, player: PlayerId) -> Result<usize, GameError> {
        self.seats
            .iter()
            .position(|s| s.id() == player)
            .ok_or(GameError::UnknownPlayer(player))
    }

    pub fn current_player(&self) -> PlayerId {
        self.seats[self.turn].id()
    }

    pub fn active_players(&self) -> Vec<PlayerId> {
        self.seats
            .iter()
            .filter(|s| !s.is_folded())
            .map(Seat::id)
            .collect()
    }

    fn active_count(&self) -> usize {
        self.seats.iter().filter(|s| !s.is_folded()).count()
    }

    fn view_at(&self, idx: usize) -> SeatView {
        let seat = &self.seats[idx];
        SeatView {
            coins: seat.coins(),
            stake: self.stake,
            active_players: self.active_count(),
            hand_len: seat.hand().len(),
            seen: seat.has_seen(),
            deck_remaining: self.deck.remaining(),
        }
    }

    pub fn seat_view(&self, player: PlayerId) -> Result<SeatView, GameError> {
        Ok(self.view_at(self.seat_index(player)?))
    }

    /// Decisions the policy currently allows `player`; swaps list every card index.
    pub fn legal_decisions(&self, player: PlayerId) -> Result<Vec<Decision>, GameError> {
        let view = self.seat_view(player)?;
        let raise_to = self.stake.saturating_mul(2).max(self.stake + 1);
        let mut candidates = vec![Decision::Bet, Decision::Raise(raise_to), Decision::See];
        candidates.extend((0..view.hand_len).map(|index| Decision::Swap { index }));
        candidates.push(Decision::Show);
        candidates.push(Decision::Fold);
        Ok(candidates
            .into_iter()
            .filter(|d| self.policy.validate(&view, d).is_ok())
            .collect())
    }

    fn next_active_after(&self, idx: usize) -> usize {
        let n = self.seats.len();
        (1..=n)
            .map(|step| (idx + step) % n)
            .find(|&i| !self.seats[i].is_folded())
            .unwrap_or(idx)
    }

    fn end(&mut self, reason: RoundEnd) -> DecisionEffect {
        self.phase = RoundPhase::Settling;
        tracing::info!(reason = ?reason, pot = self.pot, "round ready to settle");
        DecisionEffect::RoundOver(reason)
    }

    /// Applies `decision` for `player`, who must hold the turn.
    pub fn apply_decision(
        &mut self,
        player: PlayerId,
        decision: &Decision,
    ) -> Result<DecisionEffect, GameError> {
        if self.phase != RoundPhase::InProgress {
            return Err(GameError::RoundNotInProgress);
        }
        let idx = self.seat_index(player)?;
        if self.seats[idx].is_folded() {
            return Err(GameError::PlayerAlreadyFolded(player));
        }
        let expected = self.current_player();
        if expected != player {
            return Err(GameError::NotPlayersTurn {
                expected,
                actual: player,
            });
        }

        let view = self.view_at(idx);
        match self.policy.validate(&view, decision)? {
            ValidatedDecision::Bet(amount) => {
                self.seats[idx].pay(amount)?;
                self.pot += amount;
            }
            ValidatedDecision::Raise(amount) => {
                self.seats[idx].pay(amount)?;
                self.pot += amount;
                self.stake = amount;
            }
            ValidatedDecision::Fold => self.seats[idx].fold(),
            ValidatedDecision::See => {
                // looking at one's cards does not use up the turn
                self.seats[idx].see_cards();
                return Ok(DecisionEffect::NextTurn(player));
            }
            ValidatedDecision::Swap { index } => {
                let hand_len = self.seats[idx].hand().len();
                if index >= hand_len {
                    return Err(GameError::CardIndexOutOfRange { index, len: hand_len });
                }
                let card = self.deck.draw_card().ok_or(GameError::DeckExhausted)?;
                let discarded = self.seats[idx].hand_mut().swap(index, card)?;
                tracing::debug!(player, index, discarded = %discarded, "card swapped");
            }
            ValidatedDecision::Show(amount) => {
                self.seats[idx].pay(amount)?;
                self.pot += amount;
                return Ok(self.end(RoundEnd::Show));
            }
        }

        if self.active_count() == 1 {
            return Ok(self.end(RoundEnd::LastPlayerStanding));
        }
        if matches!(self.mode.pot_limit, Some(limit) if self.pot >= limit) {
            return Ok(self.end(RoundEnd::PotLimit));
        }
        self.turn = self.next_active_after(idx);
        Ok(DecisionEffect::NextTurn(self.current_player()))
    }

    /// The decision taken for `player` when their turn timer runs out.
    pub fn timeout_decision(&self, player: PlayerId) -> Decision {
        match self.mode.timeout_action {
            TimeoutAction::AutoBet => match self.seat_view(player) {
                Ok(view) if self.policy.validate(&view, &Decision::Bet).is_ok() => Decision::Bet,
                _ => Decision::Fold,
            },
            TimeoutAction::Fold => Decision::Fold,
        }
    }

    /// Scores every non-folded hand and pays the pot to the winner.
    ///
    /// The winner has the highest total; ties go to the higher single card,
    /// then to the seat earliest in turn order.
    pub fn settle(&mut self, engine: &BonusEngine) -> Result<Settlement, GameError> {
        if self.phase == RoundPhase::Complete {
            return Err(GameError::RoundAlreadySettled);
        }
        self.phase = RoundPhase::Settling;

        let mut evaluations = Vec::with_capacity(self.seats.len());
        for seat in &self.seats {
            let evaluation = if seat.is_folded() {
                None
            } else {
                Some(engine.evaluate_hand_with_trump(seat.hand(), self.trump)?)
            };
            evaluations.push(evaluation);
        }

        let mut best: Option<(usize, u32, Option<Rank>)> = None;
        for (i, eval) in evaluations.iter().enumerate() {
            let Some(eval) = eval else { continue };
            let key = (eval.total_bonus, eval.high_card);
            let better = match best {
                None => true,
                Some((_, total, high)) => key > (total, high),
            };
            if better {
                best = Some((i, key.0, key.1));
            }
        }
        let Some((winner_idx, _, _)) = best else {
            return Err(GameError::RoundNotInProgress);
        };

        let pot = self.pot;
        self.seats[winner_idx].credit(pot);
        self.pot = 0;
        let winner = self.seats[winner_idx].id();

        let results = self
            .seats
            .iter_mut()
            .zip(evaluations)
            .map(|(seat, evaluation)| {
                seat.hand_mut().clear();
                SeatResult {
                    player: seat.id(),
                    evaluation,
                    folded: seat.is_folded(),
                    coins: seat.coins(),
                }
            })
            .collect();

        self.phase = RoundPhase::Complete;
        tracing::info!(winner, pot, "round settled");
        Ok(Settlement {
            winner,
            pot,
            trump: self.trump,
            results,
        })
    }
}

impl DecisionTarget for Round {
    fn apply_decision(
        &mut self,
        player: PlayerId,
        decision: &Decision,
    ) -> Result<DecisionEffect, GameError> {
        Round::apply_decision(self, player, decision)
    }

    fn timeout_decision(&self, player: PlayerId) -> Decision {
        Round::timeout_decision(self, player)
    }
}
