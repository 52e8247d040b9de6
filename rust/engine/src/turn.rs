//! Turn state machine: `Idle -> AwaitingDecision -> Resolving -> Idle`.
//!
//! One turn episode at a time. A turn ends when the acting player's decision
//! is applied or when the countdown expires and the table's default decision
//! is applied instead.

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

use crate::errors::{GameError, TurnError};
use crate::events::{EventBus, GameEvent};
use crate::player::{Decision, PlayerId};
use crate::round::DecisionEffect;
use crate::timer::{TimerState, TurnTimer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    Idle,
    AwaitingDecision,
    Resolving,
}

/// State of the turn currently awaiting a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnContext {
    pub player: PlayerId,
    pub duration_secs: u32,
    pub episode: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnResolution {
    pub player: PlayerId,
    pub decision: Decision,
    pub timed_out: bool,
    pub effect: DecisionEffect,
}

/// A decision as it arrives from a player or bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerDecision {
    pub player: PlayerId,
    pub decision: Decision,
}

/// Whatever a resolved decision is applied to; normally a [`crate::round::Round`].
pub trait DecisionTarget {
    fn apply_decision(
        &mut self,
        player: PlayerId,
        decision: &Decision,
    ) -> Result<DecisionEffect, GameError>;

    /// Decision taken when `player` runs out of time.
    fn timeout_decision(&self, player: PlayerId) -> Decision;
}

#[derive(Debug)]
pub struct TurnMachine {
    phase: TurnPhase,
    context: Option<TurnContext>,
    timer: TurnTimer,
    bus: EventBus,
    episodes: u64,
}

impl TurnMachine {
    pub fn new(bus: EventBus) -> Self {
        Self {
            phase: TurnPhase::Idle,
            context: None,
            timer: TurnTimer::new(bus.clone()),
            bus,
            episodes: 0,
        }
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn context(&self) -> Option<TurnContext> {
        self.context
    }

    pub fn timer(&self) -> &TurnTimer {
        &self.timer
    }

    pub fn remaining_secs(&self) -> u32 {
        self.timer.remaining_secs()
    }

    /// Opens a turn for `player` and starts its countdown.
    ///
    /// The returned receiver resolves when the countdown reaches zero; it is
    /// dropped unsent if the turn resolves or the timer is stopped first.
    pub fn start_turn(
        &mut self,
        player: PlayerId,
        duration_secs: u32,
    ) -> Result<oneshot::Receiver<()>, TurnError> {
        if let Some(ctx) = self.context.filter(|_| self.phase != TurnPhase::Idle) {
            return Err(TurnError::TurnInProgress(ctx.player));
        }
        let expiry = self
            .timer
            .start(player, duration_secs)
            .ok_or(TurnError::TurnInProgress(player))?;

        self.episodes += 1;
        self.context = Some(TurnContext {
            player,
            duration_secs,
            episode: self.episodes,
        });
        self.phase = TurnPhase::AwaitingDecision;
        self.bus.publish(GameEvent::TurnStarted {
            player,
            duration_secs,
        });
        tracing::info!(player, duration_secs, episode = self.episodes, "turn started");
        Ok(expiry)
    }

    /// Applies `decision` from `player` to `target`.
    ///
    /// The countdown is frozen while the decision is applied. An illegal
    /// decision leaves the turn open and restarts the countdown from the
    /// remaining whole seconds so the player can try again.
    pub fn submit_decision<T: DecisionTarget + ?Sized>(
        &mut self,
        target: &mut T,
        player: PlayerId,
        decision: Decision,
    ) -> Result<TurnResolution, TurnError> {
        self.resolve(target, player, decision, false)
    }

    /// Applies the table's default decision for the player whose time ran out.
    ///
    /// Falls back to a fold if the default decision is rejected.
    pub fn expire<T: DecisionTarget + ?Sized>(
        &mut self,
        target: &mut T,
    ) -> Result<TurnResolution, TurnError> {
        let ctx = self.awaiting()?;
        let fallback = target.timeout_decision(ctx.player);
        match self.resolve(target, ctx.player, fallback, true) {
            Err(TurnError::Game(_)) => self.resolve(target, ctx.player, Decision::Fold, true),
            other => other,
        }
    }

    pub fn pause_timer(&self) {
        self.timer.pause();
    }

    pub fn resume_timer(&self) {
        self.timer.resume();
    }

    /// Cancels the open turn: the countdown resets to its full duration and
    /// the machine returns to `Idle` without applying any decision.
    pub fn stop_timer(&mut self) {
        self.timer.stop();
        if self.phase != TurnPhase::Idle {
            tracing::info!(player = ?self.context.map(|c| c.player), "turn cancelled");
        }
        self.phase = TurnPhase::Idle;
        self.context = None;
    }

    fn awaiting(&self) -> Result<TurnContext, TurnError> {
        match (self.phase, self.context) {
            (TurnPhase::AwaitingDecision, Some(ctx)) => Ok(ctx),
            _ => Err(TurnError::NoTurnInProgress),
        }
    }

    fn resolve<T: DecisionTarget + ?Sized>(
        &mut self,
        target: &mut T,
        player: PlayerId,
        decision: Decision,
        timed_out: bool,
    ) -> Result<TurnResolution, TurnError> {
        let ctx = self.awaiting()?;
        if ctx.player != player {
            return Err(TurnError::WrongPlayer {
                expected: ctx.player,
                actual: player,
            });
        }

        self.phase = TurnPhase::Resolving;
        self.timer.hold();
        match target.apply_decision(player, &decision) {
            Ok(effect) => {
                self.timer.finish();
                self.phase = TurnPhase::Idle;
                self.context = None;
                tracing::info!(player, decision = %decision, timed_out, "decision resolved");
                self.bus.publish(GameEvent::DecisionResolved {
                    player,
                    decision: decision.clone(),
                    timed_out,
                    effect: effect.clone(),
                });
                Ok(TurnResolution {
                    player,
                    decision,
                    timed_out,
                    effect,
                })
            }
            Err(e) => {
                self.phase = TurnPhase::AwaitingDecision;
                self.timer.release();
                tracing::debug!(player, decision = %decision, error = %e, "decision rejected");
                self.bus.publish(GameEvent::DecisionRejected {
                    player,
                    decision,
                    reason: e.to_string(),
                });
                Err(e.into())
            }
        }
    }

    /// Runs one full turn episode for `player`: starts the countdown, then
    /// applies the first acceptable decision from `decisions` or the default
    /// decision on expiry.
    ///
    /// Rejected and misaddressed decisions are ignored and the turn stays open.
    /// A closed channel leaves the countdown to decide.
    pub async fn run_turn<T: DecisionTarget + ?Sized>(
        &mut self,
        target: &mut T,
        player: PlayerId,
        duration_secs: u32,
        decisions: &mut mpsc::Receiver<PlayerDecision>,
    ) -> Result<TurnResolution, TurnError> {
        let mut expiry = self.start_turn(player, duration_secs)?;
        let mut channel_open = true;
        loop {
            tokio::select! {
                fired = &mut expiry => {
                    return match fired {
                        Ok(()) => self.expire(target),
                        Err(_) => {
                            // stopped through a cloned timer handle
                            self.phase = TurnPhase::Idle;
                            self.context = None;
                            Err(TurnError::NoTurnInProgress)
                        }
                    };
                }
                msg = decisions.recv(), if channel_open => match msg {
                    Some(PlayerDecision { player: from, decision }) => {
                        match self.submit_decision(target, from, decision) {
                            Ok(resolution) => return Ok(resolution),
                            Err(e) => tracing::debug!(from, error = %e, "ignoring decision"),
                        }
                    }
                    None => {
                        tracing::warn!(player, "decision channel closed, waiting for the timer");
                        channel_open = false;
                        // nothing left to resume a paused countdown
                        if self.timer.state() == TimerState::Paused {
                            self.stop_timer();
                            return Err(TurnError::DecisionChannelClosed);
                        }
                    }
                },
            }
        }
    }
}
