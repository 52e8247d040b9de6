//! Per-turn countdown.
//!
//! The countdown runs as a background task that wakes once a second,
//! publishes the remaining time and, on reaching zero, fires the expiry
//! signal. Each started turn owns one single-use expiry sender, so the
//! signal fires at most once per turn episode. Pausing, resuming and
//! stopping invalidate the running tick task through a generation counter.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::events::{EventBus, GameEvent};
use crate::player::PlayerId;

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Expired,
}

#[derive(Debug)]
struct Countdown {
    state: TimerState,
    player: Option<PlayerId>,
    duration: u32,
    remaining: u32,
    /// Bumped on every start/pause/resume/stop/hold; stale tick tasks exit on mismatch
    generation: u64,
    expiry: Option<oneshot::Sender<()>>,
}

/// Cloneable handle to one table's turn countdown.
///
/// Starting or resuming must happen inside a tokio runtime.
#[derive(Debug, Clone)]
pub struct TurnTimer {
    inner: Arc<Mutex<Countdown>>,
    bus: EventBus,
}

impl TurnTimer {
    pub fn new(bus: EventBus) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Countdown {
                state: TimerState::Idle,
                player: None,
                duration: 0,
                remaining: 0,
                generation: 0,
                expiry: None,
            })),
            bus,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Countdown> {
        self.inner.lock().expect("timer lock poisoned")
    }

    pub fn state(&self) -> TimerState {
        self.lock().state
    }

    pub fn remaining_secs(&self) -> u32 {
        self.lock().remaining
    }

    pub fn duration_secs(&self) -> u32 {
        self.lock().duration
    }

    pub fn player(&self) -> Option<PlayerId> {
        self.lock().player
    }

    /// Starts counting down `duration_secs` for `player`.
    ///
    /// Returns the expiry signal, or `None` (with a warning) if a countdown
    /// is already running or paused.
    pub fn start(&self, player: PlayerId, duration_secs: u32) -> Option<oneshot::Receiver<()>> {
        let mut cd = self.lock();
        if matches!(cd.state, TimerState::Running | TimerState::Paused) {
            tracing::warn!(
                player,
                running_for = ?cd.player,
                "timer already running, start ignored"
            );
            return None;
        }
        let (tx, rx) = oneshot::channel();
        cd.state = TimerState::Running;
        cd.player = Some(player);
        cd.duration = duration_secs;
        cd.remaining = duration_secs;
        cd.generation += 1;
        cd.expiry = Some(tx);
        let generation = cd.generation;
        drop(cd);

        self.spawn_ticker(generation);
        Some(rx)
    }

    pub fn pause(&self) {
        let mut cd = self.lock();
        if cd.state != TimerState::Running {
            tracing::warn!(state = ?cd.state, "pause on a timer that is not running ignored");
            return;
        }
        cd.state = TimerState::Paused;
        cd.generation += 1;
        if let Some(player) = cd.player {
            self.bus.publish(GameEvent::TimerPaused {
                player,
                remaining_secs: cd.remaining,
            });
        }
        tracing::debug!(remaining = cd.remaining, "timer paused");
    }

    /// Resumes from the remaining time; the partial second before the pause is not credited.
    pub fn resume(&self) {
        let mut cd = self.lock();
        if cd.state != TimerState::Paused {
            tracing::warn!(state = ?cd.state, "resume on a timer that is not paused ignored");
            return;
        }
        cd.state = TimerState::Running;
        cd.generation += 1;
        let generation = cd.generation;
        if let Some(player) = cd.player {
            self.bus.publish(GameEvent::TimerResumed {
                player,
                remaining_secs: cd.remaining,
            });
        }
        drop(cd);
        self.spawn_ticker(generation);
    }

    /// Cancels the countdown and resets the remaining time to the full duration.
    ///
    /// The pending expiry signal is dropped unsent.
    pub fn stop(&self) {
        let mut cd = self.lock();
        if cd.state == TimerState::Idle {
            tracing::warn!("stop on an idle timer ignored");
            return;
        }
        Self::reset(&mut cd);
        if let Some(player) = cd.player {
            self.bus.publish(GameEvent::TimerStopped { player });
        }
    }

    /// Freezes the countdown while a decision is applied; the tick task exits
    /// and no tick or expiry can land until [`release`](Self::release).
    pub(crate) fn hold(&self) {
        let mut cd = self.lock();
        cd.generation += 1;
    }

    /// Restarts a held countdown after a rejected decision. A paused or
    /// expired countdown stays as it was.
    pub(crate) fn release(&self) {
        let mut cd = self.lock();
        if cd.state != TimerState::Running {
            return;
        }
        cd.generation += 1;
        let generation = cd.generation;
        drop(cd);
        self.spawn_ticker(generation);
    }

    /// Quiet reset after a turn resolved.
    pub(crate) fn finish(&self) {
        let mut cd = self.lock();
        Self::reset(&mut cd);
    }

    fn reset(cd: &mut Countdown) {
        cd.state = TimerState::Idle;
        cd.remaining = cd.duration;
        cd.generation += 1;
        cd.expiry = None;
    }

    fn spawn_ticker(&self, generation: u64) {
        let inner = Arc::clone(&self.inner);
        let bus = self.bus.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(TICK).await;
                // events go out under the lock so no tick trails a stop or expiry
                let mut cd = inner.lock().expect("timer lock poisoned");
                if cd.generation != generation || cd.state != TimerState::Running {
                    break;
                }
                cd.remaining = cd.remaining.saturating_sub(1);
                let player = cd.player.unwrap_or_default();
                bus.publish(GameEvent::TimeRemaining {
                    player,
                    remaining_secs: cd.remaining,
                });
                tracing::debug!(player, remaining = cd.remaining, "turn timer tick");
                if cd.remaining == 0 {
                    cd.state = TimerState::Expired;
                    if let Some(tx) = cd.expiry.take() {
                        let _ = tx.send(());
                    }
                    tracing::info!(player, "turn timer expired");
                    break;
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn expires_after_duration() {
        let timer = TurnTimer::new(EventBus::new());
        let rx = timer.start(0, 3).unwrap();
        rx.await.unwrap();
        assert_eq!(timer.state(), TimerState::Expired);
        assert_eq!(timer.remaining_secs(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn second_start_is_ignored_while_running() {
        let timer = TurnTimer::new(EventBus::new());
        let _rx = timer.start(0, 5).unwrap();
        assert!(timer.start(1, 5).is_none());
        assert_eq!(timer.player(), Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn pause_holds_remaining_time() {
        let timer = TurnTimer::new(EventBus::new());
        let _rx = timer.start(0, 10).unwrap();
        tokio::time::sleep(Duration::from_millis(2_500)).await;
        timer.pause();
        assert_eq!(timer.remaining_secs(), 8);
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(timer.remaining_secs(), 8);
        assert_eq!(timer.state(), TimerState::Paused);
        timer.resume();
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert_eq!(timer.remaining_secs(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn held_countdown_neither_ticks_nor_expires() {
        let bus = EventBus::new();
        let mut sub = bus.subscribe();
        let timer = TurnTimer::new(bus);
        let mut rx = timer.start(0, 3).unwrap();
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert_eq!(timer.remaining_secs(), 2);

        timer.hold();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(timer.remaining_secs(), 2);
        assert!(rx.try_recv().is_err());
        let ticks = std::iter::from_fn(|| sub.receiver().try_recv().ok())
            .filter(|e| matches!(e, GameEvent::TimeRemaining { .. }))
            .count();
        assert_eq!(ticks, 1);

        timer.release();
        rx.await.unwrap();
        assert_eq!(timer.state(), TimerState::Expired);
    }

    #[tokio::test(start_paused = true)]
    async fn release_leaves_a_paused_countdown_paused() {
        let timer = TurnTimer::new(EventBus::new());
        let _rx = timer.start(0, 5).unwrap();
        timer.pause();
        timer.hold();
        timer.release();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(timer.state(), TimerState::Paused);
        assert_eq!(timer.remaining_secs(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_drops_expiry_signal() {
        let timer = TurnTimer::new(EventBus::new());
        let rx = timer.start(0, 4).unwrap();
        timer.stop();
        assert!(rx.await.is_err());
        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(timer.remaining_secs(), 4);
    }
}
