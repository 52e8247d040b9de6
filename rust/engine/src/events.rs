//! Outbound notifications for presentation and network layers.
//!
//! The engine never waits on a consumer: events go out with `try_send` and a
//! subscriber whose channel is full or closed is dropped.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::player::{Decision, PlayerId};
use crate::round::{DecisionEffect, Settlement};

const EVENT_CHANNEL_BUFFER: usize = 256;

pub type EventSender = mpsc::Sender<GameEvent>;
pub type EventReceiver = mpsc::Receiver<GameEvent>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    TurnStarted {
        player: PlayerId,
        duration_secs: u32,
    },
    TimeRemaining {
        player: PlayerId,
        remaining_secs: u32,
    },
    TimerPaused {
        player: PlayerId,
        remaining_secs: u32,
    },
    TimerResumed {
        player: PlayerId,
        remaining_secs: u32,
    },
    TimerStopped {
        player: PlayerId,
    },
    DecisionResolved {
        player: PlayerId,
        decision: Decision,
        timed_out: bool,
        effect: DecisionEffect,
    },
    DecisionRejected {
        player: PlayerId,
        decision: Decision,
        reason: String,
    },
    RoundSettled(Settlement),
}

pub struct EventSubscription {
    bus: EventBus,
    subscriber_id: usize,
    pub receiver: EventReceiver,
}

impl EventSubscription {
    pub fn receiver(&mut self) -> &mut EventReceiver {
        &mut self.receiver
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.bus.remove_subscribers(&[self.subscriber_id]);
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventBus {
    inner: Arc<EventBusInner>,
}

#[derive(Debug, Default)]
struct EventBusInner {
    subscribers: RwLock<Vec<(usize, EventSender)>>,
    next_id: AtomicUsize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> EventSubscription {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_BUFFER);
        let id = self.inner.next_id.fetch_add(1, Ordering::AcqRel);
        self.inner
            .subscribers
            .write()
            .expect("subscriber lock poisoned")
            .push((id, tx));
        tracing::debug!(subscriber_id = id, "subscribed to game events");
        EventSubscription {
            bus: self.clone(),
            subscriber_id: id,
            receiver: rx,
        }
    }

    pub fn publish(&self, event: GameEvent) {
        tracing::trace!(event = ?event, "publishing game event");
        let subscribers = self
            .inner
            .subscribers
            .read()
            .expect("subscriber lock poisoned")
            .clone();

        let mut failed = Vec::new();
        for (id, sender) in subscribers {
            if let Err(e) = sender.try_send(event.clone()) {
                tracing::warn!(subscriber_id = id, error = ?e, "dropping game event subscriber");
                failed.push(id);
            }
        }
        if !failed.is_empty() {
            self.remove_subscribers(&failed);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .read()
            .expect("subscriber lock poisoned")
            .len()
    }

    fn remove_subscribers(&self, ids: &[usize]) {
        self.inner
            .subscribers
            .write()
            .expect("subscriber lock poisoned")
            .retain(|(id, _)| !ids.contains(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_drop_unsubscribes() {
        let bus = EventBus::new();
        {
            let _sub = bus.subscribe();
            assert_eq!(bus.subscriber_count(), 1);
        }
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn publish_reaches_all_subscribers() {
        let bus = EventBus::new();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();
        bus.publish(GameEvent::TimerStopped { player: 1 });
        assert_eq!(
            a.receiver.try_recv().unwrap(),
            GameEvent::TimerStopped { player: 1 }
        );
        assert!(matches!(
            b.receiver().try_recv(),
            Ok(GameEvent::TimerStopped { player: 1 })
        ));
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let json = serde_json::to_string(&GameEvent::TimeRemaining {
            player: 2,
            remaining_secs: 7,
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"time_remaining","player":2,"remaining_secs":7}"#);
    }

    #[test]
    fn closed_receiver_is_pruned() {
        let bus = EventBus::new();
        let sub = bus.subscribe();
        let mut sub2 = bus.subscribe();
        sub2.receiver.close();
        bus.publish(GameEvent::TimerStopped { player: 0 });
        assert_eq!(bus.subscriber_count(), 1);
        drop(sub);
        assert_eq!(bus.subscriber_count(), 0);
    }
}
