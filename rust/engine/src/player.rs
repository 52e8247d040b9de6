use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardFace};
use crate::errors::GameError;
use crate::hand::Hand;

/// Seat-stable player identifier.
pub type PlayerId = usize;

/// A decision a player makes when it is their turn.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum Decision {
    /// Pay the current stake and stay in
    Bet,
    /// Raise the stake to the given amount and pay it
    Raise(u32),
    /// Leave the round
    Fold,
    /// Look at one's own cards
    See,
    /// Discard the card at `index` and draw a replacement
    Swap { index: usize },
    /// Pay the stake and call for a showdown (two players left)
    Show,
}

/// Decision without its payload; keys the informational legality notes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    Bet,
    Raise,
    Fold,
    See,
    Swap,
    Show,
}

impl Decision {
    pub fn kind(&self) -> DecisionKind {
        match self {
            Decision::Bet => DecisionKind::Bet,
            Decision::Raise(_) => DecisionKind::Raise,
            Decision::Fold => DecisionKind::Fold,
            Decision::See => DecisionKind::See,
            Decision::Swap { .. } => DecisionKind::Swap,
            Decision::Show => DecisionKind::Show,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Bet => write!(f, "bet"),
            Decision::Raise(amount) => write!(f, "raise to {}", amount),
            Decision::Fold => write!(f, "fold"),
            Decision::See => write!(f, "see"),
            Decision::Swap { index } => write!(f, "swap card {}", index),
            Decision::Show => write!(f, "show"),
        }
    }
}

/// One player's place at the table for a round: coins, cards and status.
#[derive(Debug, Clone)]
pub struct Seat {
    id: PlayerId,
    coins: u32,
    hand: Hand,
    folded: bool,
    seen: bool,
}

impl Seat {
    pub fn new(id: PlayerId, coins: u32) -> Self {
        Self {
            id,
            coins,
            hand: Hand::new(),
            folded: false,
            seen: false,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }
    pub fn coins(&self) -> u32 {
        self.coins
    }
    pub fn hand(&self) -> &Hand {
        &self.hand
    }
    pub fn hand_mut(&mut self) -> &mut Hand {
        &mut self.hand
    }
    pub fn is_folded(&self) -> bool {
        self.folded
    }
    pub fn has_seen(&self) -> bool {
        self.seen
    }

    pub fn give_card(&mut self, c: Card) -> Result<(), GameError> {
        self.hand.push(c)
    }

    pub fn pay(&mut self, amount: u32) -> Result<(), GameError> {
        if amount > self.coins {
            return Err(GameError::InsufficientCoins {
                needed: amount,
                available: self.coins,
            });
        }
        self.coins -= amount;
        Ok(())
    }

    pub fn credit(&mut self, amount: u32) {
        self.coins = self.coins.saturating_add(amount);
    }

    pub fn fold(&mut self) {
        self.folded = true;
    }

    pub fn see_cards(&mut self) {
        self.seen = true;
    }

    /// Cards as `viewer` sees them: face up for the owner once seen, backs otherwise.
    pub fn faces_for(&self, viewer: PlayerId) -> Vec<CardFace> {
        let visible = viewer == self.id && self.seen;
        self.hand
            .iter()
            .map(|&c| if visible { CardFace::Up(c) } else { CardFace::Back })
            .collect()
    }
}
