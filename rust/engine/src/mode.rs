use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::bonus::{BonusRule, RuleKind};
use crate::cards::Rank;
use crate::errors::ConfigError;
use crate::player::DecisionKind;

pub const MIN_HAND_SIZE: usize = 3;
pub const MAX_HAND_SIZE: usize = 9;
const DECK_SIZE: usize = 52;

/// Extra bonus a trump card earns depending on where it lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrumpBonusValues {
    /// Trump fills the hole inside a run
    pub middle_bonus: u32,
    /// Trump sits next to a card without forming a run
    pub adjacent_bonus: u32,
}

impl Default for TrumpBonusValues {
    fn default() -> Self {
        Self {
            middle_bonus: 10,
            adjacent_bonus: 5,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrumpSettings {
    pub enabled: bool,
    /// Trump rank for every round dealt under this mode
    #[serde(default)]
    pub rank: Option<Rank>,
    #[serde(default)]
    pub values: TrumpBonusValues,
}

/// What the table does for a player whose turn timer runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutAction {
    /// Bet the current stake when affordable, fold otherwise
    AutoBet,
    Fold,
}

/// Read-only configuration a table is built with.
///
/// The bonus engine and rounds hold it behind an `Arc` and never mutate it.
///
/// # Examples
///
/// ```
/// use brag_engine::mode::GameMode;
///
/// let mode = GameMode::three_card();
/// assert_eq!(mode.number_of_cards, 3);
/// assert!(mode.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMode {
    pub name: String,
    /// Cards dealt to each player
    pub number_of_cards: usize,
    /// Active rules in declaration order
    pub rules: Vec<BonusRule>,
    #[serde(default)]
    pub trump: TrumpSettings,
    pub turn_duration_secs: u32,
    pub initial_coins: u32,
    /// Ante every seated player pays into the pot on deal
    pub boot_amount: u32,
    /// Pot size that forces a showdown
    #[serde(default)]
    pub pot_limit: Option<u32>,
    pub timeout_action: TimeoutAction,
    /// Human-readable legality notes per decision; informational only
    #[serde(default)]
    pub decision_notes: BTreeMap<DecisionKind, String>,
}

impl GameMode {
    /// The three-card game mode with the standard bonus table.
    pub fn three_card() -> Self {
        let mut decision_notes = BTreeMap::new();
        decision_notes.insert(
            DecisionKind::Bet,
            "Bet is valid only if you can pay the current stake".to_string(),
        );
        decision_notes.insert(
            DecisionKind::Raise,
            "Raise is valid only if the amount exceeds the stake and you have enough coins"
                .to_string(),
        );
        decision_notes.insert(DecisionKind::Fold, "Fold is always valid".to_string());
        decision_notes.insert(
            DecisionKind::See,
            "See is valid once per round, before your cards are seen".to_string(),
        );
        decision_notes.insert(
            DecisionKind::Swap,
            "Swap is valid while the deck still has cards".to_string(),
        );
        decision_notes.insert(
            DecisionKind::Show,
            "Show is valid only when two players remain".to_string(),
        );

        Self {
            name: "Three Card Brag".to_string(),
            number_of_cards: 3,
            rules: vec![
                BonusRule::new("Three Of A Kind", RuleKind::ThreeOfAKind, 30, 6),
                BonusRule::new("Straight Flush", RuleKind::StraightFlush, 25, 5),
                BonusRule::new("Same Colors Sequence", RuleKind::SameColorsSequence, 20, 4),
                BonusRule::new(
                    "Different Colors Sequence",
                    RuleKind::DifferentColorsSequence,
                    15,
                    3,
                ),
                BonusRule::new("Flush", RuleKind::Flush, 10, 2),
                BonusRule::new("Pair In Hand", RuleKind::PairInHand, 5, 1),
            ],
            trump: TrumpSettings::default(),
            turn_duration_secs: 30,
            initial_coins: 1_000,
            boot_amount: 10,
            pot_limit: None,
            timeout_action: TimeoutAction::AutoBet,
            decision_notes,
        }
    }

    /// Same mode with the trump enabled at `rank`.
    pub fn with_trump(mut self, rank: Rank) -> Self {
        self.trump.enabled = true;
        self.trump.rank = Some(rank);
        self
    }

    /// Trump rank in effect, if trump is enabled.
    pub fn trump_rank(&self) -> Option<Rank> {
        if self.trump.enabled {
            self.trump.rank
        } else {
            None
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_HAND_SIZE..=MAX_HAND_SIZE).contains(&self.number_of_cards) {
            return Err(ConfigError::HandSizeOutOfRange(self.number_of_cards));
        }
        if self.rules.is_empty() {
            return Err(ConfigError::EmptyRuleSet);
        }
        let mut names = HashSet::new();
        for rule in &self.rules {
            if !names.insert(rule.name.as_str()) {
                return Err(ConfigError::DuplicateRule(rule.name.clone()));
            }
        }
        if self.trump.enabled && self.trump.rank.is_none() {
            return Err(ConfigError::MissingTrump);
        }
        if self.trump.enabled {
            // a trump bonus must reach the score whole
            let trump_bonus = self.trump.values.middle_bonus.max(self.trump.values.adjacent_bonus);
            if let Some(rule) = self
                .rules
                .iter()
                .find(|r| r.takes_trump_bonus() && r.additional_bonus_ceiling < trump_bonus)
            {
                return Err(ConfigError::CeilingBelowTrumpBonus {
                    rule: rule.name.clone(),
                    ceiling: rule.additional_bonus_ceiling,
                    trump_bonus,
                });
            }
        }
        if self.turn_duration_secs == 0 {
            return Err(ConfigError::ZeroTurnDuration);
        }
        if self.initial_coins == 0 || self.initial_coins < self.boot_amount {
            return Err(ConfigError::InsufficientStake {
                initial: self.initial_coins,
                boot: self.boot_amount,
            });
        }
        Ok(())
    }

    /// Checks that `players` can be seated and dealt under this mode.
    pub fn validate_table(&self, players: usize) -> Result<(), ConfigError> {
        if players < 2 {
            return Err(ConfigError::TooFewPlayers(players));
        }
        let needed = players * self.number_of_cards;
        if needed > DECK_SIZE {
            return Err(ConfigError::NotEnoughCards {
                players,
                needed,
                available: DECK_SIZE,
            });
        }
        Ok(())
    }
}
