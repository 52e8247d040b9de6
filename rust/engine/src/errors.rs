use thiserror::Error;

use crate::cards::Card;
use crate::player::PlayerId;

/// Broken game-mode setup. Blocks evaluation and is never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Hand size {0} is outside the supported range 3..=9")]
    HandSizeOutOfRange(usize),
    #[error("Hand has {actual} cards, game mode expects {expected}")]
    HandLengthMismatch { expected: usize, actual: usize },
    #[error("Game mode has no bonus rules")]
    EmptyRuleSet,
    #[error("Bonus rule '{0}' is declared more than once")]
    DuplicateRule(String),
    #[error("Trump is enabled but no trump rank is set")]
    MissingTrump,
    #[error("Rule '{rule}' caps its additional bonus at {ceiling}, below the trump bonus {trump_bonus}")]
    CeilingBelowTrumpBonus {
        rule: String,
        ceiling: u32,
        trump_bonus: u32,
    },
    #[error("Turn duration must be at least one second")]
    ZeroTurnDuration,
    #[error("Initial coins ({initial}) must cover the boot amount ({boot})")]
    InsufficientStake { initial: u32, boot: u32 },
    #[error("{players} players need {needed} cards, deck holds {available}")]
    NotEnoughCards {
        players: usize,
        needed: usize,
        available: usize,
    },
    #[error("A round needs at least two players, got {0}")]
    TooFewPlayers(usize),
    #[error("Player {0} is seated twice")]
    DuplicatePlayer(PlayerId),
}

/// A single rule failed to evaluate. The engine logs it and skips the rule.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Rule '{rule}' failed: {reason}")]
pub struct RuleError {
    pub rule: String,
    pub reason: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Illegal decision {decision}: {reason}")]
    IllegalDecision { decision: String, reason: String },
    #[error("Insufficient coins: need {needed}, have {available}")]
    InsufficientCoins { needed: u32, available: u32 },
    #[error("It's not player {actual}'s turn (expected player {expected})")]
    NotPlayersTurn { expected: PlayerId, actual: PlayerId },
    #[error("Player {0} already folded")]
    PlayerAlreadyFolded(PlayerId),
    #[error("Unknown player {0}")]
    UnknownPlayer(PlayerId),
    #[error("Deck exhausted")]
    DeckExhausted,
    #[error("Card {0} is already in the hand")]
    DuplicateCard(Card),
    #[error("Card index {index} out of range for a hand of {len}")]
    CardIndexOutOfRange { index: usize, len: usize },
    #[error("Round is not in progress")]
    RoundNotInProgress,
    #[error("Round already settled")]
    RoundAlreadySettled,
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TurnError {
    #[error("No turn is awaiting a decision")]
    NoTurnInProgress,
    #[error("Player {0} is already deciding")]
    TurnInProgress(PlayerId),
    #[error("Decision from player {actual}, but player {expected} is deciding")]
    WrongPlayer { expected: PlayerId, actual: PlayerId },
    #[error("Decision channel closed")]
    DecisionChannelClosed,
    #[error(transparent)]
    Game(#[from] GameError),
}
