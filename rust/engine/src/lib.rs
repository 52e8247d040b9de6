//! # brag-engine: Three Card Brag scoring and turn engine
//!
//! Scores hands against a configurable set of bonus rules (with trump-card
//! substitution), validates decisions, runs timed turns and settles rounds.
//! Deals are reproducible from a seed.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card), parsing and display
//! - [`deck`] - Seeded ChaCha20 deck and the `CardSource` trait
//! - [`hand`] - A player's cards for one round
//! - [`player`] - Seats, decisions and what each viewer may see
//! - [`mode`] - Game mode configuration and the three-card preset
//! - [`bonus`] - Bonus rules and the cumulative hand evaluator
//! - [`trump`] - Sequence detection and trump substitution
//! - [`rules`] - Decision legality
//! - [`round`] - Round bookkeeping and settlement
//! - [`timer`] - Per-turn countdown
//! - [`turn`] - Turn state machine
//! - [`engine`] - Deals, plays and settles rounds
//! - [`game`] - Coin balances and seating across rounds
//! - [`events`] - Outbound event bus
//! - [`errors`] - Error types
//! - [`logging`] - Tracing subscriber setup and test log capture
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use brag_engine::bonus::BonusEngine;
//! use brag_engine::cards::Card;
//! use brag_engine::hand::Hand;
//! use brag_engine::mode::GameMode;
//!
//! let engine = BonusEngine::new(Arc::new(GameMode::three_card())).unwrap();
//! let cards: Vec<Card> = ["A♠", "K♠", "Q♠"].iter().map(|s| s.parse().unwrap()).collect();
//! let eval = engine.evaluate_hand(&Hand::from_cards(cards).unwrap()).unwrap();
//!
//! // 14 + 13 + 12 plus the straight flush bonus
//! assert_eq!(eval.total_bonus, 39 + 25);
//! println!("{}", eval.description());
//! ```
//!
//! ## Trump Cards
//!
//! With a trump rank set, a single card of that rank can complete a run:
//!
//! ```rust
//! use std::sync::Arc;
//! use brag_engine::bonus::BonusEngine;
//! use brag_engine::cards::{Card, Rank};
//! use brag_engine::hand::Hand;
//! use brag_engine::mode::GameMode;
//!
//! let mode = GameMode::three_card().with_trump(Rank::Nine);
//! let engine = BonusEngine::new(Arc::new(mode)).unwrap();
//! let cards: Vec<Card> = ["2♠", "4♠", "9♥"].iter().map(|s| s.parse().unwrap()).collect();
//! let eval = engine.evaluate_hand(&Hand::from_cards(cards).unwrap()).unwrap();
//!
//! // the nine plays as the missing three: straight flush plus the middle bonus
//! assert_eq!(eval.details[0].rule_name, "Straight Flush");
//! assert_eq!(eval.details[0].additional_bonus, 10);
//! ```

pub mod bonus;
pub mod cards;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod events;
pub mod game;
pub mod hand;
pub mod logging;
pub mod mode;
pub mod player;
pub mod round;
pub mod rules;
pub mod timer;
pub mod trump;
pub mod turn;
