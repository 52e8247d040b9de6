//! Bonus rule engine.
//!
//! Every configured rule is tested against the hand independently and every
//! match contributes, so a hand can score a pair and a flush at once. The
//! total is the sum of the card ranks plus the bonus of each matched rule.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cards::Rank;
use crate::errors::{ConfigError, RuleError};
use crate::hand::Hand;
use crate::mode::{GameMode, TrumpBonusValues};
use crate::trump::{
    natural_sequence, resolve_trump, sequence_match, SequenceShape, TrumpOutcome, TrumpPosition,
};

/// Inputs a rule may consult besides the hand itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalContext {
    pub trump: Option<Rank>,
    pub trump_values: TrumpBonusValues,
}

/// Result of testing one rule against one hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    NoMatch,
    Matched { additional: u32, notes: Vec<String> },
    /// Bonus granted without the rule matching (trump adjacency).
    Partial { additional: u32, notes: Vec<String> },
}

/// A user-supplied rule predicate.
///
/// Implementations must be stateless: the same matcher is shared by every
/// hand and every player.
pub trait HandMatcher: fmt::Debug + Send + Sync {
    fn evaluate(&self, hand: &Hand, ctx: &EvalContext) -> Result<RuleOutcome, String>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    ThreeOfAKind,
    /// Includes the royal run A-K-Q
    StraightFlush,
    SameColorsSequence,
    /// The plain straight
    DifferentColorsSequence,
    Flush,
    PairInHand,
    #[serde(skip)]
    Custom(Arc<dyn HandMatcher>),
}

/// One configured scoring rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BonusRule {
    pub name: String,
    pub kind: RuleKind,
    /// Base bonus granted on a match
    pub bonus_value: u32,
    /// Cap on positional bonus the rule may add on top; unbounded when omitted
    #[serde(default = "unbounded_ceiling")]
    pub additional_bonus_ceiling: u32,
    /// Display order only; rules never exclude each other
    pub priority: i32,
}

fn unbounded_ceiling() -> u32 {
    u32::MAX
}

/// Structured explanation of one rule's contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusDetail {
    pub rule_name: String,
    pub base_bonus: u32,
    pub additional_bonus: u32,
    pub descriptions: Vec<String>,
    pub priority: i32,
    /// False for a bonus recorded without a match (trump adjacency)
    pub matched: bool,
}

impl BonusDetail {
    pub fn total_bonus(&self) -> u32 {
        self.base_bonus + self.additional_bonus
    }
}

impl BonusRule {
    pub fn new(name: impl Into<String>, kind: RuleKind, bonus_value: u32, priority: i32) -> Self {
        Self {
            name: name.into(),
            kind,
            bonus_value,
            additional_bonus_ceiling: unbounded_ceiling(),
            priority,
        }
    }

    /// True for the sequence rules a trump card can complete or sit next to.
    pub fn takes_trump_bonus(&self) -> bool {
        matches!(
            self.kind,
            RuleKind::StraightFlush
                | RuleKind::SameColorsSequence
                | RuleKind::DifferentColorsSequence
        )
    }

    pub fn with_additional_ceiling(mut self, ceiling: u32) -> Self {
        self.additional_bonus_ceiling = ceiling;
        self
    }

    /// Tests the rule against `hand`. `Ok(None)` means the rule contributes nothing.
    pub fn evaluate(&self, hand: &Hand, ctx: &EvalContext) -> Result<Option<BonusDetail>, RuleError> {
        let outcome = match &self.kind {
            RuleKind::ThreeOfAKind => three_of_a_kind(hand),
            RuleKind::StraightFlush => sequence(hand, ctx, SequenceShape::SameSuit),
            RuleKind::SameColorsSequence => sequence(hand, ctx, SequenceShape::SameColor),
            RuleKind::DifferentColorsSequence => sequence(hand, ctx, SequenceShape::MixedColors),
            RuleKind::Flush => flush(hand, ctx),
            RuleKind::PairInHand => pair(hand),
            RuleKind::Custom(matcher) => matcher.evaluate(hand, ctx).map_err(|reason| RuleError {
                rule: self.name.clone(),
                reason,
            })?,
        };

        let detail = match outcome {
            RuleOutcome::NoMatch => return Ok(None),
            RuleOutcome::Matched { additional, notes } => BonusDetail {
                rule_name: self.name.clone(),
                base_bonus: self.bonus_value,
                additional_bonus: additional.min(self.additional_bonus_ceiling),
                descriptions: notes,
                priority: self.priority,
                matched: true,
            },
            RuleOutcome::Partial { additional, notes } => BonusDetail {
                rule_name: self.name.clone(),
                base_bonus: 0,
                additional_bonus: additional.min(self.additional_bonus_ceiling),
                descriptions: notes,
                priority: self.priority,
                matched: false,
            },
        };
        Ok(Some(detail))
    }
}

fn largest_group(hand: &Hand) -> Option<(Rank, usize)> {
    hand.rank_counts()
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)))
}

fn three_of_a_kind(hand: &Hand) -> RuleOutcome {
    match largest_group(hand) {
        Some((rank, count)) if count >= 3 => RuleOutcome::Matched {
            additional: 0,
            notes: vec![format!("{} cards of rank {}", count, rank)],
        },
        _ => RuleOutcome::NoMatch,
    }
}

fn pair(hand: &Hand) -> RuleOutcome {
    match largest_group(hand) {
        Some((rank, 2)) => RuleOutcome::Matched {
            additional: 0,
            notes: vec![format!("Pair of {}", rank)],
        },
        _ => RuleOutcome::NoMatch,
    }
}

fn flush(hand: &Hand, ctx: &EvalContext) -> RuleOutcome {
    let cards = hand.cards();
    let Some(first) = cards.first() else {
        return RuleOutcome::NoMatch;
    };
    if !cards.iter().all(|c| c.suit == first.suit) {
        return RuleOutcome::NoMatch;
    }
    // a same-suit run belongs to the straight flush
    if sequence_match(hand, ctx.trump).is_some() {
        return RuleOutcome::NoMatch;
    }
    RuleOutcome::Matched {
        additional: 0,
        notes: vec![format!("All {:?}", first.suit)],
    }
}

fn run_label(high: u8) -> String {
    match Rank::from_u8(high) {
        Some(Rank::Ace) => "Royal run (A-K-Q)".to_string(),
        Some(rank) => format!("{}-high run", rank),
        None => format!("{}-high run", high),
    }
}

fn sequence(hand: &Hand, ctx: &EvalContext, shape: SequenceShape) -> RuleOutcome {
    match resolve_trump(hand, ctx.trump) {
        TrumpOutcome::Completes(m) if m.shape == shape => {
            let mut notes = vec![run_label(m.high)];
            let mut additional = 0;
            if let Some(sub) = m.trump {
                match sub.position {
                    TrumpPosition::Middle => {
                        additional = ctx.trump_values.middle_bonus;
                        notes.push(format!("Trump plays as {} in the middle", sub.plays_as));
                    }
                    TrumpPosition::End => {
                        notes.push(format!("Trump plays as {} at the end", sub.plays_as));
                    }
                }
            }
            RuleOutcome::Matched { additional, notes }
        }
        TrumpOutcome::Completes(_) => RuleOutcome::NoMatch,
        TrumpOutcome::Adjacent { shape: s } if s == shape => RuleOutcome::Partial {
            additional: ctx.trump_values.adjacent_bonus,
            notes: vec!["Trump adjacent to a card, no run".to_string()],
        },
        TrumpOutcome::Adjacent { .. } => RuleOutcome::NoMatch,
        TrumpOutcome::NotApplicable | TrumpOutcome::NoEffect => {
            match natural_sequence(hand.cards()) {
                Some(m) if m.shape == shape => RuleOutcome::Matched {
                    additional: 0,
                    notes: vec![run_label(m.high)],
                },
                _ => RuleOutcome::NoMatch,
            }
        }
    }
}

/// Score of one hand: rank sum, rule details and the combined total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandEvaluation {
    pub rank_sum: u32,
    /// Rank sum plus every recorded rule bonus
    pub total_bonus: u32,
    /// Ordered by descending priority, then declaration order
    pub details: Vec<BonusDetail>,
    pub high_card: Option<Rank>,
}

impl HandEvaluation {
    pub fn matched(&self) -> impl Iterator<Item = &BonusDetail> {
        self.details.iter().filter(|d| d.matched)
    }

    /// No rule matched; the hand only counts its ranks.
    pub fn is_high_card(&self) -> bool {
        self.matched().next().is_none()
    }

    /// One-line summary, e.g. `"Straight Flush + Pair In Hand (total 61)"`.
    pub fn description(&self) -> String {
        let names: Vec<&str> = self.matched().map(|d| d.rule_name.as_str()).collect();
        let label = if names.is_empty() {
            match self.high_card {
                Some(r) => format!("High Card ({})", r),
                None => "High Card".to_string(),
            }
        } else {
            names.join(" + ")
        };
        format!("{} (total {})", label, self.total_bonus)
    }
}

/// Evaluates hands against the rules of one game mode.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use brag_engine::bonus::BonusEngine;
/// use brag_engine::cards::Card;
/// use brag_engine::hand::Hand;
/// use brag_engine::mode::GameMode;
///
/// let engine = BonusEngine::new(Arc::new(GameMode::three_card())).unwrap();
/// let hand = Hand::from_cards(["J♠", "J♦", "J♣"].iter().map(|s| s.parse::<Card>().unwrap())).unwrap();
/// let eval = engine.evaluate_hand(&hand).unwrap();
/// assert_eq!(eval.total_bonus, 63);
/// ```
#[derive(Debug, Clone)]
pub struct BonusEngine {
    mode: Arc<GameMode>,
}

impl BonusEngine {
    pub fn new(mode: Arc<GameMode>) -> Result<Self, ConfigError> {
        mode.validate()?;
        Ok(Self { mode })
    }

    pub fn mode(&self) -> &GameMode {
        &self.mode
    }

    /// Evaluates with the mode's own trump rank.
    pub fn evaluate_hand(&self, hand: &Hand) -> Result<HandEvaluation, ConfigError> {
        self.evaluate_hand_with_trump(hand, self.mode.trump_rank())
    }

    /// Evaluates with the trump rank in effect for the current round.
    ///
    /// A rule that fails is logged and skipped; the remaining rules still score.
    pub fn evaluate_hand_with_trump(
        &self,
        hand: &Hand,
        trump: Option<Rank>,
    ) -> Result<HandEvaluation, ConfigError> {
        let expected = self.mode.number_of_cards;
        if hand.len() != expected {
            return Err(ConfigError::HandLengthMismatch {
                expected,
                actual: hand.len(),
            });
        }
        let ctx = EvalContext {
            trump,
            trump_values: self.mode.trump.values,
        };

        let mut details = Vec::new();
        for rule in &self.mode.rules {
            match rule.evaluate(hand, &ctx) {
                Ok(Some(detail)) => {
                    tracing::debug!(
                        rule = %rule.name,
                        matched = detail.matched,
                        bonus = detail.total_bonus(),
                        "bonus rule applied"
                    );
                    details.push(detail);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(rule = %e.rule, reason = %e.reason, "bonus rule failed, skipping");
                }
            }
        }
        // stable: equal priorities keep declaration order
        details.sort_by(|a, b| b.priority.cmp(&a.priority));

        let rank_sum = hand.rank_sum();
        let total_bonus = rank_sum + details.iter().map(BonusDetail::total_bonus).sum::<u32>();
        Ok(HandEvaluation {
            rank_sum,
            total_bonus,
            details,
            high_card: hand.highest_rank(),
        })
    }
}
