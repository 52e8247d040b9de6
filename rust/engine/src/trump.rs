//! Sequence detection and trump substitution.
//!
//! A trump is a designated rank. When a hand holds exactly one card of that
//! rank, the card may stand in for any rank and suit to complete a run. A
//! trump that fills a hole inside the run earns the "middle" bonus; one that
//! extends the run at either end completes it without a positional bonus.
//! A trump that only sits next to another card earns the "adjacent" bonus but
//! does not make the hand a sequence.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank};
use crate::hand::Hand;

/// The colour/suit shape of a run; each sequence rule owns exactly one shape.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum SequenceShape {
    /// Every card shares one suit.
    SameSuit,
    /// Every card shares one colour but not one suit.
    SameColor,
    /// Both colours appear.
    MixedColors,
}

/// Where a substituted trump landed in the completed run.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum TrumpPosition {
    Middle,
    End,
}

/// A hand that forms a consecutive run.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SequenceMatch {
    pub shape: SequenceShape,
    /// Value of the top card of the run (Ace-low runs top out at 3).
    pub high: u8,
    /// Set when the run only exists through trump substitution.
    pub trump: Option<TrumpSubstitution>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TrumpSubstitution {
    pub position: TrumpPosition,
    /// Rank the trump card plays as.
    pub plays_as: Rank,
}

/// What a trump does for one hand.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TrumpOutcome {
    /// No trump rank, or the hand holds zero or several trump cards.
    NotApplicable,
    /// The trump completes a run.
    Completes(SequenceMatch),
    /// The trump is next to another card but no run forms.
    Adjacent { shape: SequenceShape },
    /// The trump is present and does nothing.
    NoEffect,
}

pub fn shape_of(cards: &[Card]) -> SequenceShape {
    let Some(first) = cards.first() else {
        return SequenceShape::SameSuit;
    };
    if cards.iter().all(|c| c.suit == first.suit) {
        SequenceShape::SameSuit
    } else if cards.iter().all(|c| c.suit.color() == first.suit.color()) {
        SequenceShape::SameColor
    } else {
        SequenceShape::MixedColors
    }
}

/// Both readings of a card set: Ace high (14) and, when an Ace is present, Ace low (1).
fn encodings(cards: &[Card]) -> Vec<Vec<u8>> {
    let high: Vec<u8> = cards.iter().map(|c| c.rank.value()).collect();
    let mut out = vec![sorted(high.clone())];
    if high.contains(&Rank::Ace.value()) {
        let low = high
            .iter()
            .map(|&v| if v == Rank::Ace.value() { 1 } else { v })
            .collect();
        out.push(sorted(low));
    }
    out
}

fn sorted(mut v: Vec<u8>) -> Vec<u8> {
    v.sort_unstable();
    v
}

fn all_distinct(sorted_values: &[u8]) -> bool {
    sorted_values.windows(2).all(|w| w[0] != w[1])
}

/// Values a rank can take in a run; an Ace reads as 14 or 1.
fn readings(rank: Rank) -> Vec<u8> {
    if rank == Rank::Ace {
        vec![14, 1]
    } else {
        vec![rank.value()]
    }
}

fn rank_for_value(v: u8) -> Option<Rank> {
    if v == 1 {
        Some(Rank::Ace)
    } else {
        Rank::from_u8(v)
    }
}

/// The run the cards form on their own, if any.
pub fn natural_sequence(cards: &[Card]) -> Option<SequenceMatch> {
    if cards.len() < 2 {
        return None;
    }
    encodings(cards).into_iter().find_map(|v| {
        let consecutive = v.windows(2).all(|w| w[1] == w[0] + 1);
        consecutive.then(|| SequenceMatch {
            shape: shape_of(cards),
            high: v[v.len() - 1],
            trump: None,
        })
    })
}

/// Resolves what the trump rank does for `hand`.
///
/// Only a hand holding exactly one trump card is eligible. The remaining
/// cards take part with their real ranks and must be distinct. If they are
/// already consecutive the trump extends the run; if they leave exactly one
/// hole the trump fills it.
pub fn resolve_trump(hand: &Hand, trump: Option<Rank>) -> TrumpOutcome {
    let Some(trump) = trump else {
        return TrumpOutcome::NotApplicable;
    };
    if hand.count_rank(trump) != 1 || hand.len() < 2 {
        return TrumpOutcome::NotApplicable;
    }
    let others: Vec<Card> = hand.iter().copied().filter(|c| c.rank != trump).collect();
    // The trump may take any suit, so the shape comes from the other cards alone.
    let shape = shape_of(&others);
    let n = hand.len() as u8;

    for v in encodings(&others) {
        if !all_distinct(&v) {
            continue;
        }
        let (lo, hi) = (v[0], v[v.len() - 1]);
        let span = hi - lo;
        if span == n - 1 {
            // exactly one hole between lo and hi
            let hole = (lo..=hi).find(|x| v.binary_search(x).is_err());
            if let Some(plays_as) = hole.and_then(rank_for_value) {
                return TrumpOutcome::Completes(SequenceMatch {
                    shape,
                    high: hi,
                    trump: Some(TrumpSubstitution {
                        position: TrumpPosition::Middle,
                        plays_as,
                    }),
                });
            }
        } else if span == n - 2 {
            let (value, high) = if hi < Rank::Ace.value() {
                (hi + 1, hi + 1)
            } else {
                (lo - 1, hi)
            };
            if let Some(plays_as) = rank_for_value(value) {
                return TrumpOutcome::Completes(SequenceMatch {
                    shape,
                    high,
                    trump: Some(TrumpSubstitution {
                        position: TrumpPosition::End,
                        plays_as,
                    }),
                });
            }
        }
    }

    let trump_values = readings(trump);
    let adjacent = others.iter().any(|c| {
        readings(c.rank)
            .iter()
            .any(|v| trump_values.iter().any(|t| t.abs_diff(*v) == 1))
    });
    if adjacent {
        TrumpOutcome::Adjacent { shape }
    } else {
        TrumpOutcome::NoEffect
    }
}

/// The run a hand forms once trump substitution is taken into account.
pub fn sequence_match(hand: &Hand, trump: Option<Rank>) -> Option<SequenceMatch> {
    match resolve_trump(hand, trump) {
        TrumpOutcome::Completes(m) => Some(m),
        _ => natural_sequence(hand.cards()),
    }
}
