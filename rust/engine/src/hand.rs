use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank};
use crate::errors::GameError;

/// The ordered cards one player holds for one round.
///
/// Cards are unique within a hand. Rule evaluation only ever borrows a hand;
/// it changes through [`Hand::push`] and [`Hand::swap`] and is emptied with
/// [`Hand::clear`] at round end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a hand from literal cards, rejecting duplicates.
    pub fn from_cards<I: IntoIterator<Item = Card>>(cards: I) -> Result<Self, GameError> {
        let mut hand = Hand::new();
        for c in cards {
            hand.push(c)?;
        }
        Ok(hand)
    }

    pub fn push(&mut self, card: Card) -> Result<(), GameError> {
        if self.contains(&card) {
            return Err(GameError::DuplicateCard(card));
        }
        self.cards.push(card);
        Ok(())
    }

    /// Replaces the card at `index` and returns the discarded one.
    pub fn swap(&mut self, index: usize, card: Card) -> Result<Card, GameError> {
        let len = self.cards.len();
        if index >= len {
            return Err(GameError::CardIndexOutOfRange { index, len });
        }
        if self
            .cards
            .iter()
            .enumerate()
            .any(|(i, c)| i != index && *c == card)
        {
            return Err(GameError::DuplicateCard(card));
        }
        Ok(std::mem::replace(&mut self.cards[index], card))
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, card: &Card) -> bool {
        self.cards.contains(card)
    }

    pub fn contains_rank(&self, rank: Rank) -> bool {
        self.cards.iter().any(|c| c.rank == rank)
    }

    pub fn count_rank(&self, rank: Rank) -> usize {
        self.cards.iter().filter(|c| c.rank == rank).count()
    }

    /// Sum of the scoring values of every card.
    pub fn rank_sum(&self) -> u32 {
        self.cards.iter().map(|c| u32::from(c.rank.value())).sum()
    }

    pub fn highest_rank(&self) -> Option<Rank> {
        self.cards.iter().map(|c| c.rank).max()
    }

    /// Rank -> number of cards of that rank.
    pub fn rank_counts(&self) -> BTreeMap<Rank, usize> {
        let mut counts = BTreeMap::new();
        for c in &self.cards {
            *counts.entry(c.rank).or_insert(0) += 1;
        }
        counts
    }
}

impl<'a> IntoIterator for &'a Hand {
    type Item = &'a Card;
    type IntoIter = std::slice::Iter<'a, Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}
