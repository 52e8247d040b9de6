use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, Card, CardFace};

/// Anything a round can deal cards from.
pub trait CardSource {
    /// Draws the next card, or `None` once the source is exhausted.
    fn draw_card(&mut self) -> Option<Card>;

    /// Cards left to draw.
    fn remaining(&self) -> usize;
}

/// A 52-card deck shuffled with a seeded ChaCha20 RNG.
///
/// # Examples
///
/// ```
/// use brag_engine::deck::{CardSource, Deck};
///
/// let mut a = Deck::new_with_seed(7);
/// let mut b = Deck::new_with_seed(7);
/// a.shuffle();
/// b.shuffle();
/// assert_eq!(a.draw_card(), b.draw_card());
/// ```
#[derive(Debug)]
pub struct Deck {
    cards: Vec<Card>,
    position: usize,
    rng: ChaCha20Rng,
}

impl Deck {
    pub fn new_with_seed(seed: u64) -> Self {
        let rng = ChaCha20Rng::seed_from_u64(seed);
        // Keep initial order until shuffle is called explicitly
        Self {
            cards: full_deck(),
            position: 0,
            rng,
        }
    }

    pub fn shuffle(&mut self) {
        self.cards = full_deck();
        self.cards.shuffle(&mut self.rng);
        self.position = 0;
    }

    pub fn reset(&mut self) {
        self.cards = full_deck();
        self.position = 0;
    }

    pub fn remaining(&self) -> usize {
        self.cards.len().saturating_sub(self.position)
    }

    /// Face-down representation shown to players who may not see a card.
    pub fn back(&self) -> CardFace {
        CardFace::Back
    }
}

impl CardSource for Deck {
    fn draw_card(&mut self) -> Option<Card> {
        let c = self.cards.get(self.position).copied()?;
        self.position += 1;
        Some(c)
    }

    fn remaining(&self) -> usize {
        Deck::remaining(self)
    }
}

/// Deals a fixed sequence of cards in order; handy for scripted rounds and tests.
#[derive(Debug, Clone, Default)]
pub struct StackedDeck {
    cards: Vec<Card>,
}

impl StackedDeck {
    pub fn new(cards: Vec<Card>) -> Self {
        let mut cards = cards;
        cards.reverse();
        Self { cards }
    }
}

impl CardSource for StackedDeck {
    fn draw_card(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    fn remaining(&self) -> usize {
        self.cards.len()
    }
}
