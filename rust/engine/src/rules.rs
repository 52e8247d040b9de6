use std::fmt::Debug;

use crate::errors::GameError;
use crate::player::Decision as D;

/// What a seat may see of the round when deciding whether a decision is legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatView {
    pub coins: u32,
    /// Current stake every bet must match
    pub stake: u32,
    /// Players not yet folded, the deciding player included
    pub active_players: usize,
    pub hand_len: usize,
    pub seen: bool,
    pub deck_remaining: usize,
}

/// A decision that passed validation, carrying the coins it moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedDecision {
    Bet(u32),
    Raise(u32),
    Fold,
    See,
    Swap { index: usize },
    Show(u32),
}

fn illegal(decision: &D, reason: impl Into<String>) -> GameError {
    GameError::IllegalDecision {
        decision: decision.to_string(),
        reason: reason.into(),
    }
}

/// Validates a decision against the seat's coins and the table state.
///
/// # Errors
///
/// - [`GameError::InsufficientCoins`] when a bet, raise or show cannot be paid
/// - [`GameError::IllegalDecision`] when the decision is not available right now
/// - [`GameError::CardIndexOutOfRange`] when a swap names a card the hand does not have
///
/// # Examples
///
/// ```
/// use brag_engine::rules::{validate_decision, SeatView, ValidatedDecision};
/// use brag_engine::player::Decision;
///
/// let view = SeatView {
///     coins: 100,
///     stake: 10,
///     active_players: 3,
///     hand_len: 3,
///     seen: false,
///     deck_remaining: 40,
/// };
/// assert_eq!(validate_decision(&view, &Decision::Bet), Ok(ValidatedDecision::Bet(10)));
/// assert!(validate_decision(&view, &Decision::Show).is_err());
/// ```
pub fn validate_decision(view: &SeatView, decision: &D) -> Result<ValidatedDecision, GameError> {
    match decision {
        D::Fold => Ok(ValidatedDecision::Fold),
        D::Bet => {
            if view.coins < view.stake {
                return Err(GameError::InsufficientCoins {
                    needed: view.stake,
                    available: view.coins,
                });
            }
            Ok(ValidatedDecision::Bet(view.stake))
        }
        D::Raise(amount) => {
            if *amount <= view.stake {
                return Err(illegal(
                    decision,
                    format!("raise must exceed the current stake of {}", view.stake),
                ));
            }
            if view.coins < *amount {
                return Err(GameError::InsufficientCoins {
                    needed: *amount,
                    available: view.coins,
                });
            }
            Ok(ValidatedDecision::Raise(*amount))
        }
        D::See => {
            if view.seen {
                return Err(illegal(decision, "cards already seen"));
            }
            Ok(ValidatedDecision::See)
        }
        D::Swap { index } => {
            if *index >= view.hand_len {
                return Err(GameError::CardIndexOutOfRange {
                    index: *index,
                    len: view.hand_len,
                });
            }
            if view.deck_remaining == 0 {
                return Err(illegal(decision, "deck is empty"));
            }
            Ok(ValidatedDecision::Swap { index: *index })
        }
        D::Show => {
            if view.active_players != 2 {
                return Err(illegal(
                    decision,
                    format!("show needs exactly two players, {} remain", view.active_players),
                ));
            }
            if view.coins < view.stake {
                return Err(GameError::InsufficientCoins {
                    needed: view.stake,
                    available: view.coins,
                });
            }
            Ok(ValidatedDecision::Show(view.stake))
        }
    }
}

/// Decides which decisions are legal at a table.
///
/// Rounds consult their policy before applying any decision, so a table can
/// tighten or relax the standard rules without touching round bookkeeping.
pub trait DecisionPolicy: Send + Sync + Debug {
    fn validate(&self, view: &SeatView, decision: &D) -> Result<ValidatedDecision, GameError>;
}

/// The standard rules from [`validate_decision`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardPolicy;

impl DecisionPolicy for StandardPolicy {
    fn validate(&self, view: &SeatView, decision: &D) -> Result<ValidatedDecision, GameError> {
        validate_decision(view, decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> SeatView {
        SeatView {
            coins: 50,
            stake: 10,
            active_players: 2,
            hand_len: 3,
            seen: false,
            deck_remaining: 10,
        }
    }

    #[test]
    fn fold_is_always_legal() {
        let broke = SeatView { coins: 0, ..view() };
        assert_eq!(validate_decision(&broke, &D::Fold), Ok(ValidatedDecision::Fold));
    }

    #[test]
    fn raise_must_exceed_stake_and_be_affordable() {
        assert!(matches!(
            validate_decision(&view(), &D::Raise(10)),
            Err(GameError::IllegalDecision { .. })
        ));
        assert_eq!(
            validate_decision(&view(), &D::Raise(60)),
            Err(GameError::InsufficientCoins {
                needed: 60,
                available: 50
            })
        );
        assert_eq!(
            validate_decision(&view(), &D::Raise(20)),
            Ok(ValidatedDecision::Raise(20))
        );
    }

    #[test]
    fn see_only_once() {
        let seen = SeatView { seen: true, ..view() };
        assert!(validate_decision(&seen, &D::See).is_err());
        assert_eq!(validate_decision(&view(), &D::See), Ok(ValidatedDecision::See));
    }

    #[test]
    fn swap_needs_card_and_deck() {
        assert!(matches!(
            validate_decision(&view(), &D::Swap { index: 3 }),
            Err(GameError::CardIndexOutOfRange { index: 3, len: 3 })
        ));
        let empty = SeatView {
            deck_remaining: 0,
            ..view()
        };
        assert!(validate_decision(&empty, &D::Swap { index: 0 }).is_err());
    }

    #[test]
    fn show_needs_two_players() {
        assert_eq!(validate_decision(&view(), &D::Show), Ok(ValidatedDecision::Show(10)));
        let three = SeatView {
            active_players: 3,
            ..view()
        };
        assert!(validate_decision(&three, &D::Show).is_err());
    }
}
