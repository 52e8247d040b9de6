use std::sync::Arc;

use brag_engine::cards::Card;
use brag_engine::deck::StackedDeck;
use brag_engine::errors::GameError;
use brag_engine::mode::GameMode;
use brag_engine::player::{Decision, DecisionKind, PlayerId};
use brag_engine::round::{DecisionEffect, Round, RoundEnd};
use brag_engine::rules::{
    validate_decision, DecisionPolicy, SeatView, StandardPolicy, ValidatedDecision,
};

/// Standard rules with raising switched off.
#[derive(Debug)]
struct NoRaises;

impl DecisionPolicy for NoRaises {
    fn validate(
        &self,
        view: &SeatView,
        decision: &Decision,
    ) -> Result<ValidatedDecision, GameError> {
        if let Decision::Raise(_) = decision {
            return Err(GameError::IllegalDecision {
                decision: decision.to_string(),
                reason: "this table plays without raises".into(),
            });
        }
        validate_decision(view, decision)
    }
}

/// Lets any table call a show, not just the last two players.
#[derive(Debug)]
struct OpenShow;

impl DecisionPolicy for OpenShow {
    fn validate(
        &self,
        view: &SeatView,
        decision: &Decision,
    ) -> Result<ValidatedDecision, GameError> {
        match decision {
            Decision::Show if view.coins >= view.stake => Ok(ValidatedDecision::Show(view.stake)),
            _ => validate_decision(view, decision),
        }
    }
}

/// Only folding is allowed.
#[derive(Debug)]
struct FoldOnly;

impl DecisionPolicy for FoldOnly {
    fn validate(
        &self,
        view: &SeatView,
        decision: &Decision,
    ) -> Result<ValidatedDecision, GameError> {
        match decision {
            Decision::Fold => validate_decision(view, decision),
            _ => Err(GameError::IllegalDecision {
                decision: decision.to_string(),
                reason: "fold or nothing".into(),
            }),
        }
    }
}

/// Accepts any swap index and leaves the check to the hand.
#[derive(Debug)]
struct UncheckedSwaps;

impl DecisionPolicy for UncheckedSwaps {
    fn validate(
        &self,
        view: &SeatView,
        decision: &Decision,
    ) -> Result<ValidatedDecision, GameError> {
        match decision {
            Decision::Swap { index } => Ok(ValidatedDecision::Swap { index: *index }),
            _ => validate_decision(view, decision),
        }
    }
}

fn three_player_round(policy: Arc<dyn DecisionPolicy>) -> Round {
    let cards: Vec<Card> = [
        "2S", "5H", "9C", "3S", "6H", "10C", "4D", "8H", "QC", "KD", "AD", "7S",
    ]
    .iter()
    .map(|s| s.parse().unwrap())
    .collect();
    let seats: Vec<(PlayerId, u32)> = (0..3).map(|id| (id, 100)).collect();
    Round::deal(
        Arc::new(GameMode::three_card()),
        &seats,
        Box::new(StackedDeck::new(cards)),
    )
    .unwrap()
    .with_policy(policy)
}

fn kinds(decisions: &[Decision]) -> Vec<DecisionKind> {
    decisions.iter().map(Decision::kind).collect()
}

#[test]
fn raises_follow_the_table_policy() {
    let mut round = three_player_round(Arc::new(NoRaises));

    let err = round.apply_decision(0, &Decision::Raise(20)).unwrap_err();
    assert!(matches!(err, GameError::IllegalDecision { .. }), "{:?}", err);
    assert_eq!(round.stake(), 10);
    assert_eq!(round.pot(), 30);

    assert!(!kinds(&round.legal_decisions(0).unwrap()).contains(&DecisionKind::Raise));
    assert_eq!(
        round.apply_decision(0, &Decision::Bet).unwrap(),
        DecisionEffect::NextTurn(1)
    );
    assert_eq!(round.pot(), 40);
}

#[test]
fn a_policy_can_allow_a_show_at_a_full_table() {
    let mut standard = three_player_round(Arc::new(StandardPolicy));
    assert!(!kinds(&standard.legal_decisions(0).unwrap()).contains(&DecisionKind::Show));
    assert!(standard.apply_decision(0, &Decision::Show).is_err());

    let mut round = three_player_round(Arc::new(OpenShow));
    assert!(kinds(&round.legal_decisions(0).unwrap()).contains(&DecisionKind::Show));
    assert_eq!(
        round.apply_decision(0, &Decision::Show).unwrap(),
        DecisionEffect::RoundOver(RoundEnd::Show)
    );
    assert_eq!(round.pot(), 40);
}

#[test]
fn timeout_falls_back_to_fold_when_the_policy_rejects_a_bet() {
    let round = three_player_round(Arc::new(NoRaises));
    assert_eq!(round.timeout_decision(0), Decision::Bet);

    let mut round = three_player_round(Arc::new(FoldOnly));
    assert_eq!(round.timeout_decision(0), Decision::Fold);
    assert_eq!(round.legal_decisions(0).unwrap(), vec![Decision::Fold]);
    assert!(round.apply_decision(0, &Decision::Bet).is_err());
    assert_eq!(
        round.apply_decision(0, &Decision::Fold).unwrap(),
        DecisionEffect::NextTurn(1)
    );
}

#[test]
fn out_of_range_swap_leaves_the_deck_alone() {
    let mut round = three_player_round(Arc::new(UncheckedSwaps));
    assert_eq!(round.seat_view(0).unwrap().deck_remaining, 3);

    assert_eq!(
        round.apply_decision(0, &Decision::Swap { index: 7 }).unwrap_err(),
        GameError::CardIndexOutOfRange { index: 7, len: 3 }
    );
    assert_eq!(round.seat_view(0).unwrap().deck_remaining, 3);

    round.apply_decision(0, &Decision::Swap { index: 0 }).unwrap();
    assert_eq!(round.seat_view(0).unwrap().deck_remaining, 2);
}
