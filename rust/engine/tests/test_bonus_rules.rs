use std::sync::Arc;

use brag_engine::bonus::{
    BonusEngine, BonusRule, EvalContext, HandEvaluation, HandMatcher, RuleKind, RuleOutcome,
};
use brag_engine::cards::{all_ranks, all_suits, Card, Rank, Suit};
use brag_engine::errors::ConfigError;
use brag_engine::hand::Hand;
use brag_engine::mode::GameMode;

fn hand(ids: &[&str]) -> Hand {
    Hand::from_cards(ids.iter().map(|s| s.parse::<Card>().expect("card"))).expect("hand")
}

fn three_card() -> BonusEngine {
    BonusEngine::new(Arc::new(GameMode::three_card())).expect("valid mode")
}

fn matched(eval: &HandEvaluation) -> Vec<String> {
    eval.matched().map(|d| d.rule_name.clone()).collect()
}

#[test]
fn three_jacks_score_sixty_three() {
    let eval = three_card().evaluate_hand(&hand(&["J♠", "J♦", "J♣"])).unwrap();
    assert_eq!(matched(&eval), vec!["Three Of A Kind"]);
    assert_eq!(eval.details[0].base_bonus, 30);
    assert_eq!(eval.rank_sum, 33);
    assert_eq!(eval.total_bonus, 63);
}

#[test]
fn every_three_of_a_kind_excludes_runs_and_flushes() {
    let engine = three_card();
    for rank in all_ranks() {
        let h = Hand::from_cards([
            Card::new(rank, Suit::Clubs),
            Card::new(rank, Suit::Hearts),
            Card::new(rank, Suit::Spades),
        ])
        .unwrap();
        let eval = engine.evaluate_hand(&h).unwrap();
        assert_eq!(matched(&eval), vec!["Three Of A Kind"], "rank {}", rank);
    }
}

#[test]
fn every_same_suit_run_is_only_a_straight_flush() {
    let engine = three_card();
    let ranks = all_ranks();
    for suit in all_suits() {
        // Ace-low run first, then every run up to A-K-Q
        let mut runs = vec![[Rank::Ace, Rank::Two, Rank::Three]];
        runs.extend(ranks.windows(3).map(|w| [w[0], w[1], w[2]]));
        for run in runs {
            let h = Hand::from_cards(run.iter().map(|&r| Card::new(r, suit))).unwrap();
            let eval = engine.evaluate_hand(&h).unwrap();
            assert_eq!(matched(&eval), vec!["Straight Flush"], "{:?} {:?}", run, suit);
        }
    }
}

#[test]
fn royal_run_is_a_straight_flush_and_not_a_flush() {
    let eval = three_card().evaluate_hand(&hand(&["A♠", "K♠", "Q♠"])).unwrap();
    assert_eq!(matched(&eval), vec!["Straight Flush"]);
    assert!(eval.details[0].descriptions[0].contains("Royal"));
    assert_eq!(eval.total_bonus, 39 + 25);
}

#[test]
fn sequences_split_by_colour() {
    let engine = three_card();
    let same = engine.evaluate_hand(&hand(&["5H", "6D", "7H"])).unwrap();
    assert_eq!(matched(&same), vec!["Same Colors Sequence"]);
    assert_eq!(same.total_bonus, 18 + 20);

    let mixed = engine.evaluate_hand(&hand(&["5H", "6S", "7H"])).unwrap();
    assert_eq!(matched(&mixed), vec!["Different Colors Sequence"]);
    assert_eq!(mixed.total_bonus, 18 + 15);
}

#[test]
fn wrapping_king_ace_two_is_not_a_run() {
    let eval = three_card().evaluate_hand(&hand(&["KS", "AD", "2C"])).unwrap();
    assert!(eval.is_high_card());
    assert_eq!(eval.total_bonus, 29);
}

#[test]
fn evaluation_is_idempotent() {
    let engine = BonusEngine::new(Arc::new(GameMode::three_card().with_trump(Rank::Six))).unwrap();
    let h = hand(&["5S", "QH", "6D"]);
    let first = engine.evaluate_hand(&h).unwrap();
    let second = engine.evaluate_hand(&h).unwrap();
    assert_eq!(first, second);
}

#[test]
fn hand_length_must_match_mode() {
    let err = three_card()
        .evaluate_hand(&hand(&["2S", "3S", "4S", "5S"]))
        .unwrap_err();
    assert_eq!(
        err,
        ConfigError::HandLengthMismatch {
            expected: 3,
            actual: 4
        }
    );
}

#[test]
fn pair_and_trump_adjacency_stack() {
    let engine = BonusEngine::new(Arc::new(GameMode::three_card().with_trump(Rank::Six))).unwrap();
    let eval = engine.evaluate_hand(&hand(&["6S", "5H", "5D"])).unwrap();

    assert_eq!(matched(&eval), vec!["Pair In Hand"]);
    let partial: Vec<_> = eval.details.iter().filter(|d| !d.matched).collect();
    assert_eq!(partial.len(), 1);
    assert_eq!(partial[0].rule_name, "Same Colors Sequence");
    assert_eq!(partial[0].total_bonus(), 5);
    assert_eq!(eval.total_bonus, 16 + 5 + 5);
}

#[derive(Debug)]
struct AllRed;

impl HandMatcher for AllRed {
    fn evaluate(&self, hand: &Hand, _ctx: &EvalContext) -> Result<RuleOutcome, String> {
        if hand.iter().all(|c| matches!(c.suit, Suit::Hearts | Suit::Diamonds)) {
            Ok(RuleOutcome::Matched {
                additional: 0,
                notes: vec!["All red".into()],
            })
        } else {
            Ok(RuleOutcome::NoMatch)
        }
    }
}

#[test]
fn custom_rules_accumulate_with_builtins() {
    let mut mode = GameMode::three_card();
    mode.rules
        .push(BonusRule::new("Red Hand", RuleKind::Custom(Arc::new(AllRed)), 7, 0));
    let engine = BonusEngine::new(Arc::new(mode)).unwrap();

    let eval = engine.evaluate_hand(&hand(&["2H", "9H", "KH"])).unwrap();
    assert_eq!(matched(&eval), vec!["Flush", "Red Hand"]);
    assert_eq!(eval.total_bonus, 24 + 10 + 7);
    assert_eq!(eval.description(), "Flush + Red Hand (total 41)");
}

#[test]
fn four_card_mode_scores_pairs_and_runs() {
    let mut mode = GameMode::three_card();
    mode.number_of_cards = 4;
    let engine = BonusEngine::new(Arc::new(mode)).unwrap();

    let run = engine.evaluate_hand(&hand(&["9S", "10S", "JS", "QS"])).unwrap();
    assert_eq!(matched(&run), vec!["Straight Flush"]);

    let pair = engine.evaluate_hand(&hand(&["9S", "9D", "2C", "KH"])).unwrap();
    assert_eq!(matched(&pair), vec!["Pair In Hand"]);
}
