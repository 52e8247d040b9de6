use brag_engine::cards::{Card, CardFace, Rank, Suit};
use brag_engine::errors::GameError;
use brag_engine::game::GameState;
use brag_engine::player::{Decision, DecisionKind, Seat};

#[test]
fn seat_pays_and_cannot_overpay() {
    let mut seat = Seat::new(0, 100);
    seat.pay(30).expect("pay should succeed");
    assert_eq!(seat.coins(), 70);
    assert_eq!(
        seat.pay(500).unwrap_err(),
        GameError::InsufficientCoins {
            needed: 500,
            available: 70
        }
    );
    seat.credit(u32::MAX);
    assert_eq!(seat.coins(), u32::MAX);
}

#[test]
fn cards_stay_face_down_until_seen_by_their_owner() {
    let mut seat = Seat::new(2, 100);
    let ace = Card::new(Rank::Ace, Suit::Spades);
    seat.give_card(ace).unwrap();
    assert_eq!(seat.faces_for(2), vec![CardFace::Back]);

    seat.see_cards();
    assert_eq!(seat.faces_for(2), vec![CardFace::Up(ace)]);
    assert_eq!(seat.faces_for(0), vec![CardFace::Back]);
}

#[test]
fn decisions_display_and_classify() {
    assert_eq!(Decision::Raise(40).to_string(), "raise to 40");
    assert_eq!(Decision::Swap { index: 1 }.kind(), DecisionKind::Swap);
    assert_eq!(Decision::Show.kind(), DecisionKind::Show);
}

#[test]
fn button_rotates_through_every_seat() {
    let mut g = GameState::new(3, 100);
    let mut firsts = Vec::new();
    for _ in 0..3 {
        firsts.push(g.seating_order(10)[0].0);
        g.rotate_button();
    }
    assert_eq!(firsts, vec![1, 2, 0]);
    assert_eq!(g.button_index(), 0);
}
