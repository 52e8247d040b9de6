//! Card, hand, and evaluation formatters for terminal display.
//!
//! Cards render with Unicode suit symbols where the terminal supports them
//! and fall back to the ASCII identity (`"JS"`, `"10H"`) otherwise.
//!
//! ## Example
//!
//! ```rust
//! use brag_engine::cards::{Card, Rank, Suit};
//! use brag_cli::formatters::format_card;
//!
//! let jack = Card::new(Rank::Jack, Suit::Spades);
//! assert!(format_card(&jack) == "J♠" || format_card(&jack) == "JS");
//! ```

use brag_engine::bonus::{BonusDetail, HandEvaluation};
use brag_engine::cards::{Card, Rank};
use brag_engine::hand::Hand;

/// On Windows, checks for Windows Terminal (WT_SESSION), modern terminals
/// (TERM_PROGRAM) or VS Code (VSCODE_INJECTION). Unix-like systems are
/// assumed to render Unicode.
pub fn supports_unicode() -> bool {
    if cfg!(windows) {
        std::env::var("WT_SESSION").is_ok()
            || std::env::var("TERM_PROGRAM").is_ok()
            || std::env::var("VSCODE_INJECTION").is_ok()
    } else {
        true
    }
}

pub fn format_card(card: &Card) -> String {
    if supports_unicode() {
        card.to_string()
    } else {
        card.id()
    }
}

pub fn format_hand(hand: &Hand) -> String {
    hand.iter().map(format_card).collect::<Vec<_>>().join(" ")
}

pub fn format_trump(trump: Option<Rank>) -> String {
    match trump {
        Some(rank) => rank.alias().to_string(),
        None => "none".to_string(),
    }
}

/// One line per bonus detail, e.g. `Three Of A Kind: +30 (three J)`.
///
/// Adjacency details recorded without a match are tagged `(partial)`.
pub fn format_detail(detail: &BonusDetail) -> String {
    let mut line = format!("{}: +{}", detail.rule_name, detail.base_bonus);
    if detail.additional_bonus > 0 {
        line.push_str(&format!(" +{}", detail.additional_bonus));
    }
    if !detail.matched {
        line.push_str(" (partial)");
    }
    if !detail.descriptions.is_empty() {
        line.push_str(&format!(" [{}]", detail.descriptions.join("; ")));
    }
    line
}

/// Detail lines followed by the rank sum and total.
pub fn format_evaluation(eval: &HandEvaluation) -> Vec<String> {
    let mut lines: Vec<String> = eval.details.iter().map(format_detail).collect();
    if eval.is_high_card()
        && let Some(rank) = eval.high_card
    {
        lines.push(format!("High Card: {}", rank));
    }
    lines.push(format!("Rank sum: {}", eval.rank_sum));
    lines.push(format!("Total: {}", eval.total_bonus));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(matched: bool, additional: u32) -> BonusDetail {
        BonusDetail {
            rule_name: "Straight Flush".into(),
            base_bonus: if matched { 25 } else { 0 },
            additional_bonus: additional,
            descriptions: vec!["trump 9 fills the gap".into()],
            priority: 5,
            matched,
        }
    }

    #[test]
    fn detail_lists_bonus_parts() {
        assert_eq!(
            format_detail(&detail(true, 10)),
            "Straight Flush: +25 +10 [trump 9 fills the gap]"
        );
        assert!(format_detail(&detail(false, 5)).contains("(partial)"));
    }

    #[test]
    fn trump_renders_alias_or_none() {
        assert_eq!(format_trump(Some(Rank::Ten)), "10");
        assert_eq!(format_trump(None), "none");
    }
}
