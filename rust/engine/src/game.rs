use serde::{Deserialize, Serialize};

use crate::player::PlayerId;
use crate::round::Settlement;

/// Coins and dealer button carried from one round to the next.
///
/// The player after the button acts first; players who can no longer pay the
/// boot sit out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Index into `players` of the button seat
    button_index: usize,
    players: Vec<(PlayerId, u32)>,
}

impl GameState {
    pub fn new(player_count: usize, initial_coins: u32) -> Self {
        Self {
            button_index: 0,
            players: (0..player_count).map(|id| (id, initial_coins)).collect(),
        }
    }

    pub fn button_index(&self) -> usize {
        self.button_index
    }

    pub fn players(&self) -> &[(PlayerId, u32)] {
        &self.players
    }

    pub fn coins(&self, player: PlayerId) -> Option<u32> {
        self.players
            .iter()
            .find(|(id, _)| *id == player)
            .map(|&(_, coins)| coins)
    }

    /// Players able to pay `boot`, starting left of the button.
    pub fn seating_order(&self, boot: u32) -> Vec<(PlayerId, u32)> {
        let n = self.players.len();
        (1..=n)
            .map(|step| self.players[(self.button_index + step) % n])
            .filter(|&(_, coins)| coins >= boot && coins > 0)
            .collect()
    }

    pub fn rotate_button(&mut self) {
        if !self.players.is_empty() {
            self.button_index = (self.button_index + 1) % self.players.len();
        }
    }

    /// Takes over the coin counts a settled round ended with.
    pub fn apply_settlement(&mut self, settlement: &Settlement) {
        for result in &settlement.results {
            if let Some(entry) = self.players.iter_mut().find(|(id, _)| *id == result.player) {
                entry.1 = result.coins;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::round::SeatResult;

    #[test]
    fn seating_starts_left_of_button() {
        let mut g = GameState::new(3, 100);
        let order: Vec<PlayerId> = g.seating_order(10).iter().map(|p| p.0).collect();
        assert_eq!(order, vec![1, 2, 0]);
        g.rotate_button();
        let order: Vec<PlayerId> = g.seating_order(10).iter().map(|p| p.0).collect();
        assert_eq!(order, vec![2, 0, 1]);
    }

    #[test]
    fn broke_players_sit_out() {
        let mut g = GameState::new(2, 100);
        g.apply_settlement(&Settlement {
            winner: 1,
            pot: 200,
            trump: None,
            results: vec![
                SeatResult {
                    player: 0,
                    evaluation: None,
                    folded: true,
                    coins: 5,
                },
                SeatResult {
                    player: 1,
                    evaluation: None,
                    folded: false,
                    coins: 195,
                },
            ],
        });
        assert_eq!(g.coins(0), Some(5));
        assert_eq!(g.seating_order(10), vec![(1, 195)]);
    }
}
