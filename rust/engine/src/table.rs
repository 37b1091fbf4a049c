use std::fmt;

use crate::decision::DecisionProvider;
use crate::player::PlayerState;

/// The single pot of a hand plus the current table bet.
///
/// Chips only enter through [`Pot::collect`], which debits the player in
/// the same step, so `total + Σ chips` stays constant.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Pot {
    total: u32,
    current_bet: u32,
}

impl Pot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn current_bet(&self) -> u32 {
        self.current_bet
    }

    /// Takes up to `amount` from `player`. Returns what was actually moved.
    pub fn collect(&mut self, player: &mut PlayerState, amount: u32) -> u32 {
        let paid = player.pay(amount);
        self.total += paid;
        paid
    }

    pub fn raise_to(&mut self, bet: u32) {
        self.current_bet = self.current_bet.max(bet);
    }

    pub fn start_street(&mut self) {
        self.current_bet = 0;
    }

    /// Empties the pot and returns its content.
    pub fn take(&mut self) -> u32 {
        self.current_bet = 0;
        std::mem::take(&mut self.total)
    }

    /// Puts back chips taken with [`Pot::take`] (pot carried to next hand).
    pub fn restore(&mut self, chips: u32) {
        self.total += chips;
    }
}

/// A player and the provider that decides for them.
pub struct Seat {
    pub player: PlayerState,
    agent: Box<dyn DecisionProvider>,
}

impl Seat {
    pub fn new(player: PlayerState, agent: Box<dyn DecisionProvider>) -> Self {
        Self { player, agent }
    }

    pub fn agent(&self) -> &dyn DecisionProvider {
        self.agent.as_ref()
    }

    pub fn name(&self) -> &str {
        self.player.name()
    }
}

impl fmt::Debug for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Seat")
            .field("player", &self.player)
            .field("agent", &self.agent.name())
            .finish()
    }
}

/// Chips held by every seat plus the pot.
pub fn chips_in_play(seats: &[Seat], pot: &Pot) -> u64 {
    seats
        .iter()
        .map(|s| s.player.chips() as u64)
        .sum::<u64>()
        + pot.total() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_moves_chips_atomically() {
        let mut pot = Pot::new();
        let mut p = PlayerState::new("a", "m", 100);
        assert_eq!(pot.collect(&mut p, 30), 30);
        assert_eq!(pot.total() + p.chips(), 100);
        assert_eq!(pot.collect(&mut p, 500), 70);
        assert_eq!(pot.total(), 100);
        assert_eq!(p.chips(), 0);
    }

    #[test]
    fn take_empties_pot() {
        let mut pot = Pot::new();
        let mut p = PlayerState::new("a", "m", 100);
        pot.collect(&mut p, 40);
        pot.raise_to(40);
        assert_eq!(pot.take(), 40);
        assert_eq!(pot.total(), 0);
        assert_eq!(pot.current_bet(), 0);
        pot.restore(40);
        assert_eq!(pot.total(), 40);
    }
}
