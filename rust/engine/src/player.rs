use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::{format_cards, Card};
use crate::errors::GameError;

/// Opinion text held for an opponent nobody has reflected on yet.
pub const NO_OBSERVATION: &str = "(no observation yet)";

/// Default starting chips for each player.
pub const STARTING_CHIPS: u32 = 1_000;

/// A betting decision after parsing.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "amount", rename_all = "lowercase")]
pub enum PlayerAction {
    /// Leave the hand
    Fold,
    /// Pass without adding chips
    Check,
    /// Match the table bet
    Call,
    /// Increase the table bet by the given amount
    Raise(u32),
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerAction::Fold => write!(f, "fold"),
            PlayerAction::Check => write!(f, "check"),
            PlayerAction::Call => write!(f, "call"),
            PlayerAction::Raise(n) => write!(f, "raise {}", n),
        }
    }
}

/// Per-player mutable state, keyed by a unique, stable name.
#[derive(Debug, Clone)]
pub struct PlayerState {
    name: String,
    model: String,
    chips: u32,
    hole: Vec<Card>,
    folded: bool,
    alive: bool,
    /// Chips put in on the current street
    current_bet: u32,
    /// Chips put in over the whole hand
    contributed: u32,
    opinions: BTreeMap<String, String>,
}

impl PlayerState {
    pub fn new(name: impl Into<String>, model: impl Into<String>, chips: u32) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            chips,
            hole: Vec::with_capacity(2),
            folded: false,
            alive: chips > 0,
            current_bet: 0,
            contributed: 0,
            opinions: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn model(&self) -> &str {
        &self.model
    }
    pub fn chips(&self) -> u32 {
        self.chips
    }
    pub fn hole_cards(&self) -> &[Card] {
        &self.hole
    }
    pub fn is_folded(&self) -> bool {
        self.folded
    }
    pub fn is_alive(&self) -> bool {
        self.alive
    }
    pub fn current_bet(&self) -> u32 {
        self.current_bet
    }
    pub fn contributed(&self) -> u32 {
        self.contributed
    }

    /// Alive and not folded: may still act and win the pot.
    pub fn is_live(&self) -> bool {
        self.alive && !self.folded
    }

    pub fn hole_pair(&self) -> Result<[Card; 2], GameError> {
        <[Card; 2]>::try_from(self.hole.as_slice())
            .map_err(|_| GameError::InvalidHoleCards(self.name.clone()))
    }

    pub fn give_cards(&mut self, cards: [Card; 2]) {
        self.hole.clear();
        self.hole.extend_from_slice(&cards);
    }

    pub fn fold(&mut self) {
        self.folded = true;
    }

    /// Moves up to `amount` chips out of the stack, capped at what is left.
    /// Returns the chips actually paid; the caller adds them to the pot.
    pub fn pay(&mut self, amount: u32) -> u32 {
        let paid = amount.min(self.chips);
        self.chips -= paid;
        self.current_bet += paid;
        self.contributed += paid;
        paid
    }

    /// Overrides the street bet without moving chips. Legacy raise
    /// accounting records the full table bet here.
    pub fn set_street_bet(&mut self, bet: u32) {
        self.current_bet = bet;
    }

    pub fn award(&mut self, amount: u32) {
        self.chips = self.chips.saturating_add(amount);
    }

    /// Returns this hand's contributions to the stack. Used when a hand is
    /// aborted.
    pub fn refund(&mut self) -> u32 {
        let back = self.contributed;
        self.chips += back;
        self.contributed = 0;
        self.current_bet = 0;
        back
    }

    pub fn start_street(&mut self) {
        self.current_bet = 0;
    }

    /// Clears hand-scoped state. Folded players are back in for the next hand.
    pub fn reset_for_next_hand(&mut self) {
        self.hole.clear();
        self.folded = false;
        self.current_bet = 0;
        self.contributed = 0;
    }

    /// Marks a busted player as eliminated. Returns true on the transition.
    pub fn check_elimination(&mut self) -> bool {
        if self.alive && self.chips == 0 {
            self.alive = false;
            return true;
        }
        false
    }

    pub fn init_opinions<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        for other in names {
            if other != self.name {
                self.opinions
                    .entry(other.to_string())
                    .or_insert_with(|| NO_OBSERVATION.to_string());
            }
        }
    }

    pub fn opinion_of(&self, other: &str) -> &str {
        self.opinions
            .get(other)
            .map(String::as_str)
            .unwrap_or(NO_OBSERVATION)
    }

    pub fn set_opinion(&mut self, other: &str, text: String) {
        self.opinions.insert(other.to_string(), text);
    }

    pub fn opinions(&self) -> &BTreeMap<String, String> {
        &self.opinions
    }

    /// One-line status used in narration.
    pub fn status_line(&self) -> String {
        let status = if self.alive { "alive" } else { "eliminated" };
        format!(
            "{} | chips: {} | hand: {} | {}",
            self.name,
            self.chips,
            format_cards(&self.hole),
            status
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pay_is_capped_at_stack() {
        let mut p = PlayerState::new("a", "m", 30);
        assert_eq!(p.pay(50), 30);
        assert_eq!(p.chips(), 0);
        assert_eq!(p.current_bet(), 30);
        assert_eq!(p.contributed(), 30);
    }

    #[test]
    fn refund_restores_contributions() {
        let mut p = PlayerState::new("a", "m", 100);
        p.pay(20);
        p.start_street();
        p.pay(15);
        assert_eq!(p.refund(), 35);
        assert_eq!(p.chips(), 100);
    }

    #[test]
    fn elimination_happens_once() {
        let mut p = PlayerState::new("a", "m", 10);
        p.pay(10);
        assert!(p.check_elimination());
        assert!(!p.is_alive());
        assert!(!p.check_elimination());
    }

    #[test]
    fn opinions_start_with_placeholder() {
        let mut p = PlayerState::new("a", "m", 10);
        p.init_opinions(["a", "b", "c"]);
        assert_eq!(p.opinions().len(), 2);
        assert_eq!(p.opinion_of("b"), NO_OBSERVATION);
        p.set_opinion("b", "bluffs a lot".into());
        assert_eq!(p.opinion_of("b"), "bluffs a lot");
    }
}
