use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, Card};
use crate::errors::GameError;

/// Ordered 52-card deck dealt from the top without replacement.
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

    /// A deck that deals `cards` in the given order. Shuffling it restores a
    /// full random deck.
    pub fn stacked(cards: Vec<Card>) -> Self {
        Self {
            cards,
            position: 0,
            rng: ChaCha20Rng::seed_from_u64(0),
        }
    }

    /// Recreates all 52 cards and applies a Fisher-Yates shuffle.
    pub fn shuffle(&mut self) {
        self.cards = full_deck();
        self.cards.shuffle(&mut self.rng);
        self.position = 0;
    }

    /// Removes and returns the top `n` cards. Nothing is dealt when fewer
    /// than `n` remain.
    pub fn deal(&mut self, n: usize) -> Result<Vec<Card>, GameError> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(GameError::DeckExhausted {
                requested: n,
                remaining,
            });
        }
        let dealt = self.cards[self.position..self.position + n].to_vec();
        self.position += n;
        Ok(dealt)
    }

    pub fn remaining(&self) -> usize {
        self.cards.len().saturating_sub(self.position)
    }

    /// Cards not yet dealt, top first.
    #[cfg(test)]
    fn undealt(&self) -> &[Card] {
        &self.cards[self.position.min(self.cards.len())..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deal_fails_without_consuming_when_short() {
        let mut deck = Deck::new_with_seed(1);
        deck.deal(50).unwrap();
        let err = deck.deal(3).unwrap_err();
        assert_eq!(
            err,
            GameError::DeckExhausted {
                requested: 3,
                remaining: 2
            }
        );
        assert_eq!(deck.remaining(), 2);
    }

    #[test]
    fn stacked_deck_deals_in_order() {
        let cards: Vec<Card> = ["AH", "KD", "2C"].iter().map(|c| c.parse().unwrap()).collect();
        let mut deck = Deck::stacked(cards.clone());
        assert_eq!(deck.deal(2).unwrap(), cards[..2].to_vec());
        assert_eq!(deck.undealt(), &cards[2..]);
    }
}
