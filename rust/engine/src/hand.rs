use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Suit};
use crate::errors::GameError;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Category {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

impl Category {
    pub fn name(self) -> &'static str {
        match self {
            Category::HighCard => "High Card",
            Category::OnePair => "One Pair",
            Category::TwoPair => "Two Pair",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "Full House",
            Category::FourOfAKind => "Four of a Kind",
            Category::StraightFlush => "Straight Flush",
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct HandStrength {
    pub category: Category,
    // kickers: ordered high -> low for tiebreaks
    pub kickers: [u8; 5],
}

/// Best five-card strength out of seven cards.
pub fn evaluate_hand(cards: &[Card; 7]) -> HandStrength {
    let mut rank_counts = [0u8; 15]; // 2..14 used
    let mut rank_mask: u16 = 0;
    let mut suit_masks = [0u16; 4];
    let mut suit_counts = [0u8; 4];
    for c in cards {
        let r = c.rank as u8;
        rank_counts[r as usize] += 1;
        rank_mask |= 1 << r;
        let s = suit_index(c.suit);
        suit_masks[s] |= 1 << r;
        suit_counts[s] += 1;
    }

    let flush_mask = (0..4)
        .find(|&s| suit_counts[s] >= 5)
        .map(|s| suit_masks[s]);

    if let Some(mask) = flush_mask {
        if let Some(high) = straight_high(mask) {
            return strength(Category::StraightFlush, &[high]);
        }
    }

    let mut quads = Vec::new();
    let mut trips = Vec::new();
    let mut pairs = Vec::new();
    for r in (2..=14u8).rev() {
        match rank_counts[r as usize] {
            4 => quads.push(r),
            3 => trips.push(r),
            2 => pairs.push(r),
            _ => {}
        }
    }

    if let Some(&q) = quads.first() {
        let kicker = top_ranks(rank_mask & !(1 << q), 1);
        return strength(Category::FourOfAKind, &[q, kicker[0]]);
    }

    if let Some(&t) = trips.first() {
        // a second set of trips plays as the pair
        let pair = trips.get(1).or(pairs.first()).copied();
        if let Some(p) = pair {
            return strength(Category::FullHouse, &[t, p]);
        }
    }

    if let Some(mask) = flush_mask {
        return strength(Category::Flush, &top_ranks(mask, 5));
    }

    if let Some(high) = straight_high(rank_mask) {
        return strength(Category::Straight, &[high]);
    }

    if let Some(&t) = trips.first() {
        let mut k = vec![t];
        k.extend(top_ranks(rank_mask & !(1 << t), 2));
        return strength(Category::ThreeOfAKind, &k);
    }

    if pairs.len() >= 2 {
        let (high, low) = (pairs[0], pairs[1]);
        let mut k = vec![high, low];
        k.extend(top_ranks(rank_mask & !(1 << high) & !(1 << low), 1));
        return strength(Category::TwoPair, &k);
    }

    if let Some(&p) = pairs.first() {
        let mut k = vec![p];
        k.extend(top_ranks(rank_mask & !(1 << p), 3));
        return strength(Category::OnePair, &k);
    }

    strength(Category::HighCard, &top_ranks(rank_mask, 5))
}

pub fn compare_hands(a: &HandStrength, b: &HandStrength) -> Ordering {
    match a.category.cmp(&b.category) {
        Ordering::Equal => a.kickers.cmp(&b.kickers),
        ord => ord,
    }
}

fn strength(category: Category, ranks: &[u8]) -> HandStrength {
    let mut kickers = [0u8; 5];
    for (slot, &r) in kickers.iter_mut().zip(ranks) {
        *slot = r;
    }
    HandStrength { category, kickers }
}

fn suit_index(s: Suit) -> usize {
    match s {
        Suit::Clubs => 0,
        Suit::Diamonds => 1,
        Suit::Hearts => 2,
        Suit::Spades => 3,
    }
}

/// Highest `n` ranks set in `mask`, descending.
fn top_ranks(mask: u16, n: usize) -> Vec<u8> {
    (2..=14u8)
        .rev()
        .filter(|r| mask & (1 << r) != 0)
        .take(n)
        .collect()
}

fn straight_high(mask: u16) -> Option<u8> {
    let mut m = mask;
    // Ace also plays low
    if m & (1 << 14) != 0 {
        m |= 1 << 1;
    }
    (5..=14u8).rev().find(|&high| {
        let window = 0b11111u16 << (high - 4);
        m & window == window
    })
}

const RADIX: u32 = 15;
const WORST: u32 = (Category::StraightFlush as u32 + 1) * RADIX.pow(5);

/// Totally ordered hand score. Lower is strictly better and equal scores
/// mean equal strength.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Score {
    value: u32,
    category: Category,
}

impl Score {
    pub fn from_strength(s: &HandStrength) -> Self {
        let packed = s
            .kickers
            .iter()
            .fold(s.category as u32, |acc, &k| acc * RADIX + k as u32);
        Self {
            value: WORST - packed,
            category: s.category,
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn beats(&self, other: &Score) -> bool {
        self.value < other.value
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.value, self.category.name())
    }
}

/// Ranks a player's hole cards against the board.
pub trait HandEvaluator: Send + Sync {
    fn evaluate(&self, hole: &[Card; 2], board: &[Card]) -> Result<Score, GameError>;
}

/// Seven-card evaluator. Only defined for a complete five-card board.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardEvaluator;

impl HandEvaluator for StandardEvaluator {
    fn evaluate(&self, hole: &[Card; 2], board: &[Card]) -> Result<Score, GameError> {
        let board: &[Card; 5] = board
            .try_into()
            .map_err(|_| GameError::IncompleteBoard(board.len()))?;
        let cards = [
            hole[0], hole[1], board[0], board[1], board[2], board[3], board[4],
        ];
        Ok(Score::from_strength(&evaluate_hand(&cards)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(codes: &[&str]) -> Vec<Card> {
        codes.iter().map(|c| c.parse().unwrap()).collect()
    }

    fn seven(codes: [&str; 7]) -> HandStrength {
        let v = cards(&codes);
        evaluate_hand(&v.try_into().unwrap())
    }

    #[test]
    fn wheel_is_five_high_straight() {
        let hs = seven(["AH", "2D", "3C", "4S", "5H", "9D", "KC"]);
        assert_eq!(hs.category, Category::Straight);
        assert_eq!(hs.kickers[0], 5);
    }

    #[test]
    fn two_pair_kicker_considers_third_pair() {
        let hs = seven(["KH", "KD", "QC", "QS", "JH", "JD", "2C"]);
        assert_eq!(hs.category, Category::TwoPair);
        assert_eq!(hs.kickers, [13, 12, 11, 0, 0]);
    }

    #[test]
    fn double_trips_is_full_house() {
        let hs = seven(["9H", "9D", "9C", "4S", "4H", "4D", "AC"]);
        assert_eq!(hs.category, Category::FullHouse);
        assert_eq!(hs.kickers[..2], [9, 4]);
    }

    #[test]
    fn better_hand_has_lower_score() {
        let flush = Score::from_strength(&seven(["2H", "7H", "9H", "JH", "KH", "3C", "4D"]));
        let pair = Score::from_strength(&seven(["AH", "AD", "9C", "JS", "KH", "3C", "4D"]));
        assert!(flush < pair);
        assert!(flush.beats(&pair));
        assert_eq!(flush.category(), Category::Flush);
    }

    #[test]
    fn evaluator_requires_full_board() {
        let hole: [Card; 2] = cards(&["AH", "AD"]).try_into().unwrap();
        let err = StandardEvaluator
            .evaluate(&hole, &cards(&["2C", "3C", "4C"]))
            .unwrap_err();
        assert_eq!(err, GameError::IncompleteBoard(3));
    }

    #[test]
    fn identical_strength_ties() {
        let board = cards(&["AH", "KD", "QC", "JS", "9H"]);
        let a: [Card; 2] = cards(&["2C", "3D"]).try_into().unwrap();
        let b: [Card; 2] = cards(&["2D", "3H"]).try_into().unwrap();
        let sa = StandardEvaluator.evaluate(&a, &board).unwrap();
        let sb = StandardEvaluator.evaluate(&b, &board).unwrap();
        assert_eq!(sa, sb);
    }
}
