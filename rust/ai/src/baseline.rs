//! Rule-based player for games without a model server.
//!
//! Strength is rated 0-10 from the hand already made on the board, then
//! mapped to an action with simple pot odds. Fully deterministic.

use tablemind_engine::cards::{full_deck, Card};
use tablemind_engine::decision::{ActionContext, DecisionProvider, ProviderError, ReflectContext};
use tablemind_engine::hand::{compare_hands, evaluate_hand, Category, HandStrength};
use tablemind_engine::player::PlayerAction;

/// Smallest raise the baseline player makes.
const MIN_RAISE: u32 = 20;

#[derive(Debug, Clone, Default)]
pub struct BaselineProvider;

impl BaselineProvider {
    pub fn new() -> Self {
        Self
    }

    /// Rates two hole cards on a 0-10 scale, used before any board is out.
    fn preflop_strength(hole: [Card; 2]) -> u8 {
        let r1 = hole[0].rank as u8;
        let r2 = hole[1].rank as u8;
        let (high, low) = if r1 > r2 { (r1, r2) } else { (r2, r1) };
        let suited = hole[0].suit == hole[1].suit;

        if r1 == r2 {
            return match high {
                13..=14 => 10,
                11..=12 => 9,
                10 => 8,
                9 => 7,
                8 => 6,
                7 => 5,
                _ => 4,
            };
        }
        // (offsuit, suited)
        let (plain, same_suit) = match (high, low) {
            (14, 13) => (8, 10),
            (14, 12) => (7, 8),
            (14, 11) => (6, 7),
            (14, 10) => (5, 6),
            (14, _) => (4, 5),
            (13, 12) => (6, 7),
            (13, 11) | (12, 11) => (5, 6),
            (13, 10) | (12, 10) => (4, 5),
            _ => {
                let broadway = high >= 11 && low >= 9;
                let plain = if broadway { 4 } else { 2 };
                let connected = if high - low > 2 {
                    plain
                } else if high >= 9 {
                    5
                } else {
                    4
                };
                (plain, connected)
            }
        };
        if suited { same_suit } else { plain }
    }

    /// Hand made with the cards already out: the weakest result over every
    /// possible completion of the board.
    fn made_hand(hole: [Card; 2], board: &[Card]) -> Option<HandStrength> {
        if !(3..=5).contains(&board.len()) {
            return None;
        }
        let known: Vec<Card> = hole.iter().chain(board).copied().collect();
        let unseen: Vec<Card> = full_deck()
            .into_iter()
            .filter(|c| !known.contains(c))
            .collect();

        let mut worst: Option<HandStrength> = None;
        let mut consider = |extra: &[Card]| {
            let mut seven = [known[0]; 7];
            seven[..known.len()].copy_from_slice(&known);
            seven[known.len()..].copy_from_slice(extra);
            let hs = evaluate_hand(&seven);
            if worst.as_ref().is_none_or(|w| compare_hands(&hs, w).is_lt()) {
                worst = Some(hs);
            }
        };
        match 7 - known.len() {
            0 => consider(&[]),
            1 => unseen.iter().for_each(|&c| consider(&[c])),
            _ => {
                for (i, &a) in unseen.iter().enumerate() {
                    for &b in &unseen[i + 1..] {
                        consider(&[a, b]);
                    }
                }
            }
        }
        worst
    }

    fn postflop_strength(hole: [Card; 2], board: &[Card]) -> Option<u8> {
        let strength = Self::made_hand(hole, board)?;
        let base = match strength.category {
            Category::HighCard => 1,
            Category::OnePair => 3,
            Category::TwoPair => 5,
            Category::ThreeOfAKind => 6,
            Category::Straight => 7,
            Category::Flush => 8,
            Category::FullHouse => 9,
            Category::FourOfAKind | Category::StraightFlush => 10,
        };
        let kicker = u8::from(strength.kickers[0] >= 12);
        Some((base + kicker).min(10))
    }

    fn pot_odds(pot: u32, call: u32) -> f32 {
        if call == 0 {
            return 1.0;
        }
        pot as f32 / (pot + call) as f32
    }

    fn choose(strength: u8, call: u32, chips: u32, pot: u32) -> PlayerAction {
        if call == 0 {
            return match strength {
                9..=10 if chips >= MIN_RAISE => PlayerAction::Raise((pot * 2 / 3).clamp(MIN_RAISE, chips)),
                7..=8 if chips >= MIN_RAISE => PlayerAction::Raise((pot / 2).clamp(MIN_RAISE, chips)),
                _ => PlayerAction::Check,
            };
        }
        // calls are capped at the stack, so short stacks simply call off
        if call >= chips {
            return if strength >= 7 {
                PlayerAction::Call
            } else {
                PlayerAction::Fold
            };
        }
        let odds = Self::pot_odds(pot, call);
        match strength {
            9..=10 if chips >= call + MIN_RAISE => {
                PlayerAction::Raise((pot / 2).clamp(MIN_RAISE, chips - call))
            }
            7..=10 => PlayerAction::Call,
            5..=6 if odds >= 0.3 || call <= pot / 4 => PlayerAction::Call,
            3..=4 if odds >= 0.4 || call <= pot / 6 => PlayerAction::Call,
            _ => PlayerAction::Fold,
        }
    }
}

impl DecisionProvider for BaselineProvider {
    fn decide(&self, ctx: &ActionContext<'_>) -> Result<String, ProviderError> {
        let hole: [Card; 2] = ctx
            .hand
            .try_into()
            .map_err(|_| ProviderError::Malformed("no hole cards".to_string()))?;
        let strength = Self::postflop_strength(hole, ctx.community)
            .unwrap_or_else(|| Self::preflop_strength(hole));
        Ok(Self::choose(strength, ctx.call_amount, ctx.chips, ctx.pot).to_string())
    }

    /// Tallies what the subject did this round.
    fn reflect(&self, ctx: &ReflectContext<'_>) -> Result<String, ProviderError> {
        let (mut raises, mut calls, mut checks, mut folds) = (0, 0, 0, 0);
        let marker = format!("] {} ", ctx.subject);
        for line in ctx.round_actions.lines().filter(|l| l.contains(&marker)) {
            let action = line[line.find(&marker).unwrap_or(0) + marker.len()..].trim_start();
            if action.starts_with("raise") {
                raises += 1;
            } else if action.starts_with("call") {
                calls += 1;
            } else if action.starts_with("check") {
                checks += 1;
            } else if action.starts_with("fold") {
                folds += 1;
            }
        }
        Ok(format!(
            "{} last round: {} raises, {} calls, {} checks, {} folds",
            ctx.subject, raises, calls, checks, folds
        ))
    }

    fn name(&self) -> &str {
        "baseline"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(codes: &[&str]) -> Vec<Card> {
        codes.iter().map(|c| c.parse().unwrap()).collect()
    }

    fn pair(codes: [&str; 2]) -> [Card; 2] {
        codes.map(|c| c.parse().unwrap())
    }

    #[test]
    fn premium_pairs_rate_highest() {
        assert_eq!(BaselineProvider::preflop_strength(pair(["AH", "AS"])), 10);
        assert_eq!(BaselineProvider::preflop_strength(pair(["KH", "KS"])), 10);
    }

    #[test]
    fn ace_king_suited_beats_offsuit() {
        assert_eq!(BaselineProvider::preflop_strength(pair(["AH", "KH"])), 10);
        assert_eq!(BaselineProvider::preflop_strength(pair(["AH", "KS"])), 8);
    }

    #[test]
    fn weak_offsuit_rates_low() {
        assert!(BaselineProvider::preflop_strength(pair(["7H", "2S"])) <= 3);
    }

    #[test]
    fn suited_connectors_are_playable() {
        let s = BaselineProvider::preflop_strength(pair(["9H", "8H"]));
        assert!((4..=6).contains(&s));
    }

    #[test]
    fn pot_odds_calculation() {
        assert!((BaselineProvider::pot_odds(100, 50) - 0.667).abs() < 0.01);
        assert_eq!(BaselineProvider::pot_odds(100, 0), 1.0);
    }

    #[test]
    fn made_hand_ignores_draws() {
        // four hearts on the flop is only a draw
        let hs = BaselineProvider::made_hand(pair(["AH", "KH"]), &cards(&["2H", "7H", "9C"]))
            .unwrap();
        assert_eq!(hs.category, Category::HighCard);
    }

    #[test]
    fn trips_on_the_river_rate_strong() {
        let s = BaselineProvider::postflop_strength(
            pair(["AH", "AS"]),
            &cards(&["AD", "KC", "QH", "JS", "3D"]),
        )
        .unwrap();
        assert!(s >= 6);
    }

    #[test]
    fn strong_hand_bets_when_unopposed() {
        assert!(matches!(
            BaselineProvider::choose(9, 0, 1000, 60),
            PlayerAction::Raise(40)
        ));
        assert_eq!(BaselineProvider::choose(2, 0, 1000, 60), PlayerAction::Check);
    }

    #[test]
    fn weak_hand_folds_to_big_bet() {
        assert_eq!(BaselineProvider::choose(1, 200, 1000, 40), PlayerAction::Fold);
    }
}
