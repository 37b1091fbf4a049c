use tracing::{info, warn};

use crate::cards::Card;
use crate::decision::ReflectContext;
use crate::errors::GameError;
use crate::hand::{HandEvaluator, Score};
use crate::record::{ForcedReason, GameRecord, RoundEvent, ShowdownEntry};
use crate::rules::TieRule;
use crate::table::{Pot, Seat};

/// Result of adjudicating one hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowdownOutcome {
    pub entries: Vec<ShowdownEntry>,
    /// Winner names with the chips each received
    pub winners: Vec<(String, u32)>,
    pub pot: u32,
    /// Chips left in the pot because nobody was live
    pub carried: u32,
    /// Players live at showdown, in seating order
    pub live: Vec<String>,
    pub eliminated: Vec<String>,
}

impl ShowdownOutcome {
    /// Text handed to reflecting players.
    pub fn summary(&self) -> String {
        if self.winners.is_empty() {
            return format!(
                "Showdown finished with no live players; the pot of {} carries over.",
                self.carried
            );
        }
        let winners: Vec<String> = self
            .winners
            .iter()
            .map(|(name, won)| {
                let category = self
                    .entries
                    .iter()
                    .find(|e| &e.player == name)
                    .map(|e| e.category.name())
                    .unwrap_or("unknown");
                format!("{} wins {} with {}", name, won, category)
            })
            .collect();
        format!(
            "Showdown finished: {}. Reflect on your opponents' behaviour and their final hands.",
            winners.join("; ")
        )
    }
}

pub struct ShowdownResolver<'a> {
    pub evaluator: &'a dyn HandEvaluator,
    pub tie_rule: TieRule,
}

impl ShowdownResolver<'_> {
    /// Awards the pot to the best live hand, resets every seat for the next
    /// hand and eliminates busted players.
    ///
    /// Nothing is mutated when the board is incomplete or a live player
    /// lacks hole cards.
    pub fn resolve(
        &self,
        seats: &mut [Seat],
        community: &[Card],
        pot: &mut Pot,
        record: &mut GameRecord,
    ) -> Result<ShowdownOutcome, GameError> {
        if community.len() != 5 {
            return Err(GameError::IncompleteBoard(community.len()));
        }

        let mut scored: Vec<(usize, Score)> = Vec::new();
        for (idx, seat) in seats.iter().enumerate() {
            if !seat.player.is_live() {
                continue;
            }
            let hole = seat.player.hole_pair()?;
            scored.push((idx, self.evaluator.evaluate(&hole, community)?));
        }

        let entries: Vec<ShowdownEntry> = scored
            .iter()
            .map(|&(idx, score)| ShowdownEntry {
                player: seats[idx].name().to_string(),
                hand: seats[idx].player.hole_cards().to_vec(),
                score: score.value(),
                category: score.category(),
            })
            .collect();
        let live: Vec<String> = entries.iter().map(|e| e.player.clone()).collect();

        let best = scored
            .iter()
            .map(|(_, s)| *s)
            .reduce(|best, s| if s.beats(&best) { s } else { best });
        let winner_idx: Vec<usize> = match best {
            None => Vec::new(),
            Some(best) => {
                let mut tied = scored.iter().filter(|(_, s)| *s == best).map(|(i, _)| *i);
                match self.tie_rule {
                    TieRule::FirstSeat => tied.next().into_iter().collect(),
                    TieRule::Split => tied.collect(),
                }
            }
        };

        let pot_total = pot.total();
        let mut winners = Vec::new();
        let mut carried = 0;
        let note;
        if winner_idx.is_empty() {
            carried = pot_total;
            note = Some(format!("no live players, pot of {} carried over", carried));
            warn!(pot = carried, "showdown without live players");
        } else {
            let chips = pot.take();
            let k = winner_idx.len() as u32;
            let (share, mut odd) = (chips / k, chips % k);
            for &idx in &winner_idx {
                let extra = if odd > 0 {
                    odd -= 1;
                    1
                } else {
                    0
                };
                seats[idx].player.award(share + extra);
                winners.push((seats[idx].name().to_string(), share + extra));
            }
            note = (k > 1).then(|| format!("split pot between {} players", k));
            info!(winners = ?winners, pot = chips, "pot awarded");
        }

        record.record(RoundEvent::Showdown {
            entries: entries.clone(),
            winners: winners.iter().map(|(n, _)| n.clone()).collect(),
            pot: pot_total,
            note,
        });

        let mut eliminated = Vec::new();
        for seat in seats.iter_mut() {
            seat.player.reset_for_next_hand();
            if seat.player.check_elimination() {
                info!(player = seat.name(), "player eliminated");
                record.record(RoundEvent::Forced {
                    player: seat.name().to_string(),
                    reason: ForcedReason::Eliminated,
                    amount: 0,
                });
                eliminated.push(seat.name().to_string());
            }
        }

        Ok(ShowdownOutcome {
            entries,
            winners,
            pot: pot_total,
            carried,
            live,
            eliminated,
        })
    }

    /// Every player live at showdown updates its opinion of every other live
    /// player. A failed or empty reflection keeps the previous opinion.
    pub fn reflect_all(
        &self,
        seats: &mut [Seat],
        outcome: &ShowdownOutcome,
        rules: &str,
        record: &GameRecord,
    ) {
        let round_info = record.round_info();
        let round_result = outcome.summary();
        for seat in seats.iter_mut() {
            if !outcome.live.iter().any(|n| n == seat.name()) {
                continue;
            }
            let me = seat.name().to_string();
            let round_actions = record.round_actions(&me);
            for other in outcome.live.iter().filter(|n| **n != me) {
                let previous = seat.player.opinion_of(other).to_string();
                let ctx = ReflectContext {
                    rules,
                    self_name: &me,
                    subject: other,
                    alive_players: &outcome.live,
                    round_info: &round_info,
                    round_actions: &round_actions,
                    round_result: &round_result,
                    previous_opinion: &previous,
                };
                match seat.agent().reflect(&ctx) {
                    Ok(text) if !text.trim().is_empty() => {
                        info!(player = %me, subject = %other, "opinion updated");
                        seat.player.set_opinion(other, text.trim().to_string());
                    }
                    Ok(_) => warn!(player = %me, subject = %other, "empty reflection ignored"),
                    Err(e) => {
                        warn!(player = %me, subject = %other, error = %e, "reflection failed")
                    }
                }
            }
        }
    }
}
