//! Single-pass betting round.
//!
//! Every live seat is asked once, in seating order from `first`. A raise
//! does not reopen the action for players who already acted.

use tracing::{debug, warn};

use crate::cards::Card;
use crate::decision::{ActionContext, ActionParser};
use crate::player::PlayerAction;
use crate::record::{GameRecord, RoundEvent, Street};
use crate::rules::{validate_action, RaiseAccounting, ValidatedAction};
use crate::table::{chips_in_play, Pot, Seat};

/// Where a player ended up in one betting round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionState {
    /// Not asked (folded earlier or eliminated)
    Pending,
    Folded,
    Checked,
    Called(u32),
    Raised { to: u32, paid: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BettingSummary {
    pub street: Street,
    pub outcomes: Vec<(String, ActionState)>,
}

impl BettingSummary {
    pub fn state_of(&self, name: &str) -> Option<&ActionState> {
        self.outcomes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s)
    }
}

pub struct BettingEngine<'a> {
    pub rules: &'a str,
    pub parser: &'a dyn ActionParser,
    pub accounting: RaiseAccounting,
}

impl BettingEngine<'_> {
    /// Runs one pass over the table.
    ///
    /// With incremental accounting every street starts from a zero table
    /// bet. Legacy accounting carries the table bet and each player's street
    /// bet through the whole hand, so a later raise charges the full new bet
    /// again and a call only covers the gap to it.
    #[allow(clippy::too_many_arguments)]
    pub fn run_betting_round(
        &self,
        seats: &mut [Seat],
        first: usize,
        street: Street,
        community: &[Card],
        deck_remaining: usize,
        pot: &mut Pot,
        record: &mut GameRecord,
    ) -> BettingSummary {
        let before = chips_in_play(seats, pot);
        if self.accounting == RaiseAccounting::Incremental {
            pot.start_street();
            for seat in seats.iter_mut() {
                seat.player.start_street();
            }
        }

        let n = seats.len();
        let mut outcomes: Vec<(String, ActionState)> = seats
            .iter()
            .map(|s| (s.name().to_string(), ActionState::Pending))
            .collect();

        for offset in 0..n {
            let idx = (first + offset) % n;
            if !seats[idx].player.is_live() {
                continue;
            }
            let state = self.act(
                &mut seats[idx],
                street,
                community,
                deck_remaining,
                pot,
                record,
            );
            outcomes[idx].1 = state;
        }

        debug_assert_eq!(
            before,
            chips_in_play(seats, pot),
            "chips created or destroyed during betting"
        );
        BettingSummary { street, outcomes }
    }

    fn act(
        &self,
        seat: &mut Seat,
        street: Street,
        community: &[Card],
        deck_remaining: usize,
        pot: &mut Pot,
        record: &mut GameRecord,
    ) -> ActionState {
        let player = &seat.player;
        let name = player.name().to_string();
        let ctx = ActionContext {
            rules: self.rules,
            player: &name,
            hand: player.hole_cards(),
            community,
            street,
            deck_remaining,
            pot: pot.total(),
            current_bet: pot.current_bet(),
            own_bet: player.current_bet(),
            call_amount: pot.current_bet().saturating_sub(player.current_bet()),
            chips: player.chips(),
            opinions: player.opinions(),
        };

        let (action, behavior) = match seat.agent().decide(&ctx) {
            Ok(reply) => {
                let parsed = self.parser.parse(&reply);
                if let Some(why) = &parsed.fallback {
                    warn!(player = %name, reply = %reply, "{}", why);
                    record.record_text(format!("{}: {}", name, why));
                }
                (parsed.action, reply)
            }
            Err(e) => {
                warn!(player = %name, error = %e, "decision failed, checking");
                record.record_text(format!("{}: decision failed ({}), checking", name, e));
                (PlayerAction::Check, String::new())
            }
        };

        let player = &mut seat.player;
        let validated = validate_action(
            player.current_bet(),
            pot.current_bet(),
            self.accounting,
            action,
        );
        let (state, paid) = match validated {
            ValidatedAction::Fold => {
                player.fold();
                (ActionState::Folded, 0)
            }
            ValidatedAction::Check => (ActionState::Checked, 0),
            ValidatedAction::Call(amount) => {
                let paid = pot.collect(player, amount);
                (ActionState::Called(paid), paid)
            }
            ValidatedAction::Raise { to, charge } => {
                pot.raise_to(to);
                let paid = pot.collect(player, charge);
                if self.accounting == RaiseAccounting::Legacy && paid == charge {
                    player.set_street_bet(to);
                }
                (ActionState::Raised { to, paid }, paid)
            }
        };

        debug!(player = %name, %street, %action, paid, pot = pot.total(), "action applied");
        record.record(RoundEvent::Play {
            player: name,
            street,
            action,
            paid,
            pot: pot.total(),
            current_bet: pot.current_bet(),
            behavior,
        });
        state
    }
}
