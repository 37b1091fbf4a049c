use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::betting::{BettingEngine, BettingSummary};
use crate::cards::Card;
use crate::deck::Deck;
use crate::decision::{ActionParser, DecisionProvider, KeywordParser, DEFAULT_RAISE};
use crate::errors::GameError;
use crate::hand::{HandEvaluator, StandardEvaluator};
use crate::logger::RoundLogger;
use crate::player::{PlayerState, STARTING_CHIPS};
use crate::record::{ForcedReason, GameRecord, PlayerSnapshot, RoundEvent, Street};
use crate::rules::{Blinds, RaiseAccounting, TieRule};
use crate::showdown::{ShowdownOutcome, ShowdownResolver};
use crate::table::{Pot, Seat};

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 9;

/// Largest starting stack for `players` seats such that every chip on the
/// table still fits one pot.
pub fn max_starting_chips(players: usize) -> u32 {
    u32::try_from(players.max(1)).map_or(0, |n| u32::MAX / n)
}

/// Table settings fixed for the whole match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub starting_chips: u32,
    pub blinds: Blinds,
    /// Charge blinds right after the deal
    pub post_blinds: bool,
    pub raise_accounting: RaiseAccounting,
    pub tie_rule: TieRule,
    pub default_raise: u32,
    pub seed: Option<u64>,
    /// Where the final round record is exported
    pub records_dir: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_chips: STARTING_CHIPS,
            blinds: Blinds::default(),
            post_blinds: false,
            raise_accounting: RaiseAccounting::default(),
            tie_rule: TieRule::default(),
            default_raise: DEFAULT_RAISE,
            seed: None,
            records_dir: PathBuf::from("game_records"),
        }
    }
}

/// Hand lifecycle. Transitions are strictly sequential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    Dealt,
    Flop,
    Turn,
    River,
    Showdown,
    MatchOngoing,
    MatchOver,
}

impl From<Street> for Phase {
    fn from(s: Street) -> Self {
        match s {
            Street::Preflop => Phase::Dealt,
            Street::Flop => Phase::Flop,
            Street::Turn => Phase::Turn,
            Street::River => Phase::River,
        }
    }
}

/// A player joining the match and the provider deciding for them.
pub struct Entrant {
    pub name: String,
    pub model: String,
    pub agent: Box<dyn DecisionProvider>,
}

#[derive(Debug)]
pub struct HandOutcome {
    pub round_id: u32,
    pub betting: Vec<BettingSummary>,
    pub showdown: ShowdownOutcome,
    /// Set once a single player is left (or nobody is)
    pub match_over: bool,
    pub match_winner: Option<String>,
    /// Result of exporting the round record when the match ended
    pub export: Option<Result<PathBuf, GameError>>,
}

/// Owns the roster, the deck, the board, the pot and the round record.
pub struct Game {
    seats: Vec<Seat>,
    deck: Deck,
    community: Vec<Card>,
    pot: Pot,
    record: GameRecord,
    config: GameConfig,
    rules: Arc<str>,
    evaluator: Box<dyn HandEvaluator>,
    parser: Box<dyn ActionParser>,
    history: Option<RoundLogger>,
    phase: Phase,
    round: u32,
    seed: u64,
    first_to_act: usize,
}

impl Game {
    pub fn new(
        config: GameConfig,
        rules: Arc<str>,
        entrants: Vec<Entrant>,
    ) -> Result<Self, GameError> {
        if entrants.len() < MIN_PLAYERS {
            return Err(GameError::TooFewPlayers {
                minimum: MIN_PLAYERS,
                actual: entrants.len(),
            });
        }
        if entrants.len() > MAX_PLAYERS {
            return Err(GameError::TooManyPlayers {
                maximum: MAX_PLAYERS,
                actual: entrants.len(),
            });
        }
        let limit = max_starting_chips(entrants.len());
        if config.starting_chips > limit {
            return Err(GameError::TooManyChips {
                players: entrants.len(),
                chips: config.starting_chips,
                limit,
            });
        }
        let mut seen = HashSet::new();
        for e in &entrants {
            if !seen.insert(e.name.as_str()) {
                return Err(GameError::DuplicatePlayer(e.name.clone()));
            }
        }

        let names: Vec<String> = entrants.iter().map(|e| e.name.clone()).collect();
        let seats = entrants
            .into_iter()
            .map(|e| {
                let mut player = PlayerState::new(e.name, e.model, config.starting_chips);
                player.init_opinions(names.iter().map(String::as_str));
                Seat::new(player, e.agent)
            })
            .collect();

        let seed = config.seed.unwrap_or_else(rand::random);
        let parser = KeywordParser {
            default_raise: config.default_raise,
        };
        Ok(Self {
            seats,
            deck: Deck::new_with_seed(seed),
            community: Vec::with_capacity(5),
            pot: Pot::new(),
            record: GameRecord::new(),
            config,
            rules,
            evaluator: Box::new(StandardEvaluator),
            parser: Box::new(parser),
            history: None,
            phase: Phase::Init,
            round: 0,
            seed,
            first_to_act: 0,
        })
    }

    pub fn with_evaluator(mut self, evaluator: Box<dyn HandEvaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn with_parser(mut self, parser: Box<dyn ActionParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Appends every finished round to a JSONL history.
    pub fn with_history(mut self, logger: RoundLogger) -> Self {
        self.history = Some(logger);
        self
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }
    pub fn player(&self, name: &str) -> Option<&PlayerState> {
        self.seats.iter().map(|s| &s.player).find(|p| p.name() == name)
    }
    pub fn community(&self) -> &[Card] {
        &self.community
    }
    pub fn pot(&self) -> &Pot {
        &self.pot
    }
    pub fn record(&self) -> &GameRecord {
        &self.record
    }
    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn round(&self) -> u32 {
        self.round
    }
    pub fn seed(&self) -> u64 {
        self.seed
    }
    pub fn config(&self) -> &GameConfig {
        &self.config
    }
    pub fn deck_remaining(&self) -> usize {
        self.deck.remaining()
    }

    /// Total chips on the table, pot included. Constant for the whole match.
    pub fn chips_in_play(&self) -> u64 {
        crate::table::chips_in_play(&self.seats, &self.pot)
    }

    pub fn alive_players(&self) -> Vec<&str> {
        self.seats
            .iter()
            .filter(|s| s.player.is_alive())
            .map(|s| s.name())
            .collect()
    }

    /// Plays one hand with a freshly shuffled deck.
    pub fn play_hand(&mut self) -> Result<HandOutcome, GameError> {
        // one independent shuffle per hand, reproducible from the match seed
        let mut deck = Deck::new_with_seed(self.seed.wrapping_add(self.round as u64));
        deck.shuffle();
        self.play_hand_with_deck(deck)
    }

    /// Plays one hand dealing from `deck` as given.
    pub fn play_hand_with_deck(&mut self, deck: Deck) -> Result<HandOutcome, GameError> {
        if self.phase == Phase::MatchOver {
            return Err(GameError::MatchOver);
        }
        self.round += 1;
        self.deck = deck;
        self.community.clear();
        self.phase = Phase::Init;

        match self.run_streets() {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                self.abort_hand(&e);
                Err(e)
            }
        }
    }

    /// Plays hands until the match is decided or `max_hands` were played.
    pub fn play_match(&mut self, max_hands: u32) -> Result<Vec<HandOutcome>, GameError> {
        let mut outcomes = Vec::new();
        while self.phase != Phase::MatchOver && (outcomes.len() as u32) < max_hands {
            outcomes.push(self.play_hand()?);
        }
        Ok(outcomes)
    }

    fn run_streets(&mut self) -> Result<HandOutcome, GameError> {
        // Init -> Dealt
        for seat in self.seats.iter_mut().filter(|s| s.player.is_alive()) {
            let cards = self.deck.deal(2)?;
            seat.player.give_cards([cards[0], cards[1]]);
        }
        let snapshots: Vec<PlayerSnapshot> = self
            .seats
            .iter()
            .filter(|s| s.player.is_alive())
            .map(|s| PlayerSnapshot {
                player_name: s.name().to_string(),
                chips: s.player.chips(),
                hand: s.player.hole_cards().to_vec(),
            })
            .collect();
        let names = snapshots.iter().map(|s| s.player_name.clone()).collect();
        self.record.start_round(self.round, names, snapshots);
        self.phase = Phase::Dealt;
        if self.config.post_blinds {
            self.post_blinds();
        }

        let engine = BettingEngine {
            rules: &self.rules,
            parser: self.parser.as_ref(),
            accounting: self.config.raise_accounting,
        };
        let mut betting = Vec::with_capacity(3);
        for street in [Street::Flop, Street::Turn, Street::River] {
            let cards = self.deck.deal(street.board_size() - self.community.len())?;
            self.community.extend_from_slice(&cards);
            self.record.record(RoundEvent::Deal { street, cards });
            self.phase = Phase::from(street);
            info!(round = self.round, %street, pot = self.pot.total(), "street dealt");
            betting.push(engine.run_betting_round(
                &mut self.seats,
                self.first_to_act,
                street,
                &self.community,
                self.deck.remaining(),
                &mut self.pot,
                &mut self.record,
            ));
        }

        self.phase = Phase::Showdown;
        let resolver = ShowdownResolver {
            evaluator: self.evaluator.as_ref(),
            tie_rule: self.config.tie_rule,
        };
        let showdown =
            resolver.resolve(&mut self.seats, &self.community, &mut self.pot, &mut self.record)?;
        resolver.reflect_all(&mut self.seats, &showdown, &self.rules, &self.record);

        if let (Some(logger), Some(round)) = (&mut self.history, self.record.current()) {
            if let Err(e) = logger.write(round) {
                error!(error = %e, "failed to append round to history");
            }
        }
        self.advance_first_to_act();

        let (match_over, match_winner, export) = self.check_victory();
        Ok(HandOutcome {
            round_id: self.round,
            betting,
            showdown,
            match_over,
            match_winner,
            export,
        })
    }

    /// Ends the match when at most one player is alive and exports the
    /// latest round.
    #[allow(clippy::type_complexity)]
    fn check_victory(&mut self) -> (bool, Option<String>, Option<Result<PathBuf, GameError>>) {
        let alive = self.alive_players();
        if alive.len() > 1 {
            self.phase = Phase::MatchOngoing;
            return (false, None, None);
        }
        let winner = alive.first().map(|s| s.to_string());
        self.phase = Phase::MatchOver;
        let export = self
            .record
            .finish_game(winner.as_deref().unwrap_or("nobody"), &self.config.records_dir)
            .map_err(GameError::from);
        if let Err(e) = &export {
            error!(error = %e, "round record export failed");
        }
        (true, winner, Some(export))
    }

    /// The first actor posts the small blind, the next alive seat the big
    /// blind. Short stacks post what they have.
    fn post_blinds(&mut self) {
        let order = self.alive_order();
        let Blinds { small, big } = self.config.blinds;
        for (&idx, (amount, reason)) in order
            .iter()
            .zip([(small, ForcedReason::SmallBlind), (big, ForcedReason::BigBlind)])
        {
            let seat = &mut self.seats[idx];
            let paid = self.pot.collect(&mut seat.player, amount);
            // dead money, not a bet to be called
            seat.player.start_street();
            info!(player = seat.name(), paid, ?reason, "blind posted");
            self.record.record(RoundEvent::Forced {
                player: seat.name().to_string(),
                reason,
                amount: paid,
            });
        }
    }

    /// Alive seat indices in acting order.
    fn alive_order(&self) -> Vec<usize> {
        let n = self.seats.len();
        (0..n)
            .map(|o| (self.first_to_act + o) % n)
            .filter(|&i| self.seats[i].player.is_alive())
            .collect()
    }

    fn advance_first_to_act(&mut self) {
        let n = self.seats.len();
        if let Some(next) = (1..=n)
            .map(|o| (self.first_to_act + o) % n)
            .find(|&i| self.seats[i].player.is_alive())
        {
            self.first_to_act = next;
        }
    }

    /// Gives every contribution of the current hand back and clears
    /// hand-scoped state. Chips carried in from an earlier hand stay.
    fn abort_hand(&mut self, cause: &GameError) {
        error!(round = self.round, error = %cause, "hand aborted");
        let refunded: u32 = self.seats.iter_mut().map(|s| s.player.refund()).sum();
        let chips = self.pot.take();
        debug_assert!(chips >= refunded, "pot smaller than contributions");
        self.pot.restore(chips.saturating_sub(refunded));
        for seat in &mut self.seats {
            seat.player.reset_for_next_hand();
        }
        self.community.clear();
        // a hand that failed before its round opened leaves older rounds alone
        if self.record.current().is_some_and(|r| r.round_id == self.round) {
            self.record.record_text(format!("hand aborted: {}", cause));
        }
        self.phase = Phase::MatchOngoing;
    }
}
