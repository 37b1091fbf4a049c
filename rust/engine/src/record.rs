//! Per-hand event log.
//!
//! A [`GameRecord`] holds the round being played. Events are appended and
//! never edited. When the match ends the latest round is exported as a JSON
//! document; earlier rounds survive only through the optional JSONL history
//! (see [`crate::logger::RoundLogger`]).

use std::fmt;
use std::fs::{create_dir_all, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::cards::{format_cards, Card};
use crate::errors::RecordError;
use crate::hand::Category;
use crate::player::PlayerAction;

/// Betting street in Texas Hold'em.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Street {
    /// Hole cards dealt, no board yet
    Preflop,
    /// 3 community cards
    Flop,
    /// 4th community card
    Turn,
    /// 5th community card
    River,
}

impl Street {
    /// Community cards on the table once this street is dealt.
    pub fn board_size(self) -> usize {
        match self {
            Street::Preflop => 0,
            Street::Flop => 3,
            Street::Turn => 4,
            Street::River => 5,
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Street::Preflop => "preflop",
            Street::Flop => "flop",
            Street::Turn => "turn",
            Street::River => "river",
        };
        f.write_str(s)
    }
}

/// Chips and hole cards of a player when the round started.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub player_name: String,
    pub chips: u32,
    pub hand: Vec<Card>,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ShowdownEntry {
    pub player: String,
    pub hand: Vec<Card>,
    pub score: u32,
    pub category: Category,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForcedReason {
    SmallBlind,
    BigBlind,
    Eliminated,
}

/// One entry of the round log, tagged by `type` in exports.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RoundEvent {
    Deal {
        street: Street,
        cards: Vec<Card>,
    },
    Play {
        player: String,
        street: Street,
        action: PlayerAction,
        /// Chips that actually left the player's stack
        paid: u32,
        pot: u32,
        current_bet: u32,
        /// Raw reply the action was parsed from
        behavior: String,
    },
    /// Hands are revealed and the pot is adjudicated.
    #[serde(rename = "challenge")]
    Showdown {
        entries: Vec<ShowdownEntry>,
        winners: Vec<String>,
        pot: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },
    /// Chips or status taken by the rules rather than by a decision.
    #[serde(rename = "penalty")]
    Forced {
        player: String,
        reason: ForcedReason,
        amount: u32,
    },
    Text {
        text: String,
    },
}

/// Everything that happened in one hand.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round_id: u32,
    pub players: Vec<String>,
    pub initial_states: Vec<PlayerSnapshot>,
    pub actions: Vec<RoundEvent>,
}

impl RoundRecord {
    pub fn plays(&self) -> impl Iterator<Item = &RoundEvent> {
        self.actions
            .iter()
            .filter(|e| matches!(e, RoundEvent::Play { .. }))
    }

    pub fn showdown(&self) -> Option<&RoundEvent> {
        self.actions
            .iter()
            .find(|e| matches!(e, RoundEvent::Showdown { .. }))
    }
}

#[derive(Debug, Default)]
pub struct GameRecord {
    current: Option<RoundRecord>,
}

impl GameRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a fresh round and hands back the one it replaces.
    pub fn start_round(
        &mut self,
        round_id: u32,
        players: Vec<String>,
        initial_states: Vec<PlayerSnapshot>,
    ) -> Option<RoundRecord> {
        tracing::info!(round_id, players = ?players, "round started");
        self.current.replace(RoundRecord {
            round_id,
            players,
            initial_states,
            actions: Vec::new(),
        })
    }

    pub fn current(&self) -> Option<&RoundRecord> {
        self.current.as_ref()
    }

    /// Appends to the active round. Without one the event is dropped.
    pub fn record(&mut self, event: RoundEvent) {
        match &mut self.current {
            Some(round) => round.actions.push(event),
            None => tracing::warn!(?event, "no active round, event dropped"),
        }
    }

    pub fn record_text(&mut self, text: impl Into<String>) {
        self.record(RoundEvent::Text { text: text.into() });
    }

    /// One-line description of the active round.
    pub fn round_info(&self) -> String {
        match &self.current {
            Some(r) => format!("Round {}, players: {}", r.round_id, r.players.join(", ")),
            None => "No round in progress".to_string(),
        }
    }

    /// Public history of the active round as seen by `for_player`, one line
    /// per event. The viewer's own entries are marked.
    pub fn round_actions(&self, for_player: &str) -> String {
        let Some(round) = &self.current else {
            return String::new();
        };
        let who = |name: &str| {
            if name == for_player {
                format!("{} (you)", name)
            } else {
                name.to_string()
            }
        };
        let mut lines = Vec::new();
        for event in &round.actions {
            match event {
                RoundEvent::Deal { street, cards } => {
                    lines.push(format!("{} dealt: {}", street, format_cards(cards)));
                }
                RoundEvent::Play {
                    player,
                    street,
                    action,
                    paid,
                    pot,
                    ..
                } => {
                    lines.push(format!(
                        "[{}] {} {} (paid {}, pot {})",
                        street,
                        who(player),
                        action,
                        paid,
                        pot
                    ));
                }
                RoundEvent::Showdown {
                    entries, winners, ..
                } => {
                    for e in entries {
                        lines.push(format!(
                            "showdown: {} shows {} ({})",
                            who(&e.player),
                            format_cards(&e.hand),
                            e.category.name()
                        ));
                    }
                    if !winners.is_empty() {
                        lines.push(format!("winner: {}", winners.join(", ")));
                    }
                }
                RoundEvent::Forced {
                    player,
                    reason,
                    amount,
                } => {
                    let what = match reason {
                        ForcedReason::SmallBlind => format!("posts small blind {}", amount),
                        ForcedReason::BigBlind => format!("posts big blind {}", amount),
                        ForcedReason::Eliminated => "is eliminated".to_string(),
                    };
                    lines.push(format!("{} {}", who(player), what));
                }
                RoundEvent::Text { .. } => {}
            }
        }
        lines.join("\n")
    }

    /// Raw reply behind the most recent play, if any.
    pub fn latest_play_behavior(&self) -> Option<&str> {
        self.current.as_ref()?.actions.iter().rev().find_map(|e| match e {
            RoundEvent::Play { behavior, .. } => Some(behavior.as_str()),
            _ => None,
        })
    }

    /// Closes the match and exports the latest round into `dir`.
    pub fn finish_game(&mut self, winner: &str, dir: &Path) -> Result<PathBuf, RecordError> {
        tracing::info!(winner, "match finished");
        self.export_to_json(dir)
    }

    /// Writes the active round to `dir/game_record_<timestamp>.json`. A name
    /// that is already taken gets a numeric suffix; no file is overwritten.
    pub fn export_to_json(&self, dir: &Path) -> Result<PathBuf, RecordError> {
        let round = self.current.as_ref().ok_or(RecordError::NoRound)?;
        create_dir_all(dir)?;
        let stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        for attempt in 0..1000u32 {
            let name = if attempt == 0 {
                format!("game_record_{}.json", stamp)
            } else {
                format!("game_record_{}_{}.json", stamp, attempt)
            };
            let path = dir.join(name);
            let file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(f) => f,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };
            let mut w = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut w, round)?;
            w.write_all(b"\n")?;
            w.flush()?;
            tracing::info!(path = %path.display(), "round record exported");
            return Ok(path);
        }
        Err(RecordError::NameExhausted(stamp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GameRecord {
        let mut rec = GameRecord::new();
        rec.start_round(1, vec!["ann".into(), "bob".into()], vec![]);
        rec.record(RoundEvent::Play {
            player: "ann".into(),
            street: Street::Flop,
            action: PlayerAction::Raise(40),
            paid: 40,
            pot: 40,
            current_bet: 40,
            behavior: "raise 40".into(),
        });
        rec.record_text("bob: provider timed out");
        rec.record(RoundEvent::Play {
            player: "bob".into(),
            street: Street::Flop,
            action: PlayerAction::Check,
            paid: 0,
            pot: 40,
            current_bet: 40,
            behavior: String::new(),
        });
        rec
    }

    #[test]
    fn round_info_lists_players() {
        assert_eq!(sample().round_info(), "Round 1, players: ann, bob");
        assert_eq!(GameRecord::new().round_info(), "No round in progress");
    }

    #[test]
    fn round_actions_marks_viewer_and_skips_text() {
        let text = sample().round_actions("bob");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "[flop] ann raise 40 (paid 40, pot 40)");
        assert_eq!(lines[1], "[flop] bob (you) check (paid 0, pot 40)");
    }

    #[test]
    fn latest_behavior_is_last_play() {
        assert_eq!(sample().latest_play_behavior(), Some(""));
        assert_eq!(GameRecord::new().latest_play_behavior(), None);
    }

    #[test]
    fn events_are_tagged_by_type() {
        let v = serde_json::to_value(RoundEvent::Forced {
            player: "ann".into(),
            reason: ForcedReason::BigBlind,
            amount: 20,
        })
        .unwrap();
        assert_eq!(v["type"], "penalty");
        assert_eq!(v["reason"], "big_blind");
        let v = serde_json::to_value(RoundEvent::Showdown {
            entries: vec![],
            winners: vec!["ann".into()],
            pot: 10,
            note: None,
        })
        .unwrap();
        assert_eq!(v["type"], "challenge");
        assert!(v.get("note").is_none());
    }

    #[test]
    fn starting_a_round_returns_the_previous_one() {
        let mut rec = sample();
        let prev = rec.start_round(2, vec!["ann".into()], vec![]).unwrap();
        assert_eq!(prev.round_id, 1);
        assert_eq!(prev.plays().count(), 2);
        assert!(rec.current().unwrap().actions.is_empty());
    }

    #[test]
    fn export_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("records");
        let rec = sample();
        let a = rec.export_to_json(&out).unwrap();
        let b = rec.export_to_json(&out).unwrap();
        assert_ne!(a, b);
        let back: RoundRecord =
            serde_json::from_str(&std::fs::read_to_string(&a).unwrap()).unwrap();
        assert_eq!(&back, rec.current().unwrap());
    }

    #[test]
    fn export_without_round_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            GameRecord::new().export_to_json(dir.path()),
            Err(RecordError::NoRound)
        ));
    }
}
