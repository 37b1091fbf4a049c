//! Card and round-event formatters for terminal narration.
//!
//! Cards use suit symbols when the terminal can render them and fall back
//! to record codes (`AH`, `10S`) otherwise.
//!
//! ## Unicode vs ASCII Fallback
//!
//! On Windows the module checks for a modern terminal (WT_SESSION,
//! TERM_PROGRAM, VSCODE_INJECTION); Unix-like systems are assumed to cope.
//!
//! ## Example
//!
//! ```rust
//! use tablemind_engine::cards::{Card, Rank, Suit};
//! use tablemind_cli::formatters::{format_card, format_board};
//!
//! let ace_spades = Card::new(Rank::Ace, Suit::Spades);
//! assert!(format_card(&ace_spades) == "A♠" || format_card(&ace_spades) == "AS");
//!
//! let board = vec![ace_spades];
//! assert!(format_board(&board).starts_with("[A"));
//! ```

use tablemind_engine::cards::Card;
use tablemind_engine::record::{ForcedReason, RoundEvent};

/// Check if the terminal supports Unicode card symbols.
pub fn supports_unicode() -> bool {
    if cfg!(windows) {
        std::env::var("WT_SESSION").is_ok()
            || std::env::var("TERM_PROGRAM").is_ok()
            || std::env::var("VSCODE_INJECTION").is_ok()
    } else {
        true
    }
}

/// `A♠` with Unicode support, `AS` without.
pub fn format_card(card: &Card) -> String {
    if supports_unicode() {
        card.to_string()
    } else {
        card.code()
    }
}

/// Formatted board string like "[A♠ K♥ Q♦]" or "[]" if empty
pub fn format_board(cards: &[Card]) -> String {
    let formatted: Vec<String> = cards.iter().map(format_card).collect();
    format!("[{}]", formatted.join(" "))
}

fn reason_label(reason: ForcedReason) -> &'static str {
    match reason {
        ForcedReason::SmallBlind => "small blind",
        ForcedReason::BigBlind => "big blind",
        ForcedReason::Eliminated => "eliminated",
    }
}

/// One narration line per round event.
///
/// ```rust
/// use tablemind_engine::record::{RoundEvent, Street};
/// use tablemind_engine::player::PlayerAction;
/// # use tablemind_cli::formatters::format_event;
///
/// let line = format_event(&RoundEvent::Play {
///     player: "ann".into(),
///     street: Street::Turn,
///     action: PlayerAction::Raise(40),
///     paid: 40,
///     pot: 80,
///     current_bet: 40,
///     behavior: "raise 40".into(),
/// });
/// assert_eq!(line, "[turn] ann: raise 40 (paid 40, pot 80)");
/// ```
pub fn format_event(event: &RoundEvent) -> String {
    match event {
        RoundEvent::Deal { street, cards } => {
            format!("--- {} --- {}", street, format_board(cards))
        }
        RoundEvent::Play {
            player,
            street,
            action,
            paid,
            pot,
            ..
        } => format!("[{}] {}: {} (paid {}, pot {})", street, player, action, paid, pot),
        RoundEvent::Showdown {
            entries,
            winners,
            pot,
            note,
        } => {
            let mut lines: Vec<String> = entries
                .iter()
                .map(|e| {
                    format!(
                        "  {} shows {} ({})",
                        e.player,
                        format_board(&e.hand),
                        e.category.name()
                    )
                })
                .collect();
            let verdict = if winners.is_empty() {
                format!("Showdown: nobody wins, pot {} carries over", pot)
            } else {
                format!("Showdown: {} win(s) pot {}", winners.join(", "), pot)
            };
            lines.insert(0, verdict);
            if let Some(note) = note {
                lines.push(format!("  ({})", note));
            }
            lines.join("\n")
        }
        RoundEvent::Forced {
            player,
            reason,
            amount,
        } => match reason {
            ForcedReason::Eliminated => format!("{} is eliminated", player),
            _ => format!("{} posts {} of {}", player, reason_label(*reason), amount),
        },
        RoundEvent::Text { text } => format!("* {}", text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablemind_engine::cards::{Rank, Suit};

    #[test]
    fn test_format_card() {
        let ten = Card::new(Rank::Ten, Suit::Hearts);
        let formatted = format_card(&ten);
        assert!(formatted == "10♥" || formatted == "10H");
    }

    #[test]
    fn test_format_board_empty() {
        assert_eq!(format_board(&[]), "[]");
    }

    #[test]
    fn test_format_board_with_cards() {
        let board = vec![
            Card::new(Rank::Ace, Suit::Spades),
            Card::new(Rank::King, Suit::Hearts),
        ];
        let formatted = format_board(&board);
        assert!(formatted.starts_with("[A"));
        assert!(formatted.contains(" K"));
        assert!(formatted.ends_with(']'));
    }

    #[test]
    fn blinds_and_eliminations_read_naturally() {
        let blind = RoundEvent::Forced {
            player: "bob".into(),
            reason: ForcedReason::BigBlind,
            amount: 20,
        };
        assert_eq!(format_event(&blind), "bob posts big blind of 20");
        let out = RoundEvent::Forced {
            player: "bob".into(),
            reason: ForcedReason::Eliminated,
            amount: 0,
        };
        assert_eq!(format_event(&out), "bob is eliminated");
    }

    #[test]
    fn empty_showdown_reports_carry_over() {
        let e = RoundEvent::Showdown {
            entries: vec![],
            winners: vec![],
            pot: 60,
            note: None,
        };
        assert_eq!(
            format_event(&e),
            "Showdown: nobody wins, pot 60 carries over"
        );
    }
}
