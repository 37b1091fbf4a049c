//! The seam between the engine and whatever produces decisions.
//!
//! A [`DecisionProvider`] answers in free text; an [`ActionParser`] turns the
//! text into a [`PlayerAction`]. Neither step can fail a hand: provider
//! errors and unreadable replies fall back to `check`.

use std::collections::BTreeMap;
use std::time::Duration;

use thiserror::Error;

use crate::cards::Card;
use crate::player::PlayerAction;
use crate::record::Street;

/// Raise size used when a reply says "raise" without a usable amount.
pub const DEFAULT_RAISE: u32 = 50;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("decision timed out after {0:?}")]
    Timeout(Duration),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("service answered with status {0}")]
    Status(u16),
    #[error("malformed reply: {0}")]
    Malformed(String),
    #[error("no scripted reply left")]
    Exhausted,
}

/// What a player sees when asked to act.
#[derive(Debug, Clone)]
pub struct ActionContext<'a> {
    pub rules: &'a str,
    pub player: &'a str,
    pub hand: &'a [Card],
    pub community: &'a [Card],
    pub street: Street,
    /// Cards left in the deck after this street was dealt
    pub deck_remaining: usize,
    pub pot: u32,
    pub current_bet: u32,
    pub own_bet: u32,
    pub call_amount: u32,
    pub chips: u32,
    pub opinions: &'a BTreeMap<String, String>,
}

/// What a player sees when reflecting on one opponent after a showdown.
#[derive(Debug, Clone)]
pub struct ReflectContext<'a> {
    pub rules: &'a str,
    pub self_name: &'a str,
    pub subject: &'a str,
    pub alive_players: &'a [String],
    pub round_info: &'a str,
    pub round_actions: &'a str,
    pub round_result: &'a str,
    pub previous_opinion: &'a str,
}

/// External decision maker for one seat.
pub trait DecisionProvider: Send + Sync {
    /// Free-text betting decision, e.g. `"I will raise 40"`.
    fn decide(&self, ctx: &ActionContext<'_>) -> Result<String, ProviderError>;

    /// Free-text opinion of `ctx.subject`, stored verbatim.
    fn reflect(&self, ctx: &ReflectContext<'_>) -> Result<String, ProviderError>;

    fn name(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAction {
    pub action: PlayerAction,
    /// Set when the parser had to substitute a default
    pub fallback: Option<String>,
}

impl ParsedAction {
    fn exact(action: PlayerAction) -> Self {
        Self {
            action,
            fallback: None,
        }
    }
}

pub trait ActionParser: Send + Sync {
    fn parse(&self, reply: &str) -> ParsedAction;
}

/// Substring classifier. Keywords are tried in the order fold, check, call,
/// raise; the first one present wins. Anything else is a check.
#[derive(Debug, Clone)]
pub struct KeywordParser {
    pub default_raise: u32,
}

impl Default for KeywordParser {
    fn default() -> Self {
        Self {
            default_raise: DEFAULT_RAISE,
        }
    }
}

impl ActionParser for KeywordParser {
    fn parse(&self, reply: &str) -> ParsedAction {
        let text = reply.to_lowercase();
        if text.contains("fold") {
            return ParsedAction::exact(PlayerAction::Fold);
        }
        if text.contains("check") {
            return ParsedAction::exact(PlayerAction::Check);
        }
        if text.contains("call") {
            return ParsedAction::exact(PlayerAction::Call);
        }
        if let Some(idx) = text.find("raise") {
            return match raise_amount(&text[idx + "raise".len()..]) {
                Some(n) => ParsedAction::exact(PlayerAction::Raise(n)),
                None => ParsedAction {
                    action: PlayerAction::Raise(self.default_raise),
                    fallback: Some(format!(
                        "raise without amount, using {}",
                        self.default_raise
                    )),
                },
            };
        }
        ParsedAction {
            action: PlayerAction::Check,
            fallback: Some("unrecognized reply, checking".to_string()),
        }
    }
}

/// Digits right after the keyword, optional whitespace in between.
fn raise_amount(rest: &str) -> Option<u32> {
    let digits: String = rest
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok().filter(|&n| n > 0)
}
