//! Prompt templates.
//!
//! Three plain-text files live in the prompt directory: `rule.txt`,
//! `action_prompt_template.txt` and `reflect_prompt_template.txt`. Templates
//! use `{key}` placeholders; unknown keys are left as written. A missing file
//! falls back to the built-in text.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use tablemind_engine::cards::format_cards;
use tablemind_engine::decision::{ActionContext, ReflectContext};

pub const RULES_FILE: &str = "rule.txt";
pub const ACTION_FILE: &str = "action_prompt_template.txt";
pub const REFLECT_FILE: &str = "reflect_prompt_template.txt";

const DEFAULT_RULES: &str = "\
Texas Hold'em, 2 to 9 players, one 52-card deck. Every player gets two hole
cards. Three community cards are dealt (flop), then a fourth (turn) and a
fifth (river). After each deal every player still in the hand acts once:
fold, check, call, or raise N (raise the table bet by N chips). The best
five-card hand out of hole cards plus board wins the pot. A player with no
chips left is eliminated; the last player standing wins the match.";

const DEFAULT_ACTION: &str = "\
{rules}

You are {player}. Street: {street}.
Your hand: {hand}
Community cards: {community_cards}
Table bet: {current_bet}. You already put in {own_bet}; calling costs {call_amount}.
Pot: {pot}. Your chips: {chips}.
What you think of the other players:
{opinions}

Answer with exactly one of: fold, check, call, raise <amount>.";

const DEFAULT_REFLECT: &str = "\
{rules}

You are {self_name}. The hand is over.
{round_base_info}
What happened:
{round_action_info}
Result: {round_result}

Your previous opinion of {player}: {previous_opinion}
Write your updated opinion of {player}'s playing style in two sentences or fewer.";

#[derive(Debug, Error)]
#[error("failed to read prompt template {path}: {source}")]
pub struct TemplateError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Loaded once per match and shared by every chat player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplates {
    pub rules: String,
    pub action: String,
    pub reflect: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            rules: DEFAULT_RULES.to_string(),
            action: DEFAULT_ACTION.to_string(),
            reflect: DEFAULT_REFLECT.to_string(),
        }
    }
}

impl PromptTemplates {
    pub fn load(dir: &Path) -> Result<Self, TemplateError> {
        let defaults = Self::default();
        Ok(Self {
            rules: read_or(dir.join(RULES_FILE), defaults.rules)?,
            action: read_or(dir.join(ACTION_FILE), defaults.action)?,
            reflect: read_or(dir.join(REFLECT_FILE), defaults.reflect)?,
        })
    }

    pub fn action_prompt(&self, ctx: &ActionContext<'_>) -> String {
        let opinions = if ctx.opinions.is_empty() {
            "(none)".to_string()
        } else {
            ctx.opinions
                .iter()
                .map(|(name, text)| format!("- {}: {}", name, text))
                .collect::<Vec<_>>()
                .join("\n")
        };
        render(
            &self.action,
            &[
                ("rules", ctx.rules),
                ("player", ctx.player),
                ("street", &ctx.street.to_string()),
                ("hand", &format_cards(ctx.hand)),
                ("community_cards", &format_cards(ctx.community)),
                ("current_bet", &ctx.current_bet.to_string()),
                ("own_bet", &ctx.own_bet.to_string()),
                ("call_amount", &ctx.call_amount.to_string()),
                ("pot", &ctx.pot.to_string()),
                ("chips", &ctx.chips.to_string()),
                ("opinions", &opinions),
            ],
        )
    }

    pub fn reflect_prompt(&self, ctx: &ReflectContext<'_>) -> String {
        render(
            &self.reflect,
            &[
                ("rules", ctx.rules),
                ("self_name", ctx.self_name),
                ("player", ctx.subject),
                ("alive_players", &ctx.alive_players.join(", ")),
                ("round_base_info", ctx.round_info),
                ("round_action_info", ctx.round_actions),
                ("round_result", ctx.round_result),
                ("previous_opinion", ctx.previous_opinion),
            ],
        )
    }
}

fn read_or(path: PathBuf, default: String) -> Result<String, TemplateError> {
    match fs::read_to_string(&path) {
        Ok(text) => {
            debug!(path = %path.display(), "prompt template loaded");
            Ok(text)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "prompt template missing, using built-in");
            Ok(default)
        }
        Err(source) => Err(TemplateError { path, source }),
    }
}

/// Substitutes `{key}` placeholders in one pass. Substituted values are not
/// scanned again.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let value = tail.find('}').and_then(|close| {
            let key = &tail[1..close];
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, close))
        });
        match value {
            Some((v, close)) => {
                out.push_str(v);
                rest = &tail[close + 1..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tablemind_engine::cards::Card;
    use tablemind_engine::record::Street;

    #[test]
    fn render_replaces_known_keys_once() {
        let out = render("{a} and {b} and {c}", &[("a", "{b}"), ("b", "two")]);
        assert_eq!(out, "{b} and two and {c}");
    }

    #[test]
    fn render_keeps_lone_braces() {
        assert_eq!(render("x { y", &[("y", "z")]), "x { y");
    }

    #[test]
    fn missing_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(RULES_FILE), "house rules").unwrap();
        let t = PromptTemplates::load(dir.path()).unwrap();
        assert_eq!(t.rules, "house rules");
        assert_eq!(t.action, PromptTemplates::default().action);
    }

    #[test]
    fn action_prompt_shows_table_state() {
        let hand: Vec<Card> = vec!["AH".parse().unwrap(), "10S".parse().unwrap()];
        let mut opinions = BTreeMap::new();
        opinions.insert("bob".to_string(), "bluffs".to_string());
        let ctx = ActionContext {
            rules: "R",
            player: "ann",
            hand: &hand,
            community: &[],
            street: Street::Flop,
            deck_remaining: 45,
            pot: 120,
            current_bet: 40,
            own_bet: 10,
            call_amount: 30,
            chips: 900,
            opinions: &opinions,
        };
        let text = PromptTemplates::default().action_prompt(&ctx);
        assert!(text.starts_with("R\n"));
        assert!(text.contains("[A♥, 10♠]"));
        assert!(text.contains("calling costs 30"));
        assert!(text.contains("- bob: bluffs"));
    }
}
