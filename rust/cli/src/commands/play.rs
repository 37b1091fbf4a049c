//! # Play Command
//!
//! Seats the `--player` roster, plays up to `hands` hands and narrates each
//! one from its round record: the deal, every decision, the showdown and
//! the opinions players formed afterwards. When a single player is left the
//! final round record is exported and its path printed.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use tablemind_ai::create_provider;
use tablemind_ai::prompt::PromptTemplates;
use tablemind_engine::game::{Entrant, Game, HandOutcome, Phase};
use tablemind_engine::logger::RoundLogger;
use tablemind_engine::player::NO_OBSERVATION;
use tracing::info;

use crate::cli::PlayArgs;
use crate::config::{self, Config};
use crate::error::CliError;
use crate::formatters::{format_board, format_event};
use crate::ui;

pub fn handle_play_command(
    args: &PlayArgs,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let cfg = config::load_for_play(args)?.config;
    let templates = Arc::new(load_templates(&cfg.prompt_dir, err)?);
    let mut game = seat_players(args, &cfg, &templates)?;
    if let Some(path) = &cfg.history {
        game = game.with_history(RoundLogger::create(path)?);
    }

    writeln!(
        out,
        "play: players={} hands={} seed={}",
        game.seats().len(),
        cfg.hands,
        game.seed()
    )?;
    for (i, seat) in game.seats().iter().enumerate() {
        writeln!(
            out,
            "Seat {}: {} ({}) {} chips",
            i + 1,
            seat.name(),
            seat.player.model(),
            seat.player.chips()
        )?;
    }

    let mut played = 0u32;
    while played < cfg.hands && game.phase() != Phase::MatchOver {
        writeln!(out, "{}", ui::hand_banner(game.round() + 1))?;
        let outcome = game.play_hand()?;
        played += 1;
        narrate_hand(&game, &outcome, out, err)?;
    }

    writeln!(out, "Hands played: {}", played)?;
    let mut standings: Vec<(&str, u32)> = game
        .seats()
        .iter()
        .map(|s| (s.name(), s.player.chips()))
        .collect();
    standings.sort_by(|a, b| b.1.cmp(&a.1));
    for (name, chips) in standings {
        writeln!(out, "  {}: {}", name, chips)?;
    }
    info!(hands = played, phase = ?game.phase(), "session finished");
    Ok(())
}

/// A missing prompt directory is not an error; the built-in texts apply.
fn load_templates(dir: &Path, err: &mut dyn Write) -> Result<PromptTemplates, CliError> {
    if !dir.is_dir() {
        ui::display_warning(
            err,
            &format!(
                "prompt directory {} not found, using built-in prompts",
                dir.display()
            ),
        )?;
        return Ok(PromptTemplates::default());
    }
    Ok(PromptTemplates::load(dir)?)
}

fn seat_players(
    args: &PlayArgs,
    cfg: &Config,
    templates: &Arc<PromptTemplates>,
) -> Result<Game, CliError> {
    let settings = cfg.chat_settings();
    let entrants = args
        .players
        .iter()
        .map(|p| {
            let agent = create_provider(&p.model, templates, &settings)?;
            Ok(Entrant {
                name: p.name.clone(),
                model: p.model.clone(),
                agent,
            })
        })
        .collect::<Result<Vec<_>, CliError>>()?;
    let rules: Arc<str> = Arc::from(templates.rules.as_str());
    Ok(Game::new(cfg.game_config(), rules, entrants)?)
}

fn narrate_hand(
    game: &Game,
    outcome: &HandOutcome,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if let Some(round) = game.record().current() {
        for seat in game.seats() {
            if let Some(snap) = round
                .initial_states
                .iter()
                .find(|s| s.player_name == seat.name())
            {
                writeln!(out, "{} holds {}", snap.player_name, format_board(&snap.hand))?;
            }
        }
        for event in &round.actions {
            writeln!(out, "{}", format_event(event))?;
        }
    }
    if let Some(reply) = game.record().latest_play_behavior().filter(|r| !r.is_empty()) {
        writeln!(out, "Last reply: {:?}", reply)?;
    }

    for seat in game.seats().iter().filter(|s| s.player.is_alive()) {
        for (other, opinion) in seat.player.opinions() {
            if opinion != NO_OBSERVATION {
                writeln!(out, "{} on {}: {}", seat.name(), other, opinion)?;
            }
        }
    }
    for seat in game.seats() {
        writeln!(out, "{}", seat.player.status_line())?;
    }

    if outcome.match_over {
        match &outcome.match_winner {
            Some(winner) => writeln!(out, "Match over: {} wins", winner)?,
            None => writeln!(out, "Match over: nobody left standing")?,
        }
        match &outcome.export {
            Some(Ok(path)) => writeln!(out, "Round record exported to {}", path.display())?,
            Some(Err(e)) => ui::display_warning(err, &format!("export failed: {}", e))?,
            None => {}
        }
    }
    Ok(())
}
