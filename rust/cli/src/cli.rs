use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tablemind_engine::rules::RaiseAccounting;

#[derive(Parser, Debug)]
#[command(
    name = "tablemind",
    version,
    about = "Texas Hold'em arena for language-model players"
)]
pub struct TablemindCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play a match between model-driven players
    Play(PlayArgs),
    /// Print the resolved configuration and where each value came from
    Cfg,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PlayArgs {
    /// Seat a player as NAME=MODEL; repeat once per seat (2 to 9).
    /// MODEL is a chat model id, `baseline`, or `scripted:<reply>,<reply>,...`
    #[arg(long = "player", value_name = "NAME=MODEL", required = true, value_parser = parse_player)]
    pub players: Vec<PlayerSpec>,
    /// Hands to play at most
    #[arg(long)]
    pub hands: Option<u32>,
    #[arg(long)]
    pub seed: Option<u64>,
    /// Starting chips per player
    #[arg(long)]
    pub chips: Option<u32>,
    /// Post small and big blinds after the deal
    #[arg(long)]
    pub blinds: bool,
    #[arg(long, value_enum)]
    pub raise_accounting: Option<RaiseMode>,
    /// Split tied pots instead of paying the first tied seat
    #[arg(long)]
    pub split_ties: bool,
    #[arg(long)]
    pub prompt_dir: Option<PathBuf>,
    /// Where the final round record is exported
    #[arg(long)]
    pub records_dir: Option<PathBuf>,
    /// Append every finished round to this JSONL file
    #[arg(long)]
    pub history: Option<PathBuf>,
    /// Chat endpoint base URL
    #[arg(long)]
    pub endpoint: Option<String>,
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSpec {
    pub name: String,
    pub model: String,
}

fn parse_player(s: &str) -> Result<PlayerSpec, String> {
    let (name, model) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=MODEL, got '{}'", s))?;
    let (name, model) = (name.trim(), model.trim());
    if name.is_empty() || model.is_empty() {
        return Err(format!("expected NAME=MODEL, got '{}'", s));
    }
    Ok(PlayerSpec {
        name: name.to_string(),
        model: model.to_string(),
    })
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum RaiseMode {
    Legacy,
    Incremental,
}

impl From<RaiseMode> for RaiseAccounting {
    fn from(mode: RaiseMode) -> Self {
        match mode {
            RaiseMode::Legacy => RaiseAccounting::Legacy,
            RaiseMode::Incremental => RaiseAccounting::Incremental,
        }
    }
}
