//! # Tablemind CLI Library
//!
//! Command-line front end for the tablemind engine: seats model-driven
//! players at a Hold'em table, narrates each hand and exports the final
//! round record.
//!
//! ## Main Entry Point
//!
//! The primary entry point is the [`run`] function, which parses command-line
//! arguments and executes the appropriate subcommand.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::io;
//! let args = vec![
//!     "tablemind", "play",
//!     "--player", "ann=baseline",
//!     "--player", "bob=qwen2.5:7b",
//!     "--hands", "10",
//! ];
//! let code = tablemind_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `play`: Play a match between model-driven players
//! - `cfg`: Display the resolved configuration and its sources

use clap::Parser;
use std::io::Write;
pub mod cli;
mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod formatters;
pub mod logging;
pub mod ui;

use cli::{Commands, TablemindCli};
use commands::{handle_cfg_command, handle_play_command};

pub use error::CliError;

const COMMANDS: &[&str] = &["play", "cfg"];

/// Parses `args` and runs the chosen subcommand.
///
/// Returns [`exit_code::SUCCESS`] or [`exit_code::ERROR`]. Help and version
/// output go to `out` and count as success.
///
/// ```
/// use std::io;
/// let args = vec![
///     "tablemind", "play",
///     "--player", "ann=scripted:call,check,check",
///     "--player", "bob=scripted:check,check,check",
///     "--seed", "7",
///     "--records-dir", "target/doc-records",
/// ];
/// let code = tablemind_cli::run(args, &mut io::sink(), &mut io::sink());
/// assert_eq!(code, 0);
/// ```
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match TablemindCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => return report_usage(e, out, err),
    };
    let result = match cli.cmd {
        Commands::Play(args) => handle_play_command(&args, out, err),
        Commands::Cfg => handle_cfg_command(out, err),
    };
    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            let _ = ui::write_error(err, &e.to_string());
            exit_code::ERROR
        }
    }
}

fn report_usage(e: clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    use clap::error::ErrorKind;

    // Help and version should print to stdout and exit 0
    if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        return match write!(out, "{}", e) {
            Ok(()) => exit_code::SUCCESS,
            Err(_) => exit_code::ERROR,
        };
    }
    let _ = write_usage(&e, err);
    exit_code::ERROR
}

fn write_usage(e: &clap::Error, err: &mut dyn Write) -> std::io::Result<()> {
    writeln!(err, "{}", e)?;
    writeln!(err)?;
    writeln!(err, "Tablemind Hold'em CLI")?;
    writeln!(err, "Usage: tablemind <command> [options]\n")?;
    writeln!(err, "Commands:")?;
    for c in COMMANDS {
        writeln!(err, "  {}", c)?;
    }
    writeln!(err, "\nFor full help, run: tablemind --help")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_capture(args: &[&str]) -> (i32, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = run(args.iter().copied(), &mut out, &mut err);
        (
            code,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn help_goes_to_stdout() {
        let (code, out, _) = run_capture(&["tablemind", "--help"]);
        assert_eq!(code, 0);
        assert!(out.contains("play"));
        assert!(out.contains("cfg"));
    }

    #[test]
    fn unknown_command_lists_commands() {
        let (code, _, err) = run_capture(&["tablemind", "deal"]);
        assert_eq!(code, 2);
        assert!(err.contains("Commands:"));
        assert!(err.contains("  play"));
    }
}
