//! Command handler modules for the tablemind CLI.
//!
//! Each command lives in its own file and exposes
//! `pub fn handle_COMMAND_command(...) -> Result<(), CliError>` taking the
//! output streams as `&mut dyn Write`.

mod cfg;
mod play;

pub use cfg::handle_cfg_command;
pub use play::handle_play_command;
