//! Small helpers for consistent stderr output across commands.

use std::io::Write;

pub fn write_error(err: &mut dyn Write, msg: &str) -> std::io::Result<()> {
    writeln!(err, "Error: {}", msg)
}

/// Display a warning message to stderr with "WARNING:" prefix
pub fn display_warning(err: &mut dyn Write, message: &str) -> std::io::Result<()> {
    writeln!(err, "WARNING: {}", message)
}

/// Horizontal rule printed between hands.
pub fn hand_banner(round: u32) -> String {
    format!("===== Hand {} =====", round)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_are_prefixed() {
        let mut buf = Vec::new();
        display_warning(&mut buf, "no prompt directory").unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "WARNING: no prompt directory\n");
    }
}
