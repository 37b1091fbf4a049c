use std::fs::{create_dir_all, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::record::RoundRecord;

/// One line of the match history file.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct LoggedRound {
    /// Timestamp when the round was written (RFC3339)
    pub ts: String,
    #[serde(flatten)]
    pub round: RoundRecord,
}

/// Appends finished rounds to a JSONL file, one object per line.
pub struct RoundLogger {
    writer: Option<BufWriter<File>>,
    written: usize,
}

impl RoundLogger {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
            written: 0,
        })
    }

    /// A logger that counts rounds but writes nothing.
    pub fn disabled() -> Self {
        Self {
            writer: None,
            written: 0,
        }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn write(&mut self, round: &RoundRecord) -> std::io::Result<()> {
        let line = serde_json::to_string(&LoggedRound {
            ts: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            round: round.clone(),
        })
        .map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        self.written += 1;
        Ok(())
    }
}
