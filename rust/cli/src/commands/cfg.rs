//! Configuration command handler.
//!
//! Prints every resolved setting with the layer it came from:
//!
//! ```json
//! {
//!   "starting_chips": {
//!     "value": 1000,
//!     "source": "default"
//!   },
//!   ...
//! }
//! ```

use crate::config::{self, ConfigResolved};
use crate::error::CliError;
use serde_json::{Value, json};
use std::io::Write;

pub fn handle_cfg_command(out: &mut dyn Write, _err: &mut dyn Write) -> Result<(), CliError> {
    let resolved = config::load_with_sources()?;
    let json_str =
        serde_json::to_string_pretty(&describe(&resolved)).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}

fn describe(resolved: &ConfigResolved) -> Value {
    let ConfigResolved { config, sources } = resolved;
    json!({
        "starting_chips": { "value": config.starting_chips, "source": sources.starting_chips },
        "small_blind": { "value": config.small_blind, "source": sources.blinds },
        "big_blind": { "value": config.big_blind, "source": sources.blinds },
        "post_blinds": { "value": config.post_blinds, "source": sources.post_blinds },
        "raise_accounting": { "value": config.raise_accounting, "source": sources.raise_accounting },
        "tie_rule": { "value": config.tie_rule, "source": sources.tie_rule },
        "default_raise": { "value": config.default_raise, "source": sources.default_raise },
        "seed": { "value": config.seed, "source": sources.seed },
        "hands": { "value": config.hands, "source": sources.hands },
        "endpoint": { "value": config.endpoint, "source": sources.endpoint },
        // never echo the key itself
        "api_key": { "value": config.api_key.as_ref().map(|_| "<set>"), "source": sources.api_key },
        "timeout_secs": { "value": config.timeout_secs, "source": sources.timeout_secs },
        "prompt_dir": { "value": config.prompt_dir, "source": sources.prompt_dir },
        "records_dir": { "value": config.records_dir, "source": sources.records_dir },
        "history": { "value": config.history, "source": sources.history },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ConfigSources, ValueSource};

    #[test]
    fn api_key_is_masked() {
        let resolved = ConfigResolved {
            config: Config {
                api_key: Some("sk-secret".into()),
                ..Config::default()
            },
            sources: ConfigSources {
                api_key: ValueSource::Env,
                ..ConfigSources::default()
            },
        };
        let v = describe(&resolved);
        assert_eq!(v["api_key"]["value"], "<set>");
        assert_eq!(v["api_key"]["source"], "env");
        assert!(!v.to_string().contains("sk-secret"));
    }

    #[test]
    fn every_value_has_a_source() {
        let resolved = ConfigResolved {
            config: Config::default(),
            sources: ConfigSources::default(),
        };
        let v = describe(&resolved);
        let obj = v.as_object().unwrap();
        assert_eq!(obj.len(), 15);
        for (key, entry) in obj {
            assert_eq!(entry["source"], "default", "{}", key);
        }
        assert_eq!(v["raise_accounting"]["value"], "incremental");
        assert_eq!(v["tie_rule"]["value"], "first_seat");
    }
}
