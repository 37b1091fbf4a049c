use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tablemind_ai::chat::{ChatSettings, DEFAULT_ENDPOINT};
use tablemind_engine::game::{max_starting_chips, GameConfig, MIN_PLAYERS};
use tablemind_engine::player::STARTING_CHIPS;
use tablemind_engine::rules::{Blinds, RaiseAccounting, TieRule};

use crate::cli::PlayArgs;

pub const CONFIG_ENV: &str = "TABLEMIND_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub starting_chips: u32,
    pub small_blind: u32,
    pub big_blind: u32,
    pub post_blinds: bool,
    pub raise_accounting: RaiseAccounting,
    pub tie_rule: TieRule,
    pub default_raise: u32,
    pub seed: Option<u64>,
    pub hands: u32,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub prompt_dir: PathBuf,
    pub records_dir: PathBuf,
    pub history: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let game = GameConfig::default();
        Self {
            starting_chips: STARTING_CHIPS,
            small_blind: game.blinds.small,
            big_blind: game.blinds.big,
            post_blinds: game.post_blinds,
            raise_accounting: game.raise_accounting,
            tie_rule: game.tie_rule,
            default_raise: game.default_raise,
            seed: None,
            hands: 1,
            endpoint: DEFAULT_ENDPOINT.into(),
            api_key: None,
            timeout_secs: 60,
            prompt_dir: PathBuf::from("prompt"),
            records_dir: game.records_dir,
            history: None,
        }
    }
}

impl Config {
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            starting_chips: self.starting_chips,
            blinds: Blinds {
                small: self.small_blind,
                big: self.big_blind,
            },
            post_blinds: self.post_blinds,
            raise_accounting: self.raise_accounting,
            tie_rule: self.tie_rule,
            default_raise: self.default_raise,
            seed: self.seed,
            records_dir: self.records_dir.clone(),
        }
    }

    pub fn chat_settings(&self) -> ChatSettings {
        ChatSettings {
            endpoint: self.endpoint.clone(),
            api_key: self.api_key.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
    Flag,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub starting_chips: ValueSource,
    pub blinds: ValueSource,
    pub post_blinds: ValueSource,
    pub raise_accounting: ValueSource,
    pub tie_rule: ValueSource,
    pub default_raise: ValueSource,
    pub seed: ValueSource,
    pub hands: ValueSource,
    pub endpoint: ValueSource,
    pub api_key: ValueSource,
    pub timeout_secs: ValueSource,
    pub prompt_dir: ValueSource,
    pub records_dir: ValueSource,
    pub history: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            starting_chips: ValueSource::Default,
            blinds: ValueSource::Default,
            post_blinds: ValueSource::Default,
            raise_accounting: ValueSource::Default,
            tie_rule: ValueSource::Default,
            default_raise: ValueSource::Default,
            seed: ValueSource::Default,
            hands: ValueSource::Default,
            endpoint: ValueSource::Default,
            api_key: ValueSource::Default,
            timeout_secs: ValueSource::Default,
            prompt_dir: ValueSource::Default,
            records_dir: ValueSource::Default,
            history: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => f.write_str(msg),
        }
    }
}

/// Defaults, then the TOML file named by `TABLEMIND_CONFIG`, then
/// `TABLEMIND_*` variables. Validated before returning.
pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut resolved = ConfigResolved {
        config: Config::default(),
        sources: ConfigSources::default(),
    };
    if let Some(path) = env_value(CONFIG_ENV) {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        f.apply(&mut resolved);
    }
    apply_env(&mut resolved)?;
    validate(&resolved.config)?;
    Ok(resolved)
}

/// Same as [`load_with_sources`] with command-line flags applied last.
pub fn load_for_play(args: &PlayArgs) -> Result<ConfigResolved, ConfigError> {
    let mut resolved = load_with_sources()?;
    apply_flags(&mut resolved, args);
    validate(&resolved.config)?;
    Ok(resolved)
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    starting_chips: Option<u32>,
    small_blind: Option<u32>,
    big_blind: Option<u32>,
    post_blinds: Option<bool>,
    raise_accounting: Option<RaiseAccounting>,
    tie_rule: Option<TieRule>,
    default_raise: Option<u32>,
    seed: Option<u64>,
    hands: Option<u32>,
    endpoint: Option<String>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
    prompt_dir: Option<PathBuf>,
    records_dir: Option<PathBuf>,
    history: Option<PathBuf>,
}

/// Copies `$value` into `$cfg.$field` and marks its source.
macro_rules! set {
    ($r:expr, $field:ident, $value:expr, $src:expr) => {{
        $r.config.$field = $value;
        $r.sources.$field = $src;
    }};
}

impl FileConfig {
    fn apply(self, r: &mut ConfigResolved) {
        let src = ValueSource::File;
        if let Some(v) = self.starting_chips {
            set!(r, starting_chips, v, src);
        }
        if let Some(v) = self.small_blind {
            r.config.small_blind = v;
            r.sources.blinds = src;
        }
        if let Some(v) = self.big_blind {
            r.config.big_blind = v;
            r.sources.blinds = src;
        }
        if let Some(v) = self.post_blinds {
            set!(r, post_blinds, v, src);
        }
        if let Some(v) = self.raise_accounting {
            set!(r, raise_accounting, v, src);
        }
        if let Some(v) = self.tie_rule {
            set!(r, tie_rule, v, src);
        }
        if let Some(v) = self.default_raise {
            set!(r, default_raise, v, src);
        }
        if let Some(v) = self.seed {
            set!(r, seed, Some(v), src);
        }
        if let Some(v) = self.hands {
            set!(r, hands, v, src);
        }
        if let Some(v) = self.endpoint {
            set!(r, endpoint, v, src);
        }
        if let Some(v) = self.api_key {
            set!(r, api_key, Some(v), src);
        }
        if let Some(v) = self.timeout_secs {
            set!(r, timeout_secs, v, src);
        }
        if let Some(v) = self.prompt_dir {
            set!(r, prompt_dir, v, src);
        }
        if let Some(v) = self.records_dir {
            set!(r, records_dir, v, src);
        }
        if let Some(v) = self.history {
            set!(r, history, Some(v), src);
        }
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn apply_env(r: &mut ConfigResolved) -> Result<(), ConfigError> {
    let src = ValueSource::Env;
    if let Some(seed) = env_value("TABLEMIND_SEED") {
        let seed = seed
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid TABLEMIND_SEED: {}", seed)))?;
        set!(r, seed, Some(seed), src);
    }
    if let Some(chips) = env_value("TABLEMIND_CHIPS") {
        let chips = chips
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid TABLEMIND_CHIPS: {}", chips)))?;
        set!(r, starting_chips, chips, src);
    }
    if let Some(endpoint) = env_value("TABLEMIND_ENDPOINT") {
        set!(r, endpoint, endpoint, src);
    }
    if let Some(key) = env_value("TABLEMIND_API_KEY") {
        set!(r, api_key, Some(key), src);
    }
    if let Some(secs) = env_value("TABLEMIND_TIMEOUT_SECS") {
        let secs = secs.parse().map_err(|_| {
            ConfigError::Invalid(format!("Invalid TABLEMIND_TIMEOUT_SECS: {}", secs))
        })?;
        set!(r, timeout_secs, secs, src);
    }
    Ok(())
}

fn apply_flags(r: &mut ConfigResolved, args: &PlayArgs) {
    let src = ValueSource::Flag;
    if let Some(v) = args.hands {
        set!(r, hands, v, src);
    }
    if let Some(v) = args.seed {
        set!(r, seed, Some(v), src);
    }
    if let Some(v) = args.chips {
        set!(r, starting_chips, v, src);
    }
    if args.blinds {
        set!(r, post_blinds, true, src);
    }
    if let Some(v) = args.raise_accounting {
        set!(r, raise_accounting, v.into(), src);
    }
    if args.split_ties {
        set!(r, tie_rule, TieRule::Split, src);
    }
    if let Some(v) = &args.prompt_dir {
        set!(r, prompt_dir, v.clone(), src);
    }
    if let Some(v) = &args.records_dir {
        set!(r, records_dir, v.clone(), src);
    }
    if let Some(v) = &args.history {
        set!(r, history, Some(v.clone()), src);
    }
    if let Some(v) = &args.endpoint {
        set!(r, endpoint, v.clone(), src);
    }
    if let Some(v) = args.timeout_secs {
        set!(r, timeout_secs, v, src);
    }
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.starting_chips == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: starting_chips must be >0".into(),
        ));
    }
    let limit = max_starting_chips(MIN_PLAYERS);
    if cfg.starting_chips > limit {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: starting_chips must be <={}",
            limit
        )));
    }
    if cfg.timeout_secs == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: timeout_secs must be >0".into(),
        ));
    }
    if cfg.big_blind < cfg.small_blind {
        return Err(ConfigError::Invalid(
            "Invalid configuration: big_blind must be >= small_blind".into(),
        ));
    }
    if cfg.hands == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: hands must be >=1".into(),
        ));
    }
    Ok(())
}
