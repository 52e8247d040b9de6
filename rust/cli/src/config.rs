use brag_engine::cards::Rank;
use brag_engine::mode::GameMode;
use serde::{Deserialize, Serialize};
use std::fs;

pub const CONFIG_ENV: &str = "BRAG_CONFIG";
pub const SEED_ENV: &str = "BRAG_SEED";
pub const CARDS_ENV: &str = "BRAG_CARDS";
pub const TURN_SECS_ENV: &str = "BRAG_TURN_SECS";
pub const TRUMP_ENV: &str = "BRAG_TRUMP";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub seed: Option<u64>,
    pub cards: usize,
    pub turn_secs: u32,
    pub trump: Option<Rank>,
    pub initial_coins: u32,
    pub boot_amount: u32,
    pub pot_limit: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub seed: ValueSource,
    pub cards: ValueSource,
    pub turn_secs: ValueSource,
    pub trump: ValueSource,
    pub initial_coins: ValueSource,
    pub boot_amount: ValueSource,
    pub pot_limit: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            seed: ValueSource::Default,
            cards: ValueSource::Default,
            turn_secs: ValueSource::Default,
            trump: ValueSource::Default,
            initial_coins: ValueSource::Default,
            boot_amount: ValueSource::Default,
            pot_limit: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        let mode = GameMode::three_card();
        Self {
            seed: None,
            cards: mode.number_of_cards,
            turn_secs: mode.turn_duration_secs,
            trump: None,
            initial_coins: mode.initial_coins,
            boot_amount: mode.boot_amount,
            pot_limit: mode.pot_limit,
        }
    }
}

impl Config {
    /// The three-card preset with this configuration applied.
    pub fn game_mode(&self) -> Result<GameMode, ConfigError> {
        let mut mode = GameMode::three_card();
        mode.number_of_cards = self.cards;
        mode.turn_duration_secs = self.turn_secs;
        mode.initial_coins = self.initial_coins;
        mode.boot_amount = self.boot_amount;
        mode.pot_limit = self.pot_limit;
        if let Some(rank) = self.trump {
            mode = mode.with_trump(rank);
        }
        mode.validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(mode)
    }
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

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var(CONFIG_ENV)
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.cards {
            cfg.cards = v;
            sources.cards = ValueSource::File;
        }
        if let Some(v) = f.turn_secs {
            cfg.turn_secs = v;
            sources.turn_secs = ValueSource::File;
        }
        if let Some(v) = f.trump {
            cfg.trump = parse_trump(&v)?;
            sources.trump = ValueSource::File;
        }
        if let Some(v) = f.initial_coins {
            cfg.initial_coins = v;
            sources.initial_coins = ValueSource::File;
        }
        if let Some(v) = f.boot_amount {
            cfg.boot_amount = v;
            sources.boot_amount = ValueSource::File;
        }
        if let Some(v) = f.pot_limit {
            cfg.pot_limit = Some(v);
            sources.pot_limit = ValueSource::File;
        }
    }

    if let Ok(seed) = std::env::var(SEED_ENV)
        && !seed.is_empty()
    {
        cfg.seed = Some(
            seed.parse()
                .map_err(|_| ConfigError::Invalid(format!("Invalid seed '{}'", seed)))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Ok(cards) = std::env::var(CARDS_ENV)
        && !cards.is_empty()
    {
        cfg.cards = cards
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid card count '{}'", cards)))?;
        sources.cards = ValueSource::Env;
    }
    if let Ok(secs) = std::env::var(TURN_SECS_ENV)
        && !secs.is_empty()
    {
        cfg.turn_secs = secs
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid turn duration '{}'", secs)))?;
        sources.turn_secs = ValueSource::Env;
    }
    if let Ok(trump) = std::env::var(TRUMP_ENV)
        && !trump.is_empty()
    {
        cfg.trump = parse_trump(&trump)?;
        sources.trump = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    cards: Option<usize>,
    #[serde(default)]
    turn_secs: Option<u32>,
    #[serde(default)]
    trump: Option<String>,
    #[serde(default)]
    initial_coins: Option<u32>,
    #[serde(default)]
    boot_amount: Option<u32>,
    #[serde(default)]
    pot_limit: Option<u32>,
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    cfg.game_mode()
        .map(|_| ())
        .map_err(|e| ConfigError::Invalid(format!("Invalid configuration: {}", e)))
}

/// Accepts a rank alias ("7", "J", "10") or "none" to disable the trump.
pub fn parse_trump(s: &str) -> Result<Option<Rank>, ConfigError> {
    if s.eq_ignore_ascii_case("none") || s.eq_ignore_ascii_case("off") {
        return Ok(None);
    }
    s.parse::<Rank>()
        .map(Some)
        .map_err(|e| ConfigError::Invalid(format!("Invalid trump: {}", e)))
}
