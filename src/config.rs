use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

use crate::{errors::Error, mutation::Keying, Rule, RuleRegistry};

pub const DEFAULT_PATH: &str = "blendca.yaml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub seed: Option<u64>,
    pub engine: EngineConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// `0` fits the terminal width.
    pub cols: usize,
    /// `0` fits the terminal height.
    pub rows: usize,
    pub step_increment: f64,
    pub base_mutation_chance: f64,
    pub adjacent_mutation_chance: f64,
    pub mutation_keying: Keying,
    /// explicit tables are indexed by neighborhood code, pattern `000` first.
    pub rules: Vec<RuleSpec>,
}

/// A registry entry, either a Wolfram number or a named table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RuleSpec {
    Number(u8),
    Table { name: String, table: Vec<u8> },
}

impl RuleSpec {
    pub fn build(&self) -> Result<Rule, Error> {
        match self {
            Self::Number(number) => Ok(Rule::wolfram(*number)),
            Self::Table { name, table } => Rule::from_table(name.clone(), table),
        }
    }
}

impl EngineConfig {
    pub fn registry(&self) -> Result<RuleRegistry, Error> {
        let rules = self
            .rules
            .iter()
            .map(RuleSpec::build)
            .collect::<Result<Vec<_>, _>>()?;
        RuleRegistry::new(rules)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub tick_ms: u64,
    pub refresh_ms: u64,
    /// generations after which the simulation freezes, `None` runs forever.
    pub stop_after: Option<u64>,
}

impl DisplayConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn refresh(&self) -> Duration {
        Duration::from_millis(self.refresh_ms)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cols: 0,
            rows: 0,
            step_increment: 0.01,
            base_mutation_chance: 0.01,
            adjacent_mutation_chance: 0.2,
            mutation_keying: Keying::RowSlot,
            rules: RuleRegistry::DEFAULT_RULES
                .into_iter()
                .map(RuleSpec::Number)
                .collect(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            tick_ms: 16,
            refresh_ms: 33,
            stop_after: Some(650),
        }
    }
}

pub fn parse(contents: &str) -> Result<Config, Error> {
    Ok(serde_yaml::from_str(contents)?)
}

/// reads `path` when given, failing on any error; otherwise falls back to
/// [`DEFAULT_PATH`] if present and to defaults when it is missing or broken.
pub fn load(path: Option<&Path>) -> Result<Config, Error> {
    if let Some(path) = path {
        info!("loading configuration from {}", path.display());
        return parse(&fs::read_to_string(path)?);
    }

    let path = Path::new(DEFAULT_PATH);
    if !path.exists() {
        return Ok(Config::default());
    }
    let loaded = fs::read_to_string(path)
        .map_err(Error::from)
        .and_then(|contents| parse(&contents));
    match loaded {
        Ok(config) => Ok(config),
        Err(err) => {
            warn!("failed to load {DEFAULT_PATH}: {err}; using defaults");
            Ok(Config::default())
        }
    }
}
