//! Engine configuration.
//!
//! Configuration is assembled once, before the engine is initialized, from
//! (lowest to highest precedence):
//!
//! 1. built-in defaults,
//! 2. an optional JSON file,
//! 3. `QMAP_*` environment variables,
//! 4. initialization commands sent by the upstream producer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

use crate::error::{EngineError, EngineResult};
use crate::oracle::{RandomPlacementOracle, RoutingOptions, RoutingOracle, TrivialOracle};
use crate::platform::Platform;

/// Environment variable naming the platform description.
pub const ENV_HARDWARE_CONFIG: &str = "QMAP_HARDWARE_CONFIG";
/// Environment variable naming the gatemap description.
pub const ENV_GATEMAP: &str = "QMAP_GATEMAP";
/// Environment variable overriding the matching tolerance.
pub const ENV_EPSILON: &str = "QMAP_EPSILON";
/// Environment variable overriding the routing seed.
pub const ENV_SEED: &str = "QMAP_SEED";

/// How the first block may place virtual qubits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementStrategy {
    /// Keep the identity placement.
    #[default]
    Trivial,
    /// Choose a seeded random permutation for the first block.
    Random,
}

impl FromStr for PlacementStrategy {
    type Err = EngineError;

    fn from_str(s: &str) -> EngineResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "trivial" => Ok(PlacementStrategy::Trivial),
            "random" => Ok(PlacementStrategy::Random),
            other => Err(EngineError::Config(format!(
                "unknown placement strategy \"{other}\", expected trivial or random"
            ))),
        }
    }
}

impl fmt::Display for PlacementStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementStrategy::Trivial => write!(f, "trivial"),
            PlacementStrategy::Random => write!(f, "random"),
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Platform description file.
    #[serde(default)]
    pub platform: Option<PathBuf>,
    /// Gatemap description file.
    #[serde(default)]
    pub gatemap: Option<PathBuf>,
    /// Options forwarded to the routing oracle.
    #[serde(default)]
    pub options: BTreeMap<String, String>,
    /// Tolerance for matrix comparisons.
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    /// Seed handed to the routing oracle.
    #[serde(default)]
    pub seed: u64,
    /// Initial placement strategy.
    #[serde(default)]
    pub initial_placement: PlacementStrategy,
}

fn default_epsilon() -> f64 {
    qmap_catalog::DEFAULT_EPSILON
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            platform: None,
            gatemap: None,
            options: BTreeMap::new(),
            epsilon: default_epsilon(),
            seed: 0,
            initial_placement: PlacementStrategy::default(),
        }
    }
}

/// An initialization command from the upstream producer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitCommand {
    /// Set the platform description file.
    HardwareConfig(PathBuf),
    /// Set the gatemap description file.
    Gatemap(PathBuf),
    /// Set a routing oracle option.
    Option {
        /// Option name.
        key: String,
        /// Option value.
        value: String,
    },
    /// Set the routing seed.
    Seed(u64),
}

impl FromStr for InitCommand {
    type Err = EngineError;

    /// Parse `hardware_config PATH`, `gatemap PATH`, `option KEY VALUE` or
    /// `seed N`.
    fn from_str(s: &str) -> EngineResult<Self> {
        let mut parts = s.split_whitespace();
        let command = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();
        let bad_args = |usage: &str| {
            EngineError::Config(format!("usage: {command} {usage}, got \"{}\"", s.trim()))
        };
        match (command, args.as_slice()) {
            ("hardware_config", [path]) => Ok(InitCommand::HardwareConfig(PathBuf::from(path))),
            ("gatemap", [path]) => Ok(InitCommand::Gatemap(PathBuf::from(path))),
            ("option", [key, value]) => Ok(InitCommand::Option {
                key: key.to_string(),
                value: value.to_string(),
            }),
            ("seed", [seed]) => seed
                .parse()
                .map(InitCommand::Seed)
                .map_err(|_| bad_args("<u64>")),
            ("hardware_config" | "gatemap", _) => Err(bad_args("<path>")),
            ("option", _) => Err(bad_args("<key> <value>")),
            ("seed", _) => Err(bad_args("<u64>")),
            _ => Err(EngineError::Config(format!(
                "unknown initialization command \"{command}\""
            ))),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file.
    ///
    /// Relative platform and gatemap paths are resolved against the
    /// directory containing the file.
    pub fn from_file(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_json::from_str(&contents)?;
        if let Some(base) = path.parent() {
            config.platform = config.platform.map(|p| base.join(p));
            config.gatemap = config.gatemap.map(|p| base.join(p));
        }
        Ok(config)
    }

    /// Load configuration from an optional file, then apply the environment.
    pub fn load(path: Option<&Path>) -> EngineResult<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.merge_env())
    }

    /// Apply `QMAP_*` overrides from the process environment.
    #[must_use]
    pub fn merge_env(self) -> Self {
        self.merge_env_from(|key| std::env::var(key).ok())
    }

    /// Apply `QMAP_*` overrides from an arbitrary variable source.
    ///
    /// Values that fail to parse are ignored with a warning.
    #[must_use]
    pub fn merge_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup(ENV_HARDWARE_CONFIG) {
            self.platform = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup(ENV_GATEMAP) {
            self.gatemap = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup(ENV_EPSILON) {
            match v.parse() {
                Ok(val) => self.epsilon = val,
                Err(_) => warn!("Ignoring {ENV_EPSILON}={v}: not a number"),
            }
        }
        if let Some(v) = lookup(ENV_SEED) {
            match v.parse() {
                Ok(val) => self.seed = val,
                Err(_) => warn!("Ignoring {ENV_SEED}={v}: not an unsigned integer"),
            }
        }
        self
    }

    /// Apply initialization commands in order.
    pub fn apply_commands(&mut self, commands: impl IntoIterator<Item = InitCommand>) {
        for command in commands {
            debug!("Applying init command {command:?}");
            match command {
                InitCommand::HardwareConfig(path) => self.platform = Some(path),
                InitCommand::Gatemap(path) => self.gatemap = Some(path),
                InitCommand::Option { key, value } => {
                    self.options.insert(key, value);
                }
                InitCommand::Seed(seed) => self.seed = seed,
            }
        }
    }

    /// Check that every required parameter is present and sane.
    pub fn validate(&self) -> EngineResult<()> {
        if self.platform.is_none() {
            return Err(EngineError::MissingConfiguration(format!(
                "no platform description; use the hardware_config init command or {ENV_HARDWARE_CONFIG}"
            )));
        }
        if self.gatemap.is_none() {
            return Err(EngineError::MissingConfiguration(format!(
                "no gatemap description; use the gatemap init command or {ENV_GATEMAP}"
            )));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(EngineError::Config(format!(
                "epsilon must be a positive number, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }

    /// Options forwarded to the routing oracle.
    pub fn routing_options(&self) -> RoutingOptions {
        RoutingOptions::from(self.options.clone())
    }

    /// Build the routing oracle selected by `initial_placement`.
    pub fn build_oracle(&self, platform: &Platform) -> Box<dyn RoutingOracle> {
        match self.initial_placement {
            PlacementStrategy::Trivial => Box::new(TrivialOracle::new(platform.num_qubits())),
            PlacementStrategy::Random => {
                Box::new(RandomPlacementOracle::new(platform.num_qubits()))
            }
        }
    }
}
