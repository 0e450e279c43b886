//! Configuration file
//!
//! ```toml
//! log_file = "Logs/eqlog_Jim_project1999.txt"
//! alliance = "VCR"
//! items = ["Copper Disc", "Platinum Disc"]
//!
//! [alliances]
//! VCR = ["Venerate", "Castle", "Reconstructed", "Kingdom"]
//!
//! [history]
//! Peter = "Kingdom"
//! ```
use crate::{
    auction::{Guild, GuildRef, ItemName, PlayerName},
    history::InMemoryAffiliationHistory,
};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("alliance `{0}` is not defined in [alliances]")]
    UnknownAlliance(String),
    #[error("no log file configured")]
    NoLogFile,
}

/// A named group of guilds whose members' drops and bids are tracked
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alliance {
    pub name: String,
    pub guilds: BTreeSet<Guild>,
}

impl Alliance {
    pub fn new<I, S>(name: impl Into<String>, guilds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Guild>,
    {
        Self {
            name: name.into(),
            guilds: guilds.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, guild: GuildRef) -> bool {
        self.guilds.contains(guild)
    }
}

fn default_poll_interval_ms() -> u64 {
    250
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub log_file: Option<PathBuf>,
    /// Which entry of `alliances` the engine acts for
    pub alliance: String,
    /// Replay the whole log instead of only following new lines
    #[serde(default)]
    pub from_start: bool,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default)]
    pub items: Vec<ItemName>,
    /// Extra item names, one per line
    pub items_file: Option<PathBuf>,
    #[serde(default)]
    pub alliances: BTreeMap<String, Vec<Guild>>,
    #[serde(default)]
    pub history: BTreeMap<PlayerName, Guild>,

    /// Relative paths in the file are resolved against this directory
    #[serde(skip)]
    base_dir: PathBuf,
}

impl Config {
    pub fn from_toml(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config = Self::from_toml(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(config)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_relative() {
            self.base_dir.join(path)
        } else {
            path.to_path_buf()
        }
    }

    pub fn log_file(&self) -> Result<PathBuf, ConfigError> {
        self.log_file
            .as_deref()
            .map(|path| self.resolve(path))
            .ok_or(ConfigError::NoLogFile)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn alliance(&self) -> Result<Alliance, ConfigError> {
        self.alliances
            .get(&self.alliance)
            .map(|guilds| Alliance::new(self.alliance.clone(), guilds.iter().cloned()))
            .ok_or_else(|| ConfigError::UnknownAlliance(self.alliance.clone()))
    }

    /// Inline `items` followed by the contents of `items_file`
    pub fn item_names(&self) -> Result<Vec<ItemName>> {
        let mut names = self.items.clone();
        if let Some(items_file) = &self.items_file {
            let path = self.resolve(items_file);
            let text = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read items file {}", path.display()))?;
            names.extend(
                text.lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty() && !line.starts_with('#'))
                    .map(str::to_owned),
            );
        }
        Ok(names)
    }

    pub fn history(&self) -> InMemoryAffiliationHistory {
        self.history
            .iter()
            .map(|(player, guild)| (player.clone(), guild.clone()))
            .collect()
    }
}
