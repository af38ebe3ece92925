//! Showcase configuration
//!
//! A single TOML file under the user config directory
//! (`~/.config/grain-showcase/showcase.toml` on Linux). Every field has a
//! default, so a missing file or a partial file still yields a usable
//! configuration; only malformed TOML or invalid timings are errors.

use color_eyre::eyre::{eyre, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::time::Duration;
use tracing::{debug, info, warn};

use crate::carousel::{CarouselSettings, LockPolicy, TransitionTimings};
use crate::deck::CardDeck;

const CONFIG_DIR: &str = "grain-showcase";
const CONFIG_FILE: &str = "showcase.toml";

/// Phase and auto-advance durations in milliseconds
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct TimingConfig {
    pub exit_ms: u64,
    pub settle_ms: u64,
    pub auto_advance_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            exit_ms: 250,
            settle_ms: 50,
            auto_advance_ms: 4500,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct BehaviourConfig {
    pub lock_policy: LockPolicy,
    pub autoplay: bool,
}

impl Default for BehaviourConfig {
    fn default() -> Self {
        Self {
            lock_policy: LockPolicy::Reference,
            autoplay: true,
        }
    }
}

/// Where the cards come from; the built-in deck when `path` is unset
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct DeckConfig {
    pub path: Option<PathBuf>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ShowcaseConfig {
    pub timing: TimingConfig,
    pub behaviour: BehaviourConfig,
    pub deck: DeckConfig,
}

impl ShowcaseConfig {
    /// Default location of the config file, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| eyre!("Invalid showcase config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.timing.auto_advance_ms == 0 {
            return Err(eyre!("timing.auto_advance_ms must be greater than zero"));
        }
        let transition_ms = self.timing.exit_ms + self.timing.settle_ms;
        if self.timing.auto_advance_ms < transition_ms {
            warn!(
                "Auto-advance interval ({}ms) is shorter than a transition ({}ms)",
                self.timing.auto_advance_ms, transition_ms
            );
        }
        Ok(())
    }

    /// Loads from the default location, falling back to defaults
    pub async fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path).await,
            None => {
                warn!("No config directory available, using default settings");
                Ok(Self::default())
            }
        }
    }

    /// Loads `path`; a missing file yields the defaults
    pub async fn load_from(path: &Path) -> Result<Self> {
        if !tokio::fs::try_exists(path)
            .await
            .wrap_err_with(|| format!("Failed to check config file {:?}", path))?
        {
            info!("No config at {:?}, using default settings", path);
            return Ok(Self::default());
        }

        let source = tokio::fs::read_to_string(path)
            .await
            .wrap_err_with(|| format!("Failed to read config file {:?}", path))?;
        let config = Self::from_toml_str(&source)
            .wrap_err_with(|| format!("Failed to load config file {:?}", path))?;
        debug!("Loaded config: {:?}", config);
        Ok(config)
    }

    /// Writes the default config to `path` unless a file already exists
    pub async fn ensure_default_config(path: &Path) -> Result<()> {
        if tokio::fs::try_exists(path)
            .await
            .wrap_err("Failed to check config file")?
        {
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .wrap_err_with(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let content = toml::to_string_pretty(&Self::default())
            .map_err(|e| eyre!("Failed to serialize default config: {}", e))?;
        tokio::fs::write(path, content)
            .await
            .wrap_err_with(|| format!("Failed to write default config {:?}", path))?;
        info!("Wrote default config to {:?}", path);
        Ok(())
    }

    pub fn carousel_settings(&self) -> CarouselSettings {
        CarouselSettings {
            timings: TransitionTimings {
                exit: Duration::from_millis(self.timing.exit_ms),
                settle: Duration::from_millis(self.timing.settle_ms),
            },
            auto_advance: Duration::from_millis(self.timing.auto_advance_ms),
            autoplay: self.behaviour.autoplay,
            lock_policy: self.behaviour.lock_policy,
        }
    }

    /// Loads the configured deck, or the built-in one
    pub async fn load_deck(&self) -> Result<CardDeck> {
        match &self.deck.path {
            Some(path) => CardDeck::load(path)
                .await
                .wrap_err_with(|| format!("Failed to load deck {:?}", path)),
            None => CardDeck::builtin().wrap_err("Built-in deck is invalid"),
        }
    }
}
