//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs. Every
//! section and key is optional; anything left out falls back to the
//! reference values the simulator was tuned with.

use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::feed::simulator::{FeedConfig, DEFAULT_SUSPENSION_REASON};
use crate::slip::DEFAULT_CASH_OUT_RATIO;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub feed: FeedSettings,
    pub slip: SlipSettings,
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FeedSettings {
    pub tick_interval_ms: u64,
    pub suspend_probability: f64,
    pub resume_probability: f64,
    pub odds_jitter: f64,
    /// Fixed seed for a reproducible feed. Unset means seed from entropy.
    pub seed: Option<u64>,
    pub suspension_reason: String,
}

impl Default for FeedSettings {
    fn default() -> Self {
        let feed = FeedConfig::default();
        Self {
            tick_interval_ms: 3_000,
            suspend_probability: feed.suspend_probability,
            resume_probability: feed.resume_probability,
            odds_jitter: feed.odds_jitter,
            seed: None,
            suspension_reason: DEFAULT_SUSPENSION_REASON.to_string(),
        }
    }
}

impl FeedSettings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn simulator_config(&self) -> FeedConfig {
        FeedConfig {
            suspend_probability: self.suspend_probability,
            resume_probability: self.resume_probability,
            odds_jitter: self.odds_jitter,
            suspension_reason: self.suspension_reason.clone(),
        }
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SlipSettings {
    pub cash_out_ratio: Decimal,
}

impl Default for SlipSettings {
    fn default() -> Self {
        Self {
            cash_out_ratio: DEFAULT_CASH_OUT_RATIO,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DashboardSettings {
    pub enabled: bool,
    pub port: u16,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 8080,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::from_toml(&contents).with_context(|| format!("Invalid config file: {path}"))
    }

    /// Load `path` if it exists, otherwise use the defaults.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            info!(path, "No config file found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let feed = &self.feed;
        for (name, p) in [
            ("feed.suspend_probability", feed.suspend_probability),
            ("feed.resume_probability", feed.resume_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                bail!("{name} must be within [0, 1], got {p}");
            }
        }
        if !(feed.odds_jitter >= 0.0 && feed.odds_jitter.is_finite()) {
            bail!("feed.odds_jitter must be a non-negative number, got {}", feed.odds_jitter);
        }
        if feed.tick_interval_ms == 0 {
            bail!("feed.tick_interval_ms must be positive");
        }
        let ratio = self.slip.cash_out_ratio;
        if ratio <= Decimal::ZERO || ratio > Decimal::ONE {
            bail!("slip.cash_out_ratio must be within (0, 1], got {ratio}");
        }
        Ok(())
    }
}
