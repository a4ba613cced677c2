// Configuration management module
// This file handles loading and parsing of configuration settings
// from defaults and environment variables
//
// Numan Thabit 2025 Nov

use crate::quant::MAX_PARTS;
use anyhow::{ensure, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP listen address, e.g. 0.0.0.0:8080
    pub listen_addr: SocketAddr,
    /// YAML file declaring the venue set
    pub venues_file: PathBuf,
    /// Upper bound on the granularity callers may request
    pub max_parts: u32,
    /// Reload the venue file this often (seconds); unset disables reloading
    pub reload_interval_secs: Option<u64>,
    /// Heartbeat log interval
    pub heartbeat_secs: u64,
}

impl AppConfig {
    /// Defaults overridden by `SPLIT__*` environment variables,
    /// e.g. `SPLIT__LISTEN_ADDR`, `SPLIT__VENUES_FILE`.
    pub fn load() -> Result<Self> {
        Self::from_builder(
            config::Config::builder().add_source(
                config::Environment::with_prefix("SPLIT")
                    .separator("__")
                    .try_parsing(true),
            ),
        )
    }

    pub fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self> {
        let cfg = builder
            .set_default("listen_addr", "0.0.0.0:8080")?
            .set_default("venues_file", "venues.yaml")?
            .set_default("max_parts", i64::from(MAX_PARTS))?
            .set_default("heartbeat_secs", 30i64)?
            .build()?;
        let app: Self = cfg.try_deserialize()?;
        app.validate()?;
        Ok(app)
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            (1..=MAX_PARTS).contains(&self.max_parts),
            "max_parts must be within 1..={MAX_PARTS}, got {}",
            self.max_parts
        );
        ensure!(self.heartbeat_secs > 0, "heartbeat_secs must be positive");
        if let Some(secs) = self.reload_interval_secs {
            ensure!(secs > 0, "reload_interval_secs must be positive");
        }
        Ok(())
    }

    pub fn reload_interval(&self) -> Option<Duration> {
        self.reload_interval_secs.map(Duration::from_secs)
    }

    pub fn heartbeat(&self) -> Duration {
        Duration::from_secs(self.heartbeat_secs)
    }
}
