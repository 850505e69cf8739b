//! Daemon configuration
//!
//! Layered: built-in defaults, then an optional TOML file, then
//! `TICKETLINE_*` environment variables.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use ticketline_core::domain::{QueueConfig, DEFAULT_COUNTER, DEFAULT_MAX_TICKET_NUMBER};

pub const DEFAULT_CONFIG_PATH: &str = "~/.ticketline/config.toml";
pub const DEFAULT_DB_PATH: &str = "~/.ticketline/tickets.db";
const ENV_PREFIX: &str = "TICKETLINE";

/// Codes are two digits wide
const MAX_SEQUENCE_CEILING: u32 = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DaemonConfig {
    pub db_path: String,
    pub store: StoreKind,
    pub rpc_host: String,
    pub rpc_port: u16,
    pub counter: i32,
    pub max_ticket_number: u32,
    pub log_format: LogFormat,
    #[serde(default)]
    pub log_dir: Option<String>,
}

impl DaemonConfig {
    /// Load configuration; `path` overrides the default file location
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => p.to_path_buf(),
            None => PathBuf::from(shellexpand::tilde(DEFAULT_CONFIG_PATH).into_owned()),
        };
        // An explicitly named file must exist; the default one is optional
        let required = path.is_some();

        let settings = config::Config::builder()
            .set_default("db_path", DEFAULT_DB_PATH)?
            .set_default("store", "sqlite")?
            .set_default("rpc_host", "127.0.0.1")?
            .set_default("rpc_port", 9530)?
            .set_default("counter", DEFAULT_COUNTER as i64)?
            .set_default("max_ticket_number", DEFAULT_MAX_TICKET_NUMBER as i64)?
            .set_default("log_format", "pretty")?
            .add_source(config::File::from(file.clone()).required(required))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .with_context(|| format!("Failed to read configuration ({})", file.display()))?;

        let mut config: DaemonConfig = settings
            .try_deserialize()
            .context("Invalid configuration")?;
        config.db_path = shellexpand::tilde(&config.db_path).into_owned();
        config.log_dir = config
            .log_dir
            .map(|dir| shellexpand::tilde(&dir).into_owned());

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_SEQUENCE_CEILING).contains(&self.max_ticket_number) {
            bail!(
                "max_ticket_number must be between 1 and {} (got {})",
                MAX_SEQUENCE_CEILING,
                self.max_ticket_number
            );
        }
        if self.rpc_host.trim().is_empty() {
            bail!("rpc_host must not be empty");
        }
        Ok(())
    }

    pub fn queue_config(&self) -> QueueConfig {
        QueueConfig::new(self.counter, self.max_ticket_number)
    }
}
