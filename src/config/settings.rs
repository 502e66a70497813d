use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

use crate::merge::DEFAULT_UNSUBSCRIBE_BASE;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub merge: MergeConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Largest accepted request body, in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MergeConfig {
    /// Base URL of the `unsubscribe` variable; the address is appended as `?email=`
    #[serde(default = "default_unsubscribe_base")]
    pub unsubscribe_base: String,
    /// Largest recipient list accepted by the batch endpoint
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
    /// Cap on the subject and body bytes a single batch may produce
    #[serde(default = "default_max_output_bytes")]
    pub max_output_bytes: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogConfig {
    #[serde(default)]
    pub format: LogFormat,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

fn default_max_body_bytes() -> usize {
    10 * 1024 * 1024 // 10 MiB
}

fn default_unsubscribe_base() -> String {
    DEFAULT_UNSUBSCRIBE_BASE.to_string()
}

fn default_max_batch_size() -> usize {
    10_000
}

fn default_max_output_bytes() -> usize {
    64 * 1024 * 1024 // 64 MiB
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8081)?
            .set_default("server.max_body_bytes", 10 * 1024 * 1024)?
            .set_default("merge.unsubscribe_base", DEFAULT_UNSUBSCRIBE_BASE)?
            .set_default("merge.max_batch_size", 10_000)?
            .set_default("merge.max_output_bytes", 64 * 1024 * 1024)?
            .set_default("log.format", "text")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // MAILMERGE_SERVER__PORT, MAILMERGE_MERGE__MAX_BATCH_SIZE, MAILMERGE_LOG__FORMAT, ...
            .add_source(
                Environment::with_prefix("MAILMERGE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            unsubscribe_base: default_unsubscribe_base(),
            max_batch_size: default_max_batch_size(),
            max_output_bytes: default_max_output_bytes(),
        }
    }
}
