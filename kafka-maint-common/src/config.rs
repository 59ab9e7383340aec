// Copyright 2024 The Kafka Maint Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Process-wide configuration
//!
//! Loaded once at start and never mutated afterwards. Both tools share the same file:
//!
//! ```toml
//! broker = "kafka-1:9092,kafka-2:9092"
//! zookeeper = "zk-1:2181/kafka"
//! kafka_home = "/opt/kafka"
//! zookeeper_home = "/opt/zookeeper"
//!
//! [cleaner]
//! wait_mode = "poll"
//! poll_timeout_secs = 600
//! ```
//!
//! A shell-style file with `BROKER=...`, `ZOOKEEPER=...`, `KAFKA_HOME=...` and
//! `ZOOKEEPER_HOME=...` lines is accepted as well.

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use kafka_maint_error::ConfigError;
use kafka_maint_error::MaintResult;
use serde::Deserialize;
use tracing::debug;

use crate::utils::parse_config_file::parse_config_file;

/// Environment variable naming the configuration file
pub const CONFIG_PATH_ENV: &str = "KAFKA_MAINT_CONFIG";
/// Prefix for per-key environment overrides, e.g. `KAFKA_MAINT_BROKER`
pub const ENV_PREFIX: &str = "KAFKA_MAINT";
/// File looked up in the working directory when nothing else is given
pub const DEFAULT_CONFIG_FILE: &str = "kafka-maint.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MaintConfig {
    /// Bootstrap broker list, `host:port[,host:port...]`
    #[serde(default, alias = "BROKER")]
    pub broker: String,

    /// Zookeeper connect string, `host:port[,host:port...][/chroot]`
    #[serde(default, alias = "ZOOKEEPER")]
    pub zookeeper: String,

    /// Kafka install directory, the scripts live in `bin/`
    #[serde(default, alias = "KAFKA_HOME")]
    pub kafka_home: PathBuf,

    /// Zookeeper install directory, only needed for metadata cleanup
    #[serde(default, alias = "ZOOKEEPER_HOME")]
    pub zookeeper_home: Option<PathBuf>,

    #[serde(default)]
    pub cleaner: CleanerConfig,

    #[serde(default)]
    pub topics: TopicsConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaitMode {
    /// Sleep a fixed time per phase
    Fixed,
    /// Poll the cluster until the phase is observed complete
    #[default]
    Poll,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    /// `retention.ms` applied while a topic is being purged
    pub purge_retention_ms: u64,
    pub wait_mode: WaitMode,
    pub wait_secs: u64,
    pub poll_interval_secs: u64,
    pub poll_timeout_secs: u64,
    pub journal_path: PathBuf,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            purge_retention_ms: 1000,
            wait_mode: WaitMode::Poll,
            wait_secs: 60,
            poll_interval_secs: 5,
            poll_timeout_secs: 600,
            journal_path: PathBuf::from(".kafka-topic-cleaner.journal.json"),
        }
    }
}

impl CleanerConfig {
    #[inline]
    pub fn wait(&self) -> Duration {
        Duration::from_secs(self.wait_secs)
    }

    #[inline]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    #[inline]
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TopicsConfig {
    /// Remove `/brokers/topics/<topic>` with `zkCli.sh` after a delete
    pub purge_zookeeper_metadata: bool,
}

impl MaintConfig {
    /// Locate, parse and validate the configuration.
    ///
    /// Lookup order: `explicit`, `$KAFKA_MAINT_CONFIG`, `./kafka-maint.toml`,
    /// `<user config dir>/kafka-maint/config.toml`.
    pub fn load(explicit: Option<&Path>) -> MaintResult<Self> {
        let path = resolve_config_path(explicit, std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> MaintResult<Self> {
        debug!("loading configuration from {}", path.display());
        let config: MaintConfig = parse_config_file(path, Some(ENV_PREFIX))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.broker.trim().is_empty() {
            return Err(ConfigError::missing_field("broker"));
        }
        validate_host_port_list("broker", &self.broker)?;

        if self.zookeeper.trim().is_empty() {
            return Err(ConfigError::missing_field("zookeeper"));
        }
        // the chroot suffix only follows the last host
        let hosts = self.zookeeper.split('/').next().unwrap_or_default();
        validate_host_port_list("zookeeper", hosts)?;

        if self.kafka_home.as_os_str().is_empty() {
            return Err(ConfigError::missing_field("kafka_home"));
        }
        if self.topics.purge_zookeeper_metadata && self.zookeeper_home.is_none() {
            return Err(ConfigError::missing_field("zookeeper_home"));
        }
        if self.cleaner.wait_mode == WaitMode::Poll && self.cleaner.poll_interval_secs == 0 {
            return Err(ConfigError::invalid("cleaner.poll_interval_secs", "must be positive"));
        }
        Ok(())
    }
}

/// Pick the configuration file to load
pub fn resolve_config_path(explicit: Option<&Path>, from_env: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = from_env.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(path);
    }

    let mut candidates = vec![PathBuf::from(DEFAULT_CONFIG_FILE)];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("kafka-maint").join("config.toml"));
    }
    candidates
        .iter()
        .find(|candidate| candidate.is_file())
        .cloned()
        .ok_or_else(|| ConfigError::NotFound {
            searched: candidates.iter().map(|c| c.display().to_string()).collect(),
        })
}

fn validate_host_port_list(field: &str, value: &str) -> Result<(), ConfigError> {
    for addr in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (host, port) = addr
            .rsplit_once(':')
            .ok_or_else(|| ConfigError::invalid(field, format!("invalid format '{addr}', expected 'host:port'")))?;
        if host.is_empty() {
            return Err(ConfigError::invalid(field, format!("missing host in '{addr}'")));
        }
        port.parse::<u16>()
            .map_err(|_| ConfigError::invalid(field, format!("invalid port '{port}' in address '{addr}'")))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> MaintConfig {
        MaintConfig {
            broker: "localhost:9092".to_string(),
            zookeeper: "localhost:2181".to_string(),
            kafka_home: PathBuf::from("/opt/kafka"),
            ..Default::default()
        }
    }

    #[test]
    fn validate_accepts_minimal_config() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn validate_reports_missing_fields() {
        let mut config = valid();
        config.broker.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingRequiredField { ref field }) if field == "broker"
        ));

        let mut config = valid();
        config.kafka_home = PathBuf::new();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingRequiredField { ref field }) if field == "kafka_home"
        ));
    }

    #[test]
    fn validate_address_shapes() {
        let mut config = valid();
        config.broker = "kafka-1:9092,kafka-2:9092".to_string();
        config.zookeeper = "zk-1:2181,zk-2:2181/kafka".to_string();
        assert!(config.validate().is_ok());

        config.broker = "kafka-1".to_string();
        assert!(config.validate().is_err());

        config.broker = "kafka-1:port".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zookeeper_home_required_for_metadata_cleanup() {
        let mut config = valid();
        config.topics.purge_zookeeper_metadata = true;
        assert!(config.validate().is_err());

        config.zookeeper_home = Some(PathBuf::from("/opt/zookeeper"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn explicit_path_wins() {
        let path = resolve_config_path(Some(Path::new("/etc/kafka-maint.toml")), Some(PathBuf::from("/tmp/x")))
            .unwrap();
        assert_eq!(path, PathBuf::from("/etc/kafka-maint.toml"));

        let path = resolve_config_path(None, Some(PathBuf::from("/tmp/x.toml"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/x.toml"));
    }

    #[test]
    fn cleaner_defaults() {
        let cleaner = CleanerConfig::default();
        assert_eq!(cleaner.purge_retention_ms, 1000);
        assert_eq!(cleaner.wait_mode, WaitMode::Poll);
        assert_eq!(cleaner.poll_interval(), Duration::from_secs(5));
        assert_eq!(cleaner.wait(), Duration::from_secs(60));
    }
}
