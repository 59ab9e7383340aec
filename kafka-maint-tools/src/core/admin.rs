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

//! Kafka tool-chain access
//!
//! - [`ToolchainBuilder`] - Fluent builder for the cluster addresses and install paths
//! - [`Toolchain`] - Builds the [`Invocation`] for every admin operation

use std::fmt;
use std::path::Path;
use std::path::PathBuf;

use kafka_maint_common::MaintConfig;

use crate::core::runner::Invocation;

pub const KAFKA_TOPICS: &str = "kafka-topics.sh";
pub const KAFKA_CONSUMER_GROUPS: &str = "kafka-consumer-groups.sh";
pub const KAFKA_CONFIGS: &str = "kafka-configs.sh";
pub const KAFKA_RUN_CLASS: &str = "kafka-run-class.sh";
pub const ZK_CLI: &str = "zkCli.sh";

pub const CONSOLE_CONSUMER_CLASS: &str = "kafka.tools.ConsoleConsumer";
pub const GET_OFFSET_SHELL_CLASS: &str = "kafka.tools.GetOffsetShell";

pub const RETENTION_MS: &str = "retention.ms";

/// Idle timeout for single message consumption
pub const CONSUME_ONE_TIMEOUT_MS: u64 = 2000;

/// Where consumer group state is looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coordinator {
    /// Zookeeper-backed groups of the old consumer
    Legacy,
    /// Broker-coordinated groups of the new consumer
    Broker,
}

impl Coordinator {
    /// Order in which group queries are issued
    pub const ALL: [Coordinator; 2] = [Coordinator::Legacy, Coordinator::Broker];
}

impl fmt::Display for Coordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coordinator::Legacy => f.write_str("zookeeper"),
            Coordinator::Broker => f.write_str("broker"),
        }
    }
}

/// `--time` argument of `GetOffsetShell`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetTime {
    Earliest,
    Latest,
}

impl OffsetTime {
    fn as_arg(self) -> &'static str {
        match self {
            OffsetTime::Earliest => "-2",
            OffsetTime::Latest => "-1",
        }
    }
}

/// Builder for a [`Toolchain`]
///
/// # Examples
///
/// ```rust
/// use kafka_maint_tools::core::admin::ToolchainBuilder;
///
/// let tools = ToolchainBuilder::new()
///     .kafka_home("/opt/kafka")
///     .broker("localhost:9092")
///     .zookeeper("localhost:2181")
///     .build();
///
/// let describe = tools.describe_topic("orders");
/// assert_eq!(describe.program_name(), "kafka-topics.sh");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ToolchainBuilder {
    kafka_home: Option<PathBuf>,
    zookeeper_home: Option<PathBuf>,
    broker: Option<String>,
    zookeeper: Option<String>,
}

impl ToolchainBuilder {
    /// Create a new builder with default configuration
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn kafka_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.kafka_home = Some(home.into());
        self
    }

    #[inline]
    pub fn zookeeper_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.zookeeper_home = Some(home.into());
        self
    }

    /// Set the bootstrap broker list, e.g. `"kafka-1:9092,kafka-2:9092"`
    #[inline]
    pub fn broker(mut self, addr: impl Into<String>) -> Self {
        self.broker = Some(addr.into());
        self
    }

    /// Set the Zookeeper connect string, e.g. `"zk-1:2181/kafka"`
    #[inline]
    pub fn zookeeper(mut self, addr: impl Into<String>) -> Self {
        self.zookeeper = Some(addr.into());
        self
    }

    /// Unset values become empty strings and surface as the tool's own error
    pub fn build(self) -> Toolchain {
        Toolchain {
            kafka_bin: self.kafka_home.unwrap_or_default().join("bin"),
            zookeeper_bin: self.zookeeper_home.map(|home| home.join("bin")),
            broker: self.broker.unwrap_or_default(),
            zookeeper: self.zookeeper.unwrap_or_default(),
        }
    }
}

/// Invocation factory for the Kafka and Zookeeper scripts
#[derive(Debug, Clone)]
pub struct Toolchain {
    kafka_bin: PathBuf,
    zookeeper_bin: Option<PathBuf>,
    broker: String,
    zookeeper: String,
}

impl Toolchain {
    pub fn from_config(config: &MaintConfig) -> Self {
        let mut builder = ToolchainBuilder::new()
            .kafka_home(&config.kafka_home)
            .broker(&config.broker)
            .zookeeper(&config.zookeeper);
        if let Some(home) = &config.zookeeper_home {
            builder = builder.zookeeper_home(home);
        }
        builder.build()
    }

    fn kafka_script(&self, script: &str) -> Invocation {
        Invocation::new(self.kafka_bin.join(script))
    }

    // ========================================================================
    // Consumer groups
    // ========================================================================

    fn consumer_groups(&self, coordinator: Coordinator) -> Invocation {
        let inv = self.kafka_script(KAFKA_CONSUMER_GROUPS);
        match coordinator {
            Coordinator::Legacy => inv.args(["--zookeeper", self.zookeeper.as_str()]),
            Coordinator::Broker => inv.args(["--bootstrap-server", self.broker.as_str()]),
        }
    }

    pub fn list_groups(&self, coordinator: Coordinator) -> Invocation {
        self.consumer_groups(coordinator).arg("--list")
    }

    pub fn describe_group(&self, coordinator: Coordinator, group: &str) -> Invocation {
        self.consumer_groups(coordinator).args(["--describe", "--group", group])
    }

    /// Submit a reset plan file for `group`
    pub fn reset_offsets_from_file(&self, group: &str, plan: &Path) -> Invocation {
        self.consumer_groups(Coordinator::Broker)
            .args(["--group", group, "--reset-offsets", "--from-file"])
            .arg(plan.display().to_string())
            .arg("--execute")
    }

    // ========================================================================
    // Topics
    // ========================================================================

    fn topics(&self) -> Invocation {
        self.kafka_script(KAFKA_TOPICS).args(["--zookeeper", self.zookeeper.as_str()])
    }

    pub fn describe_topic(&self, topic: &str) -> Invocation {
        self.topics().args(["--describe", "--topic", topic])
    }

    pub fn create_topic(&self, topic: &str, replicas: &str, partitions: &str) -> Invocation {
        self.topics().args([
            "--create",
            "--topic",
            topic,
            "--replication-factor",
            replicas,
            "--partitions",
            partitions,
        ])
    }

    pub fn delete_topic(&self, topic: &str) -> Invocation {
        self.topics().args(["--delete", "--topic", topic])
    }

    /// Remove the topic znode left behind by brokers without delete support
    pub fn delete_topic_metadata(&self, topic: &str) -> Option<Invocation> {
        let bin = self.zookeeper_bin.as_ref()?;
        Some(
            Invocation::new(bin.join(ZK_CLI))
                .args(["-server", self.zookeeper.as_str(), "deleteall"])
                .arg(format!("/brokers/topics/{topic}")),
        )
    }

    // ========================================================================
    // Topic configs
    // ========================================================================

    fn topic_configs(&self, topic: &str) -> Invocation {
        self.kafka_script(KAFKA_CONFIGS).args([
            "--zookeeper",
            self.zookeeper.as_str(),
            "--entity-type",
            "topics",
            "--entity-name",
            topic,
        ])
    }

    pub fn describe_topic_config(&self, topic: &str) -> Invocation {
        self.topic_configs(topic).arg("--describe")
    }

    pub fn set_retention(&self, topic: &str, retention_ms: u64) -> Invocation {
        self.topic_configs(topic)
            .args(["--alter", "--add-config"])
            .arg(format!("{RETENTION_MS}={retention_ms}"))
    }

    /// Drop the topic override so the broker default applies again
    pub fn clear_retention(&self, topic: &str) -> Invocation {
        self.topic_configs(topic)
            .args(["--alter", "--delete-config", RETENTION_MS])
    }

    // ========================================================================
    // Consumers and offsets
    // ========================================================================

    fn run_class(&self, class: &str) -> Invocation {
        self.kafka_script(KAFKA_RUN_CLASS).arg(class)
    }

    pub fn consume_all(&self, topic: &str) -> Invocation {
        self.run_class(CONSOLE_CONSUMER_CLASS).args([
            "--bootstrap-server",
            self.broker.as_str(),
            "--topic",
            topic,
            "--from-beginning",
        ])
    }

    pub fn consume_one(&self, topic: &str, partition: &str, offset: &str) -> Invocation {
        self.run_class(CONSOLE_CONSUMER_CLASS)
            .args([
                "--bootstrap-server",
                self.broker.as_str(),
                "--topic",
                topic,
                "--partition",
                partition,
                "--offset",
                offset,
                "--max-messages",
                "1",
                "--timeout-ms",
            ])
            .arg(CONSUME_ONE_TIMEOUT_MS.to_string())
    }

    pub fn topic_offsets(&self, topic: &str, time: OffsetTime) -> Invocation {
        self.run_class(GET_OFFSET_SHELL_CLASS).args([
            "--broker-list",
            self.broker.as_str(),
            "--topic",
            topic,
            "--time",
            time.as_arg(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tools() -> Toolchain {
        ToolchainBuilder::new()
            .kafka_home("/opt/kafka")
            .zookeeper_home("/opt/zookeeper")
            .broker("kafka:9092")
            .zookeeper("zk:2181")
            .build()
    }

    fn args(inv: &Invocation) -> Vec<&str> {
        inv.get_args().iter().map(String::as_str).collect()
    }

    #[test]
    fn group_queries_use_both_coordinators() {
        let tools = tools();
        let legacy = tools.list_groups(Coordinator::Legacy);
        assert_eq!(legacy.program(), Path::new("/opt/kafka/bin/kafka-consumer-groups.sh"));
        assert_eq!(args(&legacy), ["--zookeeper", "zk:2181", "--list"]);

        let broker = tools.describe_group(Coordinator::Broker, "billing");
        assert_eq!(
            args(&broker),
            ["--bootstrap-server", "kafka:9092", "--describe", "--group", "billing"]
        );
        assert_eq!(Coordinator::ALL, [Coordinator::Legacy, Coordinator::Broker]);
    }

    #[test]
    fn create_forwards_counts_verbatim() {
        let inv = tools().create_topic("orders", "3", "twelve");
        assert_eq!(
            args(&inv),
            [
                "--zookeeper",
                "zk:2181",
                "--create",
                "--topic",
                "orders",
                "--replication-factor",
                "3",
                "--partitions",
                "twelve"
            ]
        );
    }

    #[test]
    fn consume_one_has_fixed_timeout() {
        let inv = tools().consume_one("orders", "0", "42");
        assert_eq!(inv.program_name(), "kafka-run-class.sh");
        assert_eq!(inv.get_args()[0], CONSOLE_CONSUMER_CLASS);
        assert!(inv.contains(&["--partition", "0", "--offset", "42", "--max-messages", "1"]));
        assert_eq!(inv.value_of("--timeout-ms"), Some("2000"));
    }

    #[test]
    fn retention_changes() {
        let tools = tools();
        let set = tools.set_retention("orders", 1000);
        assert_eq!(set.program_name(), "kafka-configs.sh");
        assert!(set.contains(&["--entity-type", "topics", "--entity-name", "orders"]));
        assert!(set.contains(&["--alter", "--add-config", "retention.ms=1000"]));

        let clear = tools.clear_retention("orders");
        assert!(clear.contains(&["--alter", "--delete-config", "retention.ms"]));
    }

    #[test]
    fn reset_plan_submission() {
        let inv = tools().reset_offsets_from_file("billing", Path::new("./.reset.csv"));
        assert!(inv.contains(&["--bootstrap-server", "kafka:9092"]));
        assert!(inv.contains(&["--group", "billing", "--reset-offsets", "--from-file", "./.reset.csv", "--execute"]));
    }

    #[test]
    fn offsets_query_time() {
        let tools = tools();
        assert_eq!(tools.topic_offsets("orders", OffsetTime::Earliest).value_of("--time"), Some("-2"));
        assert_eq!(tools.topic_offsets("orders", OffsetTime::Latest).value_of("--time"), Some("-1"));
    }

    #[test]
    fn metadata_cleanup_needs_zookeeper_home() {
        let inv = tools().delete_topic_metadata("orders").unwrap();
        assert_eq!(inv.program(), Path::new("/opt/zookeeper/bin/zkCli.sh"));
        assert_eq!(args(&inv), ["-server", "zk:2181", "deleteall", "/brokers/topics/orders"]);

        let without = ToolchainBuilder::new().kafka_home("/opt/kafka").build();
        assert!(without.delete_topic_metadata("orders").is_none());
    }

    #[test]
    fn from_config_copies_addresses() {
        let config = MaintConfig {
            broker: "b:9092".to_string(),
            zookeeper: "z:2181".to_string(),
            kafka_home: PathBuf::from("/k"),
            ..Default::default()
        };
        let tools = Toolchain::from_config(&config);
        assert_eq!(tools.list_groups(Coordinator::Broker).value_of("--bootstrap-server"), Some("b:9092"));
        assert_eq!(tools.list_groups(Coordinator::Legacy).value_of("--zookeeper"), Some("z:2181"));
        assert_eq!(tools.describe_topic("t").program(), Path::new("/k/bin/kafka-topics.sh"));
    }
}
