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

//! Topic operations
//!
//! Thin wrappers over `kafka-topics.sh`, `kafka-configs.sh` and the console
//! tools run through `kafka-run-class.sh`.

use tracing::info;
use tracing::warn;

use super::types::parse_offset_shell_output;
use super::types::parse_retention_override;
use super::types::TopicOffsets;
use crate::core::admin::OffsetTime;
use crate::core::admin::Toolchain;
use crate::core::runner::CommandRunner;
use crate::core::MaintResult;

/// Topic operations service
pub struct TopicService;

impl TopicService {
    pub async fn describe<R: CommandRunner>(runner: &mut R, tools: &Toolchain, topic: &str) -> MaintResult<()> {
        runner.run(&tools.describe_topic(topic)).await
    }

    /// Create a topic; counts are forwarded to `kafka-topics.sh` as given
    pub async fn create<R: CommandRunner>(
        runner: &mut R,
        tools: &Toolchain,
        topic: &str,
        replicas: &str,
        partitions: &str,
    ) -> MaintResult<()> {
        runner.run(&tools.create_topic(topic, replicas, partitions)).await
    }

    /// Delete a topic
    ///
    /// # Arguments
    /// * `purge_metadata` - Also remove `/brokers/topics/<topic>` with `zkCli.sh`
    pub async fn delete<R: CommandRunner>(
        runner: &mut R,
        tools: &Toolchain,
        topic: &str,
        purge_metadata: bool,
    ) -> MaintResult<()> {
        runner.run(&tools.delete_topic(topic)).await?;
        if !purge_metadata {
            return Ok(());
        }
        match tools.delete_topic_metadata(topic) {
            Some(invocation) => {
                info!("removing zookeeper metadata of topic {topic}");
                runner.run(&invocation).await
            }
            None => {
                warn!("zookeeper_home is not configured, metadata of topic {topic} is left in place");
                Ok(())
            }
        }
    }

    pub async fn consume_all<R: CommandRunner>(runner: &mut R, tools: &Toolchain, topic: &str) -> MaintResult<()> {
        runner.run(&tools.consume_all(topic)).await
    }

    /// Print the single message at `offset` of `partition`
    pub async fn consume_one<R: CommandRunner>(
        runner: &mut R,
        tools: &Toolchain,
        topic: &str,
        partition: &str,
        offset: &str,
    ) -> MaintResult<()> {
        runner.run(&tools.consume_one(topic, partition, offset)).await
    }

    /// Current `retention.ms` override, `None` when the broker default applies
    pub async fn retention_override<R: CommandRunner>(
        runner: &mut R,
        tools: &Toolchain,
        topic: &str,
    ) -> MaintResult<Option<u64>> {
        let output = runner.capture(&tools.describe_topic_config(topic)).await?;
        Ok(parse_retention_override(&output))
    }

    pub async fn set_retention<R: CommandRunner>(
        runner: &mut R,
        tools: &Toolchain,
        topic: &str,
        retention_ms: u64,
    ) -> MaintResult<()> {
        runner.run(&tools.set_retention(topic, retention_ms)).await
    }

    pub async fn clear_retention<R: CommandRunner>(runner: &mut R, tools: &Toolchain, topic: &str) -> MaintResult<()> {
        runner.run(&tools.clear_retention(topic)).await
    }

    /// Put back a previously read override, or drop the override if there was none
    pub async fn restore_retention<R: CommandRunner>(
        runner: &mut R,
        tools: &Toolchain,
        topic: &str,
        original: Option<u64>,
    ) -> MaintResult<()> {
        match original {
            Some(retention_ms) => Self::set_retention(runner, tools, topic, retention_ms).await,
            None => Self::clear_retention(runner, tools, topic).await,
        }
    }

    /// Earliest and latest offset of every partition
    pub async fn offsets<R: CommandRunner>(runner: &mut R, tools: &Toolchain, topic: &str) -> MaintResult<TopicOffsets> {
        let earliest = runner.capture(&tools.topic_offsets(topic, OffsetTime::Earliest)).await?;
        let latest = runner.capture(&tools.topic_offsets(topic, OffsetTime::Latest)).await?;
        Ok(TopicOffsets::merge(
            topic,
            &parse_offset_shell_output(&earliest, topic)?,
            &parse_offset_shell_output(&latest, topic)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::admin::ToolchainBuilder;
    use crate::testing::RecordingRunner;

    fn tools(with_zookeeper_home: bool) -> Toolchain {
        let builder = ToolchainBuilder::new()
            .kafka_home("/opt/kafka")
            .broker("kafka:9092")
            .zookeeper("zk:2181");
        if with_zookeeper_home {
            builder.zookeeper_home("/opt/zookeeper").build()
        } else {
            builder.build()
        }
    }

    #[tokio::test]
    async fn delete_without_metadata_cleanup() {
        let mut runner = RecordingRunner::new();
        TopicService::delete(&mut runner, &tools(true), "orders", false).await.unwrap();
        assert_eq!(runner.invocations().len(), 1);
        assert!(runner.invocations()[0].contains(&["--delete", "--topic", "orders"]));
    }

    #[tokio::test]
    async fn delete_with_metadata_cleanup() {
        let mut runner = RecordingRunner::new();
        TopicService::delete(&mut runner, &tools(true), "orders", true).await.unwrap();
        assert_eq!(runner.count(&["zkCli.sh", "deleteall", "/brokers/topics/orders"]), 1);

        let mut runner = RecordingRunner::new();
        TopicService::delete(&mut runner, &tools(false), "orders", true).await.unwrap();
        assert_eq!(runner.invocations().len(), 1);
    }

    #[tokio::test]
    async fn failed_delete_skips_metadata_cleanup() {
        let mut runner = RecordingRunner::new().fail_on(&["--delete"], 1);
        assert!(TopicService::delete(&mut runner, &tools(true), "orders", true).await.is_err());
        assert_eq!(runner.count(&["zkCli.sh"]), 0);
    }

    #[tokio::test]
    async fn restore_chooses_add_or_delete() {
        let tools = tools(false);
        let mut runner = RecordingRunner::new();
        TopicService::restore_retention(&mut runner, &tools, "orders", Some(86_400_000)).await.unwrap();
        TopicService::restore_retention(&mut runner, &tools, "payments", None).await.unwrap();

        let invocations = runner.invocations();
        assert!(invocations[0].contains(&["--add-config", "retention.ms=86400000"]));
        assert!(invocations[1].contains(&["--entity-name", "payments"]));
        assert!(invocations[1].contains(&["--delete-config", "retention.ms"]));
    }

    #[tokio::test]
    async fn offsets_merge_both_queries() {
        let mut runner = RecordingRunner::new()
            .respond_to(&["--time", "-2"], "orders:0:100\norders:1:0\n")
            .respond_to(&["--time", "-1"], "orders:0:100\norders:1:25\n");
        let offsets = TopicService::offsets(&mut runner, &tools(false), "orders").await.unwrap();
        assert_eq!(offsets.partitions.len(), 2);
        assert_eq!(offsets.retained(), 25);
    }

    #[tokio::test]
    async fn retention_override_is_parsed() {
        let mut runner = RecordingRunner::new().respond_to(
            &["--describe"],
            "Configs for topic 'orders' are retention.ms=5000\n",
        );
        let current = TopicService::retention_override(&mut runner, &tools(false), "orders").await.unwrap();
        assert_eq!(current, Some(5000));
    }
}
