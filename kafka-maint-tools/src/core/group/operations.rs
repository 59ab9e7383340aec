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

//! Consumer group operations

use tracing::debug;

use super::types::parse_describe_output;
use super::types::PartitionOffset;
use crate::core::admin::Coordinator;
use crate::core::admin::Toolchain;
use crate::core::runner::CommandRunner;
use crate::core::MaintResult;

/// Consumer group operations service
pub struct GroupService;

impl GroupService {
    /// List groups known to the legacy coordinator, then to the broker
    ///
    /// Both listings reach the terminal as printed by the tool, one after the other.
    pub async fn list_groups<R: CommandRunner>(runner: &mut R, tools: &Toolchain) -> MaintResult<()> {
        for coordinator in Coordinator::ALL {
            debug!("listing consumer groups via {coordinator}");
            runner.run(&tools.list_groups(coordinator)).await?;
        }
        Ok(())
    }

    /// Describe `group` against the legacy coordinator, then the broker
    pub async fn describe_group<R: CommandRunner>(runner: &mut R, tools: &Toolchain, group: &str) -> MaintResult<()> {
        for coordinator in Coordinator::ALL {
            debug!("describing consumer group {group} via {coordinator}");
            runner.run(&tools.describe_group(coordinator, group)).await?;
        }
        Ok(())
    }

    /// Committed offsets of `group` on every partition of `topic`
    ///
    /// # Returns
    /// Rows sorted by partition; empty when the group never committed on the topic
    pub async fn committed_offsets<R: CommandRunner>(
        runner: &mut R,
        tools: &Toolchain,
        group: &str,
        topic: &str,
    ) -> MaintResult<Vec<PartitionOffset>> {
        let output = runner
            .capture(&tools.describe_group(Coordinator::Broker, group))
            .await?;
        Ok(parse_describe_output(&output, topic))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::admin::ToolchainBuilder;
    use crate::testing::RecordingRunner;

    fn tools() -> Toolchain {
        ToolchainBuilder::new()
            .kafka_home("/opt/kafka")
            .broker("kafka:9092")
            .zookeeper("zk:2181")
            .build()
    }

    #[tokio::test]
    async fn list_queries_legacy_then_broker() {
        let mut runner = RecordingRunner::new();
        GroupService::list_groups(&mut runner, &tools()).await.unwrap();

        let invocations = runner.invocations();
        assert_eq!(invocations.len(), 2);
        assert!(invocations[0].contains(&["--zookeeper", "zk:2181", "--list"]));
        assert!(invocations[1].contains(&["--bootstrap-server", "kafka:9092", "--list"]));
    }

    #[tokio::test]
    async fn legacy_failure_stops_describe() {
        let mut runner = RecordingRunner::new().fail_on(&["--zookeeper"], 1);
        let err = GroupService::describe_group(&mut runner, &tools(), "billing")
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 1);
        assert_eq!(runner.invocations().len(), 1);
    }

    #[tokio::test]
    async fn committed_offsets_come_from_broker() {
        let mut runner = RecordingRunner::new().respond_to(
            &["--describe", "--group", "billing"],
            "TOPIC PARTITION CURRENT-OFFSET LOG-END-OFFSET LAG\norders 0 500 510 10\n",
        );
        let rows = GroupService::committed_offsets(&mut runner, &tools(), "billing", "orders")
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].current_offset, 500);
        assert!(runner.invocations()[0].contains(&["--bootstrap-server", "kafka:9092"]));
    }
}
