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

use super::CommandContext;
use super::CommandExecute;
use crate::cli::validators::validate_required;
use crate::core::runner::CommandRunner;
use crate::core::topic::TopicService;
use crate::core::MaintResult;
use crate::ui::output;

/// `-t TOPIC`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeTopicCommand {
    pub topic: String,
}

impl CommandExecute for DescribeTopicCommand {
    async fn execute<R: CommandRunner>(&self, ctx: &mut CommandContext<'_, R>) -> MaintResult<()> {
        validate_required("topic", &self.topic)?;
        output::print_operation_start(&format!("Describing topic {}", self.topic));
        TopicService::describe(&mut *ctx.runner, ctx.tools, &self.topic).await
    }
}

/// `-n TOPIC REPLICAS PARTITIONS`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTopicCommand {
    pub topic: String,
    pub replicas: String,
    pub partitions: String,
}

impl CommandExecute for CreateTopicCommand {
    async fn execute<R: CommandRunner>(&self, ctx: &mut CommandContext<'_, R>) -> MaintResult<()> {
        validate_required("topic", &self.topic)?;
        validate_required("replicas", &self.replicas)?;
        validate_required("partitions", &self.partitions)?;
        output::print_operation_start(&format!(
            "Creating topic {} with {} replicas and {} partitions",
            self.topic, self.replicas, self.partitions
        ));
        TopicService::create(&mut *ctx.runner, ctx.tools, &self.topic, &self.replicas, &self.partitions).await
    }
}

/// `-d TOPIC`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTopicCommand {
    pub topic: String,
}

impl CommandExecute for DeleteTopicCommand {
    async fn execute<R: CommandRunner>(&self, ctx: &mut CommandContext<'_, R>) -> MaintResult<()> {
        validate_required("topic", &self.topic)?;
        output::print_operation_start(&format!("Deleting topic {}", self.topic));
        let purge_metadata = ctx.config.topics.purge_zookeeper_metadata;
        TopicService::delete(&mut *ctx.runner, ctx.tools, &self.topic, purge_metadata).await
    }
}
