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

/// `-c TOPIC` / `-a TOPIC`: print the topic from the beginning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumeAllCommand {
    pub topic: String,
}

impl CommandExecute for ConsumeAllCommand {
    async fn execute<R: CommandRunner>(&self, ctx: &mut CommandContext<'_, R>) -> MaintResult<()> {
        validate_required("topic", &self.topic)?;
        output::print_operation_start(&format!("Consuming topic {} from the beginning", self.topic));
        TopicService::consume_all(&mut *ctx.runner, ctx.tools, &self.topic).await
    }
}

/// `-m TOPIC PARTITION OFFSET`
///
/// Partition and offset go to the console consumer unparsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumeOneCommand {
    pub topic: String,
    pub partition: String,
    pub offset: String,
}

impl CommandExecute for ConsumeOneCommand {
    async fn execute<R: CommandRunner>(&self, ctx: &mut CommandContext<'_, R>) -> MaintResult<()> {
        validate_required("topic", &self.topic)?;
        validate_required("partition", &self.partition)?;
        validate_required("offset", &self.offset)?;
        output::print_operation_start(&format!(
            "Reading message {} of partition {}-{}",
            self.offset, self.topic, self.partition
        ));
        TopicService::consume_one(&mut *ctx.runner, ctx.tools, &self.topic, &self.partition, &self.offset).await
    }
}
