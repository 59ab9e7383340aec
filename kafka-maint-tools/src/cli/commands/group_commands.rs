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
use crate::core::group::GroupService;
use crate::core::runner::CommandRunner;
use crate::core::MaintResult;
use crate::ui::output;

/// `-l`: list groups on both coordinators
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListGroupsCommand;

impl CommandExecute for ListGroupsCommand {
    async fn execute<R: CommandRunner>(&self, ctx: &mut CommandContext<'_, R>) -> MaintResult<()> {
        output::print_operation_start("Listing consumer groups");
        GroupService::list_groups(&mut *ctx.runner, ctx.tools).await
    }
}

/// `-g GROUP`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeGroupCommand {
    pub group: String,
}

impl CommandExecute for DescribeGroupCommand {
    async fn execute<R: CommandRunner>(&self, ctx: &mut CommandContext<'_, R>) -> MaintResult<()> {
        validate_required("group", &self.group)?;
        output::print_operation_start(&format!("Describing consumer group {}", self.group));
        GroupService::describe_group(&mut *ctx.runner, ctx.tools, &self.group).await
    }
}
