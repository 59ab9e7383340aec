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

//! Maintenance commands
//!
//! One struct per flag of `kafka-maint`. Each is a thin wrapper that checks
//! its input and calls into [`crate::core`].

pub mod consume_commands;
pub mod group_commands;
pub mod offset_commands;
pub mod purge_command;
pub mod topic_commands;

use std::path::PathBuf;

use kafka_maint_common::MaintConfig;
use tokio_util::sync::CancellationToken;

pub use self::consume_commands::ConsumeAllCommand;
pub use self::consume_commands::ConsumeOneCommand;
pub use self::group_commands::DescribeGroupCommand;
pub use self::group_commands::ListGroupsCommand;
pub use self::offset_commands::RewindOffsetsCommand;
pub use self::purge_command::PurgeTopicCommand;
pub use self::topic_commands::CreateTopicCommand;
pub use self::topic_commands::DeleteTopicCommand;
pub use self::topic_commands::DescribeTopicCommand;
use crate::core::admin::Toolchain;
use crate::core::cleaner::Confirm;
use crate::core::runner::CommandRunner;
use crate::core::MaintResult;

/// Everything a command needs to reach the cluster
pub struct CommandContext<'a, R: CommandRunner> {
    pub runner: &'a mut R,
    pub tools: &'a Toolchain,
    pub config: &'a MaintConfig,
    pub confirm: &'a mut dyn Confirm,
    pub cancel: CancellationToken,
    /// Where transient reset plan files are written
    pub work_dir: PathBuf,
}

/// Execution behaviour shared by every command
pub trait CommandExecute {
    async fn execute<R: CommandRunner>(&self, ctx: &mut CommandContext<'_, R>) -> MaintResult<()>;
}

/// One flag occurrence on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaintAction {
    ListGroups(ListGroupsCommand),
    DescribeGroup(DescribeGroupCommand),
    DescribeTopic(DescribeTopicCommand),
    ConsumeAll(ConsumeAllCommand),
    ConsumeOne(ConsumeOneCommand),
    CreateTopic(CreateTopicCommand),
    PurgeTopic(PurgeTopicCommand),
    RewindOffsets(RewindOffsetsCommand),
    DeleteTopic(DeleteTopicCommand),
}

impl CommandExecute for MaintAction {
    async fn execute<R: CommandRunner>(&self, ctx: &mut CommandContext<'_, R>) -> MaintResult<()> {
        match self {
            MaintAction::ListGroups(value) => value.execute(ctx).await,
            MaintAction::DescribeGroup(value) => value.execute(ctx).await,
            MaintAction::DescribeTopic(value) => value.execute(ctx).await,
            MaintAction::ConsumeAll(value) => value.execute(ctx).await,
            MaintAction::ConsumeOne(value) => value.execute(ctx).await,
            MaintAction::CreateTopic(value) => value.execute(ctx).await,
            MaintAction::PurgeTopic(value) => value.execute(ctx).await,
            MaintAction::RewindOffsets(value) => value.execute(ctx).await,
            MaintAction::DeleteTopic(value) => value.execute(ctx).await,
        }
    }
}
