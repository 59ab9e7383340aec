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
use crate::core::rewind::RewindService;
use crate::core::runner::CommandRunner;
use crate::core::MaintResult;
use crate::ui::output;
use crate::ui::tables;

/// `-r TOPIC GROUP DELTA`: move the group's committed offsets back by `delta`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewindOffsetsCommand {
    pub topic: String,
    pub group: String,
    pub delta: i64,
}

impl CommandExecute for RewindOffsetsCommand {
    async fn execute<R: CommandRunner>(&self, ctx: &mut CommandContext<'_, R>) -> MaintResult<()> {
        validate_required("topic", &self.topic)?;
        validate_required("group", &self.group)?;
        output::print_operation_start(&format!(
            "Rewinding group {} on topic {} by {}",
            self.group, self.topic, self.delta
        ));

        let plan = RewindService::plan(&mut *ctx.runner, ctx.tools, &self.topic, &self.group, self.delta).await?;
        println!("{}", tables::reset_plan_table(&plan));
        if plan.rows.iter().any(|row| row.target_offset < 0) {
            output::print_warning("Some targets are negative; the consumer groups tool decides how to treat them");
        }

        RewindService::submit(&mut *ctx.runner, ctx.tools, &plan, &ctx.work_dir).await?;
        output::print_success(&format!("Offsets of group {} reset", self.group));
        Ok(())
    }
}
