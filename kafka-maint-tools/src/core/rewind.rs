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

//! Consumer group offset rewind
//!
//! A rewind is a read-modify-write against `kafka-consumer-groups.sh`:
//! read the committed offsets, subtract the delta, submit the result as a
//! reset plan file.

use std::io::Write;
use std::path::Path;

use kafka_maint_error::MaintError;
use kafka_maint_error::ToolsError;
use tabled::Tabled;
use tracing::debug;
use tracing::warn;

use crate::core::admin::Toolchain;
use crate::core::group::GroupService;
use crate::core::group::PartitionOffset;
use crate::core::runner::CommandRunner;
use crate::core::MaintResult;

const PLAN_FILE_PREFIX: &str = ".reset-offsets-";
const PLAN_FILE_SUFFIX: &str = ".csv";

/// Target offset of one partition
#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct ResetPlanRow {
    #[tabled(rename = "TOPIC")]
    pub topic: String,
    #[tabled(rename = "PARTITION")]
    pub partition: i32,
    #[tabled(rename = "CURRENT")]
    pub current_offset: i64,
    #[tabled(rename = "TARGET")]
    pub target_offset: i64,
}

/// Offsets to submit for one group
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetPlan {
    pub group: String,
    pub topic: String,
    pub rows: Vec<ResetPlanRow>,
}

impl ResetPlan {
    /// Move every committed offset back by `delta`
    ///
    /// Targets are not clamped at zero. A negative target is logged and left
    /// for the consumer groups tool to accept or reject.
    pub fn from_offsets(group: &str, topic: &str, offsets: &[PartitionOffset], delta: i64) -> Self {
        let rows = offsets
            .iter()
            .map(|offset| {
                let target_offset = offset.current_offset.saturating_sub(delta);
                if target_offset < 0 {
                    warn!(
                        "partition {}-{} would be reset to negative offset {target_offset}",
                        offset.topic, offset.partition
                    );
                }
                ResetPlanRow {
                    topic: offset.topic.clone(),
                    partition: offset.partition,
                    current_offset: offset.current_offset,
                    target_offset,
                }
            })
            .collect();
        ResetPlan {
            group: group.to_string(),
            topic: topic.to_string(),
            rows,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `topic,partition,offset` lines as read by `--reset-offsets --from-file`
    pub fn to_csv(&self) -> String {
        self.rows
            .iter()
            .map(|row| format!("{},{},{}\n", row.topic, row.partition, row.target_offset))
            .collect()
    }
}

/// Offset rewind service
pub struct RewindService;

impl RewindService {
    /// Read the committed offsets of `group` on `topic` and derive the reset plan
    ///
    /// # Errors
    /// [`ToolsError::NoCommittedOffsets`] when the group has nothing committed on the topic
    pub async fn plan<R: CommandRunner>(
        runner: &mut R,
        tools: &Toolchain,
        topic: &str,
        group: &str,
        delta: i64,
    ) -> MaintResult<ResetPlan> {
        let offsets = GroupService::committed_offsets(runner, tools, group, topic).await?;
        let plan = ResetPlan::from_offsets(group, topic, &offsets, delta);
        if plan.is_empty() {
            return Err(MaintError::Tools(ToolsError::no_committed_offsets(group, topic)));
        }
        Ok(plan)
    }

    /// Write `plan` to a dot-prefixed file in `dir` and submit it
    ///
    /// The file is removed once the submission returns, whatever its outcome.
    pub async fn submit<R: CommandRunner>(
        runner: &mut R,
        tools: &Toolchain,
        plan: &ResetPlan,
        dir: &Path,
    ) -> MaintResult<()> {
        let mut file = tempfile::Builder::new()
            .prefix(PLAN_FILE_PREFIX)
            .suffix(PLAN_FILE_SUFFIX)
            .tempfile_in(dir)?;
        file.write_all(plan.to_csv().as_bytes())?;
        file.flush()?;
        debug!("reset plan for {} written to {}", plan.group, file.path().display());

        let result = runner
            .run(&tools.reset_offsets_from_file(&plan.group, file.path()))
            .await;
        file.close()?;
        result
    }

    /// [`plan`](Self::plan) then [`submit`](Self::submit)
    pub async fn rewind<R: CommandRunner>(
        runner: &mut R,
        tools: &Toolchain,
        topic: &str,
        group: &str,
        delta: i64,
        dir: &Path,
    ) -> MaintResult<ResetPlan> {
        let plan = Self::plan(runner, tools, topic, group, delta).await?;
        Self::submit(runner, tools, &plan, dir).await?;
        Ok(plan)
    }
}
