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

//! Tables for the rewind plan and the cleaner report

use tabled::settings::Style;
use tabled::Table;
use tabled::Tabled;

use crate::core::rewind::ResetPlan;
use crate::core::topic::TopicOffsets;

#[derive(Debug, Clone, Tabled)]
struct OffsetRow {
    #[tabled(rename = "TOPIC")]
    topic: String,
    #[tabled(rename = "PARTITION")]
    partition: i32,
    #[tabled(rename = "EARLIEST")]
    earliest: i64,
    #[tabled(rename = "LATEST")]
    latest: i64,
    #[tabled(rename = "RETAINED")]
    retained: i64,
}

pub fn reset_plan_table(plan: &ResetPlan) -> String {
    let mut table = Table::new(&plan.rows);
    table.with(Style::modern());
    table.to_string()
}

/// One row per partition of every topic
pub fn offsets_table(offsets: &[TopicOffsets]) -> String {
    let rows: Vec<OffsetRow> = offsets
        .iter()
        .flat_map(|topic| {
            topic.partitions.iter().map(|range| OffsetRow {
                topic: topic.topic.clone(),
                partition: range.partition,
                earliest: range.earliest,
                latest: range.latest,
                retained: range.retained(),
            })
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::modern());
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::group::PartitionOffset;

    #[test]
    fn plan_table_lists_targets() {
        let offsets = [PartitionOffset {
            topic: "orders".to_string(),
            partition: 0,
            current_offset: 500,
            log_end_offset: Some(600),
        }];
        let table = reset_plan_table(&ResetPlan::from_offsets("billing", "orders", &offsets, 100));
        assert!(table.contains("TARGET"));
        assert!(table.contains("orders"));
        assert!(table.contains("400"));
    }

    #[test]
    fn offsets_table_flattens_topics() {
        let offsets = [
            TopicOffsets::merge("orders", &[(0, 40)], &[(0, 40)]),
            TopicOffsets::merge("payments", &[(0, 3), (1, 7)], &[(0, 9), (1, 7)]),
        ];
        let table = offsets_table(&offsets);
        assert!(table.contains("RETAINED"));
        assert!(table.contains("payments"));
        assert_eq!(table.matches("payments").count(), 2);
    }
}
