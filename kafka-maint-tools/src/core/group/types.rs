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

//! Consumer group data types

use tracing::warn;

const TOPIC_COLUMN: &str = "TOPIC";
const PARTITION_COLUMN: &str = "PARTITION";
const CURRENT_OFFSET_COLUMN: &str = "CURRENT-OFFSET";
const LOG_END_OFFSET_COLUMN: &str = "LOG-END-OFFSET";

/// Committed position of a group on one partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionOffset {
    pub topic: String,
    pub partition: i32,
    pub current_offset: i64,
    pub log_end_offset: Option<i64>,
}

#[derive(Debug, Clone, Copy)]
struct Columns {
    topic: usize,
    partition: usize,
    current_offset: usize,
    log_end_offset: Option<usize>,
}

impl Columns {
    fn from_header(fields: &[&str]) -> Option<Self> {
        let index_of = |name: &str| fields.iter().position(|f| *f == name);
        Some(Columns {
            topic: index_of(TOPIC_COLUMN)?,
            partition: index_of(PARTITION_COLUMN)?,
            current_offset: index_of(CURRENT_OFFSET_COLUMN)?,
            log_end_offset: index_of(LOG_END_OFFSET_COLUMN),
        })
    }
}

/// Extract the rows of `topic` from `kafka-consumer-groups.sh --describe` output.
///
/// Columns are located from the header line, so both the layout with a leading
/// `GROUP` column and the older one without it are understood. Partitions without
/// a committed offset (`-`) are skipped.
pub fn parse_describe_output(output: &str, topic: &str) -> Vec<PartitionOffset> {
    let mut columns: Option<Columns> = None;
    let mut rows = Vec::new();

    for line in output.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if let Some(header) = Columns::from_header(&fields) {
            columns = Some(header);
            continue;
        }
        let Some(cols) = columns else {
            continue;
        };
        if fields.get(cols.topic) != Some(&topic) {
            continue;
        }
        let Some(partition) = fields.get(cols.partition).and_then(|p| p.parse::<i32>().ok()) else {
            continue;
        };
        let Some(current_offset) = fields.get(cols.current_offset).and_then(|o| o.parse::<i64>().ok()) else {
            warn!("partition {topic}-{partition} has no committed offset, skipping");
            continue;
        };
        let log_end_offset = cols
            .log_end_offset
            .and_then(|i| fields.get(i))
            .and_then(|o| o.parse::<i64>().ok());
        rows.push(PartitionOffset {
            topic: topic.to_string(),
            partition,
            current_offset,
            log_end_offset,
        });
    }

    rows.sort_by_key(|row| row.partition);
    rows
}
