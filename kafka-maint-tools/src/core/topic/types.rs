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

//! Topic-related types and output parsers

use std::collections::BTreeMap;

use kafka_maint_error::MaintError;
use kafka_maint_error::MaintResult;
use tabled::Tabled;

use crate::core::admin::GET_OFFSET_SHELL_CLASS;
use crate::core::admin::RETENTION_MS;

/// Earliest and latest offset of one partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Tabled)]
pub struct PartitionRange {
    #[tabled(rename = "PARTITION")]
    pub partition: i32,
    #[tabled(rename = "EARLIEST")]
    pub earliest: i64,
    #[tabled(rename = "LATEST")]
    pub latest: i64,
}

impl PartitionRange {
    /// Number of messages still retained
    #[inline]
    pub fn retained(&self) -> i64 {
        self.latest - self.earliest
    }
}

/// Offset ranges of every partition of a topic
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicOffsets {
    pub topic: String,
    pub partitions: Vec<PartitionRange>,
}

impl TopicOffsets {
    /// Join earliest and latest offsets on partition
    ///
    /// Partitions reported by only one of the two queries are dropped.
    pub fn merge(topic: impl Into<String>, earliest: &[(i32, i64)], latest: &[(i32, i64)]) -> Self {
        let latest: BTreeMap<i32, i64> = latest.iter().copied().collect();
        let mut partitions: Vec<PartitionRange> = earliest
            .iter()
            .filter_map(|&(partition, earliest)| {
                latest.get(&partition).map(|&latest| PartitionRange {
                    partition,
                    earliest,
                    latest,
                })
            })
            .collect();
        partitions.sort_by_key(|range| range.partition);
        TopicOffsets {
            topic: topic.into(),
            partitions,
        }
    }

    /// Whether no partition retains any message
    ///
    /// A topic without any reported partition is never drained: an empty answer
    /// says nothing about what the log still holds.
    pub fn is_drained(&self) -> bool {
        !self.partitions.is_empty() && self.partitions.iter().all(|range| range.retained() <= 0)
    }

    pub fn retained(&self) -> i64 {
        self.partitions.iter().map(PartitionRange::retained).sum()
    }
}

/// Parse `topic:partition:offset` lines printed by `GetOffsetShell`
///
/// Lines of other topics and blank lines are ignored. A line for `topic`
/// whose numbers do not parse is an error.
pub fn parse_offset_shell_output(output: &str, topic: &str) -> MaintResult<Vec<(i32, i64)>> {
    let mut offsets = Vec::new();
    for line in output.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let mut parts = line.rsplitn(3, ':');
        let (Some(offset), Some(partition), Some(name)) = (parts.next(), parts.next(), parts.next()) else {
            continue;
        };
        if name != topic {
            continue;
        }
        let parsed = partition.parse::<i32>().ok().zip(offset.parse::<i64>().ok());
        match parsed {
            Some(entry) => offsets.push(entry),
            None => {
                return Err(MaintError::output_parse_failed(
                    GET_OFFSET_SHELL_CLASS,
                    format!("malformed offset line '{line}'"),
                ))
            }
        }
    }
    Ok(offsets)
}

/// Find the topic's `retention.ms` override in `kafka-configs.sh --describe` output
///
/// Understands both the single-line `Configs for topic 'x' are a=1,b=2` layout
/// and the newer one-config-per-line layout with synonyms. Keys that merely end
/// in `retention.ms`, such as `log.retention.ms`, are not matched.
pub fn parse_retention_override(output: &str) -> Option<u64> {
    let key = format!("{RETENTION_MS}=");
    let mut rest = output;
    while let Some(pos) = rest.find(&key) {
        let boundary = rest[..pos]
            .chars()
            .next_back()
            .is_none_or(|c| !(c.is_alphanumeric() || c == '.' || c == '_'));
        let value = &rest[pos + key.len()..];
        if boundary {
            let digits: String = value.chars().take_while(char::is_ascii_digit).collect();
            if let Ok(retention) = digits.parse() {
                return Some(retention);
            }
        }
        rest = value;
    }
    None
}
