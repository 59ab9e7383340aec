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

use thiserror::Error;

/// Errors raised while driving the external admin binaries
#[derive(Debug, Error)]
pub enum ToolsError {
    // ============================================================================
    // External Command Errors
    // ============================================================================
    /// The external binary ran and exited unsuccessfully
    #[error("External command '{program}' failed with {}", describe_status(.code))]
    CommandFailed { program: String, code: Option<i32> },

    /// The external binary could not be started
    #[error("Failed to start '{program}': {reason}")]
    CommandSpawnFailed { program: String, reason: String },

    /// The external binary printed something we could not interpret
    #[error("Unexpected output from '{program}': {reason}")]
    OutputParseFailed { program: String, reason: String },

    // ============================================================================
    // Argument Errors
    // ============================================================================
    /// Input validation failed
    #[error("Validation failed for '{field}': {reason}")]
    ValidationError { field: String, reason: String },

    /// A required argument was not supplied
    #[error("Missing required argument: {argument}")]
    MissingArgument { argument: String },

    // ============================================================================
    // Offset Errors
    // ============================================================================
    /// Rewind found nothing to reset
    #[error("Consumer group '{group}' has no committed offsets on topic '{topic}'")]
    NoCommittedOffsets { group: String, topic: String },

    // ============================================================================
    // Cleaner Errors
    // ============================================================================
    /// A previous cleaner run has not finished
    #[error("Cleaner journal '{path}' already exists; finish it with --resume")]
    JournalExists { path: String },

    /// Another process is resuming the same journal
    #[error("Cleaner journal '{path}' is being resumed by another process (lock '{lock}')")]
    JournalLocked { path: String, lock: String },

    /// Nothing to resume
    #[error("No cleaner journal at '{path}' to resume")]
    JournalNotFound { path: String },

    /// Retention could not be restored on some topics
    #[error("Retention was not restored for: {}", .topics.join(", "))]
    PartialRestore { topics: Vec<String> },
}

fn describe_status(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {code}"),
        None => "termination by signal".to_string(),
    }
}

impl ToolsError {
    /// Create an external command failure
    #[inline]
    pub fn command_failed(program: impl Into<String>, code: Option<i32>) -> Self {
        Self::CommandFailed {
            program: program.into(),
            code,
        }
    }

    /// Create a validation error
    #[inline]
    pub fn validation_error(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a no committed offsets error
    #[inline]
    pub fn no_committed_offsets(group: impl Into<String>, topic: impl Into<String>) -> Self {
        Self::NoCommittedOffsets {
            group: group.into(),
            topic: topic.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_errors() {
        let err = ToolsError::command_failed("kafka-topics.sh", Some(1));
        assert_eq!(
            err.to_string(),
            "External command 'kafka-topics.sh' failed with exit status 1"
        );

        let err = ToolsError::command_failed("kafka-configs.sh", None);
        assert_eq!(
            err.to_string(),
            "External command 'kafka-configs.sh' failed with termination by signal"
        );
    }

    #[test]
    fn test_offset_errors() {
        let err = ToolsError::no_committed_offsets("billing", "orders");
        assert_eq!(
            err.to_string(),
            "Consumer group 'billing' has no committed offsets on topic 'orders'"
        );
    }

    #[test]
    fn test_partial_restore() {
        let err = ToolsError::PartialRestore {
            topics: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(err.to_string(), "Retention was not restored for: a, b");
    }

    #[test]
    fn test_journal_locked() {
        let err = ToolsError::JournalLocked {
            path: "j.json".to_string(),
            lock: "j.json.lock".to_string(),
        };
        assert!(err.to_string().contains("j.json.lock"));
    }
}
