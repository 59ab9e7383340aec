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

use kafka_maint_error::ConfigError;
use kafka_maint_error::MaintError;
use kafka_maint_error::ToolsError;

#[test]
fn test_tools_error_into_maint_error() {
    let tools_err = ToolsError::no_committed_offsets("billing", "orders");
    let err: MaintError = tools_err.into();

    assert!(matches!(err, MaintError::Tools(ToolsError::NoCommittedOffsets { .. })));
    assert!(err.to_string().contains("billing"));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn test_config_error_into_maint_error() {
    let err = MaintError::from(ConfigError::missing_field("broker"));

    assert!(matches!(err, MaintError::Config(ConfigError::MissingRequiredField { .. })));
    assert_eq!(err.to_string(), "Missing required field: 'broker'");
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn test_external_status_is_propagated() {
    let err = MaintError::command_failed("kafka-consumer-groups.sh", Some(42));
    assert_eq!(err.exit_code(), 42);

    // a zero status never reaches the shell as a failure
    let err = MaintError::command_failed("kafka-consumer-groups.sh", Some(0));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn test_argument_errors() {
    assert_eq!(MaintError::validation("delta", "expected an integer").exit_code(), 1);
    assert_eq!(MaintError::missing_argument("-t TOPIC").exit_code(), 2);
    assert_eq!(
        MaintError::missing_argument("-t TOPIC").to_string(),
        "Missing required argument: -t TOPIC"
    );
}

#[test]
fn test_journal_errors_exit_one() {
    let err = MaintError::from(ToolsError::JournalExists {
        path: ".kafka-topic-cleaner.journal.json".to_string(),
    });
    assert!(err.to_string().contains("--resume"));
    assert_eq!(err.exit_code(), 1);
}
