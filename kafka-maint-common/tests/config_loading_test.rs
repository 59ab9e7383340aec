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

use std::fs;
use std::path::PathBuf;

use kafka_maint_common::MaintConfig;
use kafka_maint_common::WaitMode;
use kafka_maint_error::ConfigError;
use kafka_maint_error::MaintError;

#[test]
fn load_toml_with_cleaner_section() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kafka-maint.toml");
    fs::write(
        &path,
        r#"
broker = "kafka-1:9092,kafka-2:9092"
zookeeper = "zk-1:2181/kafka"
kafka_home = "/opt/kafka"

[cleaner]
wait_mode = "fixed"
wait_secs = 15
purge_retention_ms = 500
"#,
    )
    .unwrap();

    let config = MaintConfig::load_from(&path).unwrap();
    assert_eq!(config.broker, "kafka-1:9092,kafka-2:9092");
    assert_eq!(config.zookeeper, "zk-1:2181/kafka");
    assert_eq!(config.kafka_home, PathBuf::from("/opt/kafka"));
    assert!(config.zookeeper_home.is_none());
    assert_eq!(config.cleaner.wait_mode, WaitMode::Fixed);
    assert_eq!(config.cleaner.wait_secs, 15);
    assert_eq!(config.cleaner.purge_retention_ms, 500);
    // untouched keys keep their defaults
    assert_eq!(config.cleaner.poll_interval_secs, 5);
    assert!(!config.topics.purge_zookeeper_metadata);
}

#[test]
fn load_shell_style_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.sh");
    fs::write(
        &path,
        "# cluster settings\nBROKER=\"localhost:9092\"\nZOOKEEPER=localhost:2181\nKAFKA_HOME=/opt/kafka\nZOOKEEPER_HOME=/opt/zookeeper\n",
    )
    .unwrap();

    let config = MaintConfig::load_from(&path).unwrap();
    assert_eq!(config.broker, "localhost:9092");
    assert_eq!(config.zookeeper, "localhost:2181");
    assert_eq!(config.kafka_home, PathBuf::from("/opt/kafka"));
    assert_eq!(config.zookeeper_home, Some(PathBuf::from("/opt/zookeeper")));
}

#[test]
fn missing_broker_is_reported_by_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kafka-maint.toml");
    fs::write(&path, "zookeeper = \"localhost:2181\"\nkafka_home = \"/opt/kafka\"\n").unwrap();

    let err = MaintConfig::load_from(&path).unwrap_err();
    assert!(matches!(
        err,
        MaintError::Config(ConfigError::MissingRequiredField { ref field }) if field == "broker"
    ));
}

#[test]
fn unreadable_file_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.toml");

    let err = MaintConfig::load_from(&path).unwrap_err();
    assert!(matches!(err, MaintError::Config(ConfigError::ParseFailed { .. })));
}
