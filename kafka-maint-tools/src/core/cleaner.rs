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

//! Topic cleaner
//!
//! Purges topics by lowering `retention.ms`, waiting for the brokers to drop
//! the old segments, and putting the original retention back.
//!
//! - [`state`] - Phases of a run
//! - [`journal`] - JSON record of a run, used by `--resume`
//! - [`wait`] - Fixed or polling waits that honour Ctrl-C
//! - [`workflow`] - [`TopicCleaner`], the driver

pub mod journal;
pub mod state;
pub mod wait;
pub mod workflow;

use std::path::PathBuf;

use kafka_maint_common::CleanerConfig;

pub use journal::CleanerJournal;
pub use journal::ResumeLock;
pub use journal::TopicEntry;
pub use state::CleanerState;
pub use wait::WaitStrategy;
pub use workflow::TopicCleaner;

use crate::core::topic::TopicOffsets;

/// Interactive yes/no gate before retention is touched
pub trait Confirm {
    fn confirm(&mut self, message: &str) -> bool;
}

/// Cleaner settings derived from the `[cleaner]` config section
#[derive(Debug, Clone)]
pub struct CleanerSettings {
    pub purge_retention_ms: u64,
    pub wait: WaitStrategy,
    pub journal_path: PathBuf,
}

impl CleanerSettings {
    pub fn from_config(config: &CleanerConfig) -> Self {
        CleanerSettings {
            purge_retention_ms: config.purge_retention_ms,
            wait: WaitStrategy::from_config(config),
            journal_path: config.journal_path.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CleanerRequest {
    pub topics: Vec<String>,
    /// Skip the confirmation prompt
    pub force: bool,
    /// Continue the run recorded in the journal
    pub resume: bool,
}

/// Offsets after the run, and the topics whose retention could not be restored
#[derive(Debug, Clone, Default)]
pub struct CleanerReport {
    pub offsets: Vec<TopicOffsets>,
    pub unrestored: Vec<String>,
    /// Topics never purged because lowering their retention failed
    pub not_lowered: Vec<String>,
}

impl CleanerReport {
    #[inline]
    pub fn fully_restored(&self) -> bool {
        self.unrestored.is_empty()
    }
}

#[derive(Debug, Clone)]
pub enum CleanerOutcome {
    Completed(CleanerReport),
    /// Confirmation was declined; nothing was changed
    Declined,
}
