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

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Phase of a cleaner run
///
/// Persisted in the journal after every transition, so a killed run can be
/// picked up again from the phase it reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanerState {
    #[default]
    Idle,
    Confirming,
    LoweringRetention,
    WaitingForPurge,
    RestoringRetention,
    WaitingForRestore,
    Reporting,
    Done,
    /// Confirmation was declined
    Aborted,
}

impl CleanerState {
    /// Successor on the happy path; terminal states stay put
    pub fn next(self) -> Self {
        match self {
            CleanerState::Idle => CleanerState::Confirming,
            CleanerState::Confirming => CleanerState::LoweringRetention,
            CleanerState::LoweringRetention => CleanerState::WaitingForPurge,
            CleanerState::WaitingForPurge => CleanerState::RestoringRetention,
            CleanerState::RestoringRetention => CleanerState::WaitingForRestore,
            CleanerState::WaitingForRestore => CleanerState::Reporting,
            CleanerState::Reporting => CleanerState::Done,
            CleanerState::Done => CleanerState::Done,
            CleanerState::Aborted => CleanerState::Aborted,
        }
    }
}

impl fmt::Display for CleanerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CleanerState::Idle => "idle",
            CleanerState::Confirming => "confirming",
            CleanerState::LoweringRetention => "lowering retention",
            CleanerState::WaitingForPurge => "waiting for purge",
            CleanerState::RestoringRetention => "restoring retention",
            CleanerState::WaitingForRestore => "waiting for restore",
            CleanerState::Reporting => "reporting",
            CleanerState::Done => "done",
            CleanerState::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_reaches_done() {
        let mut state = CleanerState::Idle;
        let mut seen = vec![state];
        while state != CleanerState::Done {
            state = state.next();
            seen.push(state);
        }
        assert_eq!(seen.len(), 8);
        assert_eq!(state, CleanerState::Done);
        assert_eq!(CleanerState::Done.next(), CleanerState::Done);
        assert_eq!(CleanerState::Aborted.next(), CleanerState::Aborted);
    }

    #[test]
    fn serializes_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&CleanerState::WaitingForPurge).unwrap(),
            "\"waiting_for_purge\""
        );
        let state: CleanerState = serde_json::from_str("\"restoring_retention\"").unwrap();
        assert_eq!(state, CleanerState::RestoringRetention);
    }
}
