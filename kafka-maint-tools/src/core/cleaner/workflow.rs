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

//! Cleaner driver

use std::fmt;

use kafka_maint_error::MaintError;
use kafka_maint_error::MaintResult;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use super::journal::CleanerJournal;
use super::journal::ResumeLock;
use super::journal::TopicEntry;
use super::state::CleanerState;
use super::wait::Tick;
use super::wait::Waiter;
use super::CleanerOutcome;
use super::CleanerReport;
use super::CleanerRequest;
use super::CleanerSettings;
use super::Confirm;
use crate::core::admin::Toolchain;
use crate::core::runner::CommandRunner;
use crate::core::topic::TopicOffsets;
use crate::core::topic::TopicService;
use crate::ui::progress;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Purge,
    Restore,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Purge => f.write_str("purge"),
            Phase::Restore => f.write_str("retention restore"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WaitEnd {
    Satisfied,
    Elapsed,
    TimedOut,
    Cancelled,
}

/// Runs the purge procedure over a set of topics
///
/// Retention is lowered on every topic before any is restored, and restored on
/// every topic before offsets are reported. A failed command for one topic is
/// logged and the remaining topics are still handled.
pub struct TopicCleaner<'a, R: CommandRunner> {
    runner: &'a mut R,
    tools: &'a Toolchain,
    settings: &'a CleanerSettings,
    confirm: &'a mut dyn Confirm,
    cancel: CancellationToken,
    show_progress: bool,
}

impl<'a, R: CommandRunner> TopicCleaner<'a, R> {
    pub fn new(
        runner: &'a mut R,
        tools: &'a Toolchain,
        settings: &'a CleanerSettings,
        confirm: &'a mut dyn Confirm,
        cancel: CancellationToken,
    ) -> Self {
        TopicCleaner {
            runner,
            tools,
            settings,
            confirm,
            cancel,
            show_progress: false,
        }
    }

    /// Show a spinner during the wait phases
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Run a new purge, or continue the journaled one when `request.resume` is set
    ///
    /// # Errors
    /// - missing argument when no topic is given for a new run
    /// - [`JournalExists`](kafka_maint_error::ToolsError::JournalExists) when another run is unfinished
    /// - [`JournalLocked`](kafka_maint_error::ToolsError::JournalLocked) when another process is resuming
    /// - [`MaintError::Cancelled`] after Ctrl-C; retention has been restored by then
    pub async fn run(&mut self, request: CleanerRequest) -> MaintResult<CleanerOutcome> {
        if request.resume {
            let _lock = ResumeLock::acquire(&self.settings.journal_path)?;
            let mut journal = CleanerJournal::load(&self.settings.journal_path)?;
            info!(
                "resuming cleaner run on {} from state '{}'",
                journal.topic_names().join(", "),
                journal.state
            );
            return self.drive(&mut journal).await;
        }
        match self.begin(&request).await? {
            Some(mut journal) => self.drive(&mut journal).await,
            None => Ok(CleanerOutcome::Declined),
        }
    }

    async fn begin(&mut self, request: &CleanerRequest) -> MaintResult<Option<CleanerJournal>> {
        let mut topics: Vec<&str> = Vec::with_capacity(request.topics.len());
        for topic in &request.topics {
            if !topics.contains(&topic.as_str()) {
                topics.push(topic);
            }
        }
        if topics.is_empty() {
            return Err(MaintError::missing_argument("-t TOPIC"));
        }
        CleanerJournal::ensure_absent(&self.settings.journal_path)?;

        let state = CleanerState::Idle.next();
        if !request.force {
            let message = format!(
                "Purge all messages of {}? Retention drops to {} ms until restored",
                topics.join(", "),
                self.settings.purge_retention_ms
            );
            if !self.confirm.confirm(&message) {
                info!("cleaner {}, no topic was changed", CleanerState::Aborted);
                return Ok(None);
            }
        }

        let mut entries = Vec::with_capacity(topics.len());
        for topic in topics {
            let original = TopicService::retention_override(&mut *self.runner, self.tools, topic).await?;
            debug!("topic {topic} retention override before purge: {original:?}");
            entries.push(TopicEntry::new(topic, original));
        }
        let journal = CleanerJournal::create(
            &self.settings.journal_path,
            state.next(),
            self.settings.purge_retention_ms,
            entries,
        )?;
        Ok(Some(journal))
    }

    async fn drive(&mut self, journal: &mut CleanerJournal) -> MaintResult<CleanerOutcome> {
        let mut cancelled = false;
        let mut offsets = Vec::new();
        loop {
            match journal.state {
                CleanerState::Idle | CleanerState::Confirming => {
                    journal.transition(CleanerState::LoweringRetention)?;
                }
                CleanerState::LoweringRetention => {
                    self.lower(journal).await?;
                    journal.transition(journal.state.next())?;
                }
                CleanerState::WaitingForPurge => {
                    if self.wait_for(Phase::Purge, journal).await == WaitEnd::Cancelled {
                        warn!("cancelled while waiting for purge, restoring retention");
                        cancelled = true;
                    }
                    journal.transition(journal.state.next())?;
                }
                CleanerState::RestoringRetention => {
                    self.restore(journal).await?;
                    if cancelled {
                        return Self::finish_cancelled(journal);
                    }
                    journal.transition(journal.state.next())?;
                }
                CleanerState::WaitingForRestore => {
                    if self.wait_for(Phase::Restore, journal).await == WaitEnd::Cancelled {
                        return Self::finish_cancelled(journal);
                    }
                    journal.transition(journal.state.next())?;
                }
                CleanerState::Reporting => {
                    offsets = self.report(journal).await;
                    let unrestored = journal.unrestored();
                    if !unrestored.is_empty() {
                        // keep the journal so --resume retries the restore
                        journal.transition(CleanerState::RestoringRetention)?;
                        warn!(
                            "journal kept at {}, rerun with --resume to restore retention",
                            journal.path().display()
                        );
                        return Ok(CleanerOutcome::Completed(CleanerReport {
                            offsets,
                            unrestored,
                            not_lowered: journal.lower_failed(),
                        }));
                    }
                    journal.transition(journal.state.next())?;
                }
                CleanerState::Done | CleanerState::Aborted => {
                    journal.remove()?;
                    info!("cleaner run {}", journal.state);
                    return Ok(CleanerOutcome::Completed(CleanerReport {
                        offsets,
                        unrestored: Vec::new(),
                        not_lowered: journal.lower_failed(),
                    }));
                }
            }
        }
    }

    fn finish_cancelled(journal: &CleanerJournal) -> MaintResult<CleanerOutcome> {
        let unrestored = journal.unrestored();
        if unrestored.is_empty() {
            journal.remove()?;
        } else {
            warn!(
                "retention not restored for {}, journal kept at {}",
                unrestored.join(", "),
                journal.path().display()
            );
        }
        Err(MaintError::Cancelled)
    }

    async fn lower(&mut self, journal: &mut CleanerJournal) -> MaintResult<()> {
        let retention_ms = journal.purge_retention_ms;
        for index in 0..journal.topics.len() {
            if journal.topics[index].lowered {
                continue;
            }
            let topic = journal.topics[index].topic.clone();
            info!("lowering retention of topic {topic} to {retention_ms} ms");
            match TopicService::set_retention(&mut *self.runner, self.tools, &topic, retention_ms).await {
                Ok(()) => journal.mark_lowered(index)?,
                Err(e) => {
                    error!("failed to lower retention of topic {topic}: {e}");
                    journal.mark_lower_failed(index)?;
                }
            }
        }
        Ok(())
    }

    async fn restore(&mut self, journal: &mut CleanerJournal) -> MaintResult<()> {
        for index in 0..journal.topics.len() {
            let entry = &journal.topics[index];
            if !entry.needs_restore() {
                if !entry.restored {
                    debug!("retention of topic {} was never lowered, nothing to restore", entry.topic);
                }
                continue;
            }
            let topic = entry.topic.clone();
            let original = entry.original_retention;
            match original {
                Some(retention_ms) => info!("restoring retention of topic {topic} to {retention_ms} ms"),
                None => info!("removing retention override of topic {topic}"),
            }
            match TopicService::restore_retention(&mut *self.runner, self.tools, &topic, original).await {
                Ok(()) => journal.mark_restored(index)?,
                Err(e) => error!("failed to restore retention of topic {topic}: {e}"),
            }
        }
        Ok(())
    }

    async fn wait_for(&mut self, phase: Phase, journal: &CleanerJournal) -> WaitEnd {
        let spinner = self
            .show_progress
            .then(|| progress::create_spinner(&format!("Waiting for {phase}...")));
        let mut waiter = Waiter::start(self.settings.wait);
        let end = loop {
            match waiter.tick(&self.cancel).await {
                Tick::Check => {
                    if self.condition_holds(phase, journal).await {
                        break WaitEnd::Satisfied;
                    }
                }
                Tick::Elapsed => break WaitEnd::Elapsed,
                Tick::TimedOut => {
                    warn!("{phase} did not complete before the poll timeout, continuing");
                    break WaitEnd::TimedOut;
                }
                Tick::Cancelled => break WaitEnd::Cancelled,
            }
        };
        if let Some(spinner) = spinner {
            match end {
                WaitEnd::Satisfied | WaitEnd::Elapsed => progress::finish_progress_success(&spinner, &format!("{phase} wait over")),
                WaitEnd::TimedOut => progress::finish_progress_error(&spinner, &format!("{phase} timed out")),
                WaitEnd::Cancelled => progress::finish_progress_error(&spinner, "cancelled"),
            }
        }
        debug!("{phase} wait ended: {end:?}");
        end
    }

    async fn condition_holds(&mut self, phase: Phase, journal: &CleanerJournal) -> bool {
        for entry in &journal.topics {
            let holds = match phase {
                Phase::Purge if entry.lowered => {
                    match TopicService::offsets(&mut *self.runner, self.tools, &entry.topic).await {
                        Ok(offsets) if offsets.partitions.is_empty() => {
                            warn!("no partition offsets reported for topic {}, still waiting", entry.topic);
                            false
                        }
                        Ok(offsets) => offsets.is_drained(),
                        Err(e) => {
                            warn!("could not read offsets of topic {}: {e}", entry.topic);
                            false
                        }
                    }
                }
                Phase::Restore if entry.restored => {
                    match TopicService::retention_override(&mut *self.runner, self.tools, &entry.topic).await {
                        Ok(current) => current == entry.original_retention,
                        Err(e) => {
                            warn!("could not read retention of topic {}: {e}", entry.topic);
                            false
                        }
                    }
                }
                _ => true,
            };
            if !holds {
                return false;
            }
        }
        true
    }

    async fn report(&mut self, journal: &CleanerJournal) -> Vec<TopicOffsets> {
        let mut offsets = Vec::with_capacity(journal.topics.len());
        for entry in &journal.topics {
            match TopicService::offsets(&mut *self.runner, self.tools, &entry.topic).await {
                Ok(topic_offsets) => offsets.push(topic_offsets),
                Err(e) => error!("failed to read offsets of topic {}: {e}", entry.topic),
            }
        }
        offsets
    }
}
