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

use kafka_maint_error::MaintError;
use kafka_maint_error::ToolsError;

use super::CommandContext;
use super::CommandExecute;
use crate::cli::validators::validate_required;
use crate::core::cleaner::CleanerOutcome;
use crate::core::cleaner::CleanerRequest;
use crate::core::cleaner::CleanerSettings;
use crate::core::cleaner::TopicCleaner;
use crate::core::runner::CommandRunner;
use crate::core::MaintResult;
use crate::ui::output;
use crate::ui::tables;

/// `-p TOPIC`: run the cleaner on one topic, with confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeTopicCommand {
    pub topic: String,
}

impl CommandExecute for PurgeTopicCommand {
    async fn execute<R: CommandRunner>(&self, ctx: &mut CommandContext<'_, R>) -> MaintResult<()> {
        validate_required("topic", &self.topic)?;
        let settings = CleanerSettings::from_config(&ctx.config.cleaner);
        let request = CleanerRequest {
            topics: vec![self.topic.clone()],
            force: false,
            resume: false,
        };
        let outcome = TopicCleaner::new(
            &mut *ctx.runner,
            ctx.tools,
            &settings,
            &mut *ctx.confirm,
            ctx.cancel.clone(),
        )
        .show_progress(true)
        .run(request)
        .await?;
        report_outcome(outcome)
    }
}

/// Print the cleaner result
///
/// # Errors
/// [`ToolsError::PartialRestore`] after the report when some retention could not be put back
pub fn report_outcome(outcome: CleanerOutcome) -> MaintResult<()> {
    match outcome {
        CleanerOutcome::Declined => {
            output::print_info("Purge cancelled, no topic was changed");
            Ok(())
        }
        CleanerOutcome::Completed(report) => {
            output::print_header("Offsets after purge");
            println!("{}", tables::offsets_table(&report.offsets));
            if !report.not_lowered.is_empty() {
                output::print_warning(&format!(
                    "Retention could not be lowered, not purged: {}",
                    report.not_lowered.join(", ")
                ));
            }
            if report.fully_restored() {
                output::print_success("Purge complete, retention restored");
                Ok(())
            } else {
                Err(MaintError::Tools(ToolsError::PartialRestore {
                    topics: report.unrestored,
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cleaner::CleanerReport;

    #[test]
    fn declined_is_success() {
        assert!(report_outcome(CleanerOutcome::Declined).is_ok());
    }

    #[test]
    fn unrestored_topics_fail_the_run() {
        let report = CleanerReport {
            unrestored: vec!["orders".to_string()],
            ..Default::default()
        };
        let err = report_outcome(CleanerOutcome::Completed(report)).unwrap_err();
        assert!(err.to_string().contains("orders"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn topics_left_unlowered_do_not_fail_the_run() {
        let report = CleanerReport {
            not_lowered: vec!["payments".to_string()],
            ..Default::default()
        };
        assert!(report_outcome(CleanerOutcome::Completed(report)).is_ok());
    }
}
