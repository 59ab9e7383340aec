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

//! `kafka-topic-cleaner` command line

use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::ArgAction;
use clap::CommandFactory;
use clap::Parser;
use kafka_maint_common::MaintConfig;
use kafka_maint_error::EXIT_INVALID_ARGUMENT;
use kafka_maint_error::EXIT_MISSING_ARGUMENT;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::cli::commands::purge_command::report_outcome;
use crate::cli::validators::validate_topics;
use crate::core::admin::Toolchain;
use crate::core::cleaner::CleanerRequest;
use crate::core::cleaner::CleanerSettings;
use crate::core::cleaner::Confirm;
use crate::core::cleaner::TopicCleaner;
use crate::core::runner::CommandRunner;
use crate::core::runner::ProcessRunner;
use crate::core::MaintResult;
use crate::maint_cli::cancel_on_ctrl_c;
use crate::ui::output;
use crate::ui::prompt::TerminalConfirm;

#[derive(Debug, Clone, Parser)]
#[command(name = "kafka-topic-cleaner")]
#[command(about = "Purge Kafka topics by temporarily lowering their retention", long_about = None)]
pub struct CleanerCli {
    /// Topic to purge; repeat for several topics
    #[arg(short = 't', long = "topic", value_name = "TOPIC", action = ArgAction::Append)]
    pub topics: Vec<String>,

    /// Do not ask for confirmation
    #[arg(short = 'f', long = "force")]
    pub force: bool,

    /// Continue the run recorded in the journal
    #[arg(long = "resume")]
    pub resume: bool,

    /// Configuration file
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl CleanerCli {
    pub fn request(&self) -> CleanerRequest {
        CleanerRequest {
            topics: self.topics.clone(),
            force: self.force,
            resume: self.resume,
        }
    }
}

/// Parse the command line, or the status to exit with
///
/// A run without `-t` that does not resume exits with `2` after printing usage.
pub fn parse_args<I, T>(args: I) -> Result<CleanerCli, i32>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = CleanerCli::try_parse_from(args).map_err(|e| {
        let _ = e.print();
        match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
            _ => EXIT_INVALID_ARGUMENT,
        }
    })?;
    if cli.topics.is_empty() && !cli.resume {
        output::print_error("at least one -t TOPIC is required");
        eprintln!("{}", CleanerCli::command().render_usage());
        return Err(EXIT_MISSING_ARGUMENT);
    }
    if cli.resume && !cli.topics.is_empty() {
        warn!("--resume continues the journaled topics, -t is ignored");
    }
    Ok(cli)
}

/// Run the cleaner for `cli` with the given runner and confirmation source
pub async fn run_cleaner<R: CommandRunner>(
    cli: &CleanerCli,
    runner: &mut R,
    config: &MaintConfig,
    confirm: &mut dyn Confirm,
    cancel: CancellationToken,
) -> MaintResult<()> {
    validate_topics(&cli.topics)?;
    let tools = Toolchain::from_config(config);
    let settings = CleanerSettings::from_config(&config.cleaner);
    let outcome = TopicCleaner::new(runner, &tools, &settings, confirm, cancel)
        .show_progress(true)
        .run(cli.request())
        .await?;
    report_outcome(outcome)
}

/// Entry point of the `kafka-topic-cleaner` binary
pub async fn run<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match parse_args(args) {
        Ok(cli) => cli,
        Err(code) => return code,
    };
    let result = match MaintConfig::load(cli.config.as_deref()) {
        Ok(config) => {
            let cancel = cancel_on_ctrl_c();
            run_cleaner(&cli, &mut ProcessRunner, &config, &mut TerminalConfirm, cancel).await
        }
        Err(e) => Err(e),
    };
    match result {
        Ok(()) => 0,
        Err(e) => {
            output::print_error(&e.to_string());
            e.exit_code()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_topics_accumulate() {
        let cli = parse_args(["kafka-topic-cleaner", "-t", "orders", "-f", "-t", "payments"]).unwrap();
        assert_eq!(cli.topics, vec!["orders", "payments"]);
        assert!(cli.force);
        assert!(!cli.resume);
    }

    #[test]
    fn no_topic_is_a_missing_argument() {
        assert_eq!(parse_args(["kafka-topic-cleaner"]).unwrap_err(), 2);
        assert_eq!(parse_args(["kafka-topic-cleaner", "-f"]).unwrap_err(), 2);
    }

    #[test]
    fn resume_needs_no_topic() {
        let cli = parse_args(["kafka-topic-cleaner", "--resume"]).unwrap();
        assert!(cli.request().resume);
    }

    #[test]
    fn unknown_flag_and_help() {
        assert_eq!(parse_args(["kafka-topic-cleaner", "-x"]).unwrap_err(), 1);
        assert_eq!(parse_args(["kafka-topic-cleaner", "-h"]).unwrap_err(), 0);
    }

    #[test]
    fn cli_definition_is_consistent() {
        CleanerCli::command().debug_assert();
    }
}
