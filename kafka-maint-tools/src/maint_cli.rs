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

//! `kafka-maint` command line
//!
//! Flags are dispatched in the order they appear, so
//! `kafka-maint -t orders -r orders billing 100 -t orders` describes the topic,
//! rewinds the group and describes the topic again. The first failing flag
//! stops the run and its status becomes the process status.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::ArgAction;
use clap::ArgMatches;
use clap::CommandFactory;
use clap::FromArgMatches;
use clap::Parser;
use clap_complete::generate;
use clap_complete::shells::Bash;
use clap_complete::shells::Fish;
use clap_complete::shells::Zsh;
use kafka_maint_common::MaintConfig;
use kafka_maint_error::MaintError;
use kafka_maint_error::MaintResult;
use kafka_maint_error::EXIT_INVALID_ARGUMENT;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cli::commands::CommandContext;
use crate::cli::commands::CommandExecute;
use crate::cli::commands::ConsumeAllCommand;
use crate::cli::commands::ConsumeOneCommand;
use crate::cli::commands::CreateTopicCommand;
use crate::cli::commands::DeleteTopicCommand;
use crate::cli::commands::DescribeGroupCommand;
use crate::cli::commands::DescribeTopicCommand;
use crate::cli::commands::ListGroupsCommand;
use crate::cli::commands::MaintAction;
use crate::cli::commands::PurgeTopicCommand;
use crate::cli::commands::RewindOffsetsCommand;
use crate::cli::validators::parse_delta;
use crate::core::admin::Toolchain;
use crate::core::cleaner::Confirm;
use crate::core::runner::CommandRunner;
use crate::core::runner::ProcessRunner;
use crate::ui::output;
use crate::ui::prompt::TerminalConfirm;

const BIN_NAME: &str = "kafka-maint";

#[derive(Debug, Parser)]
#[command(name = "kafka-maint")]
#[command(about = "Kafka cluster maintenance through the stock admin scripts", long_about = None)]
pub struct MaintCli {
    /// List consumer groups on Zookeeper and on the broker
    // one value per occurrence, so each `-l` keeps its own index
    #[arg(
        short = 'l',
        long = "list-groups",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL",
        action = ArgAction::Append
    )]
    list_groups: Vec<bool>,

    /// Describe a consumer group
    #[arg(short = 'g', long = "group", value_name = "GROUP", action = ArgAction::Append)]
    describe_group: Vec<String>,

    /// Describe a topic
    #[arg(short = 't', long = "topic", value_name = "TOPIC", action = ArgAction::Append)]
    describe_topic: Vec<String>,

    /// Consume all messages of a topic from the beginning
    #[arg(
        short = 'c',
        visible_short_alias = 'a',
        long = "consume",
        value_name = "TOPIC",
        action = ArgAction::Append
    )]
    consume_all: Vec<String>,

    /// Consume the single message at an offset
    #[arg(
        short = 'm',
        long = "message",
        num_args = 3,
        value_names = ["TOPIC", "PARTITION", "OFFSET"],
        allow_negative_numbers = true,
        action = ArgAction::Append
    )]
    consume_one: Vec<String>,

    /// Create a topic
    #[arg(
        short = 'n',
        long = "create",
        num_args = 3,
        value_names = ["TOPIC", "REPLICAS", "PARTITIONS"],
        allow_negative_numbers = true,
        action = ArgAction::Append
    )]
    create_topic: Vec<String>,

    /// Purge all messages of a topic, asking first
    #[arg(short = 'p', long = "purge", value_name = "TOPIC", action = ArgAction::Append)]
    purge_topic: Vec<String>,

    /// Move a group's committed offsets on a topic back by DELTA
    #[arg(
        short = 'r',
        long = "rewind",
        num_args = 3,
        value_names = ["TOPIC", "GROUP", "DELTA"],
        allow_negative_numbers = true,
        action = ArgAction::Append
    )]
    rewind: Vec<String>,

    /// Delete a topic
    #[arg(short = 'd', long = "delete", value_name = "TOPIC", action = ArgAction::Append)]
    delete_topic: Vec<String>,

    /// Configuration file
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Generate shell completion script
    #[arg(
        long = "generate-completion",
        value_name = "SHELL",
        value_parser = ["bash", "zsh", "fish"],
        help = "Generate shell completion script (bash, zsh, fish)"
    )]
    completion: Option<String>,
}

/// Result of reading the command line
#[derive(Debug)]
pub enum ParsedArgs {
    /// Flag occurrences in command-line order
    Run {
        config: Option<PathBuf>,
        actions: Vec<MaintAction>,
    },
    /// Nothing to run; exit with this status
    Exit(i32),
}

fn positions(matches: &ArgMatches, id: &str, arity: usize) -> Vec<usize> {
    matches
        .indices_of(id)
        .map(|indices| indices.step_by(arity).collect())
        .unwrap_or_default()
}

impl MaintCli {
    /// Turn every flag occurrence into its action, ordered by position
    fn actions(&self, matches: &ArgMatches) -> MaintResult<Vec<MaintAction>> {
        let mut ordered: Vec<(usize, MaintAction)> = Vec::new();

        // `-l=false` is accepted and queues nothing
        for (index, _) in positions(matches, "list_groups", 1)
            .into_iter()
            .zip(&self.list_groups)
            .filter(|(_, enabled)| **enabled)
        {
            ordered.push((index, MaintAction::ListGroups(ListGroupsCommand)));
        }
        let singles: [(&str, &Vec<String>, fn(String) -> MaintAction); 4] = [
            ("describe_group", &self.describe_group, |group| {
                MaintAction::DescribeGroup(DescribeGroupCommand { group })
            }),
            ("describe_topic", &self.describe_topic, |topic| {
                MaintAction::DescribeTopic(DescribeTopicCommand { topic })
            }),
            ("consume_all", &self.consume_all, |topic| {
                MaintAction::ConsumeAll(ConsumeAllCommand { topic })
            }),
            ("delete_topic", &self.delete_topic, |topic| {
                MaintAction::DeleteTopic(DeleteTopicCommand { topic })
            }),
        ];
        for (id, values, build) in singles {
            for (index, value) in positions(matches, id, 1).into_iter().zip(values) {
                ordered.push((index, build(value.clone())));
            }
        }
        for (index, topic) in positions(matches, "purge_topic", 1).into_iter().zip(&self.purge_topic) {
            ordered.push((
                index,
                MaintAction::PurgeTopic(PurgeTopicCommand { topic: topic.clone() }),
            ));
        }

        for (index, values) in positions(matches, "consume_one", 3)
            .into_iter()
            .zip(self.consume_one.chunks_exact(3))
        {
            ordered.push((
                index,
                MaintAction::ConsumeOne(ConsumeOneCommand {
                    topic: values[0].clone(),
                    partition: values[1].clone(),
                    offset: values[2].clone(),
                }),
            ));
        }
        for (index, values) in positions(matches, "create_topic", 3)
            .into_iter()
            .zip(self.create_topic.chunks_exact(3))
        {
            ordered.push((
                index,
                MaintAction::CreateTopic(CreateTopicCommand {
                    topic: values[0].clone(),
                    replicas: values[1].clone(),
                    partitions: values[2].clone(),
                }),
            ));
        }
        for (index, values) in positions(matches, "rewind", 3)
            .into_iter()
            .zip(self.rewind.chunks_exact(3))
        {
            ordered.push((
                index,
                MaintAction::RewindOffsets(RewindOffsetsCommand {
                    topic: values[0].clone(),
                    group: values[1].clone(),
                    delta: parse_delta(&values[2])?,
                }),
            ));
        }

        ordered.sort_by_key(|(index, _)| *index);
        Ok(ordered.into_iter().map(|(_, action)| action).collect())
    }

    fn print_completion(shell: &str) -> i32 {
        let mut cmd = MaintCli::command();
        match shell {
            "bash" => generate(Bash, &mut cmd, BIN_NAME, &mut std::io::stdout()),
            "zsh" => generate(Zsh, &mut cmd, BIN_NAME, &mut std::io::stdout()),
            "fish" => generate(Fish, &mut cmd, BIN_NAME, &mut std::io::stdout()),
            _ => {
                output::print_error(&format!("Unsupported shell: {shell}, supported shells: bash, zsh, fish"));
                return EXIT_INVALID_ARGUMENT;
            }
        }
        0
    }
}

/// Read the command line
///
/// Usage and parse errors are printed here: help goes to stdout with status
/// `0`, errors to stderr with status `1`.
pub fn parse_args<I, T>(args: I) -> ParsedArgs
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = match MaintCli::command().try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(e) => return ParsedArgs::Exit(clap_exit(e)),
    };
    let cli = match MaintCli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(e) => return ParsedArgs::Exit(clap_exit(e)),
    };

    if let Some(shell) = &cli.completion {
        return ParsedArgs::Exit(MaintCli::print_completion(shell));
    }

    let actions = match cli.actions(&matches) {
        Ok(actions) => actions,
        Err(e) => {
            output::print_error(&e.to_string());
            eprintln!("{}", MaintCli::command().render_usage());
            return ParsedArgs::Exit(e.exit_code());
        }
    };
    if actions.is_empty() {
        let _ = MaintCli::command().print_help();
        return ParsedArgs::Exit(0);
    }
    ParsedArgs::Run {
        config: cli.config,
        actions,
    }
}

fn clap_exit(e: clap::Error) -> i32 {
    let _ = e.print();
    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => EXIT_INVALID_ARGUMENT,
    }
}

/// Run `actions` in order, stopping at the first failure
pub async fn execute<R: CommandRunner>(actions: &[MaintAction], ctx: &mut CommandContext<'_, R>) -> MaintResult<()> {
    for action in actions {
        if ctx.cancel.is_cancelled() {
            return Err(MaintError::Cancelled);
        }
        debug!("executing {action:?}");
        action.execute(ctx).await?;
    }
    Ok(())
}

/// Run `actions` against `config` with the given runner and confirmation source
pub async fn run_actions<R: CommandRunner>(
    actions: &[MaintAction],
    runner: &mut R,
    config: &MaintConfig,
    confirm: &mut dyn Confirm,
    cancel: CancellationToken,
) -> i32 {
    let tools = Toolchain::from_config(config);
    let mut ctx = CommandContext {
        runner,
        tools: &tools,
        config,
        confirm,
        cancel,
        work_dir: PathBuf::from("."),
    };
    match execute(actions, &mut ctx).await {
        Ok(()) => 0,
        Err(e) => {
            output::print_error(&e.to_string());
            e.exit_code()
        }
    }
}

/// Entry point of the `kafka-maint` binary
pub async fn run<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let (config_path, actions) = match parse_args(args) {
        ParsedArgs::Run { config, actions } => (config, actions),
        ParsedArgs::Exit(code) => return code,
    };
    let config = match MaintConfig::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            output::print_error(&e.to_string());
            return e.exit_code();
        }
    };

    let cancel = cancel_on_ctrl_c();
    run_actions(&actions, &mut ProcessRunner, &config, &mut TerminalConfirm, cancel).await
}

/// Token cancelled by the first Ctrl-C
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("interrupt received");
            trigger.cancel();
        }
    });
    cancel
}
