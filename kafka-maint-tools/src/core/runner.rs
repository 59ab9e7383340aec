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

//! Typed subprocess invocation
//!
//! Every external tool is started from an explicit program path and argument
//! vector. Nothing goes through a shell, so topic and group names reach the
//! Kafka scripts exactly as given.

use std::fmt;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::process::Stdio;

use kafka_maint_error::MaintError;
use kafka_maint_error::MaintResult;
use kafka_maint_error::ToolsError;
use tokio::process::Command;
use tracing::info;

/// One call of an external binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    #[inline]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[inline]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// File name of the program, e.g. `kafka-topics.sh`
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .unwrap_or_else(|| self.program.as_os_str())
            .to_string_lossy()
            .into_owned()
    }

    #[inline]
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Whether `needle` appears as a contiguous run of arguments
    pub fn contains(&self, needle: &[&str]) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.args
            .windows(needle.len())
            .any(|window| window.iter().zip(needle).all(|(a, b)| a == b))
    }

    /// Value following `flag`, if present
    pub fn value_of(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Executes invocations, one at a time, to completion
pub trait CommandRunner {
    /// Run with the terminal attached; output goes straight to the user.
    async fn run(&mut self, invocation: &Invocation) -> MaintResult<()>;

    /// Run and return stdout. Stderr still reaches the user.
    async fn capture(&mut self, invocation: &Invocation) -> MaintResult<String>;
}

/// Runs the real binaries through `tokio::process`
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl ProcessRunner {
    fn command(invocation: &Invocation) -> Command {
        let mut command = Command::new(invocation.program());
        command.args(invocation.get_args());
        command
    }
}

impl CommandRunner for ProcessRunner {
    async fn run(&mut self, invocation: &Invocation) -> MaintResult<()> {
        info!("running {invocation}");
        let status = Self::command(invocation)
            .status()
            .await
            .map_err(|e| spawn_failed(invocation, e))?;
        check_status(invocation, status)
    }

    async fn capture(&mut self, invocation: &Invocation) -> MaintResult<String> {
        info!("running {invocation}");
        let output = Self::command(invocation)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .await
            .map_err(|e| spawn_failed(invocation, e))?;
        check_status(invocation, output.status)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn spawn_failed(invocation: &Invocation, e: std::io::Error) -> MaintError {
    MaintError::Tools(ToolsError::CommandSpawnFailed {
        program: invocation.program().display().to_string(),
        reason: e.to_string(),
    })
}

fn check_status(invocation: &Invocation, status: ExitStatus) -> MaintResult<()> {
    if status.success() {
        Ok(())
    } else {
        Err(MaintError::command_failed(invocation.program_name(), status.code()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Invocation {
        Invocation::new("/opt/kafka/bin/kafka-topics.sh")
            .args(["--zookeeper", "zk:2181"])
            .arg("--describe")
            .args(["--topic", "orders"])
    }

    #[test]
    fn display_joins_program_and_args() {
        assert_eq!(
            sample().to_string(),
            "/opt/kafka/bin/kafka-topics.sh --zookeeper zk:2181 --describe --topic orders"
        );
    }

    #[test]
    fn program_name_is_file_name() {
        assert_eq!(sample().program_name(), "kafka-topics.sh");
    }

    #[test]
    fn contains_matches_contiguous_args() {
        let inv = sample();
        assert!(inv.contains(&["--topic", "orders"]));
        assert!(inv.contains(&["--describe"]));
        assert!(inv.contains(&[]));
        assert!(!inv.contains(&["--describe", "orders"]));
        assert!(!inv.contains(&["--topic", "orders", "--extra"]));
    }

    #[test]
    fn value_of_reads_following_arg() {
        let inv = sample();
        assert_eq!(inv.value_of("--topic"), Some("orders"));
        assert_eq!(inv.value_of("--zookeeper"), Some("zk:2181"));
        assert_eq!(inv.value_of("--partition"), None);
    }

    #[tokio::test]
    async fn missing_binary_is_a_spawn_error() {
        let mut runner = ProcessRunner;
        let inv = Invocation::new("/nonexistent/kafka-maint/kafka-topics.sh").arg("--list");
        let err = runner.run(&inv).await.unwrap_err();
        assert!(matches!(err, MaintError::Tools(ToolsError::CommandSpawnFailed { .. })));
    }
}
