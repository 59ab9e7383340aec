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

//! Test doubles for code that drives the Kafka scripts
//!
//! [`RecordingRunner`] stands in for [`ProcessRunner`](crate::core::runner::ProcessRunner):
//! it records every invocation and answers captures from canned output.

use std::collections::VecDeque;

use kafka_maint_error::MaintError;
use kafka_maint_error::MaintResult;

use crate::core::cleaner::Confirm;
use crate::core::runner::CommandRunner;
use crate::core::runner::Invocation;

#[derive(Debug)]
struct Response {
    needle: Vec<String>,
    outputs: VecDeque<String>,
}

#[derive(Debug)]
struct Failure {
    needle: Vec<String>,
    code: i32,
    remaining: Option<usize>,
}

/// Records invocations instead of running them
#[derive(Debug, Default)]
pub struct RecordingRunner {
    invocations: Vec<Invocation>,
    responses: Vec<Response>,
    failures: Vec<Failure>,
}

fn owned(needle: &[&str]) -> Vec<String> {
    needle.iter().map(|s| s.to_string()).collect()
}

fn matches(invocation: &Invocation, needle: &[String]) -> bool {
    let needle: Vec<&str> = needle.iter().map(String::as_str).collect();
    match needle.split_first() {
        Some((first, rest)) if invocation.program_name() == *first => invocation.contains(rest),
        _ => invocation.contains(&needle),
    }
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer captures whose args contain `needle` with `stdout`
    ///
    /// The first element of `needle` may also be the program file name.
    pub fn respond_to(self, needle: &[&str], stdout: impl Into<String>) -> Self {
        self.respond_with_sequence(needle, [stdout.into()])
    }

    /// Answer successive matching captures with successive outputs; the last one repeats
    pub fn respond_with_sequence<I, S>(mut self, needle: &[&str], outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.responses.push(Response {
            needle: owned(needle),
            outputs: outputs.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Fail every matching invocation with exit status `code`
    pub fn fail_on(mut self, needle: &[&str], code: i32) -> Self {
        self.failures.push(Failure {
            needle: owned(needle),
            code,
            remaining: None,
        });
        self
    }

    /// Fail only the first `times` matching invocations
    pub fn fail_times(mut self, needle: &[&str], code: i32, times: usize) -> Self {
        self.failures.push(Failure {
            needle: owned(needle),
            code,
            remaining: Some(times),
        });
        self
    }

    pub fn invocations(&self) -> &[Invocation] {
        &self.invocations
    }

    /// Indices of recorded invocations matching `needle`
    pub fn positions(&self, needle: &[&str]) -> Vec<usize> {
        let needle = owned(needle);
        self.invocations
            .iter()
            .enumerate()
            .filter(|(_, inv)| matches(inv, &needle))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn count(&self, needle: &[&str]) -> usize {
        self.positions(needle).len()
    }

    fn record(&mut self, invocation: &Invocation) -> MaintResult<()> {
        self.invocations.push(invocation.clone());
        for failure in self.failures.iter_mut() {
            if !matches(invocation, &failure.needle) {
                continue;
            }
            match failure.remaining {
                Some(0) => continue,
                Some(ref mut n) => *n -= 1,
                None => {}
            }
            return Err(MaintError::command_failed(invocation.program_name(), Some(failure.code)));
        }
        Ok(())
    }
}

impl CommandRunner for RecordingRunner {
    async fn run(&mut self, invocation: &Invocation) -> MaintResult<()> {
        self.record(invocation)
    }

    async fn capture(&mut self, invocation: &Invocation) -> MaintResult<String> {
        self.record(invocation)?;
        let response = self
            .responses
            .iter_mut()
            .find(|response| matches(invocation, &response.needle));
        let output = match response {
            Some(response) if response.outputs.len() > 1 => response.outputs.pop_front().unwrap_or_default(),
            Some(response) => response.outputs.front().cloned().unwrap_or_default(),
            None => String::new(),
        };
        Ok(output)
    }
}

/// Gives the same answer to every confirmation prompt
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Confirm for FixedAnswer {
    fn confirm(&mut self, _message: &str) -> bool {
        self.0
    }
}
