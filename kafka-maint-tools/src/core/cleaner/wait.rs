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

//! Cancellable waits between cleaner phases

use std::time::Duration;

use kafka_maint_common::CleanerConfig;
use kafka_maint_common::WaitMode;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// How long a phase waits for the cluster to catch up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitStrategy {
    /// Sleep for a fixed time
    Fixed(Duration),
    /// Check the condition every `interval` until it holds or `timeout` passes
    Poll { interval: Duration, timeout: Duration },
}

impl WaitStrategy {
    pub fn from_config(config: &CleanerConfig) -> Self {
        match config.wait_mode {
            WaitMode::Fixed => WaitStrategy::Fixed(config.wait()),
            WaitMode::Poll => WaitStrategy::Poll {
                interval: config.poll_interval(),
                timeout: config.poll_timeout(),
            },
        }
    }
}

/// What the caller should do after a [`Waiter::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Evaluate the condition now
    Check,
    /// The fixed wait is over
    Elapsed,
    /// The condition never held before the deadline
    TimedOut,
    Cancelled,
}

/// One wait phase driven by a [`WaitStrategy`]
#[derive(Debug)]
pub struct Waiter {
    strategy: WaitStrategy,
    deadline: Instant,
    ticks: u32,
}

impl Waiter {
    pub fn start(strategy: WaitStrategy) -> Self {
        let span = match strategy {
            WaitStrategy::Fixed(duration) => duration,
            WaitStrategy::Poll { timeout, .. } => timeout,
        };
        Waiter {
            strategy,
            deadline: Instant::now() + span,
            ticks: 0,
        }
    }

    /// Sleep until the next step of the wait
    ///
    /// In poll mode the first tick is an immediate [`Tick::Check`]. Later ticks
    /// sleep one interval, never past the deadline, and yield [`Tick::TimedOut`]
    /// once the deadline has been reached.
    pub async fn tick(&mut self, cancel: &CancellationToken) -> Tick {
        if cancel.is_cancelled() {
            return Tick::Cancelled;
        }
        self.ticks += 1;
        match self.strategy {
            WaitStrategy::Fixed(_) => {
                if self.ticks > 1 {
                    return Tick::Elapsed;
                }
                sleep_until(self.deadline, cancel, Tick::Elapsed).await
            }
            WaitStrategy::Poll { interval, .. } => {
                if self.ticks == 1 {
                    return Tick::Check;
                }
                let now = Instant::now();
                if now >= self.deadline {
                    return Tick::TimedOut;
                }
                let wake = (now + interval).min(self.deadline);
                sleep_until(wake, cancel, Tick::Check).await
            }
        }
    }
}

async fn sleep_until(wake: Instant, cancel: &CancellationToken, done: Tick) -> Tick {
    tokio::select! {
        _ = cancel.cancelled() => Tick::Cancelled,
        _ = tokio::time::sleep_until(wake) => done,
    }
}
