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

//! kafka-maint tools - Kafka maintenance on top of the stock admin scripts
//!
//! This crate provides both:
//! - **Core**: typed invocations of the Kafka scripts and the workflows built on them
//! - **CLI**: the `kafka-maint` and `kafka-topic-cleaner` command lines
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │     CLI Layer (maint_cli, cleaner_cli)  │
//! │  - Flag parsing (clap)                  │
//! │  - Ordered dispatch of flag occurrences │
//! │  - Tables, prompts, spinners (ui/)      │
//! └─────────────────┬───────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────┐
//! │         Core Logic (core/)              │
//! │  - Group, topic and rewind operations   │
//! │  - Topic cleaner state machine          │
//! └─────────────────┬───────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────┐
//! │   Command Runner (core::runner)         │
//! │  - Invocation: program + argument list  │
//! │  - tokio::process, no shell             │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Usage Examples
//!
//! ## As a Library
//!
//! ```rust,ignore
//! use kafka_maint_tools::core::admin::Toolchain;
//! use kafka_maint_tools::core::rewind::RewindService;
//! use kafka_maint_tools::core::runner::ProcessRunner;
//!
//! let tools = Toolchain::from_config(&config);
//! let plan = RewindService::rewind(&mut ProcessRunner, &tools, "orders", "billing", 100, Path::new(".")).await?;
//! ```
//!
//! ## As a CLI Tool
//!
//! ```bash
//! kafka-maint -l -r orders billing 100
//! kafka-topic-cleaner -t orders -t payments -f
//! ```

pub mod core {
    //! Core business logic
    //!
    //! Nothing in here parses flags. Every operation takes a
    //! [`CommandRunner`](runner::CommandRunner) and a [`Toolchain`](admin::Toolchain).
    //!
    //! - [`admin`] - Invocation factory for the Kafka scripts
    //! - [`runner`] - Subprocess execution
    //! - [`group`] - Consumer group queries
    //! - [`topic`] - Topic administration
    //! - [`rewind`] - Offset rewind
    //! - [`cleaner`] - Topic cleaner workflow

    pub mod admin;
    pub mod cleaner;
    pub mod group;
    pub mod rewind;
    pub mod runner;
    pub mod topic;

    pub use kafka_maint_error::MaintError;
    pub use kafka_maint_error::MaintResult;
    pub use kafka_maint_error::ToolsError;
}

pub mod cli;

pub mod ui;

// recording fakes for this crate's tests, not part of the public API
#[doc(hidden)]
pub mod testing;

pub mod cleaner_cli;
pub mod maint_cli;
