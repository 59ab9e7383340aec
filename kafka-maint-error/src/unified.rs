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

//! Unified error system for kafka-maint
//!
//! Errors are grouped by category. Each category maps onto a process exit
//! status through [`MaintError::exit_code`].

mod config;
mod tools;

use std::io;

pub use config::ConfigError;
use thiserror::Error;
pub use tools::ToolsError;

/// Exit status for an invalid or unrecognized argument
pub const EXIT_INVALID_ARGUMENT: i32 = 1;
/// Exit status for a missing required argument
pub const EXIT_MISSING_ARGUMENT: i32 = 2;
/// Exit status after Ctrl-C
pub const EXIT_CANCELLED: i32 = 130;

/// Main error type for all kafka-maint operations
///
/// # Examples
///
/// ```rust
/// use kafka_maint_error::MaintError;
///
/// let err = MaintError::command_failed("kafka-topics.sh", Some(3));
/// assert_eq!(err.exit_code(), 3);
/// ```
#[derive(Debug, Error)]
pub enum MaintError {
    // ============================================================================
    // Tools Errors
    // ============================================================================
    /// Failures while driving the external Kafka/Zookeeper binaries
    #[error(transparent)]
    Tools(#[from] ToolsError),

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    /// Configuration lookup, parsing and validation errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    // ============================================================================
    // System Errors
    // ============================================================================
    /// IO error from std::io
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Cleaner journal could not be encoded or decoded
    #[error("Journal error: {0}")]
    Journal(#[from] serde_json::Error),

    /// The operation was interrupted by the user
    #[error("Operation cancelled")]
    Cancelled,
}

impl MaintError {
    /// Create a validation error
    #[inline]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Tools(ToolsError::validation_error(field, reason))
    }

    /// Create a missing argument error
    #[inline]
    pub fn missing_argument(argument: impl Into<String>) -> Self {
        Self::Tools(ToolsError::MissingArgument {
            argument: argument.into(),
        })
    }

    /// Create an external command failure
    #[inline]
    pub fn command_failed(program: impl Into<String>, code: Option<i32>) -> Self {
        Self::Tools(ToolsError::command_failed(program, code))
    }

    /// Create an output parsing error
    #[inline]
    pub fn output_parse_failed(program: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Tools(ToolsError::OutputParseFailed {
            program: program.into(),
            reason: reason.into(),
        })
    }

    /// Process exit status for this error
    ///
    /// A failing external command hands its own status back to the shell.
    pub fn exit_code(&self) -> i32 {
        match self {
            MaintError::Tools(ToolsError::ValidationError { .. }) => EXIT_INVALID_ARGUMENT,
            MaintError::Tools(ToolsError::MissingArgument { .. }) => EXIT_MISSING_ARGUMENT,
            MaintError::Tools(ToolsError::CommandFailed { code: Some(code), .. }) if *code != 0 => *code,
            MaintError::Cancelled => EXIT_CANCELLED,
            _ => 1,
        }
    }
}

impl From<::config::ConfigError> for MaintError {
    fn from(e: ::config::ConfigError) -> Self {
        Self::Config(ConfigError::ParseFailed { reason: e.to_string() })
    }
}

/// Result type alias for kafka-maint operations
pub type MaintResult<T> = std::result::Result<T, MaintError>;
