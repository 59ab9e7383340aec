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

use thiserror::Error;

/// Configuration file errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file was found in any lookup location
    #[error("No configuration file found, searched: {}", .searched.join(", "))]
    NotFound { searched: Vec<String> },

    /// The file exists but could not be parsed
    #[error("Failed to parse configuration: {reason}")]
    ParseFailed { reason: String },

    /// Missing required field
    #[error("Missing required field: '{field}'")]
    MissingRequiredField { field: String },

    /// Invalid configuration field
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfiguration { field: String, reason: String },
}

impl ConfigError {
    /// Create a missing field error
    #[inline]
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingRequiredField { field: field.into() }
    }

    /// Create an invalid field error
    #[inline]
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
