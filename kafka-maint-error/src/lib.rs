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

//! # kafka-maint Error Handling
//!
//! One error type for every crate in the workspace.
//!
//! ### Usage
//!
//! ```rust
//! use kafka_maint_error::MaintError;
//! use kafka_maint_error::MaintResult;
//!
//! fn require_topic(topic: &str) -> MaintResult<()> {
//!     if topic.is_empty() {
//!         return Err(MaintError::validation("topic", "topic name cannot be empty"));
//!     }
//!     Ok(())
//! }
//! # require_topic("orders").unwrap();
//! ```

pub mod unified;

pub use unified::ConfigError;
pub use unified::MaintError;
pub use unified::MaintResult;
pub use unified::ToolsError;
pub use unified::EXIT_CANCELLED;
pub use unified::EXIT_INVALID_ARGUMENT;
pub use unified::EXIT_MISSING_ARGUMENT;
