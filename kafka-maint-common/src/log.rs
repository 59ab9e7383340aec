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

use std::str::FromStr;

use tracing::Level;

const DEFAULT_LEVEL: Level = Level::INFO;

/// Initializes the logger.
///
/// The level comes from the `RUST_LOG` environment variable and defaults to `INFO`. Log lines go
/// to stderr so the output of the wrapped Kafka tools on stdout stays untouched.
pub fn init_logger() {
    let level = parse_level(std::env::var("RUST_LOG").ok().as_deref());
    init_logger_with_level(level);
}

pub fn init_logger_with_level(level: Level) {
    // a second init in the same process is a no-op
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_level(true)
        .with_target(false)
        .with_line_number(true)
        .with_max_level(level)
        .try_init();
}

fn parse_level(value: Option<&str>) -> Level {
    value
        .and_then(|v| Level::from_str(v.trim()).ok())
        .unwrap_or(DEFAULT_LEVEL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_level_accepts_known_levels() {
        assert_eq!(parse_level(Some("ERROR")), Level::ERROR);
        assert_eq!(parse_level(Some("warn")), Level::WARN);
        assert_eq!(parse_level(Some(" debug ")), Level::DEBUG);
        assert_eq!(parse_level(Some("TRACE")), Level::TRACE);
    }

    #[test]
    fn parse_level_falls_back_to_info() {
        assert_eq!(parse_level(None), Level::INFO);
        assert_eq!(parse_level(Some("")), Level::INFO);
        assert_eq!(parse_level(Some("chatty")), Level::INFO);
    }

    #[test]
    fn init_twice_does_not_panic() {
        init_logger_with_level(Level::WARN);
        init_logger_with_level(Level::DEBUG);
    }
}
