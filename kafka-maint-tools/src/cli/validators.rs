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

//! CLI input validators

use kafka_maint_error::MaintError;
use kafka_maint_error::MaintResult;

/// A value the Kafka scripts need must not be blank
pub fn validate_required(field: &str, value: &str) -> MaintResult<()> {
    if value.trim().is_empty() {
        return Err(MaintError::validation(field, "cannot be empty"));
    }
    Ok(())
}

/// Parse the rewind delta as a signed offset count
pub fn parse_delta(value: &str) -> MaintResult<i64> {
    let value = value.trim();
    value
        .parse::<i64>()
        .map_err(|_| MaintError::validation("delta", format!("'{value}' is not an integer")))
}

/// Topics handed to the cleaner, with blank entries rejected
pub fn validate_topics(topics: &[String]) -> MaintResult<()> {
    topics.iter().try_for_each(|topic| validate_required("topic", topic))
}

#[cfg(test)]
mod tests {
    use kafka_maint_error::ToolsError;

    use super::*;

    #[test]
    fn required_rejects_blank() {
        assert!(validate_required("topic", "orders").is_ok());
        let err = validate_required("group", "  ").unwrap_err();
        assert!(matches!(
            err,
            MaintError::Tools(ToolsError::ValidationError { ref field, .. }) if field == "group"
        ));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn delta_is_signed() {
        assert_eq!(parse_delta("100").unwrap(), 100);
        assert_eq!(parse_delta("-25").unwrap(), -25);
        assert_eq!(parse_delta(" 7 ").unwrap(), 7);
        assert!(parse_delta("ten").is_err());
        assert!(parse_delta("1.5").is_err());
        assert!(parse_delta("").is_err());
    }

    #[test]
    fn topics_all_checked() {
        assert!(validate_topics(&["orders".to_string(), "payments".to_string()]).is_ok());
        assert!(validate_topics(&["orders".to_string(), String::new()]).is_err());
        assert!(validate_topics(&[]).is_ok());
    }
}
