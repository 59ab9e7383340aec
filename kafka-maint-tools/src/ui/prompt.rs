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

//! Interactive confirmation

use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm as ConfirmPrompt;

use crate::core::cleaner::Confirm;

/// Yes/no prompt defaulting to no; a failed terminal read counts as no
pub fn confirm(message: &str) -> bool {
    ConfirmPrompt::with_theme(&ColorfulTheme::default())
        .with_prompt(message)
        .default(false)
        .interact()
        .unwrap_or(false)
}

/// [`Confirm`] backed by the terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&mut self, message: &str) -> bool {
        confirm(&format!("[WARNING] {message}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_confirm<C: Confirm>(_: &C) {}

    #[test]
    fn terminal_confirm_is_a_confirm() {
        assert_confirm(&TerminalConfirm);
    }
}
