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

//! Coloured status lines

use colored::Colorize;

pub fn print_success(message: &str) {
    println!("{} {}", "[OK]".green().bold(), message);
}

/// Errors go to stderr
pub fn print_error(message: &str) {
    eprintln!("{} {}", "[ERROR]".red().bold(), message);
}

pub fn print_warning(message: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), message);
}

pub fn print_info(message: &str) {
    println!("{} {}", "[INFO]".blue().bold(), message);
}

pub fn print_header(title: &str) {
    println!("\n{}", title.cyan().bold().underline());
}

/// Announce the step that is about to run
pub fn print_operation_start(operation: &str) {
    println!("{} {}...", "▶".blue().bold(), operation);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_functions_do_not_panic() {
        print_success("done");
        print_error("failed");
        print_warning("careful");
        print_info("note");
        print_header("Header");
        print_operation_start("Describing topic orders");
    }
}
