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

use kafka_maint_common::log::init_logger;
use kafka_maint_tools::cleaner_cli;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_logger();
    let code = cleaner_cli::run(std::env::args_os()).await;
    std::process::exit(code);
}
