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

use std::path::Path;

use ::config::Config;
use ::config::Environment;
use ::config::File;
use ::config::FileFormat;
use kafka_maint_error::MaintResult;
use serde::de::DeserializeOwned;

/// Parse `config_file` into `C`, layering `<ENV_PREFIX>_<KEY>` environment overrides on top.
///
/// The format follows the file extension. Anything unrecognised, such as a shell-sourced
/// `config.sh` made of `KEY=value` lines, is read as INI.
pub fn parse_config_file<C>(config_file: &Path, env_prefix: Option<&str>) -> MaintResult<C>
where
    C: DeserializeOwned,
{
    let mut builder = Config::builder().add_source(File::from(config_file).format(detect_format(config_file)));
    if let Some(prefix) = env_prefix {
        builder = builder.add_source(
            Environment::with_prefix(prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );
    }
    let cfg = builder.build()?;
    let parsed = cfg.try_deserialize::<C>()?;
    Ok(parsed)
}

pub fn detect_format(path: &Path) -> FileFormat {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("toml") => FileFormat::Toml,
        Some("json") => FileFormat::Json,
        Some("yaml") | Some("yml") => FileFormat::Yaml,
        _ => FileFormat::Ini,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_format_by_extension() {
        assert!(matches!(detect_format(Path::new("a.toml")), FileFormat::Toml));
        assert!(matches!(detect_format(Path::new("a.JSON")), FileFormat::Json));
        assert!(matches!(detect_format(Path::new("a.yml")), FileFormat::Yaml));
        assert!(matches!(detect_format(Path::new("config.sh")), FileFormat::Ini));
        assert!(matches!(detect_format(Path::new("kafka.conf")), FileFormat::Ini));
        assert!(matches!(detect_format(Path::new("no_extension")), FileFormat::Ini));
    }
}
