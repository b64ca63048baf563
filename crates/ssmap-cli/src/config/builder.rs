use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileToolConfig};
use super::models::AppConfig;
use crate::cli::ToolArgs;
use crate::error::{CliError, Result};
use ssmap::core::models::structure::AtomSelection;
use ssmap::core::parsers::AssignmentTool;
use ssmap::engine::config::AssignerConfigBuilder;
use std::path::PathBuf;
use std::time::Duration;

/// Merges defaults, the config file, `-S` overrides and CLI flags, in
/// increasing order of precedence.
pub fn build_config(args: &ToolArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let tool = match args.tool {
        Some(tool) => tool,
        None => parse_value::<AssignmentTool>(
            file_config.tool.as_deref().unwrap_or(&defaults.tool),
            "tool",
        )?,
    };
    let selection = match args.selection {
        Some(selection) => selection,
        None => parse_value::<AtomSelection>(
            file_config.selection.as_deref().unwrap_or(&defaults.selection),
            "selection",
        )?,
    };

    let stride_file = file_config.stride.take().unwrap_or_default();
    let dssp_file = file_config.dssp.take().unwrap_or_default();

    let stride_executable = args
        .stride_executable
        .clone()
        .or(stride_file.executable.map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(&defaults.stride_executable));
    let dssp_executable = args
        .dssp_executable
        .clone()
        .or(dssp_file.executable.map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(&defaults.dssp_executable));

    let timeout_secs = args
        .timeout
        .or(file_config.timeout)
        .unwrap_or(defaults.timeout_secs);

    let mut builder = AssignerConfigBuilder::new()
        .stride_executable(stride_executable)
        .stride_args(stride_file.extra_args.unwrap_or_default())
        .dssp_executable(dssp_executable)
        .dssp_args(dssp_file.extra_args.unwrap_or_default());
    builder = match timeout_secs {
        0 => builder.no_timeout(),
        secs => builder.timeout(Duration::from_secs(secs)),
    };
    let assigner = builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        tool,
        selection,
        assigner,
    })
}

fn parse_value<T>(value: &str, key: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| CliError::Config(format!("Invalid value for '{}': {}", key, e)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    if set_values.is_empty() {
        return Ok(config);
    }
    for kv_pair in set_values {
        let parts: Vec<_> = kv_pair.splitn(2, '=').collect();
        if parts.len() != 2 {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        }
        let key = parts[0].trim();
        let value_str = parts[1].trim();

        match key {
            "tool" => config.tool = Some(value_str.to_string()),
            "selection" => config.selection = Some(value_str.to_string()),
            "timeout" => {
                config.timeout = Some(value_str.parse().map_err(|_| {
                    CliError::Config(format!("Invalid integer value for {}: {}", key, value_str))
                })?);
            }
            _ => {
                let section = match key.split_once('.') {
                    Some((name, field)) => {
                        tool_section(&mut config, name).map(|section| (section, field))
                    }
                    None => None,
                };
                match section {
                    Some((section, "executable")) => {
                        section.executable = Some(value_str.to_string());
                    }
                    Some((section, "extra-args")) => {
                        section.extra_args =
                            Some(value_str.split_whitespace().map(str::to_string).collect());
                    }
                    _ => {
                        return Err(CliError::Config(format!(
                            "Unsupported configuration key for --set: '{}'",
                            key
                        )));
                    }
                }
            }
        }
    }
    Ok(config)
}

fn tool_section<'a>(config: &'a mut FileConfig, name: &str) -> Option<&'a mut FileToolConfig> {
    match name {
        "stride" => Some(config.stride.get_or_insert_with(Default::default)),
        "dssp" => Some(config.dssp.get_or_insert_with(Default::default)),
        _ => None,
    }
}
