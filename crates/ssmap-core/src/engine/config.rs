use crate::core::parsers::AssignmentTool;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_STRIDE_EXECUTABLE: &str = "stride";
pub const DEFAULT_DSSP_EXECUTABLE: &str = "mkdssp";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },
}

/// How one external assignment program is invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSettings {
    pub executable: PathBuf,
    /// Arguments placed before the tool's own input/output arguments.
    pub extra_args: Vec<String>,
}

impl ToolSettings {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            extra_args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignerConfig {
    pub stride: ToolSettings,
    pub dssp: ToolSettings,
    /// Upper bound on a single tool invocation. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl AssignerConfig {
    pub fn tool(&self, tool: AssignmentTool) -> &ToolSettings {
        match tool {
            AssignmentTool::Stride => &self.stride,
            AssignmentTool::Dssp => &self.dssp,
        }
    }
}

impl Default for AssignerConfig {
    fn default() -> Self {
        Self {
            stride: ToolSettings::new(DEFAULT_STRIDE_EXECUTABLE),
            dssp: ToolSettings::new(DEFAULT_DSSP_EXECUTABLE),
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

#[derive(Default)]
pub struct AssignerConfigBuilder {
    stride_executable: Option<PathBuf>,
    stride_args: Vec<String>,
    dssp_executable: Option<PathBuf>,
    dssp_args: Vec<String>,
    timeout: Option<Option<Duration>>,
}

impl AssignerConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stride_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.stride_executable = Some(path.into());
        self
    }
    pub fn stride_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stride_args = args.into_iter().map(Into::into).collect();
        self
    }
    pub fn dssp_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.dssp_executable = Some(path.into());
        self
    }
    pub fn dssp_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dssp_args = args.into_iter().map(Into::into).collect();
        self
    }
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(Some(timeout));
        self
    }
    pub fn no_timeout(mut self) -> Self {
        self.timeout = Some(None);
        self
    }

    pub fn build(self) -> Result<AssignerConfig, ConfigError> {
        let timeout = self.timeout.unwrap_or(Some(DEFAULT_TIMEOUT));
        if timeout.is_some_and(|t| t.is_zero()) {
            return Err(ConfigError::InvalidParameter {
                parameter: "timeout",
                reason: "must be greater than zero".to_string(),
            });
        }

        let settings = |executable: Option<PathBuf>,
                        default: &str,
                        parameter: &'static str,
                        extra_args: Vec<String>| {
            let executable = executable.unwrap_or_else(|| PathBuf::from(default));
            if executable.as_os_str().is_empty() {
                return Err(ConfigError::InvalidParameter {
                    parameter,
                    reason: "executable path is empty".to_string(),
                });
            }
            Ok(ToolSettings {
                executable,
                extra_args,
            })
        };

        Ok(AssignerConfig {
            stride: settings(
                self.stride_executable,
                DEFAULT_STRIDE_EXECUTABLE,
                "stride_executable",
                self.stride_args,
            )?,
            dssp: settings(
                self.dssp_executable,
                DEFAULT_DSSP_EXECUTABLE,
                "dssp_executable",
                self.dssp_args,
            )?,
            timeout,
        })
    }
}
