use super::config::ToolSettings;
use crate::core::parsers::AssignmentTool;
use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("'{program}' exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("'{program}' did not finish within {timeout:?} and was killed")]
    TimedOut { program: String, timeout: Duration },
    #[error("{tool} did not produce the expected output file {path}")]
    MissingOutput { tool: AssignmentTool, path: PathBuf },
    #[error("{tool} output contains no residue records")]
    NoResidues { tool: AssignmentTool },
    #[error("I/O error while running an assignment tool: {0}")]
    Io(#[from] io::Error),
}

/// Captured streams of a finished tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs `settings.executable` with its extra arguments followed by `args`,
/// waiting at most `timeout` for it to exit.
///
/// Both output streams go to anonymous temporary files, so the child never
/// blocks on a full pipe while it is being polled. A child still running
/// when the timeout expires is killed and reaped.
pub fn run_tool<I, S>(
    settings: &ToolSettings,
    args: I,
    timeout: Option<Duration>,
) -> Result<ToolOutput, ExecutionError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let program = settings.executable.display().to_string();
    let mut stdout_file = tempfile::tempfile()?;
    let mut stderr_file = tempfile::tempfile()?;

    let mut command = Command::new(&settings.executable);
    command
        .args(&settings.extra_args)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout_file.try_clone()?))
        .stderr(Stdio::from(stderr_file.try_clone()?));
    debug!(command = ?command, "Spawning assignment tool");

    let mut child = command.spawn().map_err(|source| ExecutionError::Spawn {
        program: program.clone(),
        source,
    })?;
    let status = wait_with_timeout(&mut child, timeout, &program)?;

    let stdout = read_captured(&mut stdout_file)?;
    let stderr = read_captured(&mut stderr_file)?;
    if !status.success() {
        return Err(ExecutionError::Failed {
            program,
            status,
            stderr: stderr.trim().to_string(),
        });
    }
    if !stderr.trim().is_empty() {
        debug!(program = %program, stderr = %stderr.trim(), "Tool wrote to stderr");
    }
    Ok(ToolOutput { stdout, stderr })
}

fn wait_with_timeout(
    child: &mut Child,
    timeout: Option<Duration>,
    program: &str,
) -> Result<ExitStatus, ExecutionError> {
    let Some(timeout) = timeout else {
        return Ok(child.wait()?);
    };
    let started = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if started.elapsed() >= timeout {
            warn!(program, ?timeout, "Assignment tool timed out, killing it");
            // The child may exit between the poll and the kill.
            if let Err(e) = child.kill() {
                debug!(error = %e, "Kill after timeout failed");
            }
            child.wait()?;
            return Err(ExecutionError::TimedOut {
                program: program.to_string(),
                timeout,
            });
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn read_captured(file: &mut File) -> io::Result<String> {
    file.seek(SeekFrom::Start(0))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
