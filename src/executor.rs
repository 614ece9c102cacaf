//! Shell executor for confirmed commands.
//!
//! Each command string is handed verbatim to the platform shell (`sh -c` on
//! Unix, `cmd /C` on Windows). Nothing is escaped or sandboxed: the text the
//! model produced is run exactly as shell source.

use anyhow::Result;
use async_trait::async_trait;
use colored::Colorize;
use std::io::Write;
use std::process::{Output, Stdio};
use tracing::{debug, info};

/// What happened to one command of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// The operator declined to run it.
    Skipped,
    /// Exit status zero and nothing on stderr.
    Succeeded { stdout: String },
    /// Spawn failure or non-zero exit.
    Failed { message: String },
    /// Exit status zero but stderr was not empty.
    SucceededWithWarning { stdout: String, stderr: String },
}

impl ExecutionOutcome {
    pub fn was_executed(&self) -> bool {
        !matches!(self, ExecutionOutcome::Skipped)
    }
}

// =============================================================================
// Traits for Dependency Injection
// =============================================================================

/// Trait for running one command string in a shell.
///
/// This abstraction enables testing without spawning real processes.
#[async_trait]
pub trait ShellRunner: Send + Sync {
    /// Runs `command` to completion and returns its captured output.
    async fn run(&self, command: &str) -> Result<Output>;
}

/// Runs commands through the platform shell.
pub struct SystemShellRunner;

#[async_trait]
impl ShellRunner for SystemShellRunner {
    async fn run(&self, command: &str) -> Result<Output> {
        let mut cmd = shell_command(command);
        cmd.stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        Ok(cmd.output().await?)
    }
}

#[cfg(unix)]
fn shell_command(command: &str) -> tokio::process::Command {
    let mut cmd = tokio::process::Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell_command(command: &str) -> tokio::process::Command {
    let mut cmd = tokio::process::Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

// =============================================================================
// Executor Implementation
// =============================================================================

/// Runs confirmed commands and reports their outcome.
///
/// # Example
///
/// ```ignore
/// let executor = Executor::new();
/// let outcome = executor.execute("echo hi").await;
/// executor.report(&outcome);
/// ```
pub struct Executor {
    runner: Box<dyn ShellRunner>,
}

impl Executor {
    pub fn new() -> Self {
        Self::with_runner(Box::new(SystemShellRunner))
    }

    pub fn with_runner(runner: Box<dyn ShellRunner>) -> Self {
        Self { runner }
    }

    /// Runs one command and waits for it to finish.
    ///
    /// Never returns an error: spawn failures become
    /// [`ExecutionOutcome::Failed`].
    pub async fn execute(&self, command: &str) -> ExecutionOutcome {
        info!("Executing shell command: {}", command);

        match self.runner.run(command).await {
            Ok(output) => Self::outcome_from_output(&output),
            Err(e) => {
                debug!("Failed to spawn shell for '{}': {}", command, e);
                ExecutionOutcome::Failed {
                    message: format!("Failed to start command: {}", e),
                }
            }
        }
    }

    /// Maps captured process output onto an outcome.
    pub fn outcome_from_output(output: &Output) -> ExecutionOutcome {
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            debug!("Command failed with status: {}", output.status);
            let status = match output.status.code() {
                Some(code) => format!("exit code {}", code),
                None => "terminated by signal".to_string(),
            };
            let message = if stderr.is_empty() {
                format!("Command failed ({})", status)
            } else {
                format!("Command failed ({}): {}", status, stderr)
            };
            return ExecutionOutcome::Failed { message };
        }

        if stderr.is_empty() {
            ExecutionOutcome::Succeeded { stdout }
        } else {
            ExecutionOutcome::SucceededWithWarning { stdout, stderr }
        }
    }

    /// Writes an outcome for the operator.
    pub fn report_with_io<W: Write>(outcome: &ExecutionOutcome, output: &mut W) -> Result<()> {
        match outcome {
            ExecutionOutcome::Skipped => {}
            ExecutionOutcome::Succeeded { stdout } => {
                Self::write_stdout(stdout, output)?;
            }
            ExecutionOutcome::SucceededWithWarning { stdout, stderr } => {
                writeln!(output, "{} {}", "⚠️  Warning:".yellow(), stderr)?;
                Self::write_stdout(stdout, output)?;
            }
            ExecutionOutcome::Failed { message } => {
                writeln!(output, "{} {}", "❌ Error:".red(), message)?;
            }
        }
        Ok(())
    }

    fn write_stdout<W: Write>(stdout: &str, output: &mut W) -> Result<()> {
        if stdout.trim().is_empty() {
            writeln!(output, "{}", "✅ Command executed successfully.".green())?;
        } else {
            write!(output, "{}", stdout)?;
            if !stdout.ends_with('\n') {
                writeln!(output)?;
            }
        }
        Ok(())
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}
