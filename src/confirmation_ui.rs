//! Operator-facing prompts and notices.
//!
//! Every prompt has a `_with_io` variant taking explicit reader/writer
//! streams so the interaction can be driven from tests.

use crate::executor::ExecutionOutcome;
use anyhow::{Result, anyhow};
use colored::Colorize;
use std::io::{self, BufRead, Write};
use tracing::info;

/// Handles the per-command confirm/skip interaction.
///
/// Confirmation is a yes/no question whose default answer is "no": only
/// `y` or `yes` (any case) runs the command.
///
/// # Example
///
/// ```
/// use incanto::confirmation_ui::ConfirmationUI;
/// use std::io::Cursor;
///
/// let ui = ConfirmationUI::new(false);
/// let mut input = Cursor::new(b"y\n");
/// let mut output = Vec::new();
///
/// let accepted = ui.confirm_with_io("ls -la", &mut input, &mut output)?;
/// assert!(accepted);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub struct ConfirmationUI {
    verbose: bool,
}

impl ConfirmationUI {
    /// Creates a new `ConfirmationUI`.
    ///
    /// # Arguments
    ///
    /// * `verbose` - If true, shows a position counter before each command
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    // =========================================================================
    // Core methods with I/O injection (testable)
    // =========================================================================

    /// Displays one command of the batch.
    pub fn show_command_with_io<W: Write>(
        &self,
        index: usize,
        total: usize,
        command: &str,
        output: &mut W,
    ) -> Result<()> {
        writeln!(output)?;
        if self.verbose && total > 1 {
            writeln!(output, "{}", format!("Command {} of {}", index + 1, total).dimmed())?;
        }
        writeln!(output, "{} {}", "💻 Command:".cyan().bold(), command.bold())?;
        Ok(())
    }

    /// Asks whether to run `command`. Anything but `y`/`yes` declines.
    ///
    /// End of input counts as declining.
    pub fn confirm_with_io<R: BufRead, W: Write>(
        &self,
        command: &str,
        input: &mut R,
        output: &mut W,
    ) -> Result<bool> {
        write!(output, "{} ", "Execute this command? [y/N]".yellow())?;
        output.flush()?;

        let mut line = String::new();
        let read = input.read_line(&mut line)?;
        if read == 0 {
            writeln!(output)?;
            info!("End of input while confirming '{}', declining", command);
            return Ok(false);
        }

        let accepted = matches!(line.trim().to_lowercase().as_str(), "y" | "yes");
        info!(
            "Operator {} command '{}'",
            if accepted { "accepted" } else { "declined" },
            command
        );
        Ok(accepted)
    }

    pub fn show_skipped_with_io<W: Write>(&self, command: &str, output: &mut W) -> Result<()> {
        writeln!(output, "{} {}", "⏭️  Skipped:".dimmed(), command.dimmed())?;
        Ok(())
    }

    pub fn show_executing_with_io<W: Write>(&self, command: &str, output: &mut W) -> Result<()> {
        writeln!(output, "{} {}", "▶️  Executing:".green(), command)?;
        Ok(())
    }

    /// Shows how many commands ran and how many were skipped.
    pub fn show_summary_with_io<W: Write>(
        &self,
        outcomes: &[ExecutionOutcome],
        output: &mut W,
    ) -> Result<()> {
        let executed = outcomes.iter().filter(|o| o.was_executed()).count();
        let skipped = outcomes.len() - executed;
        let failed = outcomes
            .iter()
            .filter(|o| matches!(o, ExecutionOutcome::Failed { .. }))
            .count();

        writeln!(output)?;
        let mut summary = format!("Done: {} executed, {} skipped", executed, skipped);
        if failed > 0 {
            summary.push_str(&format!(", {} failed", failed));
        }
        writeln!(output, "{}", summary.dimmed())?;
        Ok(())
    }

    pub fn show_nothing_generated_with_io<W: Write>(&self, output: &mut W) -> Result<()> {
        writeln!(output, "{}", "🤷 No commands were generated.".yellow())?;
        Ok(())
    }

    /// Asks for an instruction until a non-blank line is entered.
    ///
    /// # Errors
    ///
    /// Returns an error if input ends before an instruction is given.
    pub fn prompt_instruction_with_io<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        output: &mut W,
    ) -> Result<String> {
        loop {
            write!(output, "{} ", "What would you like to do?".cyan())?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(output)?;
                return Err(anyhow!("No instruction provided"));
            }

            let instruction = line.trim();
            if instruction.is_empty() {
                writeln!(output, "{}", "Please enter an instruction.".red())?;
                continue;
            }
            return Ok(instruction.to_string());
        }
    }

    // =========================================================================
    // Convenience methods using standard I/O
    // =========================================================================

    /// Prompts for an instruction on stdin/stdout.
    ///
    /// This is a convenience wrapper around [`Self::prompt_instruction_with_io`].
    pub fn prompt_instruction(&self) -> Result<String> {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        self.prompt_instruction_with_io(&mut input, &mut output)
    }
}
