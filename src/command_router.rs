//! Drives one instruction from model response to executed commands.

use crate::{
    command_splitter::{CommandBatch, split_commands},
    config::Config,
    confirmation_ui::ConfirmationUI,
    executor::{ExecutionOutcome, Executor},
    llm_generator::{CommandGenerator, LlmGenerator, require_api_key},
};
use anyhow::Result;
use std::io::{self, BufRead, Write};
use tracing::{debug, info};

pub struct CommandRouter {
    config: Config,
    generator: Box<dyn CommandGenerator>,
    executor: Executor,
    confirmation_ui: ConfirmationUI,
}

impl CommandRouter {
    pub fn new(config: Config, verbose: bool) -> Self {
        Self::with_components(
            config,
            Box::new(LlmGenerator::new()),
            Executor::new(),
            ConfirmationUI::new(verbose),
        )
    }

    pub fn with_components(
        config: Config,
        generator: Box<dyn CommandGenerator>,
        executor: Executor,
        confirmation_ui: ConfirmationUI,
    ) -> Self {
        Self {
            config,
            generator,
            executor,
            confirmation_ui,
        }
    }

    /// Fails with the instructional message when no API key is configured.
    pub fn ensure_api_key(&self) -> Result<()> {
        require_api_key(&self.config).map(|_| ())
    }

    /// Generates commands for `instruction` and runs the confirmation loop on stdin/stdout.
    pub async fn process_instruction(&self, instruction: &str) -> Result<Vec<ExecutionOutcome>> {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        self.process_instruction_with_io(instruction, &mut input, &mut output)
            .await
    }

    /// Generates commands for `instruction` and runs the confirmation loop.
    ///
    /// # Errors
    ///
    /// Returns an error when no API key is configured (the generator is not
    /// called) or when writing to `output` fails. API failures and failing
    /// commands are reported and do not produce an error.
    pub async fn process_instruction_with_io<R: BufRead, W: Write>(
        &self,
        instruction: &str,
        input: &mut R,
        output: &mut W,
    ) -> Result<Vec<ExecutionOutcome>> {
        self.ensure_api_key()?;
        info!("Processing instruction: {}", instruction);

        let raw = match self.generator.generate(instruction, &self.config).await? {
            Some(raw) => raw,
            None => {
                self.confirmation_ui.show_nothing_generated_with_io(output)?;
                return Ok(Vec::new());
            }
        };
        debug!("Raw model output: {:?}", raw);

        let batch = split_commands(&raw);
        if batch.is_empty() {
            self.confirmation_ui.show_nothing_generated_with_io(output)?;
            return Ok(Vec::new());
        }

        let outcomes = self.run_batch_with_io(&batch, input, output).await?;
        self.confirmation_ui.show_summary_with_io(&outcomes, output)?;
        Ok(outcomes)
    }

    /// Offers each command for confirmation, in order, and runs the accepted ones.
    ///
    /// Each accepted command runs to completion before the next one is
    /// offered. A failing command never stops the loop.
    pub async fn run_batch_with_io<R: BufRead, W: Write>(
        &self,
        batch: &CommandBatch,
        input: &mut R,
        output: &mut W,
    ) -> Result<Vec<ExecutionOutcome>> {
        let mut outcomes = Vec::with_capacity(batch.len());

        for (index, command) in batch.iter().enumerate() {
            self.confirmation_ui
                .show_command_with_io(index, batch.len(), command, output)?;

            if !self.confirmation_ui.confirm_with_io(command, input, output)? {
                self.confirmation_ui.show_skipped_with_io(command, output)?;
                outcomes.push(ExecutionOutcome::Skipped);
                continue;
            }

            self.confirmation_ui.show_executing_with_io(command, output)?;
            output.flush()?;
            let outcome = self.executor.execute(command).await;
            Executor::report_with_io(&outcome, output)?;
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }
}
