//! Command-line surface: argument definitions and dispatch.

use crate::command_router::CommandRouter;
use crate::config::{ConfigStore, DEFAULT_MODEL};
use crate::confirmation_ui::ConfirmationUI;
use anyhow::{Result, bail};
use clap::{Arg, ArgAction, ArgMatches, Command};
use colored::Colorize;
use std::io::{self, Write};
use tracing::{debug, info};

pub fn build_cli() -> Command {
    Command::new("incanto")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Turn a plain-language instruction into shell commands")
        .long_about(
            "incanto asks a language model for the shell commands that carry out your \
             instruction, then shows each one and runs it only after you confirm.\n\n\
             Generated commands are executed as-is by your shell. Read them before saying yes.",
        )
        .arg(
            Arg::new("instruction")
                .help("What you want to do, in plain language (prompted for if omitted)")
                .num_args(1..),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Show debug logs and command positions")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("config")
                .about("View or change the stored configuration")
                .arg(
                    Arg::new("set-api-key")
                        .long("set-api-key")
                        .help("Store the API key")
                        .value_name("API_KEY")
                        .num_args(1),
                )
                .arg(
                    Arg::new("set-model")
                        .long("set-model")
                        .help(format!("Store the model identifier (default: {})", DEFAULT_MODEL))
                        .value_name("MODEL")
                        .num_args(1),
                )
                .arg(
                    Arg::new("view")
                        .long("view")
                        .help("Show the current configuration")
                        .action(ArgAction::SetTrue),
                ),
        )
}

/// Joins the instruction words, or `None` when none were given.
pub fn instruction_from(matches: &ArgMatches) -> Option<String> {
    let words: Vec<String> = matches
        .get_many::<String>("instruction")
        .unwrap_or_default()
        .map(|s| s.to_string())
        .collect();
    let instruction = words.join(" ");
    if instruction.trim().is_empty() {
        None
    } else {
        Some(instruction.trim().to_string())
    }
}

pub async fn run(matches: ArgMatches) -> Result<()> {
    let verbose = matches.get_flag("verbose");
    let store = ConfigStore::from_default_location()?;

    if let Some(config_matches) = matches.subcommand_matches("config") {
        if instruction_from(&matches).is_some() {
            bail!("An instruction cannot be combined with the `config` subcommand");
        }
        let mut output = io::stdout();
        let mut errors = io::stderr();
        return handle_config_with_io(config_matches, &store, &mut output, &mut errors);
    }

    let config = store.load();
    let router = CommandRouter::new(config, verbose);
    router.ensure_api_key()?;

    let instruction = match instruction_from(&matches) {
        Some(instruction) => instruction,
        None => ConfirmationUI::new(verbose).prompt_instruction()?,
    };

    router.process_instruction(&instruction).await?;
    Ok(())
}

/// Applies `config` subcommand flags, then shows the configuration if asked
/// to or if nothing was set.
///
/// A failed save is reported on `errors` and does not stop the remaining
/// actions.
pub fn handle_config_with_io<W1: Write, W2: Write>(
    matches: &ArgMatches,
    store: &ConfigStore,
    output: &mut W1,
    errors: &mut W2,
) -> Result<()> {
    let api_key = matches.get_one::<String>("set-api-key");
    let model = matches.get_one::<String>("set-model");

    if let Some(api_key) = api_key {
        match store.set_api_key(api_key) {
            Ok(()) => writeln!(output, "{}", "✅ API key saved successfully".green())?,
            Err(e) => report_save_error("API key", &e, errors)?,
        }
    }

    if let Some(model) = model {
        match store.set_model(model) {
            Ok(()) => writeln!(output, "{} {}", "✅ Model set to".green(), model.trim())?,
            Err(e) => report_save_error("model", &e, errors)?,
        }
    }

    let nothing_set = api_key.is_none() && model.is_none();
    if nothing_set || matches.get_flag("view") {
        show_config_with_io(store, output)?;
    }
    Ok(())
}

fn report_save_error<W: Write>(what: &str, e: &anyhow::Error, output: &mut W) -> Result<()> {
    debug!("Failed to save {}: {:#}", what, e);
    writeln!(output, "{} {:#}", format!("❌ Failed to save {}:", what).red(), e)?;
    Ok(())
}

/// Prints the configuration with the API key redacted.
pub fn show_config_with_io<W: Write>(store: &ConfigStore, output: &mut W) -> Result<()> {
    let config = store.load();
    info!("Showing configuration from {}", store.path().display());

    writeln!(output, "{}", "Current configuration:".bold())?;
    writeln!(output, "  Config file: {}", store.path().display())?;
    writeln!(output, "  API Key:     {}", config.redacted_api_key())?;
    writeln!(output, "  Model:       {}", config.model)?;

    if config.api_key().is_none() {
        writeln!(output)?;
        writeln!(output, "To set the API key:")?;
        writeln!(output, "  incanto config --set-api-key <your-key>")?;
    }
    Ok(())
}
