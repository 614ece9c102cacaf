//! Incanto - turn plain-language instructions into shell commands.
//!
//! The library holds every piece of the `incanto` binary:
//!
//! - [`config`] - Persisted API key and model, with defaults
//! - [`providers`] - Host facts fed into the prompt
//! - [`http_client`] - HTTP client abstraction
//! - [`llm_generator`] - Completion client for an OpenAI-compatible API
//! - [`command_splitter`] - Splits a model response into commands
//! - [`confirmation_ui`] - Prompts and notices shown to the operator
//! - [`executor`] - Runs confirmed commands in the platform shell
//! - [`command_router`] - Generate, split, confirm, execute
//! - [`spinner`] - Progress indicator during the API call
//! - [`cli`] - Argument definitions and dispatch
//!
//! # Security
//!
//! Commands come back from a language model and are run verbatim by the
//! shell once confirmed. There is no sandbox and no escaping; the
//! confirmation prompt is the only safeguard.
//!
//! # Example
//!
//! ```ignore
//! use incanto::command_router::CommandRouter;
//! use incanto::config::ConfigStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigStore::from_default_location()?.load();
//!     let router = CommandRouter::new(config, false);
//!
//!     // Each generated command is shown and confirmed before it runs
//!     router.process_instruction("show the five largest files here").await?;
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod command_router;
pub mod command_splitter;
pub mod config;
pub mod confirmation_ui;
pub mod executor;
pub mod http_client;
pub mod llm_generator;
pub mod providers;
pub mod spinner;
