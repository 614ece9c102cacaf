//! Completion client: turns an instruction into raw shell text.
//!
//! Talks to an OpenAI-compatible chat-completion endpoint. The system
//! prompt carries the host facts so the model picks commands that fit the
//! operator's platform.

use crate::config::Config;
use crate::http_client::{HttpClient, HttpResponse, ReqwestHttpClient};
use crate::providers::{HostContext, HostProvider, SystemHostProvider};
use crate::spinner::Spinner;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Environment variable that overrides the API base URL.
pub const API_BASE_ENV: &str = "INCANTO_API_BASE";

const DEFAULT_API_BASE: &str = "https://api.openai.com";
const TEMPERATURE: f32 = 0.2;
const MAX_TOKENS: u32 = 300;

const MISSING_API_KEY_HELP: &str = "No API key configured. Set one with:

   incanto config --set-api-key <your-key>

Check the current configuration with:

   incanto config --view";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Returns the configured API key or the instructional error for a missing one.
pub fn require_api_key(config: &Config) -> Result<&str> {
    config.api_key().ok_or_else(|| anyhow!(MISSING_API_KEY_HELP))
}

#[async_trait]
pub trait CommandGenerator: Send + Sync {
    /// Produces raw shell text for `instruction`.
    ///
    /// Returns `Ok(None)` when nothing was generated, including after a
    /// reported API failure. The only `Err` is a missing API key.
    async fn generate(&self, instruction: &str, config: &Config) -> Result<Option<String>>;
}

pub struct LlmGenerator {
    http: Box<dyn HttpClient>,
    host: Box<dyn HostProvider>,
    api_base: String,
    show_spinner: bool,
}

impl LlmGenerator {
    pub fn new() -> Self {
        let api_base = std::env::var(API_BASE_ENV)
            .ok()
            .filter(|b| !b.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        Self {
            http: Box::new(ReqwestHttpClient::new()),
            host: Box::new(SystemHostProvider),
            api_base,
            show_spinner: true,
        }
    }

    /// Builds a generator with injected transport and host facts (for testing).
    pub fn with_deps(http: Box<dyn HttpClient>, host: Box<dyn HostProvider>, api_base: &str) -> Self {
        Self {
            http,
            host,
            api_base: api_base.to_string(),
            show_spinner: false,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.api_base.trim_end_matches('/'))
    }

    pub fn build_system_prompt(host: &HostContext) -> String {
        format!(
            "You translate requests into shell commands for this machine:
{}

RULES:
- Reply ONLY with shell commands. No explanations, no markdown, no code fences.
- Put each independent command on its own line; they will be confirmed and run one at a time.
- When several steps must run together as one unit, join them on one line with &&.
- Use commands and flags that exist on the platform above.",
            host.to_prompt_blob()
        )
    }

    fn build_request_body(&self, instruction: &str, model: &str) -> Result<serde_json::Value> {
        let host = self.host.capture();
        debug!("Host context: {:?}", host);

        let request = ChatRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: Self::build_system_prompt(&host),
                },
                ChatMessage {
                    role: "user",
                    content: instruction.to_string(),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };
        Ok(serde_json::to_value(&request)?)
    }

    /// Sends one completion request and extracts the first choice's text.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-2xx status, or a body
    /// that is not a chat-completion response.
    pub async fn request_completion(
        &self,
        instruction: &str,
        api_key: &str,
        model: &str,
    ) -> Result<Option<String>> {
        let body = self.build_request_body(instruction, model)?;
        let auth = format!("Bearer {}", api_key);
        let headers = [
            ("Authorization", auth.as_str()),
            ("Content-Type", "application/json"),
        ];

        info!("Requesting completion from {} with model {}", self.endpoint(), model);
        let response = self.http.post_json(&self.endpoint(), &headers, &body).await?;
        debug!("Completion API response ({}): {}", response.status, response.body);

        Self::parse_response(&response)
    }

    fn parse_response(response: &HttpResponse) -> Result<Option<String>> {
        if !response.is_success() {
            let detail = serde_json::from_str::<ApiErrorEnvelope>(&response.body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| response.body.trim().to_string());
            return Err(anyhow!("API request failed with status {}: {}", response.status, detail));
        }

        let parsed: ChatResponse = serde_json::from_str(&response.body)
            .map_err(|e| anyhow!("Unexpected response from completion API: {}", e))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty());

        Ok(text)
    }
}

impl Default for LlmGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandGenerator for LlmGenerator {
    async fn generate(&self, instruction: &str, config: &Config) -> Result<Option<String>> {
        let api_key = require_api_key(config)?;
        info!("Generating commands for: {}", instruction);

        let spinner = if self.show_spinner {
            Some(Spinner::start("Thinking..."))
        } else {
            None
        };
        let result = self.request_completion(instruction, api_key, &config.model).await;
        if let Some(spinner) = spinner {
            spinner.stop().await;
        }

        match result {
            Ok(text) => Ok(text),
            Err(e) => {
                debug!("Completion request failed: {:#}", e);
                eprintln!("{} {:#}", "❌ Failed to generate commands:".red(), e);
                Ok(None)
            }
        }
    }
}
