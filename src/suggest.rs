//! Generative Name Suggestion
//!
//! Asks a chat-completions style text-generation endpoint for the canonical
//! common name of an unrecognised plant query. The reply is only ever used
//! as a name to re-resolve against the local and remote tiers.

use crate::error::CollaboratorError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Longest reply accepted as a plant name
const MAX_SUGGESTION_CHARS: usize = 60;

const SYSTEM_PROMPT: &str = "You correct misspelled or informal garden plant names. \
Reply with only the standard common English name of the plant, nothing else. \
If you cannot identify a plant, reply with the single word UNKNOWN.";

/// Proposes a canonical plant name for a raw query
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    /// `Ok(None)` when the service has no suggestion
    async fn suggest(&self, raw_name: &str) -> Result<Option<String>, CollaboratorError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// HTTP client for the suggestion endpoint
pub struct HttpSuggestionClient {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    model: String,
}

impl HttpSuggestionClient {
    pub fn new(
        url: &str,
        api_key: Option<String>,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, CollaboratorError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("bloom_planner/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            url: url.to_string(),
            api_key,
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl SuggestionProvider for HttpSuggestionClient {
    async fn suggest(&self, raw_name: &str) -> Result<Option<String>, CollaboratorError> {
        let prompt = format!("Plant name: {}", raw_name.trim());
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: SYSTEM_PROMPT },
                ChatMessage { role: "user", content: &prompt },
            ],
            temperature: 0.0,
            max_tokens: 20,
        };

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(CollaboratorError::Status(status.as_u16(), text));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| CollaboratorError::Decode(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        Ok(clean_suggestion(&content))
    }
}

/// Reduce a free-text reply to a bare plant name
pub fn clean_suggestion(reply: &str) -> Option<String> {
    let line = reply.lines().map(str::trim).find(|l| !l.is_empty())?;

    let name = line
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '`' || c == '*')
        .trim_end_matches('.')
        .trim();

    if name.is_empty()
        || name.eq_ignore_ascii_case("unknown")
        || name.chars().count() > MAX_SUGGESTION_CHARS
    {
        return None;
    }

    Some(name.to_string())
}
