// src/services/extractor.rs

//! Structured memorial extraction with an LLM.
//!
//! The post is rendered to text through the page reader, then an
//! OpenAI-compatible chat completion turns it into an [`ExtractedMemorial`].

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{ExtractedMemorial, ExtractionConfig};
use crate::services::PageReader;
use crate::utils::http::ensure_success;

/// Turns a single post into a partial entry.
#[async_trait]
pub trait MemorialExtractor: Send + Sync {
    /// Extract memorial data from the post at `url`.
    ///
    /// `Ok(None)` means the post yielded nothing usable.
    async fn extract(&self, url: &str) -> Result<Option<ExtractedMemorial>>;
}

/// Post text beyond this many characters is not sent to the model.
const MAX_POST_CHARS: usize = 12_000;

const SYSTEM_PROMPT: &str = r#"You extract memorial records from social media posts about people who lost their lives.
Reply with a single JSON object and nothing else, using exactly these keys:
{
  "name": "Full Name",
  "name_fa": "Persian name, or null",
  "city": "City in English, or null",
  "city_fa": "City in Persian, or null",
  "location": "Specific place in English, or null",
  "location_fa": "Specific place in Persian, or null",
  "date": "YYYY-MM-DD date of death, or null",
  "bio": "Two or three factual sentences in English",
  "bio_fa": "The same in Persian, or null",
  "photo": "Direct URL of the person's photo, or null",
  "referenceLabel": "Short label for the source, e.g. the account name"
}
If the post is not about a specific person who died, reply with {"name": ""}.
Never invent facts that are not in the post."#;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    response_format: ResponseFormat,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

/// Extractor backed by an OpenAI-compatible chat completions API.
#[derive(Clone)]
pub struct LlmExtractor {
    client: Client,
    reader: Arc<dyn PageReader>,
    api_base: String,
    model: String,
    api_key: Option<String>,
}

impl LlmExtractor {
    pub fn new(client: Client, reader: Arc<dyn PageReader>, config: &ExtractionConfig) -> Self {
        Self {
            client,
            reader,
            api_base: config.api_base.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        }
    }

    async fn complete(&self, api_key: &str, url: &str, post: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            temperature: 0.0,
            response_format: ResponseFormat {
                kind: "json_object",
            },
            messages: vec![
                ChatMessage {
                    role: "system".into(),
                    content: Some(SYSTEM_PROMPT.into()),
                },
                ChatMessage {
                    role: "user".into(),
                    content: Some(format!("Post URL: {}\n\nPost content:\n{}", url, post)),
                },
            ],
        };

        let response = self
            .client
            .post(format!(
                "{}/chat/completions",
                self.api_base.trim_end_matches('/')
            ))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let response: ChatResponse = ensure_success(response)
            .await
            .map_err(|e| AppError::extraction(url, e))?
            .json()
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AppError::extraction(url, "empty completion"))
    }
}

/// Parse a model reply into an extraction.
///
/// Accepts bare JSON or JSON inside a Markdown code fence; a `null` reply
/// means nothing was found.
pub fn parse_extraction(reply: &str) -> Result<Option<ExtractedMemorial>> {
    let trimmed = reply.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    Ok(serde_json::from_str::<Option<ExtractedMemorial>>(body)?)
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[async_trait]
impl MemorialExtractor for LlmExtractor {
    async fn extract(&self, url: &str) -> Result<Option<ExtractedMemorial>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::config("OPENAI_API_KEY is not set"))?;

        let post = self.reader.read(url).await?;
        let reply = self
            .complete(api_key, url, truncate(&post, MAX_POST_CHARS))
            .await?;

        parse_extraction(&reply).map_err(|e| AppError::extraction(url, e))
    }
}
