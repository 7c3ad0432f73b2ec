// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use scraper::Html;

use crate::error::{AppError, Result};
use crate::models::HttpConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &HttpConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Fetch a page asynchronously and parse it as HTML.
pub async fn fetch_page_async(client: &reqwest::Client, url: &str) -> Result<Html> {
    let text = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    Ok(Html::parse_document(&text))
}

/// Turn a non-2xx response into an error carrying the body's `message`.
///
/// REST backends report failures as `{"message": "..."}`; anything else is
/// passed through as raw text.
pub async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(AppError::store(status.as_u16(), error_message(status, &body)))
}

fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            let body = body.trim();
            if body.is_empty() {
                status.to_string()
            } else {
                format!("{}: {}", status, body)
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_error_message_prefers_json_message() {
        let msg = error_message(
            StatusCode::CONFLICT,
            r#"{"code":"23505","message":"duplicate key value violates unique constraint"}"#,
        );
        assert_eq!(msg, "duplicate key value violates unique constraint");
    }

    #[test]
    fn test_error_message_falls_back_to_status() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, ""),
            "502 Bad Gateway"
        );
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "upstream down"),
            "502 Bad Gateway: upstream down"
        );
    }

    #[test]
    fn test_create_client() {
        assert!(create_async_client(&HttpConfig::default()).is_ok());
    }
}
