use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::TelegramConfig;

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Serialize)]
struct SendMessagePayload<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Subset of the Bot API response envelope.
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    ok: bool,
    description: Option<String>,
}

/// Result of a single sendMessage call, success or not.
#[derive(Debug, Clone)]
pub struct DeliveryOutcome {
    pub ok: bool,
    pub http_status: u16,
    pub description: Option<String>,
    pub body: String,
}

#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    api_base: String,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig) -> Result<Self, TelegramError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_seconds))
            .user_agent("Courier/1.0")
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Relay one message through the Bot API.
    ///
    /// A non-success API response is still an outcome; only transport
    /// failures (DNS, refused connection, timeout) return an error.
    pub async fn send_message(
        &self,
        bot_token: &str,
        chat_id: &str,
        text: &str,
    ) -> Result<DeliveryOutcome, TelegramError> {
        // The URL embeds the bot token, keep it out of logs.
        let url = format!("{}/bot{}/sendMessage", self.api_base, bot_token);
        let payload = SendMessagePayload { chat_id, text };

        let response = self.client.post(&url).json(&payload).send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        Ok(parse_outcome(status, body))
    }
}

fn parse_outcome(status: StatusCode, body: String) -> DeliveryOutcome {
    let envelope: Option<ApiEnvelope> = serde_json::from_str(&body).ok();

    let ok = envelope.as_ref().map_or(status.is_success(), |e| e.ok);
    let description = envelope.and_then(|e| e.description);

    DeliveryOutcome {
        ok,
        http_status: status.as_u16(),
        description,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope() {
        let body = r#"{"ok":true,"result":{"message_id":42}}"#.to_string();
        let outcome = parse_outcome(StatusCode::OK, body);
        assert!(outcome.ok);
        assert_eq!(outcome.http_status, 200);
        assert!(outcome.description.is_none());
    }

    #[test]
    fn test_error_envelope() {
        let body = r#"{"ok":false,"error_code":401,"description":"Unauthorized"}"#.to_string();
        let outcome = parse_outcome(StatusCode::UNAUTHORIZED, body);
        assert!(!outcome.ok);
        assert_eq!(outcome.http_status, 401);
        assert_eq!(outcome.description.as_deref(), Some("Unauthorized"));
    }

    #[test]
    fn test_non_json_body_falls_back_to_http_status() {
        let outcome = parse_outcome(StatusCode::BAD_GATEWAY, "<html>gateway</html>".to_string());
        assert!(!outcome.ok);
        assert_eq!(outcome.http_status, 502);
        assert!(outcome.description.is_none());
    }
}
