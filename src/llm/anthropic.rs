use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::MeteredAction;
use crate::config::LlmConfig;

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

/// Anthropic Messages API client.
pub struct AnthropicClient {
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicClient {
    pub fn from_config(cfg: &LlmConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("build http client")?;
        Ok(Self {
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
            max_tokens: cfg.max_tokens,
            client,
        })
    }
}

fn first_text(resp: MessagesResponse) -> Option<String> {
    resp.content
        .into_iter()
        .find(|b| b.kind == "text")
        .and_then(|b| b.text)
}

#[async_trait]
impl MeteredAction for AnthropicClient {
    #[instrument(skip(self, system_prompt, user_message), fields(model = %self.model))]
    async fn invoke(&self, system_prompt: &str, user_message: &str) -> anyhow::Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .context("ANTHROPIC_API_KEY not configured")?;

        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system: system_prompt,
            messages: [Message {
                role: "user",
                content: user_message,
            }],
        };

        let resp = self
            .client
            .post(MESSAGES_URL)
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .context("send messages request")?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("anthropic API error {status}: {text}");
        }

        let parsed: MessagesResponse = resp.json().await.context("decode messages response")?;
        let text = first_text(parsed).context("response contained no text block")?;
        debug!(chars = text.len(), "completion received");
        Ok(text)
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>) -> LlmConfig {
        LlmConfig {
            api_key: api_key.map(String::from),
            model: "test-model".into(),
            max_tokens: 64,
            timeout_secs: 1,
            system_prompt: "sys".into(),
        }
    }

    #[test]
    fn request_body_shape() {
        let body = MessagesRequest {
            model: "m",
            max_tokens: 10,
            system: "be brief",
            messages: [Message {
                role: "user",
                content: "hi",
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["system"], "be brief");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hi");
    }

    #[test]
    fn picks_first_text_block() {
        let resp: MessagesResponse = serde_json::from_str(
            r#"{"content":[{"type":"thinking"},{"type":"text","text":"Try a frittata."}]}"#,
        )
        .unwrap();
        assert_eq!(first_text(resp).as_deref(), Some("Try a frittata."));
    }

    #[test]
    fn empty_content_yields_none() {
        let resp: MessagesResponse = serde_json::from_str(r#"{"content":[]}"#).unwrap();
        assert!(first_text(resp).is_none());
    }

    #[tokio::test]
    async fn missing_key_fails_without_network() {
        let client = AnthropicClient::from_config(&config(None)).unwrap();
        assert!(!client.is_configured());
        let err = client.invoke("sys", "hello").await.unwrap_err();
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));
    }
}
