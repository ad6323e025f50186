use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;

use super::{GenerationParams, LlmProvider, Message};
use crate::models::TurnRole;

const EMPTY_REPLY_FALLBACK: &str = "I'm sorry, I couldn't process that. Please try again.";

pub struct GeminiProvider {
    api_base: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(api_base: String, api_key: String, model: String) -> Self {
        Self {
            api_base,
            api_key,
            model,
            client: reqwest::Client::new(),
        }
    }

    fn generate_content_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

/// The system prompt travels as the first user turn; visitor turns map to
/// `user` and assistant turns to `model`.
pub(crate) fn build_contents(system_prompt: &str, messages: &[Message]) -> Vec<serde_json::Value> {
    let mut contents = vec![json!({
        "role": "user",
        "parts": [{ "text": system_prompt }],
    })];

    for msg in messages {
        let role = match msg.role {
            TurnRole::Visitor => "user",
            TurnRole::Assistant => "model",
        };
        contents.push(json!({
            "role": role,
            "parts": [{ "text": msg.content }],
        }));
    }

    contents
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn chat(
        &self,
        system_prompt: &str,
        messages: &[Message],
        params: &GenerationParams,
    ) -> anyhow::Result<String> {
        let body = json!({
            "contents": build_contents(system_prompt, messages),
            "generationConfig": {
                "temperature": params.temperature,
                "topK": params.top_k,
                "topP": params.top_p,
                "maxOutputTokens": params.max_output_tokens,
            },
        });

        tracing::debug!(
            model = %self.model,
            turns = messages.len(),
            prompt_chars = system_prompt.len(),
            "calling Gemini"
        );

        let resp = self
            .client
            .post(self.generate_content_url())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .context("failed to call Gemini API")?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error ({}): {}", status, text);
        }

        let data: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse Gemini response")?;

        let text = data["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(EMPTY_REPLY_FALLBACK);

        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_contents_roles() {
        let messages = vec![
            Message {
                role: TurnRole::Assistant,
                content: "Hello! Who would you like to meet with?".to_string(),
            },
            Message {
                role: TurnRole::Visitor,
                content: "Arjun".to_string(),
            },
        ];
        let contents = build_contents("system", &messages);
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[0]["parts"][0]["text"], "system");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[2]["role"], "user");
        assert_eq!(contents[2]["parts"][0]["text"], "Arjun");
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        let provider = GeminiProvider::new(
            "https://example.test/v1beta/".to_string(),
            "k".to_string(),
            "gemini-2.0-flash".to_string(),
        );
        assert_eq!(
            provider.generate_content_url(),
            "https://example.test/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }
}
