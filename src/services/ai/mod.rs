pub mod extraction;
pub mod gemini;
pub mod ollama;
pub mod prompt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{ConversationTurn, TurnRole};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: TurnRole,
    pub content: String,
}

impl From<&ConversationTurn> for Message {
    fn from(turn: &ConversationTurn) -> Self {
        Self {
            role: turn.role,
            content: turn.text.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 1024,
        }
    }
}

#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn chat(
        &self,
        system_prompt: &str,
        messages: &[Message],
        params: &GenerationParams,
    ) -> anyhow::Result<String>;
}
