use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    Visitor,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn visitor(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Visitor,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Append-only, ordered record of one booking session. The whole sequence is
/// resent to the reasoning provider on every turn, so order matters.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<ConversationTurn>,
}

impl Transcript {
    pub fn push(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.turns.clear();
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Collecting,
    AwaitingConfirmation,
    Saved,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Collecting => "collecting",
            SessionStatus::AwaitingConfirmation => "awaiting_confirmation",
            SessionStatus::Saved => "saved",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_keeps_insertion_order() {
        let mut transcript = Transcript::default();
        transcript.push(ConversationTurn::assistant("hello"));
        transcript.push(ConversationTurn::visitor("hi"));
        transcript.push(ConversationTurn::assistant("who would you like to meet?"));

        let roles: Vec<TurnRole> = transcript.turns().iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![TurnRole::Assistant, TurnRole::Visitor, TurnRole::Assistant]
        );
        assert_eq!(transcript.last().unwrap().text, "who would you like to meet?");
    }

    #[test]
    fn test_transcript_serializes_as_array() {
        let mut transcript = Transcript::default();
        transcript.push(ConversationTurn::visitor("hi"));
        let json = serde_json::to_value(&transcript).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["role"], "visitor");
    }
}
