use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantProfile {
    #[serde(default = "default_assistant_name")]
    pub assistant_name: String,
    #[serde(default = "default_company_name")]
    pub company_name: String,
    #[serde(default = "default_tone")]
    pub tone: String,
    #[serde(default)]
    pub office_hours: OfficeHours,
    #[serde(default)]
    pub greeting: Option<String>,
    #[serde(default = "default_true")]
    pub booking_only: bool,
    #[serde(default)]
    pub custom_instructions: String,
}

fn default_assistant_name() -> String {
    "Vira".to_string()
}

fn default_company_name() -> String {
    "Kanishka Software".to_string()
}

fn default_tone() -> String {
    "professional".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfficeHours {
    #[serde(default = "default_open")]
    pub start: String,
    #[serde(default = "default_close")]
    pub end: String,
}

fn default_open() -> String {
    "09:00".to_string()
}

fn default_close() -> String {
    "16:30".to_string()
}

impl Default for OfficeHours {
    fn default() -> Self {
        Self {
            start: default_open(),
            end: default_close(),
        }
    }
}

impl Default for AssistantProfile {
    fn default() -> Self {
        Self {
            assistant_name: default_assistant_name(),
            company_name: default_company_name(),
            tone: default_tone(),
            office_hours: OfficeHours::default(),
            greeting: None,
            booking_only: true,
            custom_instructions: String::new(),
        }
    }
}

impl AssistantProfile {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn greeting(&self) -> String {
        match self.greeting.as_deref().map(str::trim) {
            Some(g) if !g.is_empty() => g.to_string(),
            _ => format!(
                "Hello! I'm {}, your AI appointment assistant for {}. I can help you book an appointment with any of our team members. You can either type or speak to me. Who would you like to meet with?",
                self.assistant_name, self.company_name
            ),
        }
    }

    /// Persona lines appended to the fixed booking instructions.
    pub fn to_prompt(&self) -> String {
        let mut lines = vec![format!(
            "Your name is {} and you book visitor appointments for {}.",
            self.assistant_name, self.company_name
        )];

        match self.tone.as_str() {
            "friendly" => lines.push(
                "Use a warm, friendly tone. Be personable and approachable.".to_string(),
            ),
            "casual" => lines.push("Use a casual, relaxed tone.".to_string()),
            // professional needs no extra instruction
            _ => {}
        }

        if self.booking_only {
            lines.push(
                "Only discuss topics related to booking appointments. Politely redirect any other topics."
                    .to_string(),
            );
        }

        if !self.custom_instructions.is_empty() {
            lines.push(self.custom_instructions.clone());
        }

        format!("\nPersonality and behavior:\n{}", lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_greeting_names_company() {
        let profile = AssistantProfile::default();
        let greeting = profile.greeting();
        assert!(greeting.starts_with("Hello! I'm Vira"));
        assert!(greeting.contains("Kanishka Software"));
        assert!(greeting.ends_with("Who would you like to meet with?"));
    }

    #[test]
    fn test_custom_greeting_wins() {
        let profile = AssistantProfile::from_json(r#"{"greeting":"Welcome to Acme!"}"#).unwrap();
        assert_eq!(profile.greeting(), "Welcome to Acme!");
    }

    #[test]
    fn test_from_json_partial() {
        let profile =
            AssistantProfile::from_json(r#"{"company_name":"Acme","office_hours":{"end":"18:00"}}"#)
                .unwrap();
        assert_eq!(profile.company_name, "Acme");
        assert_eq!(profile.assistant_name, "Vira");
        assert_eq!(profile.office_hours.start, "09:00");
        assert_eq!(profile.office_hours.end, "18:00");
        assert!(profile.booking_only);
    }

    #[test]
    fn test_prompt_lines() {
        let profile = AssistantProfile::from_json(
            r#"{"tone":"friendly","booking_only":false,"custom_instructions":"Mention free parking."}"#,
        )
        .unwrap();
        let prompt = profile.to_prompt();
        assert!(prompt.contains("Your name is Vira"));
        assert!(prompt.contains("warm, friendly tone"));
        assert!(!prompt.contains("Only discuss topics"));
        assert!(prompt.contains("Mention free parking."));
    }
}
