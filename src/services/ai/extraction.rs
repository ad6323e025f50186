use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;

use crate::models::{AppointmentDraft, FinalizedBooking};

static BOOKING_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)BOOKING_JSON_START\s*(.*?)\s*BOOKING_JSON_END").expect("valid regex")
});

/// What a single assistant reply yielded.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// No marker block; the usual case while the conversation is ongoing.
    NotFound,
    /// A block was present but unusable: bad JSON, missing fields, bad time/date.
    Malformed(String),
    Booking(FinalizedBooking),
}

impl Extraction {
    pub fn into_booking(self) -> Option<FinalizedBooking> {
        match self {
            Extraction::Booking(booking) => Some(booking),
            _ => None,
        }
    }
}

/// Looks for the first marker block in `text` and validates it.
/// Never fails: anything unusable is reported as `Malformed`.
pub fn extract_booking(text: &str, today: NaiveDate) -> Extraction {
    let Some(captures) = BOOKING_BLOCK.captures(text) else {
        return Extraction::NotFound;
    };
    let raw = captures.get(1).map(|m| m.as_str()).unwrap_or_default();

    let payload = match parse_payload(raw) {
        Ok(payload) => payload,
        Err(reason) => return Extraction::Malformed(reason),
    };

    let draft = AppointmentDraft {
        employee_name: string_field(&payload, "employee_name"),
        department: string_field(&payload, "department"),
        reason: string_field(&payload, "reason"),
        appointment_date: string_field(&payload, "appointment_date"),
        appointment_time: string_field(&payload, "appointment_time"),
        visitor_name: string_field(&payload, "visitor_name"),
        email: string_field(&payload, "email"),
        phone: string_field(&payload, "phone"),
    };

    match FinalizedBooking::from_draft(&draft, today) {
        Ok(booking) => Extraction::Booking(booking),
        Err(e) => Extraction::Malformed(e.to_string()),
    }
}

fn parse_payload(raw: &str) -> Result<serde_json::Map<String, Value>, String> {
    // Models sometimes wrap the block in a markdown fence
    let cleaned = raw
        .trim()
        .strip_prefix("```json")
        .or_else(|| raw.trim().strip_prefix("```"))
        .unwrap_or(raw.trim());
    let cleaned = cleaned.strip_suffix("```").unwrap_or(cleaned).trim();

    match serde_json::from_str::<Value>(cleaned) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(format!("booking block is not an object: {other}")),
        Err(e) => Err(format!("booking block is not valid JSON: {e}")),
    }
}

fn string_field(payload: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    match payload.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Removes every marker block from the user-visible copy of a reply.
pub fn strip_booking_blocks(text: &str) -> String {
    BOOKING_BLOCK.replace_all(text, "").trim().to_string()
}
