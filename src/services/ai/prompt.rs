use chrono::NaiveDateTime;

use crate::models::employee::directory_to_prompt;
use crate::models::{AssistantProfile, DirectoryEntry};

pub const BOOKING_START_MARKER: &str = "BOOKING_JSON_START";
pub const BOOKING_END_MARKER: &str = "BOOKING_JSON_END";

/// Full system prompt for one turn. Rebuilt every call so the directory and
/// the current time are always fresh.
pub fn build_system_prompt(
    profile: &AssistantProfile,
    directory: &[DirectoryEntry],
    now: NaiveDateTime,
) -> String {
    let employees = directory_to_prompt(directory);
    let current_time = now.format("%H:%M");
    let current_date = now.format("%Y-%m-%d");
    let open = &profile.office_hours.start;
    let close = &profile.office_hours.end;
    let company = &profile.company_name;

    let mut prompt = format!(
        r#"You are an intelligent appointment booking assistant for {company}. Your role is to have natural conversations with visitors to book appointments.

AVAILABLE EMPLOYEES: {employees}

CRITICAL INSTRUCTIONS:
1. Handle the entire conversation naturally and collect all information through conversation.
2. Users can provide information in any order or format.
3. When users want to change something, ask what they would like to change and update it.
4. Appointment times must be between {open} and {close}.
   - The current local time is {current_time} on {current_date}.
   - If the appointment is for today and the requested time has already passed, politely ask for a later time.
   - If the appointment is for a future date, any time within office hours is fine.
5. Never use emojis. Keep text clean and professional.

REQUIRED INFORMATION TO COLLECT:
- Employee name (from the available list) and their department
- Reason for the appointment
- Date (default today) and time
- Visitor name
- Email address
- Phone number

CONVERSATION FLOW:
1. Help visitors find the right employee if needed.
2. Collect missing information naturally.
3. When all information is collected, give a short summary and ask for confirmation.
4. Only when the visitor confirms the summary, produce the final booking.

FINAL BOOKING FORMAT:
When the visitor confirms all details are correct, reply with a short confirmation sentence followed by exactly:
{BOOKING_START_MARKER}
{{
  "employee_name": "Employee Name",
  "department": "Department",
  "reason": "Reason",
  "appointment_time": "HH:MM (24-hour)",
  "visitor_name": "Visitor Name",
  "email": "email@example.com",
  "phone": "1234567890",
  "appointment_date": "{current_date}"
}}
{BOOKING_END_MARKER}

Only generate the JSON after the visitor explicitly confirms the details."#
    );

    prompt.push_str(&profile.to_prompt());
    prompt
}
