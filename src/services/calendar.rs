use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::models::FinalizedBooking;

pub fn generate_ics(
    booking: &FinalizedBooking,
    session_id: Uuid,
    company_name: &str,
    duration_minutes: i64,
) -> String {
    let start = booking.starts_at();
    let dtstart = start.format("%Y%m%dT%H%M%S").to_string();
    let dtend = (start + Duration::minutes(duration_minutes))
        .format("%Y%m%dT%H%M%S")
        .to_string();
    let dtstamp = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
    let uid = format!("{session_id}@vira");

    let summary = escape_text(&format!(
        "Appointment with {} ({})",
        booking.employee_name, booking.department
    ));
    let description = escape_text(&booking.reason);
    let location = escape_text(company_name);

    format!(
        "BEGIN:VCALENDAR\r\n\
         VERSION:2.0\r\n\
         PRODID:-//Vira//Appointment Assistant//EN\r\n\
         BEGIN:VEVENT\r\n\
         UID:{uid}\r\n\
         DTSTAMP:{dtstamp}\r\n\
         DTSTART:{dtstart}\r\n\
         DTEND:{dtend}\r\n\
         SUMMARY:{summary}\r\n\
         DESCRIPTION:{description}\r\n\
         LOCATION:{location}\r\n\
         END:VEVENT\r\n\
         END:VCALENDAR\r\n"
    )
}

// RFC 5545 TEXT escaping
fn escape_text(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::models::AppointmentDraft;

    fn booking(reason: &str, time: &str) -> FinalizedBooking {
        let draft = AppointmentDraft {
            employee_name: Some("Arjun Mehta".to_string()),
            department: Some("Developers".to_string()),
            reason: Some(reason.to_string()),
            appointment_date: Some("2025-03-15".to_string()),
            appointment_time: Some(time.to_string()),
            visitor_name: Some("Jane Doe".to_string()),
            email: Some("jane@x.com".to_string()),
            phone: Some("5551234".to_string()),
        };
        FinalizedBooking::from_draft(&draft, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()).unwrap()
    }

    #[test]
    fn test_generate_ics() {
        let id = Uuid::new_v4();
        let ics = generate_ics(&booking("Product demo", "14:00"), id, "Kanishka Software", 30);
        assert!(ics.contains("BEGIN:VCALENDAR"));
        assert!(ics.contains("BEGIN:VEVENT"));
        assert!(ics.contains("DTSTART:20250315T140000"));
        assert!(ics.contains("DTEND:20250315T143000"));
        assert!(ics.contains("SUMMARY:Appointment with Arjun Mehta (Developers)"));
        assert!(ics.contains("DESCRIPTION:Product demo"));
        assert!(ics.contains(&format!("UID:{id}@vira")));
        assert!(ics.contains("END:VEVENT"));
        assert!(ics.contains("END:VCALENDAR"));
    }

    #[test]
    fn test_generate_ics_escapes_text() {
        let ics = generate_ics(&booking("demo, then Q&A; notes", "9:30 am"), Uuid::new_v4(), "Acme, Inc", 60);
        assert!(ics.contains("DTSTART:20250315T093000"));
        assert!(ics.contains("DTEND:20250315T103000"));
        assert!(ics.contains("DESCRIPTION:demo\\, then Q&A\\; notes"));
        assert!(ics.contains("LOCATION:Acme\\, Inc"));
    }
}
