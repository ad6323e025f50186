use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppointmentDraft {
    pub employee_name: Option<String>,
    pub department: Option<String>,
    pub reason: Option<String>,
    pub appointment_date: Option<String>,
    pub appointment_time: Option<String>,
    pub visitor_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl AppointmentDraft {
    /// `appointment_date` is not required; it defaults to today.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let fields = [
            ("employee_name", &self.employee_name),
            ("department", &self.department),
            ("reason", &self.reason),
            ("appointment_time", &self.appointment_time),
            ("visitor_name", &self.visitor_name),
            ("email", &self.email),
            ("phone", &self.phone),
        ];

        fields
            .iter()
            .filter(|(_, value)| !is_present(value.as_deref()))
            .map(|(name, _)| *name)
            .collect()
    }
}

/// Models like to write "null" or "none" instead of leaving a key out.
pub(crate) fn is_present(value: Option<&str>) -> bool {
    value
        .map(|v| {
            let v = v.trim();
            !v.is_empty() && !v.eq_ignore_ascii_case("none") && !v.eq_ignore_ascii_case("null")
        })
        .unwrap_or(false)
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DraftError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("invalid appointment time: {0}")]
    InvalidTime(String),

    #[error("invalid appointment date: {0}")]
    InvalidDate(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinalizedBooking {
    pub employee_name: String,
    pub department: String,
    pub reason: String,
    pub appointment_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub appointment_time: NaiveTime,
    pub visitor_name: String,
    pub email: String,
    pub phone: String,
}

impl FinalizedBooking {
    pub fn from_draft(draft: &AppointmentDraft, default_date: NaiveDate) -> Result<Self, DraftError> {
        let missing = draft.missing_fields();
        if !missing.is_empty() {
            return Err(DraftError::MissingFields(missing));
        }

        let raw_time = field(&draft.appointment_time);
        let appointment_time =
            parse_clock_time(&raw_time).ok_or(DraftError::InvalidTime(raw_time))?;

        let appointment_date = match draft.appointment_date.as_deref() {
            Some(d) if is_present(Some(d)) => NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d")
                .map_err(|_| DraftError::InvalidDate(d.trim().to_string()))?,
            _ => default_date,
        };

        Ok(Self {
            employee_name: field(&draft.employee_name),
            department: field(&draft.department),
            reason: field(&draft.reason),
            appointment_date,
            appointment_time,
            visitor_name: field(&draft.visitor_name),
            email: field(&draft.email),
            phone: field(&draft.phone),
        })
    }

    pub fn to_draft(&self) -> AppointmentDraft {
        AppointmentDraft {
            employee_name: Some(self.employee_name.clone()),
            department: Some(self.department.clone()),
            reason: Some(self.reason.clone()),
            appointment_date: Some(self.appointment_date.format("%Y-%m-%d").to_string()),
            appointment_time: Some(self.appointment_time.format("%H:%M").to_string()),
            visitor_name: Some(self.visitor_name.clone()),
            email: Some(self.email.clone()),
            phone: Some(self.phone.clone()),
        }
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        self.appointment_date.and_time(self.appointment_time)
    }

    /// Applies a field-by-field edit and re-validates the result as a whole.
    pub fn apply_edit(&self, edit: &BookingEdit) -> Result<Self, DraftError> {
        let mut draft = self.to_draft();
        let patches = [
            (&mut draft.employee_name, &edit.employee_name),
            (&mut draft.department, &edit.department),
            (&mut draft.reason, &edit.reason),
            (&mut draft.appointment_date, &edit.appointment_date),
            (&mut draft.appointment_time, &edit.appointment_time),
            (&mut draft.visitor_name, &edit.visitor_name),
            (&mut draft.email, &edit.email),
            (&mut draft.phone, &edit.phone),
        ];
        for (slot, patch) in patches {
            if let Some(value) = patch {
                *slot = Some(value.clone());
            }
        }
        Self::from_draft(&draft, self.appointment_date)
    }

    pub fn to_create_request(&self, method: BookingMethod) -> AppointmentCreateRequest {
        AppointmentCreateRequest {
            employee_name: self.employee_name.clone(),
            department: self.department.clone(),
            reason: Some(self.reason.clone()).filter(|r| !r.is_empty()),
            appointment_date: self.appointment_date.format("%Y-%m-%d").to_string(),
            appointment_time: self.appointment_time.format("%H:%M").to_string(),
            visitor_name: self.visitor_name.clone(),
            visitor_email: self.email.clone(),
            visitor_phone: Some(self.phone.clone()).filter(|p| !p.is_empty()),
            booking_method: method,
        }
    }
}

fn field(value: &Option<String>) -> String {
    value.as_deref().unwrap_or_default().trim().to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BookingEdit {
    pub employee_name: Option<String>,
    pub department: Option<String>,
    pub reason: Option<String>,
    pub appointment_date: Option<String>,
    pub appointment_time: Option<String>,
    pub visitor_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingMethod {
    Manual,
    Voice,
}

impl BookingMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingMethod::Manual => "manual",
            BookingMethod::Voice => "voice",
        }
    }
}

/// Body accepted by the backend's appointment-creation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppointmentCreateRequest {
    pub employee_name: String,
    pub department: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub appointment_date: String,
    pub appointment_time: String,
    pub visitor_name: String,
    pub visitor_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visitor_phone: Option<String>,
    pub booking_method: BookingMethod,
}

/// Fields submitted through the manual booking form. Reason and phone are
/// optional here, unlike the assistant's finalize payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ManualBookingForm {
    pub employee_name: String,
    pub department: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub appointment_date: Option<String>,
    pub appointment_time: String,
    pub visitor_name: String,
    pub visitor_email: String,
    #[serde(default)]
    pub visitor_phone: Option<String>,
}

impl ManualBookingForm {
    /// Validates the form and returns the backend request with its start time.
    pub fn into_request(
        self,
        today: NaiveDate,
    ) -> Result<(AppointmentCreateRequest, NaiveDateTime), DraftError> {
        let missing: Vec<&'static str> = [
            ("employee_name", &self.employee_name),
            ("department", &self.department),
            ("appointment_time", &self.appointment_time),
            ("visitor_name", &self.visitor_name),
            ("visitor_email", &self.visitor_email),
        ]
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();
        if !missing.is_empty() {
            return Err(DraftError::MissingFields(missing));
        }

        let raw_time = self.appointment_time.trim();
        let time = parse_clock_time(raw_time)
            .ok_or_else(|| DraftError::InvalidTime(raw_time.to_string()))?;
        let date = match self.appointment_date.as_deref().map(str::trim) {
            Some(d) if !d.is_empty() => NaiveDate::parse_from_str(d, "%Y-%m-%d")
                .map_err(|_| DraftError::InvalidDate(d.to_string()))?,
            _ => today,
        };

        let optional = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let request = AppointmentCreateRequest {
            employee_name: self.employee_name.trim().to_string(),
            department: self.department.trim().to_string(),
            reason: optional(self.reason),
            appointment_date: date.format("%Y-%m-%d").to_string(),
            appointment_time: time.format("%H:%M").to_string(),
            visitor_name: self.visitor_name.trim().to_string(),
            visitor_email: self.visitor_email.trim().to_string(),
            visitor_phone: optional(self.visitor_phone),
            booking_method: BookingMethod::Manual,
        };
        Ok((request, date.and_time(time)))
    }
}

/// Stored appointment as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub employee_name: String,
    pub department: String,
    pub reason: Option<String>,
    pub appointment_date: String,
    pub appointment_time: String,
    pub visitor_name: String,
    pub visitor_email: String,
    pub visitor_phone: Option<String>,
    pub company_id: i64,
    #[serde(default)]
    pub company_name: Option<String>,
    pub booking_method: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub qr_code_sent: bool,
    #[serde(default)]
    pub email_sent: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Parses "14:00", "14:00:00", "2pm", "2:30 PM", "9 a.m." into a minute-precision time.
pub fn parse_clock_time(raw: &str) -> Option<NaiveTime> {
    let value = raw.trim().to_ascii_lowercase();
    if value.is_empty() {
        return None;
    }

    for fmt in ["%H:%M", "%H:%M:%S"] {
        if let Ok(t) = NaiveTime::parse_from_str(&value, fmt) {
            return t.with_second(0);
        }
    }

    let compact = value.replace('.', "");
    let (clock, pm) = if let Some(rest) = compact.strip_suffix("pm") {
        (rest.trim(), true)
    } else if let Some(rest) = compact.strip_suffix("am") {
        (rest.trim(), false)
    } else {
        return None;
    };

    let (hour, minute) = match clock.split_once(':') {
        Some((h, m)) => (h.trim().parse::<u32>().ok()?, m.trim().parse::<u32>().ok()?),
        None => (clock.parse::<u32>().ok()?, 0),
    };
    if hour == 0 || hour > 12 {
        return None;
    }

    let hour = match (hour, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, true) => h + 12,
        (h, false) => h,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_clock_time(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid time: {raw}")))
    }
}
