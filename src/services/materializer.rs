use crate::models::{Actor, Appointment, AppointmentCreateRequest};
use crate::services::backend::{AppointmentStore, BackendError};

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("You must be logged in to book an appointment.")]
    NotLoggedIn,

    /// The account exists but is not linked to a company; an administrator
    /// has to fix it, logging in again will not help.
    #[error("User account is missing company ID. Please contact your administrator.")]
    MissingTenant,

    #[error("{0}")]
    Persistence(String),
}

impl From<BackendError> for BookingError {
    fn from(e: BackendError) -> Self {
        BookingError::Persistence(e.to_string())
    }
}

/// Submits a validated booking on behalf of `actor`. The backend scopes it
/// to the actor's company.
pub async fn materialize(
    actor: Option<&Actor>,
    request: &AppointmentCreateRequest,
    store: &dyn AppointmentStore,
) -> Result<Appointment, BookingError> {
    let actor = actor.ok_or(BookingError::NotLoggedIn)?;
    if actor.tenant_id.is_none() {
        return Err(BookingError::MissingTenant);
    }

    let appointment = store.create_appointment(actor, request).await?;

    tracing::info!(
        appointment_id = appointment.id,
        tenant_id = appointment.company_id,
        method = request.booking_method.as_str(),
        employee = %request.employee_name,
        "appointment created"
    );

    Ok(appointment)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::NaiveDate;

    use super::*;
    use crate::models::{ActorRole, AppointmentDraft, BookingMethod, FinalizedBooking};

    struct RecordingStore {
        requests: Mutex<Vec<AppointmentCreateRequest>>,
        fail_with: Option<String>,
    }

    impl RecordingStore {
        fn new(fail_with: Option<&str>) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                fail_with: fail_with.map(str::to_string),
            }
        }
    }

    #[async_trait]
    impl AppointmentStore for RecordingStore {
        async fn create_appointment(
            &self,
            actor: &Actor,
            request: &AppointmentCreateRequest,
        ) -> Result<Appointment, BackendError> {
            self.requests.lock().unwrap().push(request.clone());
            if let Some(detail) = &self.fail_with {
                return Err(BackendError::Rejected {
                    status: 400,
                    detail: detail.clone(),
                });
            }
            Ok(Appointment {
                id: 7,
                employee_name: request.employee_name.clone(),
                department: request.department.clone(),
                reason: request.reason.clone(),
                appointment_date: request.appointment_date.clone(),
                appointment_time: request.appointment_time.clone(),
                visitor_name: request.visitor_name.clone(),
                visitor_email: request.visitor_email.clone(),
                visitor_phone: request.visitor_phone.clone(),
                company_id: actor.tenant_id.unwrap_or_default(),
                company_name: None,
                booking_method: request.booking_method.as_str().to_string(),
                status: "scheduled".to_string(),
                qr_code_sent: false,
                email_sent: false,
                created_at: String::new(),
                updated_at: String::new(),
            })
        }
    }

    fn request(method: BookingMethod) -> AppointmentCreateRequest {
        let draft = AppointmentDraft {
            employee_name: Some("Arjun Mehta".to_string()),
            department: Some("Developers".to_string()),
            reason: Some("demo".to_string()),
            appointment_date: Some("2025-06-16".to_string()),
            appointment_time: Some("14:00".to_string()),
            visitor_name: Some("Jane Doe".to_string()),
            email: Some("jane@x.com".to_string()),
            phone: Some("5551234".to_string()),
        };
        FinalizedBooking::from_draft(&draft, NaiveDate::from_ymd_opt(2025, 6, 16).unwrap())
            .unwrap()
            .to_create_request(method)
    }

    fn actor(tenant_id: Option<i64>) -> Actor {
        Actor {
            email: "desk@k.com".to_string(),
            tenant_id,
            role: ActorRole::User,
            token: "t".to_string(),
        }
    }

    #[tokio::test]
    async fn test_no_actor_is_not_logged_in() {
        let store = RecordingStore::new(None);
        let err = materialize(None, &request(BookingMethod::Voice), &store)
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::NotLoggedIn));
        assert!(store.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_tenant_has_distinct_message() {
        let store = RecordingStore::new(None);
        let err = materialize(Some(&actor(None)), &request(BookingMethod::Voice), &store)
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::MissingTenant));
        assert_ne!(err.to_string(), BookingError::NotLoggedIn.to_string());
        assert!(store.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_success_sends_voice_method() {
        let store = RecordingStore::new(None);
        let appt = materialize(Some(&actor(Some(3))), &request(BookingMethod::Voice), &store)
            .await
            .unwrap();
        assert_eq!(appt.company_id, 3);
        let requests = store.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].booking_method, BookingMethod::Voice);
        assert_eq!(requests[0].appointment_time, "14:00");
    }

    #[tokio::test]
    async fn test_backend_detail_is_verbatim() {
        let store = RecordingStore::new(Some("Employee not found in your company"));
        let err = materialize(Some(&actor(Some(3))), &request(BookingMethod::Manual), &store)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Employee not found in your company");
    }
}
