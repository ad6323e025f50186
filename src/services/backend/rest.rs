use async_trait::async_trait;
use serde_json::Value;

use super::{AppointmentStore, BackendError, EmployeeDirectory};
use crate::models::{Actor, Appointment, AppointmentCreateRequest, DirectoryEntry, Employee};

/// Client for the appointment/employee REST backend.
pub struct RestBackend {
    base_url: String,
    client: reqwest::Client,
}

impl RestBackend {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl EmployeeDirectory for RestBackend {
    async fn list_employees(
        &self,
        actor: Option<&Actor>,
    ) -> Result<Vec<DirectoryEntry>, BackendError> {
        let mut req = self.client.get(self.url("/employees"));
        if let Some(actor) = actor {
            req = req.bearer_auth(&actor.token);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(rejection(status.as_u16(), &body));
        }

        let employees: Vec<Employee> = serde_json::from_str(&body)
            .map_err(|e| BackendError::InvalidResponse(format!("employee list: {e}")))?;

        Ok(employees
            .into_iter()
            .filter(|e| e.is_active)
            .map(DirectoryEntry::from)
            .collect())
    }
}

#[async_trait]
impl AppointmentStore for RestBackend {
    async fn create_appointment(
        &self,
        actor: &Actor,
        request: &AppointmentCreateRequest,
    ) -> Result<Appointment, BackendError> {
        let resp = self
            .client
            .post(self.url("/appointments"))
            .bearer_auth(&actor.token)
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(rejection(status.as_u16(), &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| BackendError::InvalidResponse(format!("appointment: {e}")))
    }
}

fn rejection(status: u16, body: &str) -> BackendError {
    BackendError::Rejected {
        status,
        detail: error_detail(status, body),
    }
}

/// Pulls the human-readable message out of an error body. FastAPI sends
/// either `{"detail": "..."}` or, for validation errors, a list of
/// `{"msg": ...}` entries.
pub(crate) fn error_detail(status: u16, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        match &json["detail"] {
            Value::String(detail) => return detail.clone(),
            Value::Array(items) => {
                let msgs: Vec<&str> = items.iter().filter_map(|i| i["msg"].as_str()).collect();
                if !msgs.is_empty() {
                    return msgs.join("; ");
                }
            }
            _ => {}
        }
    }

    let body = body.trim();
    if body.is_empty() {
        format!("HTTP {status}")
    } else {
        body.to_string()
    }
}
