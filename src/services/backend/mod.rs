pub mod rest;

use async_trait::async_trait;

use crate::models::{Actor, Appointment, AppointmentCreateRequest, DirectoryEntry};

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The backend answered with a non-success status. `detail` is its
    /// human-readable message and is shown to visitors as-is.
    #[error("{detail}")]
    Rejected { status: u16, detail: String },

    #[error("backend unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected backend response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    /// Active employees visible to `actor` (anonymous when `None`).
    async fn list_employees(
        &self,
        actor: Option<&Actor>,
    ) -> Result<Vec<DirectoryEntry>, BackendError>;
}

#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn create_appointment(
        &self,
        actor: &Actor,
        request: &AppointmentCreateRequest,
    ) -> Result<Appointment, BackendError>;
}
