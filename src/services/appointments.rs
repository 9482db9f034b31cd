//! Appointment management service (admin side)

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::appointment::{
        AppointmentRecord, AppointmentStatus, NewAppointment, UpdateAppointmentFields,
    },
    repository::{
        appointments::{AppointmentFilter, AppointmentsRepository},
        Repository,
    },
    services::email::{ConfirmationEmail, NotificationRelay},
};

/// Read/transition surface of the appointment store, seam for tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatusStore: Send + Sync {
    async fn get_appointment(&self, id: Uuid) -> AppResult<AppointmentRecord>;
    async fn set_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> AppResult<AppointmentRecord>;
}

#[async_trait]
impl StatusStore for AppointmentsRepository {
    async fn get_appointment(&self, id: Uuid) -> AppResult<AppointmentRecord> {
        self.get(id).await
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> AppResult<AppointmentRecord> {
        self.update_status(id, status).await
    }
}

#[derive(Clone)]
pub struct AppointmentsService {
    repository: Repository,
    relay: Arc<dyn NotificationRelay>,
}

impl AppointmentsService {
    pub fn new(repository: Repository, relay: Arc<dyn NotificationRelay>) -> Self {
        Self { repository, relay }
    }

    /// Subscribe to the store's payload-free change-notification stream
    pub fn subscribe_changes(&self) -> tokio::sync::broadcast::Receiver<()> {
        self.repository.appointments.subscribe_changes()
    }

    /// List appointments for the admin table
    pub async fn list(&self, filter: &AppointmentFilter) -> AppResult<Vec<AppointmentRecord>> {
        self.repository.appointments.list(filter).await
    }

    /// Get one appointment
    pub async fn get(&self, id: Uuid) -> AppResult<AppointmentRecord> {
        self.repository.appointments.get(id).await
    }

    /// Create an appointment on behalf of staff (admin add form)
    pub async fn create(&self, data: NewAppointment) -> AppResult<AppointmentRecord> {
        self.repository.appointments.create(&data).await
    }

    /// Apply a staff status transition.
    ///
    /// The transition is checked against the lifecycle state machine first.
    /// Confirming an appointment additionally sends the customer a
    /// confirmation email when one is on file; a send failure is logged and
    /// swallowed, it never blocks or rolls back the status change.
    pub async fn update_status(
        &self,
        id: Uuid,
        new_status: AppointmentStatus,
    ) -> AppResult<AppointmentRecord> {
        transition_status(
            &self.repository.appointments,
            self.relay.as_ref(),
            id,
            new_status,
        )
        .await
    }

    /// Edit appointment fields (last-write-wins)
    pub async fn update_fields(
        &self,
        id: Uuid,
        data: &UpdateAppointmentFields,
    ) -> AppResult<AppointmentRecord> {
        self.repository.appointments.update_fields(id, data).await
    }

    /// Hard-delete an appointment
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.appointments.delete(id).await
    }
}

/// Run one staff transition: check the state machine, persist, then send any
/// confirmation as fire-and-forget
async fn transition_status(
    store: &dyn StatusStore,
    relay: &dyn NotificationRelay,
    id: Uuid,
    new_status: AppointmentStatus,
) -> AppResult<AppointmentRecord> {
    let current = store.get_appointment(id).await?;
    if !current.status.can_transition_to(new_status) {
        return Err(AppError::InvalidTransition(format!(
            "{} -> {} is not allowed",
            current.status, new_status
        )));
    }

    let updated = store.set_status(id, new_status).await?;

    if let Some(email) = confirmation_email_for(&updated, new_status) {
        if let Err(e) = relay.send_confirmation(&email).await {
            tracing::warn!(
                appointment_id = %id,
                "Failed to send confirmation email: {}",
                e
            );
        }
    }

    Ok(updated)
}

/// The confirmation message for a transition, if one should be sent: only
/// `-> confirmed`, and only when the customer left an email address
fn confirmation_email_for(
    record: &AppointmentRecord,
    new_status: AppointmentStatus,
) -> Option<ConfirmationEmail> {
    if new_status != AppointmentStatus::Confirmed {
        return None;
    }
    let to_email = record.email.as_deref()?.to_string();
    let to_name = if record.full_name.is_empty() {
        "Valued Customer".to_string()
    } else {
        record.full_name.clone()
    };
    Some(ConfirmationEmail {
        to_name,
        to_email,
        appointment_date: record.appointment_date.to_string(),
        appointment_time: crate::scheduling::slots::format_clock_time(record.appointment_time),
        car_number: if record.car_number.is_empty() {
            "Not provided".to_string()
        } else {
            record.car_number.clone()
        },
        branch: if record.branch.is_empty() {
            "Our Service Center".to_string()
        } else {
            record.branch.clone()
        },
    })
}
