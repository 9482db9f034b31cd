//! Appointment record model and status lifecycle

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::scheduling::availability::BookedSlot;
use crate::scheduling::booking::ValidatedBooking;

// ---------------------------------------------------------------------------
// AppointmentStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of an appointment.
///
/// Created as `Pending` by the booking flow; afterwards mutated only by staff
/// through explicit transitions. `Completed` is terminal; `Confirmed` and
/// `Canceled` can be walked back to `Pending` via the explicit "Accept"
/// action, the only backward transition allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Canceled,
}

impl AppointmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Canceled => "canceled",
        }
    }

    /// Stored statuses outside the known set read as pending
    pub fn from_db(s: &str) -> Self {
        match s {
            "confirmed" => AppointmentStatus::Confirmed,
            "completed" => AppointmentStatus::Completed,
            "canceled" => AppointmentStatus::Canceled,
            _ => AppointmentStatus::Pending,
        }
    }

    /// Whether the staff-side state machine allows `self -> next`
    pub fn can_transition_to(self, next: AppointmentStatus) -> bool {
        use AppointmentStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Canceled)
                | (Confirmed, Completed)
                | (Confirmed, Canceled)
                | (Confirmed, Pending)
                | (Canceled, Pending)
        )
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ServiceList
// ---------------------------------------------------------------------------

/// Stored shape of `service_type`: legacy rows hold a bare string, newer rows
/// a list. Normalized to a list at the repository boundary; nothing deeper
/// ever branches on the shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServiceList {
    One(String),
    Many(Vec<String>),
}

impl ServiceList {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            ServiceList::One(s) => vec![s],
            ServiceList::Many(v) => v,
        }
    }
}

impl From<Vec<String>> for ServiceList {
    fn from(v: Vec<String>) -> Self {
        ServiceList::Many(v)
    }
}

// ---------------------------------------------------------------------------
// AppointmentRecord
// ---------------------------------------------------------------------------

/// One customer booking
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AppointmentRecord {
    pub id: Uuid,
    /// Calendar date only, no time component
    pub appointment_date: NaiveDate,
    /// Single start instant; rendered as a "start - start+30min" label
    pub appointment_time: NaiveTime,
    pub status: AppointmentStatus,
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub vehicle_make: String,
    pub vehicle_model: String,
    pub car_number: String,
    /// Selected service names, normalized to a list
    pub service_type: Vec<String>,
    pub region: String,
    pub branch: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&AppointmentRecord> for BookedSlot {
    fn from(r: &AppointmentRecord) -> Self {
        Self {
            date: r.appointment_date,
            start: r.appointment_time,
        }
    }
}

/// Fields for creating an appointment (booking flow and admin add form)
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewAppointment {
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub vehicle_make: String,
    pub vehicle_model: String,
    pub car_number: String,
    pub service_type: Vec<String>,
    pub region: String,
    pub branch: String,
}

impl From<ValidatedBooking> for NewAppointment {
    fn from(b: ValidatedBooking) -> Self {
        Self {
            appointment_date: b.date,
            appointment_time: b.start,
            full_name: b.full_name,
            phone: b.phone,
            email: b.email,
            vehicle_make: b.vehicle_make,
            vehicle_model: b.vehicle_model,
            car_number: b.car_number,
            service_type: b.services,
            region: b.region,
            branch: b.branch,
        }
    }
}

/// Partial field edit (admin side); last-write-wins, no record-level locking
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateAppointmentFields {
    pub appointment_date: Option<NaiveDate>,
    pub appointment_time: Option<NaiveTime>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub vehicle_make: Option<String>,
    pub vehicle_model: Option<String>,
    pub car_number: Option<String>,
    pub service_type: Option<Vec<String>>,
    pub region: Option<String>,
    pub branch: Option<String>,
}
