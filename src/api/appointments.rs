//! Appointment endpoints: the public booking submit and the admin table
//! operations

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::appointment::{
        AppointmentRecord, AppointmentStatus, NewAppointment, UpdateAppointmentFields,
    },
    repository::appointments::AppointmentFilter,
    scheduling::booking::BookingDraft,
    AppState,
};

/// List filters for the admin table
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListQuery {
    /// Restrict to one status
    pub status: Option<AppointmentStatus>,
    /// Restrict to one appointment date
    pub date: Option<NaiveDate>,
    /// Free-text search over customer, vehicle, service and branch fields
    pub search: Option<String>,
}

/// Public booking submission. The date and time come from a slot the client
/// selected in the week grid; the time may still carry its range suffix.
#[derive(Debug, Deserialize, ToSchema)]
pub struct BookAppointmentRequest {
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    #[serde(default)]
    pub vehicle_make: String,
    #[serde(default)]
    pub vehicle_model: String,
    #[serde(default)]
    pub car_number: String,
    pub services: Vec<String>,
    pub appointment_date: Option<NaiveDate>,
    /// Slot start time, e.g. "8:00 AM" (or the full "8:00 AM - 8:30 AM" label)
    pub appointment_time: Option<String>,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub branch: String,
}

/// Status transition request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: AppointmentStatus,
}

/// List appointments ordered by date then time
#[utoipa::path(
    get,
    path = "/appointments",
    tag = "appointments",
    params(ListQuery),
    responses(
        (status = 200, description = "Appointments", body = Vec<AppointmentRecord>)
    )
)]
pub async fn list_appointments(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<AppointmentRecord>>> {
    let filter = AppointmentFilter {
        status: query.status,
        date: query.date,
        search: query.search,
    };
    let appointments = state.services.appointments.list(&filter).await?;
    Ok(Json(appointments))
}

/// Get one appointment
#[utoipa::path(
    get,
    path = "/appointments/{id}",
    tag = "appointments",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Appointment", body = AppointmentRecord),
        (status = 404, description = "Appointment not found")
    )
)]
pub async fn get_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AppointmentRecord>> {
    let appointment = state.services.appointments.get(id).await?;
    Ok(Json(appointment))
}

/// Submit a booking (public flow). Runs the full submission gate: required
/// fields, trimming, slot-time parsing. The capacity ceilings are soft; no
/// availability re-check happens here.
#[utoipa::path(
    post,
    path = "/appointments",
    tag = "appointments",
    request_body = BookAppointmentRequest,
    responses(
        (status = 201, description = "Appointment booked", body = AppointmentRecord),
        (status = 400, description = "Missing required fields")
    )
)]
pub async fn book_appointment(
    State(state): State<AppState>,
    Json(request): Json<BookAppointmentRequest>,
) -> AppResult<(StatusCode, Json<AppointmentRecord>)> {
    let mut draft = BookingDraft::new();
    draft.full_name = request.full_name;
    draft.phone = request.phone;
    draft.email = request.email.unwrap_or_default();
    draft.vehicle_make = request.vehicle_make;
    draft.vehicle_model = request.vehicle_model;
    draft.car_number = request.car_number;
    draft.region = request.region;
    draft.branch = request.branch;
    draft.set_schedule(request.appointment_date, request.appointment_time.as_deref());
    for service in &request.services {
        if !draft.services().contains(service) {
            draft.toggle_service(service);
        }
    }

    let record = state.services.booking.submit(draft).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Create an appointment directly (admin add form). The caller supplies an
/// already-shaped record; the public booking gate is not involved, so an
/// empty service list or a blank name is accepted here.
#[utoipa::path(
    post,
    path = "/appointments/admin",
    tag = "appointments",
    request_body = NewAppointment,
    responses(
        (status = 201, description = "Appointment created", body = AppointmentRecord)
    )
)]
pub async fn create_appointment(
    State(state): State<AppState>,
    Json(request): Json<NewAppointment>,
) -> AppResult<(StatusCode, Json<AppointmentRecord>)> {
    let record = state.services.appointments.create(request).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Apply a staff status transition
#[utoipa::path(
    put,
    path = "/appointments/{id}/status",
    tag = "appointments",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = AppointmentRecord),
        (status = 404, description = "Appointment not found"),
        (status = 422, description = "Transition not allowed")
    )
)]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> AppResult<Json<AppointmentRecord>> {
    let appointment = state
        .services
        .appointments
        .update_status(id, request.status)
        .await?;
    Ok(Json(appointment))
}

/// Edit appointment fields (admin side, last-write-wins)
#[utoipa::path(
    put,
    path = "/appointments/{id}",
    tag = "appointments",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    request_body = UpdateAppointmentFields,
    responses(
        (status = 200, description = "Appointment updated", body = AppointmentRecord),
        (status = 404, description = "Appointment not found")
    )
)]
pub async fn update_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateAppointmentFields>,
) -> AppResult<Json<AppointmentRecord>> {
    let appointment = state
        .services
        .appointments
        .update_fields(id, &request)
        .await?;
    Ok(Json(appointment))
}

/// Delete an appointment (hard delete)
#[utoipa::path(
    delete,
    path = "/appointments/{id}",
    tag = "appointments",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    responses(
        (status = 204, description = "Appointment deleted"),
        (status = 404, description = "Appointment not found")
    )
)]
pub async fn delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.appointments.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
