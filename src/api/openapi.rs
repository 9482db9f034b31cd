//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{appointments, availability, events, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pitstop API",
        version = "1.0.0",
        description = "Vehicle service appointment booking REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Appointments
        appointments::list_appointments,
        appointments::get_appointment,
        appointments::book_appointment,
        appointments::create_appointment,
        appointments::update_appointment,
        appointments::update_status,
        appointments::delete_appointment,
        events::appointment_events,
        // Availability
        availability::get_week,
    ),
    components(
        schemas(
            // Appointments
            crate::models::appointment::AppointmentRecord,
            crate::models::appointment::AppointmentStatus,
            crate::models::appointment::NewAppointment,
            crate::models::appointment::UpdateAppointmentFields,
            appointments::BookAppointmentRequest,
            appointments::UpdateStatusRequest,
            // Availability
            availability::WeekAvailabilityResponse,
            availability::DaySummary,
            availability::SlotRow,
            availability::CellView,
            crate::scheduling::availability::CellStatus,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "appointments", description = "Appointment booking and management"),
        (name = "availability", description = "Derived week availability grid")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
