//! Server-sent change notifications for appointment data.
//!
//! The stream carries no payload: every event just tells the client that
//! appointment rows changed somewhere, and that it should refetch and
//! rederive whatever view it is holding. A lagged subscriber missed some
//! notifications, which under refetch semantics collapses to the same
//! instruction, so it is folded into a plain change event too.

use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};

use crate::AppState;

/// Subscribe to appointment change notifications
#[utoipa::path(
    get,
    path = "/appointments/events",
    tag = "appointments",
    responses(
        (status = 200, description = "SSE stream of change notifications", content_type = "text/event-stream")
    )
)]
pub async fn appointment_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.services.appointments.subscribe_changes();
    let stream = BroadcastStream::new(receiver)
        .map(|_| Ok(Event::default().event("appointments").data("changed")));

    Sse::new(stream).keep_alive(KeepAlive::default())
}
