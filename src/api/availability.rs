//! Week-availability endpoint: the derived calendar grid the booking UI renders

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{error::AppResult, scheduling::availability::CellStatus, AppState};

/// Query parameters for the week view
#[derive(Debug, Deserialize, IntoParams)]
pub struct WeekQuery {
    /// Any date inside the wanted week (defaults to today)
    pub pivot: Option<NaiveDate>,
}

/// Per-day occupancy summary
#[derive(Debug, Serialize, ToSchema)]
pub struct DaySummary {
    pub date: NaiveDate,
    /// Short weekday name ("Mon")
    pub weekday: String,
    /// Bookings on this date, regardless of slot
    pub total: u32,
    /// Day-level ceiling reached
    pub is_full: bool,
    /// False on the Sunday closure
    pub is_open: bool,
}

/// One (date, slot) cell of the grid
#[derive(Debug, Serialize, ToSchema)]
pub struct CellView {
    pub date: NaiveDate,
    /// Bookings matched to this slot by start time
    pub count: u32,
    pub status: CellStatus,
    pub selectable: bool,
}

/// One catalog slot across the week
#[derive(Debug, Serialize, ToSchema)]
pub struct SlotRow {
    pub label: String,
    pub is_break: bool,
    pub cells: Vec<CellView>,
}

/// The full derived week grid
#[derive(Debug, Serialize, ToSchema)]
pub struct WeekAvailabilityResponse {
    pub week_start: NaiveDate,
    /// Week-start for back navigation
    pub previous_week: NaiveDate,
    /// Week-start for forward navigation
    pub next_week: NaiveDate,
    pub days: Vec<DaySummary>,
    pub slots: Vec<SlotRow>,
}

/// Get the availability grid for the week containing `pivot`
#[utoipa::path(
    get,
    path = "/availability/week",
    tag = "availability",
    params(WeekQuery),
    responses(
        (status = 200, description = "Derived week availability", body = WeekAvailabilityResponse)
    )
)]
pub async fn get_week(
    State(state): State<AppState>,
    Query(query): Query<WeekQuery>,
) -> AppResult<Json<WeekAvailabilityResponse>> {
    let now = Local::now().naive_local();
    let pivot = query.pivot.unwrap_or_else(|| now.date());
    let week = state.services.availability.week(pivot, now).await?;
    Ok(Json(week))
}
