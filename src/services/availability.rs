//! Week-availability service: full fetch, then derive everything

use chrono::{NaiveDate, NaiveDateTime};

use crate::{
    api::availability::{CellView, DaySummary, SlotRow, WeekAvailabilityResponse},
    error::AppResult,
    repository::{appointments::AppointmentFilter, Repository},
    scheduling::{
        availability::{
            cell_status, count_for_day, count_in_slot, is_day_full, BookedSlot, Capacity,
        },
        slots::{is_sunday, next_week, previous_week, slot_catalog, start_of_week, week_days},
    },
};

#[derive(Clone)]
pub struct AvailabilityService {
    repository: Repository,
    capacity: Capacity,
}

impl AvailabilityService {
    pub fn new(repository: Repository, capacity: Capacity) -> Self {
        Self { repository, capacity }
    }

    /// Derive the week grid around `pivot`. The entire record set is
    /// re-fetched and the index recomputed from scratch; there is no
    /// incremental patching to drift out of sync with the store.
    pub async fn week(
        &self,
        pivot: NaiveDate,
        now: NaiveDateTime,
    ) -> AppResult<WeekAvailabilityResponse> {
        let records = self
            .repository
            .appointments
            .list(&AppointmentFilter::default())
            .await?;
        let booked: Vec<BookedSlot> = records.iter().map(BookedSlot::from).collect();
        Ok(assemble_week(pivot, &booked, now, self.capacity))
    }
}

/// Pure assembly of the week grid from an in-memory record view
pub(crate) fn assemble_week(
    pivot: NaiveDate,
    booked: &[BookedSlot],
    now: NaiveDateTime,
    capacity: Capacity,
) -> WeekAvailabilityResponse {
    let week_start = start_of_week(pivot);
    let days = week_days(week_start);

    let day_summaries = days
        .iter()
        .map(|&date| DaySummary {
            date,
            weekday: date.format("%a").to_string(),
            total: count_for_day(date, booked),
            is_full: is_day_full(date, booked, capacity),
            is_open: !is_sunday(date),
        })
        .collect();

    let slots = slot_catalog()
        .iter()
        .map(|slot| SlotRow {
            label: slot.label.to_string(),
            is_break: slot.is_break,
            cells: days
                .iter()
                .map(|&date| {
                    let status = cell_status(date, slot.label, booked, None, now, capacity);
                    CellView {
                        date,
                        count: count_in_slot(date, slot.label, booked),
                        status,
                        selectable: status.is_selectable(),
                    }
                })
                .collect(),
        })
        .collect();

    WeekAvailabilityResponse {
        week_start,
        previous_week: previous_week(week_start),
        next_week: next_week(week_start),
        days: day_summaries,
        slots,
    }
}
