//! Availability index: occupancy counts and the bookability verdict for every
//! (date, slot) cell of the visible week.
//!
//! Everything here is derived from scratch from the full appointment list on
//! every change signal. Record volumes are small; recomputing beats keeping
//! incremental state in sync with the store.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use utoipa::ToSchema;

use super::slots::{
    is_break_slot, is_past_slot, is_sunday, label_for_start_time, match_by_start_time,
};
use crate::config::BookingConfig;

/// Minimal view of an appointment needed for occupancy counting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookedSlot {
    pub date: NaiveDate,
    pub start: NaiveTime,
}

/// Soft-capacity ceilings. These are read-then-act caps, not constraints
/// enforced by the store: two clients can both read "one under the ceiling"
/// and both book, which is an accepted bounded overbooking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    /// Concurrent bookings allowed per (date, slot)
    pub per_slot: u32,
    /// Bookings allowed per day, independent of the per-slot ceiling
    pub per_day: u32,
}

impl Default for Capacity {
    fn default() -> Self {
        Self { per_slot: 8, per_day: 35 }
    }
}

impl From<&BookingConfig> for Capacity {
    fn from(cfg: &BookingConfig) -> Self {
        Self {
            per_slot: cfg.slot_capacity,
            per_day: cfg.day_capacity,
        }
    }
}

/// The cell the active booking session currently has selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection<'a> {
    pub date: NaiveDate,
    pub label: &'a str,
}

/// Derived status of one (date, slot) cell.
///
/// Exactly one status holds per cell, decided in declaration order: day-level
/// fullness dominates everything (a break slot on a full day reads as full,
/// because "fully booked" is the actionable signal), then break, then the
/// Sunday closure, then slot-level fullness, then past, then selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CellStatus {
    DayFull,
    Break,
    Sunday,
    SlotFull,
    Past,
    Selected,
    Available,
}

impl CellStatus {
    /// Only available and already-selected cells accept a click; every other
    /// status rejects selection attempts as a no-op
    pub fn is_selectable(self) -> bool {
        matches!(self, CellStatus::Available | CellStatus::Selected)
    }
}

/// Number of records on `date` whose stored start time names the same slot as
/// `slot_label`
pub fn count_in_slot(date: NaiveDate, slot_label: &str, records: &[BookedSlot]) -> u32 {
    records
        .iter()
        .filter(|r| r.date == date)
        .filter(|r| match_by_start_time(&label_for_start_time(r.start), slot_label))
        .count() as u32
}

/// Number of records on `date`, regardless of slot
pub fn count_for_day(date: NaiveDate, records: &[BookedSlot]) -> u32 {
    records.iter().filter(|r| r.date == date).count() as u32
}

/// True iff the per-slot ceiling is reached
pub fn is_slot_full(
    date: NaiveDate,
    slot_label: &str,
    records: &[BookedSlot],
    capacity: Capacity,
) -> bool {
    count_in_slot(date, slot_label, records) >= capacity.per_slot
}

/// True iff the per-day ceiling is reached. A day can be full while every
/// individual slot is under its own ceiling, and vice versa.
pub fn is_day_full(date: NaiveDate, records: &[BookedSlot], capacity: Capacity) -> bool {
    count_for_day(date, records) >= capacity.per_day
}

/// Decide the one status of a (date, slot) cell
pub fn cell_status(
    date: NaiveDate,
    slot_label: &str,
    records: &[BookedSlot],
    selection: Option<Selection<'_>>,
    now: NaiveDateTime,
    capacity: Capacity,
) -> CellStatus {
    if is_day_full(date, records, capacity) {
        return CellStatus::DayFull;
    }
    if is_break_slot(slot_label) {
        return CellStatus::Break;
    }
    if is_sunday(date) {
        return CellStatus::Sunday;
    }
    if is_slot_full(date, slot_label, records, capacity) {
        return CellStatus::SlotFull;
    }
    if is_past_slot(date, slot_label, now) {
        return CellStatus::Past;
    }
    if let Some(sel) = selection {
        if sel.date == date && match_by_start_time(sel.label, slot_label) {
            return CellStatus::Selected;
        }
    }
    CellStatus::Available
}
