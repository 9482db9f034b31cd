//! Booking draft: what the active booking session has currently selected, and
//! the validation gate in front of submission.
//!
//! The draft is owned by one session, discarded on successful submit, and
//! never shared. Submission concurrency (the single-flight guard) lives in the
//! booking service; this module is pure state.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

use super::availability::{cell_status, BookedSlot, Capacity, Selection};
use super::slots::{parse_clock_time, start_of_label};

/// Required fields that were absent or blank at submit time
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing required fields: {}", self.0.join(", "))]
pub struct MissingFields(pub Vec<&'static str>);

/// A draft that passed the submission gate; all text fields are trimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedBooking {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub services: Vec<String>,
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub vehicle_make: String,
    pub vehicle_model: String,
    pub car_number: String,
    pub region: String,
    pub branch: String,
}

/// The in-progress selection and form state of one booking session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingDraft {
    selected_date: Option<NaiveDate>,
    /// Start time only ("8:00 AM"); the range suffix is discarded on selection
    selected_time: Option<String>,
    services: Vec<String>,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub vehicle_make: String,
    pub vehicle_model: String,
    pub car_number: String,
    pub region: String,
    pub branch: String,
}

impl BookingDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    pub fn selected_time(&self) -> Option<&str> {
        self.selected_time.as_deref()
    }

    pub fn services(&self) -> &[String] {
        &self.services
    }

    /// Current selection as an availability-index key
    fn selection(&self) -> Option<Selection<'_>> {
        match (self.selected_date, self.selected_time.as_deref()) {
            (Some(date), Some(label)) => Some(Selection { date, label }),
            _ => None,
        }
    }

    /// Try to select a (date, slot) cell. Anything other than an available or
    /// already-selected cell rejects the click with no state change. Returns
    /// whether the selection took.
    pub fn select_slot(
        &mut self,
        date: NaiveDate,
        slot_label: &str,
        now: NaiveDateTime,
        records: &[BookedSlot],
        capacity: Capacity,
    ) -> bool {
        let status = cell_status(date, slot_label, records, self.selection(), now, capacity);
        if !status.is_selectable() {
            return false;
        }
        self.selected_date = Some(date);
        // Downstream storage wants a single start time, not a range
        self.selected_time = Some(start_of_label(slot_label).to_string());
        true
    }

    /// Rehydrate the schedule from a client that already went through slot
    /// selection; the label may still carry its range suffix. The submission
    /// gate re-checks presence and parseability either way.
    pub fn set_schedule(&mut self, date: Option<NaiveDate>, time_label: Option<&str>) {
        self.selected_date = date;
        self.selected_time = time_label.map(|t| start_of_label(t).to_string());
    }

    /// Symmetric add/remove: selecting a service twice removes it
    pub fn toggle_service(&mut self, name: &str) {
        if let Some(pos) = self.services.iter().position(|s| s == name) {
            self.services.remove(pos);
        } else {
            self.services.push(name.to_string());
        }
    }

    /// Gate the draft for submission: full name, phone, date, time and at
    /// least one service are required; email is optional. All text fields are
    /// trimmed before validation and handoff.
    pub fn validate_for_submit(&self) -> Result<ValidatedBooking, MissingFields> {
        let mut missing = Vec::new();

        let full_name = self.full_name.trim();
        let phone = self.phone.trim();
        if full_name.is_empty() {
            missing.push("full_name");
        }
        if phone.is_empty() {
            missing.push("phone");
        }
        if self.selected_date.is_none() {
            missing.push("date");
        }
        let start = self
            .selected_time
            .as_deref()
            .and_then(parse_clock_time);
        if start.is_none() {
            missing.push("time");
        }
        if self.services.is_empty() {
            missing.push("services");
        }

        if !missing.is_empty() {
            return Err(MissingFields(missing));
        }

        let email = self.email.trim();
        Ok(ValidatedBooking {
            date: self.selected_date.unwrap(),
            start: start.unwrap(),
            services: self.services.clone(),
            full_name: full_name.to_string(),
            phone: phone.to_string(),
            email: (!email.is_empty()).then(|| email.to_string()),
            vehicle_make: self.vehicle_make.trim().to_string(),
            vehicle_model: self.vehicle_model.trim().to_string(),
            car_number: self.car_number.trim().to_string(),
            region: self.region.trim().to_string(),
            branch: self.branch.trim().to_string(),
        })
    }

    /// Clear the selection and every form field (after a successful submit)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn early(d: NaiveDate) -> NaiveDateTime {
        d.and_hms_opt(0, 0, 0).unwrap()
    }

    fn filled_draft() -> BookingDraft {
        let monday = date(2024, 6, 10);
        let mut draft = BookingDraft::new();
        assert!(draft.select_slot(
            monday,
            "8:00 AM - 8:30 AM",
            early(monday),
            &[],
            Capacity::default(),
        ));
        draft.toggle_service("Oil Change");
        draft.full_name = "Jordan Velez".into();
        draft.phone = "555-0100".into();
        draft
    }

    #[test]
    fn select_slot_keeps_start_time_only() {
        let draft = filled_draft();
        assert_eq!(draft.selected_time(), Some("8:00 AM"));
        assert_eq!(draft.selected_date(), Some(date(2024, 6, 10)));
    }

    #[test]
    fn select_slot_is_idempotent() {
        let monday = date(2024, 6, 10);
        let mut once = BookingDraft::new();
        once.select_slot(monday, "8:00 AM - 8:30 AM", early(monday), &[], Capacity::default());
        let mut twice = once.clone();
        assert!(twice.select_slot(monday, "8:00 AM - 8:30 AM", early(monday), &[], Capacity::default()));
        assert_eq!(once, twice);
    }

    #[test]
    fn select_slot_rejects_blocked_cells() {
        let sunday = date(2024, 6, 9);
        let mut draft = BookingDraft::new();
        assert!(!draft.select_slot(sunday, "8:00 AM - 8:30 AM", early(sunday), &[], Capacity::default()));
        assert_eq!(draft, BookingDraft::new());

        let monday = date(2024, 6, 10);
        assert!(!draft.select_slot(
            monday,
            "11:00 AM - 11:30 AM",
            early(monday),
            &[],
            Capacity::default(),
        ));
        assert_eq!(draft.selected_date(), None);
    }

    #[test]
    fn select_slot_rejects_full_slots_without_clearing_selection() {
        let monday = date(2024, 6, 10);
        let mut draft = filled_draft();
        let full: Vec<BookedSlot> = (0..8)
            .map(|_| BookedSlot {
                date: monday,
                start: chrono::NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            })
            .collect();
        assert!(!draft.select_slot(
            monday,
            "9:00 AM - 9:30 AM",
            early(monday),
            &full,
            Capacity::default(),
        ));
        // Prior selection survives the rejected click
        assert_eq!(draft.selected_time(), Some("8:00 AM"));
    }

    #[test]
    fn toggle_service_never_duplicates() {
        let mut draft = BookingDraft::new();
        draft.toggle_service("Oil Change");
        draft.toggle_service("Brake Inspection");
        draft.toggle_service("Oil Change");
        assert_eq!(draft.services(), ["Brake Inspection"]);
        draft.toggle_service("Brake Inspection");
        assert!(draft.services().is_empty());
    }

    // Blank name with everything else set fails naming full_name
    #[test]
    fn blank_name_fails_validation() {
        let mut draft = filled_draft();
        draft.full_name = "".into();
        let err = draft.validate_for_submit().unwrap_err();
        assert_eq!(err.0, vec!["full_name"]);
    }

    #[test]
    fn whitespace_only_fields_count_as_missing() {
        let mut draft = filled_draft();
        draft.full_name = "   ".into();
        draft.phone = "\t".into();
        let err = draft.validate_for_submit().unwrap_err();
        assert_eq!(err.0, vec!["full_name", "phone"]);
    }

    #[test]
    fn zero_services_fails_validation() {
        let mut draft = filled_draft();
        draft.toggle_service("Oil Change");
        let err = draft.validate_for_submit().unwrap_err();
        assert_eq!(err.0, vec!["services"]);
    }

    #[test]
    fn empty_draft_reports_every_required_field() {
        let err = BookingDraft::new().validate_for_submit().unwrap_err();
        assert_eq!(err.0, vec!["full_name", "phone", "date", "time", "services"]);
    }

    #[test]
    fn valid_draft_is_trimmed_on_handoff() {
        let mut draft = filled_draft();
        draft.full_name = "  Jordan Velez  ".into();
        draft.email = " jordan@example.com ".into();
        draft.vehicle_make = " Toyota ".into();
        let booking = draft.validate_for_submit().unwrap();
        assert_eq!(booking.full_name, "Jordan Velez");
        assert_eq!(booking.email.as_deref(), Some("jordan@example.com"));
        assert_eq!(booking.vehicle_make, "Toyota");
        assert_eq!(booking.start, chrono::NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(booking.services, ["Oil Change"]);
    }

    #[test]
    fn empty_email_becomes_none() {
        let mut draft = filled_draft();
        draft.email = "   ".into();
        let booking = draft.validate_for_submit().unwrap();
        assert_eq!(booking.email, None);
    }

    #[test]
    fn reset_clears_everything() {
        let mut draft = filled_draft();
        draft.reset();
        assert_eq!(draft, BookingDraft::new());
    }
}
