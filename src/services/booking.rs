//! Public booking flow: the session around a draft and its single-flight
//! submission path

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::{
    error::{AppError, AppResult},
    models::appointment::{AppointmentRecord, NewAppointment},
    repository::{appointments::AppointmentsRepository, Repository},
    scheduling::booking::BookingDraft,
};

/// Creation surface of the appointment store, seam for tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn create_appointment(&self, data: &NewAppointment) -> AppResult<AppointmentRecord>;
}

#[async_trait]
impl AppointmentStore for AppointmentsRepository {
    async fn create_appointment(&self, data: &NewAppointment) -> AppResult<AppointmentRecord> {
        self.create(data).await
    }
}

/// One-shot submission: run the draft through the validation gate and create
/// the record
pub async fn submit_draft(
    store: &dyn AppointmentStore,
    draft: &BookingDraft,
) -> AppResult<AppointmentRecord> {
    let validated = draft
        .validate_for_submit()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    store.create_appointment(&NewAppointment::from(validated)).await
}

/// Result of a submit attempt
#[derive(Debug)]
pub enum SubmitOutcome {
    Created(AppointmentRecord),
    /// Another submission on this session is still in flight; this call was a
    /// no-op (double-click protection)
    AlreadyInFlight,
}

/// Releases the in-flight flag on every exit path, including errors
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// One booking session: a draft plus the single-flight submission guard.
///
/// On success the draft resets to empty; on failure the typed fields survive
/// so the user can retry without retyping.
pub struct BookingSession {
    draft: tokio::sync::Mutex<BookingDraft>,
    in_flight: AtomicBool,
}

impl BookingSession {
    pub fn new() -> Self {
        Self::with_draft(BookingDraft::new())
    }

    pub fn with_draft(draft: BookingDraft) -> Self {
        Self {
            draft: tokio::sync::Mutex::new(draft),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Mutate the draft (form edits, slot selection, service toggles)
    pub async fn edit<F: FnOnce(&mut BookingDraft)>(&self, f: F) {
        let mut draft = self.draft.lock().await;
        f(&mut draft);
    }

    pub async fn draft(&self) -> BookingDraft {
        self.draft.lock().await.clone()
    }

    /// Validate the draft and hand it to the store. Concurrent calls while a
    /// submission is in flight are no-ops; exactly one create reaches the
    /// store per completed flight.
    pub async fn submit(&self, store: &dyn AppointmentStore) -> AppResult<SubmitOutcome> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(SubmitOutcome::AlreadyInFlight);
        }
        let _release = InFlightGuard(&self.in_flight);

        let draft = self.draft.lock().await.clone();
        let record = submit_draft(store, &draft).await?;

        self.draft.lock().await.reset();
        Ok(SubmitOutcome::Created(record))
    }
}

impl Default for BookingSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Service wrapper used by the HTTP booking endpoint
#[derive(Clone)]
pub struct BookingService {
    repository: Repository,
}

impl BookingService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Run a draft through the full submission gate and create the record.
    ///
    /// Each HTTP submission carries its own draft, so this is a one-shot path;
    /// the session-level single-flight guard has nothing to protect here.
    pub async fn submit(&self, draft: BookingDraft) -> AppResult<AppointmentRecord> {
        submit_draft(&self.repository.appointments, &draft).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime, Utc};
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use tokio::sync::Notify;
    use uuid::Uuid;

    fn record_for(data: &NewAppointment) -> AppointmentRecord {
        AppointmentRecord {
            id: Uuid::new_v4(),
            appointment_date: data.appointment_date,
            appointment_time: data.appointment_time,
            status: crate::models::appointment::AppointmentStatus::Pending,
            full_name: data.full_name.clone(),
            phone: data.phone.clone(),
            email: data.email.clone(),
            vehicle_make: data.vehicle_make.clone(),
            vehicle_model: data.vehicle_model.clone(),
            car_number: data.car_number.clone(),
            service_type: data.service_type.clone(),
            region: data.region.clone(),
            branch: data.branch.clone(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn early(d: NaiveDate) -> NaiveDateTime {
        d.and_hms_opt(0, 0, 0).unwrap()
    }

    fn valid_draft() -> BookingDraft {
        let monday = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let mut draft = BookingDraft::new();
        draft.select_slot(
            monday,
            "8:00 AM - 8:30 AM",
            early(monday),
            &[],
            Default::default(),
        );
        draft.toggle_service("Oil Change");
        draft.full_name = "Jordan Velez".into();
        draft.phone = "555-0100".into();
        draft
    }

    /// Store that signals when create starts and holds it open until released
    struct SlowStore {
        calls: AtomicUsize,
        started: Notify,
        release: Notify,
    }

    impl SlowStore {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                started: Notify::new(),
                release: Notify::new(),
            }
        }
    }

    #[async_trait]
    impl AppointmentStore for SlowStore {
        async fn create_appointment(&self, data: &NewAppointment) -> AppResult<AppointmentRecord> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.started.notify_one();
            self.release.notified().await;
            Ok(record_for(data))
        }
    }

    struct FailingStore;

    #[async_trait]
    impl AppointmentStore for FailingStore {
        async fn create_appointment(&self, _: &NewAppointment) -> AppResult<AppointmentRecord> {
            Err(AppError::Internal("store unavailable".to_string()))
        }
    }

    // Two rapid submits while the first is in flight: exactly one create
    #[tokio::test]
    async fn concurrent_submit_is_single_flight() {
        let session = Arc::new(BookingSession::with_draft(valid_draft()));
        let store = Arc::new(SlowStore::new());

        let first = {
            let session = Arc::clone(&session);
            let store = Arc::clone(&store);
            tokio::spawn(async move { session.submit(store.as_ref()).await })
        };

        // Wait until the first submission holds the guard inside create
        store.started.notified().await;

        let second = session.submit(store.as_ref()).await.unwrap();
        assert!(matches!(second, SubmitOutcome::AlreadyInFlight));
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);

        store.release.notify_one();
        let first = first.await.unwrap().unwrap();
        assert!(matches!(first, SubmitOutcome::Created(_)));
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn success_resets_the_draft() {
        let session = BookingSession::with_draft(valid_draft());
        let store = SlowStore::new();
        store.release.notify_one();
        let outcome = session.submit(&store).await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Created(_)));
        assert_eq!(session.draft().await, BookingDraft::new());
    }

    #[tokio::test]
    async fn failure_preserves_fields_and_releases_the_guard() {
        let session = BookingSession::with_draft(valid_draft());
        let err = session.submit(&FailingStore).await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));

        // Typed input survives for retry
        let draft = session.draft().await;
        assert_eq!(draft.full_name, "Jordan Velez");
        assert_eq!(draft.selected_time(), Some("8:00 AM"));

        // Guard was released in the failure path: a retry reaches the store
        let store = SlowStore::new();
        store.release.notify_one();
        let outcome = session.submit(&store).await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Created(_)));
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_the_store() {
        let session = BookingSession::new();
        // No expectations set: any create call panics the mock
        let store = MockAppointmentStore::new();
        let err = session.submit(&store).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn one_shot_submit_validates_before_the_store() {
        // No expectations set: any create call panics the mock
        let store = MockAppointmentStore::new();
        let err = submit_draft(&store, &BookingDraft::new()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn one_shot_submit_creates_exactly_one_record() {
        let mut store = MockAppointmentStore::new();
        store
            .expect_create_appointment()
            .times(1)
            .returning(|data| Ok(record_for(data)));
        let record = submit_draft(&store, &valid_draft()).await.unwrap();
        assert_eq!(record.full_name, "Jordan Velez");
    }

    #[tokio::test]
    async fn validation_failure_releases_the_guard() {
        let session = BookingSession::new();
        let store = MockAppointmentStore::new();
        assert!(session.submit(&store).await.is_err());
        // Second attempt still runs the gate instead of reporting in-flight
        let err = session.submit(&store).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
