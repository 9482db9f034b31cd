//! Business logic services

pub mod appointments;
pub mod availability;
pub mod booking;
pub mod email;

use std::sync::Arc;

use crate::{
    config::{BookingConfig, EmailConfig},
    repository::Repository,
    scheduling::availability::Capacity,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub appointments: appointments::AppointmentsService,
    pub availability: availability::AvailabilityService,
    pub booking: booking::BookingService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        email_config: EmailConfig,
        booking_config: &BookingConfig,
    ) -> Self {
        let relay: Arc<dyn email::NotificationRelay> =
            Arc::new(email::EmailService::new(email_config));
        Self {
            appointments: appointments::AppointmentsService::new(repository.clone(), relay),
            availability: availability::AvailabilityService::new(
                repository.clone(),
                Capacity::from(booking_config),
            ),
            booking: booking::BookingService::new(repository),
        }
    }
}
