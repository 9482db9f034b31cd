//! Repository layer for database operations

pub mod appointments;

use sqlx::{Pool, Postgres};
use tokio::sync::broadcast;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub appointments: appointments::AppointmentsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        // Payload-free invalidation channel: every insert/update/delete to the
        // appointments table fires one signal; subscribers re-fetch in full.
        let (changes, _) = broadcast::channel(64);
        Self {
            appointments: appointments::AppointmentsRepository::new(pool.clone(), changes),
            pool,
        }
    }
}
