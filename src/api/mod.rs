//! API handlers for Pitstop REST endpoints

pub mod appointments;
pub mod availability;
pub mod events;
pub mod health;
pub mod openapi;
