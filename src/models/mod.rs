//! Domain models

pub mod appointment;
