//! View-independent slot-availability and booking-state core.
//!
//! `slots` knows the fixed catalog and time conversions, `availability` turns
//! appointment records into per-cell occupancy and a bookability verdict, and
//! `booking` holds the in-progress selection plus the submission gate.

pub mod availability;
pub mod booking;
pub mod slots;
