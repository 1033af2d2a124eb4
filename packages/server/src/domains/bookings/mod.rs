//! Bookings domain - one seat per (event, email), confirmed by email once

pub mod actions;
pub mod activities;
pub mod models;

pub use models::Booking;
