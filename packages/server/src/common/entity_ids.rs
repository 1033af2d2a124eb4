//! Typed ID definitions for domain entities.

pub use super::id::Id;

/// Marker type for Event entities.
pub struct Event;

/// Marker type for Booking entities.
pub struct Booking;

/// Typed ID for Event entities.
pub type EventId = Id<Event>;

/// Typed ID for Booking entities.
pub type BookingId = Id<Booking>;
