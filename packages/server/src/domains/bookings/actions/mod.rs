//! Booking domain actions

mod create_booking;

pub use create_booking::{
    create_booking, recipient_name, BookingOutcome, BookingRequest, BookingResponse,
    BookingStage, NotificationOutcome,
};
