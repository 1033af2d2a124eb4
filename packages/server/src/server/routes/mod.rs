// HTTP routes
pub mod bookings;
pub mod events;
pub mod health;
pub mod mail;

pub use bookings::*;
pub use events::*;
pub use health::*;
pub use mail::*;
