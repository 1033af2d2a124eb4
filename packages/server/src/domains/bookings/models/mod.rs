pub mod booking;

pub use booking::{email_domain, normalize_email, Booking};
