pub mod confirmation;

pub use confirmation::{render_confirmation, send_confirmation, ConfirmationError};
