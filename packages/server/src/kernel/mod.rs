// Kernel - infrastructure shared by every domain

pub mod database;
pub mod deps;
pub mod image_host;
pub mod mailer;
pub mod test_dependencies;
pub mod traits;

pub use database::{Database, DatabaseError};
pub use deps::ServerDeps;
pub use image_host::CloudinaryImageHost;
pub use mailer::SmtpMailer;
pub use traits::*;
