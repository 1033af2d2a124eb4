//! Server dependencies for actions and routes (using traits for testability)
//!
//! All external services sit behind trait objects so tests can swap in the
//! doubles from `test_dependencies`.

use std::sync::Arc;

use crate::kernel::database::Database;
use crate::kernel::{BaseImageHost, BaseMailer};

#[derive(Clone)]
pub struct ServerDeps {
    pub db: Arc<Database>,
    pub mailer: Arc<dyn BaseMailer>,
    pub image_host: Arc<dyn BaseImageHost>,
}

impl ServerDeps {
    pub fn new(
        db: Arc<Database>,
        mailer: Arc<dyn BaseMailer>,
        image_host: Arc<dyn BaseImageHost>,
    ) -> Self {
        Self {
            db,
            mailer,
            image_host,
        }
    }
}
