// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::{Arc, Mutex};

use super::{BaseImageHost, BaseMailer, Database, ImageUpload, OutgoingEmail, ServerDeps};
use crate::common::TransportError;

// =============================================================================
// Mock Mailer
// =============================================================================

/// Which step of a send the mock should fail at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailFailure {
    Verify,
    Send,
}

#[derive(Default)]
pub struct MockMailer {
    failure: Mutex<Option<MailFailure>>,
    sent: Mutex<Vec<OutgoingEmail>>,
    verify_calls: Mutex<usize>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer whose every delivery fails at `failure`.
    pub fn failing(failure: MailFailure) -> Self {
        let mailer = Self::new();
        mailer.set_failure(Some(failure));
        mailer
    }

    pub fn set_failure(&self, failure: Option<MailFailure>) {
        *self.failure.lock().unwrap() = failure;
    }

    /// All messages that were accepted for delivery
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn verify_calls(&self) -> usize {
        *self.verify_calls.lock().unwrap()
    }

    /// Check if any message was addressed to `to`
    pub fn was_sent_to(&self, to: &str) -> bool {
        self.sent.lock().unwrap().iter().any(|m| m.to == to)
    }
}

#[async_trait]
impl BaseMailer for MockMailer {
    async fn verify(&self) -> Result<(), TransportError> {
        *self.verify_calls.lock().unwrap() += 1;
        if *self.failure.lock().unwrap() == Some(MailFailure::Verify) {
            return Err(TransportError::Verify("mock: invalid login".to_string()));
        }
        Ok(())
    }

    async fn send(&self, email: OutgoingEmail) -> Result<(), TransportError> {
        if *self.failure.lock().unwrap() == Some(MailFailure::Send) {
            return Err(TransportError::Send("mock: connection reset".to_string()));
        }
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

// =============================================================================
// Mock Image Host
// =============================================================================

#[derive(Default)]
pub struct MockImageHost {
    fail: Mutex<bool>,
    uploads: Mutex<Vec<ImageUpload>>,
}

impl MockImageHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let host = Self::new();
        *host.fail.lock().unwrap() = true;
        host
    }

    pub fn uploads(&self) -> Vec<ImageUpload> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseImageHost for MockImageHost {
    async fn upload(&self, image: ImageUpload) -> Result<String> {
        if *self.fail.lock().unwrap() {
            return Err(anyhow!("mock: upload rejected"));
        }
        let url = format!("https://images.test/dev_events/{}", image.file_name);
        self.uploads.lock().unwrap().push(image);
        Ok(url)
    }
}

// =============================================================================
// Test dependency bundle
// =============================================================================

/// ServerDeps wired to mocks, with handles kept for assertions.
pub struct TestDependencies {
    pub deps: ServerDeps,
    pub mailer: Arc<MockMailer>,
    pub image_host: Arc<MockImageHost>,
}

impl TestDependencies {
    pub fn new(pool: PgPool) -> Self {
        Self::with_mailer(pool, MockMailer::new())
    }

    pub fn with_mailer(pool: PgPool, mailer: MockMailer) -> Self {
        Self::with_mocks(pool, mailer, MockImageHost::new())
    }

    pub fn with_image_host(pool: PgPool, image_host: MockImageHost) -> Self {
        Self::with_mocks(pool, MockMailer::new(), image_host)
    }

    pub fn with_mocks(pool: PgPool, mailer: MockMailer, image_host: MockImageHost) -> Self {
        let mailer = Arc::new(mailer);
        let image_host = Arc::new(image_host);
        let deps = ServerDeps::new(
            Arc::new(Database::from_pool(pool)),
            mailer.clone(),
            image_host.clone(),
        );
        Self {
            deps,
            mailer,
            image_host,
        }
    }
}
