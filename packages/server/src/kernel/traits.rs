// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (like "confirm a booking") lives in domain functions that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseMailer, BaseImageHost)

use anyhow::Result;
use async_trait::async_trait;

use crate::common::TransportError;

// =============================================================================
// Mailer Trait (Infrastructure - outbound email)
// =============================================================================

/// A fully rendered message ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

#[async_trait]
pub trait BaseMailer: Send + Sync {
    /// Check credentials and connectivity before sending
    async fn verify(&self) -> Result<(), TransportError>;

    /// Deliver a single message
    async fn send(&self, email: OutgoingEmail) -> Result<(), TransportError>;
}

// =============================================================================
// Image Host Trait (Infrastructure - event banner uploads)
// =============================================================================

/// An uploaded image file as received from a multipart form.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait BaseImageHost: Send + Sync {
    /// Upload image bytes and return the public HTTPS URL
    async fn upload(&self, image: ImageUpload) -> Result<String>;
}
