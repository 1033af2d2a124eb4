//! Create booking action - reserve a seat and send the confirmation once

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::common::{AppError, AppResult};
use crate::domains::bookings::activities::send_confirmation;
use crate::domains::bookings::models::{email_domain, normalize_email, Booking};
use crate::domains::events::models::Event;
use crate::domains::events::normalize::canonical_slug;
use crate::kernel::ServerDeps;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStage {
    Validating,
    ResolvingEvent,
    Writing,
    Created,
    AlreadyBooked,
    NotifyAttempted,
    Done,
}

impl BookingStage {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStage::Validating => "validating",
            BookingStage::ResolvingEvent => "resolving_event",
            BookingStage::Writing => "writing",
            BookingStage::Created => "created",
            BookingStage::AlreadyBooked => "already_booked",
            BookingStage::NotifyAttempted => "notify_attempted",
            BookingStage::Done => "done",
        }
    }
}

#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub slug: String,
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    Sent,
    /// Delivery failed; the message is surfaced to the caller as a warning.
    Failed(String),
    /// The booking already existed, so nothing was sent.
    Skipped,
}

#[derive(Debug, Clone)]
pub struct BookingOutcome {
    pub booking: Booking,
    pub was_created: bool,
    pub notification: NotificationOutcome,
}

/// Create (or find) the booking for `request.email` on `request.slug`.
///
/// Only the call that inserts the row sends a confirmation. A failed send is
/// logged and reported in `notification`; the committed booking stands.
pub async fn create_booking(request: BookingRequest, deps: &ServerDeps) -> AppResult<BookingOutcome> {
    let slug = canonical_slug(&request.slug);
    trace_stage(&slug, BookingStage::Validating);
    let email = normalize_email(&request.email)?;

    trace_stage(&slug, BookingStage::ResolvingEvent);
    let pool = deps.db.acquire().await?;
    let event = Event::find_by_slug(&slug, &pool)
        .await?
        .ok_or_else(AppError::event_not_found)?;

    trace_stage(&slug, BookingStage::Writing);
    let (booking, was_created) = Booking::find_or_create(event.id, &email, &pool).await?;

    if !was_created {
        trace_stage(&slug, BookingStage::AlreadyBooked);
        trace_stage(&slug, BookingStage::Done);
        return Ok(BookingOutcome {
            booking,
            was_created,
            notification: NotificationOutcome::Skipped,
        });
    }

    trace_stage(&slug, BookingStage::Created);
    info!(
        slug = %slug,
        booking_id = %booking.id,
        recipient_domain = %email_domain(&email),
        "Booking created"
    );

    let name = recipient_name(request.name.as_deref(), &email);
    let notification = match send_confirmation(&email, &name, &slug, deps).await {
        Ok(()) => NotificationOutcome::Sent,
        Err(e) => {
            warn!(slug = %slug, booking_id = %booking.id, error = %e, "Booking confirmation failed");
            NotificationOutcome::Failed(e.to_string())
        }
    };
    trace_stage(&slug, BookingStage::NotifyAttempted);
    trace_stage(&slug, BookingStage::Done);

    Ok(BookingOutcome {
        booking,
        was_created,
        notification,
    })
}

fn trace_stage(slug: &str, stage: BookingStage) {
    debug!(slug = %slug, stage = stage.as_str(), "Booking stage");
}

/// Supplied name, or the local part of the email.
pub fn recipient_name(name: Option<&str>, email: &str) -> String {
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => name.to_string(),
        None => email.split('@').next().unwrap_or(email).to_string(),
    }
}

/// Wire shape returned to booking callers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub already_booked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl BookingResponse {
    /// Failure body. Storage details are never echoed back.
    pub fn failure(err: &AppError) -> Self {
        let error = match err {
            AppError::Validation(v) => v.to_string(),
            AppError::NotFound(message) => message.clone(),
            _ => "Failed to create booking".to_string(),
        };
        Self {
            success: false,
            error: Some(error),
            ..Default::default()
        }
    }
}

impl From<&BookingOutcome> for BookingResponse {
    fn from(outcome: &BookingOutcome) -> Self {
        let warning = match &outcome.notification {
            NotificationOutcome::Failed(_) => {
                Some("Booking confirmed, but the confirmation email could not be sent".to_string())
            }
            _ => None,
        };
        Self {
            success: true,
            already_booked: (!outcome.was_created).then_some(true),
            email: Some(outcome.booking.email.clone()),
            error: None,
            warning,
        }
    }
}
