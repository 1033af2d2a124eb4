//! Booking confirmation email: resolve the event, render, verify, send.

use thiserror::Error;
use tracing::{debug, info};

use crate::common::{AppError, TransportError};
use crate::domains::bookings::models::email_domain;
use crate::domains::events::models::{Event, EventSummary};
use crate::domains::events::normalize::canonical_slug;
use crate::kernel::{OutgoingEmail, ServerDeps};

#[derive(Error, Debug)]
pub enum ConfirmationError {
    #[error("Event not found")]
    EventNotFound,

    #[error(transparent)]
    Lookup(#[from] AppError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Send the confirmation for a booking on `slug`.
///
/// The event summary is looked up at send time. An unknown slug fails with
/// `EventNotFound` before the mailer is touched; otherwise the transport is
/// verified and then the message is sent.
pub async fn send_confirmation(
    email: &str,
    recipient_name: &str,
    slug: &str,
    deps: &ServerDeps,
) -> Result<(), ConfirmationError> {
    let slug = canonical_slug(slug);
    let pool = deps.db.acquire().await.map_err(AppError::from)?;
    let event = Event::find_by_slug(&slug, &pool)
        .await?
        .ok_or(ConfirmationError::EventNotFound)?;

    let message = render_confirmation(email, recipient_name, &event.summary());

    deps.mailer.verify().await?;
    debug!(slug = %slug, "Mail transport verified");

    deps.mailer.send(message).await?;
    info!(
        slug = %slug,
        recipient_domain = %email_domain(email),
        "Booking confirmation sent"
    );
    Ok(())
}

/// Render the confirmation message for `summary`.
pub fn render_confirmation(to: &str, recipient_name: &str, summary: &EventSummary) -> OutgoingEmail {
    let html_body = format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 24px; color: #111;">
  <h2 style="margin-bottom: 16px;">Booking confirmed</h2>
  <p>Hi {name},</p>
  <p>Your spot for <strong>{title}</strong> is reserved.</p>
  <table style="border-collapse: collapse; margin: 16px 0;">
    <tr><td style="padding: 4px 12px 4px 0;"><strong>Date</strong></td><td>{date}</td></tr>
    <tr><td style="padding: 4px 12px 4px 0;"><strong>Time</strong></td><td>{time}</td></tr>
    <tr><td style="padding: 4px 12px 4px 0;"><strong>Location</strong></td><td>{location}</td></tr>
  </table>
  <p>See you there!</p>
  <p style="color: #666; font-size: 12px;">Dev Events</p>
</div>"#,
        name = escape_html(recipient_name),
        title = escape_html(&summary.title),
        date = escape_html(&summary.date),
        time = escape_html(&summary.time),
        location = escape_html(&summary.location),
    );

    OutgoingEmail {
        to: to.to_string(),
        subject: format!("Your Booking – {}", summary.title),
        html_body,
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
