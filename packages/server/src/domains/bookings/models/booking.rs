use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use sqlx::PgPool;
use tracing::{debug, warn};

use crate::common::errors::is_foreign_key_violation;
use crate::common::{AppError, AppResult, BookingId, EventId, ValidationError};
use crate::domains::events::models::Event;

lazy_static! {
    static ref EMAIL_FORMAT: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// Trim, lowercase and validate an email address.
pub fn normalize_email(raw: &str) -> Result<String, ValidationError> {
    let email = raw.trim().to_lowercase();
    if !EMAIL_FORMAT.is_match(&email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(email)
}

/// Domain part of an address, for logs that must not carry the full email.
pub fn email_domain(email: &str) -> &str {
    email.rsplit_once('@').map(|(_, domain)| domain).unwrap_or("")
}

/// Booking model - one row per (event, email)
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    pub event_id: EventId,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Create the booking for (event, email) unless it already exists
    ///
    /// The write is a single `INSERT ... ON CONFLICT DO NOTHING` against the
    /// `(event_id, email)` unique constraint, so concurrent callers cannot
    /// both insert. A returned row means this call created it; otherwise the
    /// committed row is fetched and reported with `false`.
    ///
    /// Invalid emails fail before any query runs. Unknown events fail with
    /// `NotFound` before the write is attempted.
    pub async fn find_or_create(
        event_id: EventId,
        email: &str,
        pool: &PgPool,
    ) -> AppResult<(Self, bool)> {
        let email = normalize_email(email)?;

        if !Event::exists(event_id, pool).await? {
            return Err(AppError::event_not_found());
        }

        let inserted = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO bookings (id, event_id, email)
            VALUES ($1, $2, $3)
            ON CONFLICT (event_id, email) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(BookingId::new())
        .bind(event_id)
        .bind(&email)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            // The event vanished between the existence check and the insert.
            if is_foreign_key_violation(&e) {
                AppError::event_not_found()
            } else {
                e.into()
            }
        })?;

        if let Some(booking) = inserted {
            debug!(event_id = %event_id, booking_id = %booking.id, "Booking inserted");
            return Ok((booking, true));
        }

        let existing = sqlx::query_as::<_, Self>(
            "SELECT * FROM bookings WHERE event_id = $1 AND email = $2",
        )
        .bind(event_id)
        .bind(&email)
        .fetch_one(pool)
        .await?;

        debug!(event_id = %event_id, booking_id = %existing.id, "Booking already existed");
        Ok((existing, false))
    }

    /// Number of bookings for an event, for display
    ///
    /// Store errors are logged and reported as 0 so a page render never fails
    /// on the counter.
    pub async fn count_for_event(event_id: EventId, pool: &PgPool) -> i64 {
        let result =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bookings WHERE event_id = $1")
                .bind(event_id)
                .fetch_one(pool)
                .await;

        match result {
            Ok(count) => count,
            Err(e) => {
                warn!(event_id = %event_id, error = %e, "Failed to count bookings");
                0
            }
        }
    }

    pub async fn count_all(pool: &PgPool) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bookings")
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_are_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  Ada@Example.COM ").unwrap(), "ada@example.com");
    }

    #[test]
    fn malformed_emails_rejected() {
        for raw in ["", "ada", "ada@", "@example.com", "ada@example", "a b@example.com", "a@b@c"] {
            assert_eq!(
                normalize_email(raw),
                Err(ValidationError::InvalidEmail),
                "{raw:?}"
            );
        }
    }

    #[test]
    fn minimal_valid_email_accepted() {
        assert_eq!(normalize_email("a@b.co").unwrap(), "a@b.co");
    }

    #[test]
    fn email_domain_strips_local_part() {
        assert_eq!(email_domain("ada@example.com"), "example.com");
        assert_eq!(email_domain("nobody"), "");
    }
}
