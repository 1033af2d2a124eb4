//! Event read paths.

use sqlx::PgPool;
use tracing::warn;

use crate::common::{AppError, AppResult, ValidationError};
use crate::domains::events::models::Event;
use crate::domains::events::normalize::canonical_slug;

/// Default number of related events shown next to an event.
pub const SIMILAR_EVENTS_LIMIT: i64 = 3;

/// Fetch one event by slug. Blank slugs are a validation error.
pub async fn get_event(slug: &str, pool: &PgPool) -> AppResult<Event> {
    let slug = canonical_slug(slug);
    if slug.is_empty() {
        return Err(ValidationError::MissingField("slug").into());
    }
    Event::find_by_slug(&slug, pool)
        .await?
        .ok_or_else(AppError::event_not_found)
}

pub async fn list_events(pool: &PgPool) -> AppResult<Vec<Event>> {
    Event::list_recent(pool).await
}

/// Events sharing a tag with `slug`. Lookup failures degrade to an empty list.
pub async fn similar_events(slug: &str, limit: i64, pool: &PgPool) -> Vec<Event> {
    let slug = canonical_slug(slug);
    match Event::find_similar(&slug, limit, pool).await {
        Ok(events) => events,
        Err(e) => {
            warn!(slug = %slug, error = %e, "Failed to load similar events");
            Vec::new()
        }
    }
}
