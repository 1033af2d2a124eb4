use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::common::errors::unique_violation;
use crate::common::{AppError, AppResult, EventId};
use crate::domains::events::normalize::{EventDraft, NormalizedEvent};

/// Event model - SQL persistence layer
///
/// `version` is an internal optimistic-concurrency counter and is never
/// serialized to API clients.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    pub date: String, // YYYY-MM-DD
    pub time: String, // HH:MM, 24-hour
    pub mode: String,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing)]
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Subset of an event that is safe to put in an email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventSummary {
    pub title: String,
    pub date: String,
    pub time: String,
    pub location: String,
}

pub(crate) fn duplicate_slug(slug: &str) -> AppError {
    AppError::Conflict(format!("An event with slug '{}' already exists", slug))
}

impl Event {
    /// Insert a normalized event
    ///
    /// The `events_slug_key` unique constraint is the arbiter for duplicate
    /// slugs; a violation is reported as `Conflict`.
    pub async fn insert(event: &NormalizedEvent, pool: &PgPool) -> AppResult<Self> {
        let f = &event.fields;
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO events (
                id, title, slug, description, overview, image, venue, location,
                date, time, mode, audience, agenda, organizer, tags
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(EventId::new())
        .bind(&f.title)
        .bind(&event.slug)
        .bind(&f.description)
        .bind(&f.overview)
        .bind(&f.image)
        .bind(&f.venue)
        .bind(&f.location)
        .bind(&f.date)
        .bind(&f.time)
        .bind(&f.mode)
        .bind(&f.audience)
        .bind(&f.agenda)
        .bind(&f.organizer)
        .bind(&f.tags)
        .fetch_one(pool)
        .await
        .map_err(|e| match unique_violation(&e) {
            Some(constraint) if constraint == "events_slug_key" => duplicate_slug(&event.slug),
            _ => e.into(),
        })
    }

    /// Find event by canonical slug
    pub async fn find_by_slug(slug: &str, pool: &PgPool) -> AppResult<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM events WHERE slug = $1")
            .bind(slug)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn exists(id: EventId, pool: &PgPool) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM events WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    /// Other events sharing at least one tag with the event at `slug`
    ///
    /// Ordered newest first with the id as tie-breaker, so results are stable
    /// for a given database state. Unknown slugs yield an empty list.
    pub async fn find_similar(slug: &str, limit: i64, pool: &PgPool) -> AppResult<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT e.*
            FROM events e
            INNER JOIN events src ON src.slug = $1
            WHERE e.id <> src.id
              AND e.tags && src.tags
            ORDER BY e.created_at DESC, e.id
            LIMIT $2
            "#,
        )
        .bind(slug)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// All events, newest first
    pub async fn list_recent(pool: &PgPool) -> AppResult<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM events ORDER BY created_at DESC, id DESC")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// Write canonical fields back, guarded by the version read by the caller
    ///
    /// Returns `None` when the row changed since `expected_version` was read.
    /// The slug column is never touched here.
    pub async fn update_fields(
        id: EventId,
        fields: &EventDraft,
        expected_version: i32,
        pool: &PgPool,
    ) -> AppResult<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE events
            SET title = $3,
                description = $4,
                overview = $5,
                image = $6,
                venue = $7,
                location = $8,
                date = $9,
                time = $10,
                mode = $11,
                audience = $12,
                agenda = $13,
                organizer = $14,
                tags = $15,
                version = version + 1,
                updated_at = NOW()
            WHERE id = $1 AND version = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(expected_version)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.overview)
        .bind(&fields.image)
        .bind(&fields.venue)
        .bind(&fields.location)
        .bind(&fields.date)
        .bind(&fields.time)
        .bind(&fields.mode)
        .bind(&fields.audience)
        .bind(&fields.agenda)
        .bind(&fields.organizer)
        .bind(&fields.tags)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn count(pool: &PgPool) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM events")
            .fetch_one(pool)
            .await
            .map_err(Into::into)
    }

    /// The stored fields as an editable draft
    pub fn to_draft(&self) -> EventDraft {
        EventDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            overview: self.overview.clone(),
            image: self.image.clone(),
            venue: self.venue.clone(),
            location: self.location.clone(),
            date: self.date.clone(),
            time: self.time.clone(),
            mode: self.mode.clone(),
            audience: self.audience.clone(),
            agenda: self.agenda.clone(),
            organizer: self.organizer.clone(),
            tags: self.tags.clone(),
        }
    }

    pub fn summary(&self) -> EventSummary {
        EventSummary {
            title: self.title.clone(),
            date: self.date.clone(),
            time: self.time.clone(),
            location: self.location.clone(),
        }
    }
}
