//! Test fixtures for creating test data.
//!
//! Titles carry a random suffix so parallel tests never collide on slugs.

use events_core::domains::events::actions::create_event;
use events_core::domains::events::{Event, EventDraft};
use sqlx::PgPool;
use uuid::Uuid;

/// A complete, valid draft with a unique title.
pub fn event_draft(title: &str, tags: &[&str]) -> EventDraft {
    EventDraft {
        title: format!("{} {}", title, short_id()),
        description: "A gathering of developers".to_string(),
        overview: "Talks, workshops and networking".to_string(),
        image: "https://images.test/dev_events/banner.png".to_string(),
        venue: "Main Hall".to_string(),
        location: "Amsterdam, Netherlands".to_string(),
        date: "2026-04-15".to_string(),
        time: "09:00".to_string(),
        mode: "offline".to_string(),
        audience: "Developers".to_string(),
        agenda: vec!["Keynote".to_string(), "Workshops".to_string()],
        organizer: "Dev Events".to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

pub async fn create_test_event(pool: &PgPool, title: &str, tags: &[&str]) -> Event {
    create_event(event_draft(title, tags), pool)
        .await
        .expect("Failed to create test event")
}

/// A unique address on the test domain.
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, short_id())
}

/// A tag no other test uses, for similarity assertions.
pub fn unique_tag(prefix: &str) -> String {
    format!("{}-{}", prefix, short_id())
}

pub async fn booking_rows(pool: &PgPool, email: &str) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bookings WHERE email = $1")
        .bind(email)
        .fetch_one(pool)
        .await
        .expect("Failed to count bookings")
}

fn short_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}
