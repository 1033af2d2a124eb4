//! Integration tests for the booking store's atomic insert-if-absent.

mod common;

use crate::common::{booking_rows, create_test_event, unique_email, TestHarness};
use events_core::common::{AppError, EventId, ValidationError};
use events_core::domains::bookings::Booking;
use futures::future::join_all;
use test_context::test_context;

#[test_context(TestHarness)]
#[tokio::test]
async fn first_booking_is_created_second_is_found(ctx: &TestHarness) {
    let event = create_test_event(&ctx.db_pool, "Store Basics", &["rust"]).await;
    let email = unique_email("basic");

    let (first, created) = Booking::find_or_create(event.id, &email, &ctx.db_pool)
        .await
        .unwrap();
    assert!(created);

    let (second, created) = Booking::find_or_create(event.id, &email, &ctx.db_pool)
        .await
        .unwrap();
    assert!(!created);
    assert_eq!(first.id, second.id);
    assert_eq!(booking_rows(&ctx.db_pool, &email).await, 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn email_is_normalized_before_uniqueness(ctx: &TestHarness) {
    let event = create_test_event(&ctx.db_pool, "Case Folding", &["rust"]).await;
    let email = unique_email("case");
    let shouted = format!("  {}  ", email.to_uppercase());

    let (_, created) = Booking::find_or_create(event.id, &email, &ctx.db_pool)
        .await
        .unwrap();
    assert!(created);

    let (booking, created) = Booking::find_or_create(event.id, &shouted, &ctx.db_pool)
        .await
        .unwrap();
    assert!(!created);
    assert_eq!(booking.email, email);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn concurrent_bookings_create_exactly_one_row(ctx: &TestHarness) {
    let event = create_test_event(&ctx.db_pool, "Rush Hour", &["rust"]).await;
    let email = unique_email("race");

    let attempts = (0..8).map(|_| {
        let pool = ctx.db_pool.clone();
        let email = email.clone();
        tokio::spawn(async move { Booking::find_or_create(event.id, &email, &pool).await })
    });

    let results: Vec<(Booking, bool)> = join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.expect("task panicked").expect("booking failed"))
        .collect();

    let created = results.iter().filter(|(_, created)| *created).count();
    assert_eq!(created, 1);

    let first_id = results[0].0.id;
    assert!(results.iter().all(|(booking, _)| booking.id == first_id));
    assert_eq!(booking_rows(&ctx.db_pool, &email).await, 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn invalid_email_never_writes(ctx: &TestHarness) {
    let event = create_test_event(&ctx.db_pool, "Bad Input", &["rust"]).await;

    let err = Booking::find_or_create(event.id, "not-an-email", &ctx.db_pool)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(ValidationError::InvalidEmail)));
    assert_eq!(Booking::count_for_event(event.id, &ctx.db_pool).await, 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn unknown_event_is_not_found_and_writes_nothing(ctx: &TestHarness) {
    let email = unique_email("ghost");

    let err = Booking::find_or_create(EventId::new(), &email, &ctx.db_pool)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(booking_rows(&ctx.db_pool, &email).await, 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn count_tracks_distinct_emails(ctx: &TestHarness) {
    let event = create_test_event(&ctx.db_pool, "Head Count", &["rust"]).await;
    let other = create_test_event(&ctx.db_pool, "Other Count", &["rust"]).await;

    for prefix in ["a", "b", "c"] {
        Booking::find_or_create(event.id, &unique_email(prefix), &ctx.db_pool)
            .await
            .unwrap();
    }
    Booking::find_or_create(other.id, &unique_email("d"), &ctx.db_pool)
        .await
        .unwrap();

    assert_eq!(Booking::count_for_event(event.id, &ctx.db_pool).await, 3);
    assert_eq!(Booking::count_for_event(other.id, &ctx.db_pool).await, 1);
    assert_eq!(Booking::count_for_event(EventId::new(), &ctx.db_pool).await, 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn count_reads_zero_when_store_is_unavailable(ctx: &TestHarness) {
    let event = create_test_event(&ctx.db_pool, "Closed Pool", &["rust"]).await;
    Booking::find_or_create(event.id, &unique_email("closed"), &ctx.db_pool)
        .await
        .unwrap();

    let closed = sqlx::PgPool::connect(&ctx.db_url).await.unwrap();
    closed.close().await;

    assert_eq!(Booking::count_for_event(event.id, &closed).await, 0);
}
