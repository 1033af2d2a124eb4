use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domains::bookings::actions::{create_booking, BookingRequest, BookingResponse};
use crate::domains::bookings::Booking;
use crate::domains::events::actions::get_event;
use crate::server::app::AppState;
use crate::server::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CreateBookingBody {
    #[serde(default)]
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BookingCountResponse {
    pub count: i64,
}

/// Book a seat on the event at `slug`
///
/// The booking runs on its own task so a client that disconnects mid-request
/// does not cancel the write. 201 when created, 200 when already booked.
/// An unreadable body is a 400 in the same `{success, error}` shape.
pub async fn create_booking_handler(
    Extension(state): Extension<AppState>,
    Path(slug): Path<String>,
    body: Result<Json<CreateBookingBody>, JsonRejection>,
) -> (StatusCode, Json<BookingResponse>) {
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(BookingResponse {
                    success: false,
                    error: Some(format!("Invalid request body: {}", rejection.body_text())),
                    ..Default::default()
                }),
            );
        }
    };
    let request = BookingRequest {
        slug,
        email: body.email.unwrap_or_default(),
        name: body.name,
    };
    let deps = state.deps.clone();
    let task = tokio::spawn(async move { create_booking(request, &deps).await });

    match task.await {
        Ok(Ok(outcome)) => {
            let status = if outcome.was_created {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            (status, Json(BookingResponse::from(&outcome)))
        }
        Ok(Err(err)) => {
            let status = ApiError::status_of(&err);
            if status.is_server_error() {
                error!(error = %err, "Booking failed");
            }
            (status, Json(BookingResponse::failure(&err)))
        }
        Err(join_err) => {
            error!(error = %join_err, "Booking task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(BookingResponse {
                    success: false,
                    error: Some("Failed to create booking".to_string()),
                    ..Default::default()
                }),
            )
        }
    }
}

/// Number of bookings for the event at `slug`. Store errors read as 0.
pub async fn booking_count_handler(
    Extension(state): Extension<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<BookingCountResponse>, ApiError> {
    let pool = state.deps.db.acquire().await?;
    let event = get_event(&slug, &pool).await?;
    let count = Booking::count_for_event(event.id, &pool).await;
    Ok(Json(BookingCountResponse { count }))
}
