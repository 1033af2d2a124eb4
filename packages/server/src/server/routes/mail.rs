use axum::{extract::Extension, Json};
use serde::{Deserialize, Serialize};

use crate::domains::bookings::activities::{send_confirmation, ConfirmationError};
use crate::domains::bookings::models::normalize_email;
use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiJson};

/// `eventId` carries the event slug.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendConfirmationBody {
    pub email: Option<String>,
    pub name: Option<String>,
    pub event_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn required(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub async fn send_confirmation_handler(
    Extension(state): Extension<AppState>,
    ApiJson(body): ApiJson<SendConfirmationBody>,
) -> Result<Json<MessageResponse>, ApiError> {
    let (Some(email), Some(name), Some(slug)) = (
        required(body.email),
        required(body.name),
        required(body.event_id),
    ) else {
        return Err(ApiError::BadRequest(
            "Missing required fields: email, name, eventId".to_string(),
        ));
    };
    let email = normalize_email(&email)?;

    match send_confirmation(&email, &name, &slug, &state.deps).await {
        Ok(()) => Ok(Json(MessageResponse {
            message: "Email sent successfully".to_string(),
        })),
        Err(ConfirmationError::EventNotFound) => {
            Err(ApiError::NotFound("Event not found".to_string()))
        }
        Err(ConfirmationError::Lookup(e)) => Err(e.into()),
        Err(ConfirmationError::Transport(e)) => {
            Err(ApiError::internal("Failed to send email", e))
        }
    }
}
