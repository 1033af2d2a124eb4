use axum::{
    extract::{Extension, Multipart, Path},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::common::ValidationError;
use crate::domains::events::actions::{
    get_event, list_events, publish_event, similar_events, update_event, SIMILAR_EVENTS_LIMIT,
};
use crate::domains::events::{Event, EventDraft, EventPatch};
use crate::kernel::ImageUpload;
use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiJson};

/// `{message, data}` envelope used by list and write endpoints.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub message: String,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(message: &str, data: T) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
            data,
        })
    }
}

pub async fn list_events_handler(
    Extension(state): Extension<AppState>,
) -> Result<Json<DataResponse<Vec<Event>>>, ApiError> {
    let pool = state.deps.db.acquire().await?;
    let events = list_events(&pool).await?;
    Ok(DataResponse::new("Events fetched successfully", events))
}

pub async fn get_event_handler(
    Extension(state): Extension<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Event>, ApiError> {
    let pool = state.deps.db.acquire().await?;
    let event = get_event(&slug, &pool).await?;
    Ok(Json(event))
}

pub async fn similar_events_handler(
    Extension(state): Extension<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<DataResponse<Vec<Event>>>, ApiError> {
    let pool = state.deps.db.acquire().await?;
    let events = similar_events(&slug, SIMILAR_EVENTS_LIMIT, &pool).await;
    Ok(DataResponse::new("Similar events fetched successfully", events))
}

pub async fn update_event_handler(
    Extension(state): Extension<AppState>,
    Path(slug): Path<String>,
    ApiJson(patch): ApiJson<EventPatch>,
) -> Result<Json<DataResponse<Event>>, ApiError> {
    let pool = state.deps.db.acquire().await?;
    let event = update_event(&slug, patch, &pool).await?;
    Ok(DataResponse::new("Event updated successfully", event))
}

/// Create an event from a multipart form
///
/// Text fields map onto the draft by name. `tags` and `agenda` arrive as
/// JSON-encoded string arrays and `image` as a file part.
pub async fn create_event_handler(
    Extension(state): Extension<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<DataResponse<Event>>), ApiError> {
    let (draft, image) = read_event_form(multipart).await?;
    let image = image.ok_or_else(|| {
        ValidationError::InvalidImage("Image file is required".to_string())
    })?;

    let event = publish_event(draft, image, &state.deps).await?;
    Ok((
        StatusCode::CREATED,
        DataResponse::new("Event created successfully", event),
    ))
}

async fn read_event_form(
    mut multipart: Multipart,
) -> Result<(EventDraft, Option<ImageUpload>), ApiError> {
    let mut draft = EventDraft::default();
    let mut image = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        if name == "image" {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let content_type = field.content_type().unwrap_or_default().to_string();
            let bytes = field.bytes().await?.to_vec();
            image = Some(ImageUpload {
                file_name,
                content_type,
                bytes,
            });
            continue;
        }

        let value = field.text().await?;
        match name.as_str() {
            "title" => draft.title = value,
            "description" => draft.description = value,
            "overview" => draft.overview = value,
            "venue" => draft.venue = value,
            "location" => draft.location = value,
            "date" => draft.date = value,
            "time" => draft.time = value,
            "mode" => draft.mode = value,
            "audience" => draft.audience = value,
            "organizer" => draft.organizer = value,
            "tags" => draft.tags = parse_string_list("tags", &value)?,
            "agenda" => draft.agenda = parse_string_list("agenda", &value)?,
            _ => {}
        }
    }

    Ok((draft, image))
}

fn parse_string_list(field: &'static str, raw: &str) -> Result<Vec<String>, ValidationError> {
    serde_json::from_str(raw).map_err(|_| ValidationError::InvalidJson(field))
}
