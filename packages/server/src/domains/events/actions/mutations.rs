//! Event authoring: create, publish with image, update.

use sqlx::PgPool;
use tracing::{info, warn};

use crate::common::{AppError, AppResult, ValidationError};
use crate::domains::events::models::event::duplicate_slug;
use crate::domains::events::models::Event;
use crate::domains::events::normalize::{canonical_slug, EventDraft, EventPatch};
use crate::kernel::{ImageUpload, ServerDeps};

/// Largest accepted banner image.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Normalize and insert a new event.
pub async fn create_event(draft: EventDraft, pool: &PgPool) -> AppResult<Event> {
    let normalized = draft.normalize()?;
    let event = Event::insert(&normalized, pool).await?;
    info!(slug = %event.slug, event_id = %event.id, "Event created");
    Ok(event)
}

/// Check an uploaded file is an image of acceptable size.
pub fn validate_image(image: &ImageUpload) -> Result<(), ValidationError> {
    if image.bytes.is_empty() {
        return Err(ValidationError::InvalidImage(
            "Image file is required".to_string(),
        ));
    }
    if !image.content_type.starts_with("image/") {
        return Err(ValidationError::InvalidImage(
            "File must be an image".to_string(),
        ));
    }
    if image.bytes.len() > MAX_IMAGE_BYTES {
        return Err(ValidationError::InvalidImage(
            "Image size must be less than 5MB".to_string(),
        ));
    }
    Ok(())
}

/// Validate the draft and image, upload the image, then create the event.
///
/// Field validation and the duplicate-slug check run before the upload so a
/// rejected form never leaves an orphaned image on the host.
pub async fn publish_event(
    mut draft: EventDraft,
    image: ImageUpload,
    deps: &ServerDeps,
) -> AppResult<Event> {
    validate_image(&image)?;

    let mut checked = draft.clone();
    checked.image = image.file_name.clone();
    let normalized = checked.normalize()?;

    // The unique constraint still decides races; this only saves the upload.
    let pool = deps.db.acquire().await?;
    if Event::find_by_slug(&normalized.slug, &pool).await?.is_some() {
        return Err(duplicate_slug(&normalized.slug));
    }

    let url = deps
        .image_host
        .upload(image)
        .await
        .map_err(|e| AppError::Upload(e.to_string()))?;
    draft.image = url;

    create_event(draft, &pool).await
}

/// Apply a partial update to the event at `slug`.
///
/// Date, time and required text fields are re-normalized. The slug is never
/// regenerated, even when the title changes, so existing links keep working.
pub async fn update_event(slug: &str, patch: EventPatch, pool: &PgPool) -> AppResult<Event> {
    let slug = canonical_slug(slug);
    let current = Event::find_by_slug(&slug, pool)
        .await?
        .ok_or_else(AppError::event_not_found)?;

    if patch.is_empty() {
        return Ok(current);
    }

    let fields = patch.apply(current.to_draft())?;
    match Event::update_fields(current.id, &fields, current.version, pool).await? {
        Some(updated) => {
            info!(slug = %updated.slug, version = updated.version, "Event updated");
            Ok(updated)
        }
        None => {
            warn!(slug = %slug, "Event changed during update");
            Err(AppError::Conflict(
                "Event was modified concurrently, retry the update".to_string(),
            ))
        }
    }
}
