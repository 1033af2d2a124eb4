//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Extension},
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::domains::events::actions::MAX_IMAGE_BYTES;
use crate::kernel::ServerDeps;
use crate::server::routes::{
    booking_count_handler, create_booking_handler, create_event_handler, get_event_handler,
    health_handler, list_events_handler, send_confirmation_handler, similar_events_handler,
    update_event_handler,
};

/// Multipart bodies carry the banner plus text fields; leave headroom over
/// the image cap so oversized images reach validation and get a 400.
const EVENT_FORM_LIMIT: usize = 2 * MAX_IMAGE_BYTES;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([CONTENT_TYPE])
}

/// Build the Axum application router
///
/// An empty `allowed_origins` allows any origin.
pub fn build_app(deps: ServerDeps, allowed_origins: &[String]) -> Router {
    let state = AppState {
        deps: Arc::new(deps),
    };

    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/events",
            get(list_events_handler)
                .post(create_event_handler)
                .layer(DefaultBodyLimit::max(EVENT_FORM_LIMIT)),
        )
        .route(
            "/events/:slug",
            get(get_event_handler).patch(update_event_handler),
        )
        .route("/events/:slug/similar", get(similar_events_handler))
        .route("/events/:slug/bookings", post(create_booking_handler))
        .route("/events/:slug/bookings/count", get(booking_count_handler))
        .route("/send-mail-confirmation", post(send_confirmation_handler))
        .layer(Extension(state))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
}
