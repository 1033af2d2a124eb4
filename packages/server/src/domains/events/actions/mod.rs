//! Event domain actions - business logic functions called from routes and tooling

mod mutations;
mod queries;
mod seed;

pub use mutations::{create_event, publish_event, update_event, validate_image, MAX_IMAGE_BYTES};
pub use queries::{get_event, list_events, similar_events, SIMILAR_EVENTS_LIMIT};
pub use seed::{sample_events, seed_sample_events, SeedReport};
