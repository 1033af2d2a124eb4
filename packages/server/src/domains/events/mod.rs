//! Events domain - authoring, normalization and lookup of published events
//!
//! Routes → actions → models. Normalization is explicit: actions call
//! `EventDraft::normalize` / `EventPatch::apply` before every write.

pub mod actions;
pub mod models;
pub mod normalize;

pub use models::{Event, EventSummary};
pub use normalize::{EventDraft, EventPatch};
