//! Event field normalization.
//!
//! Every write to the `events` table goes through `EventDraft::normalize`
//! (create) or `EventDraft::canonicalize` (update). Stored rows therefore
//! always hold trimmed text, `YYYY-MM-DD` dates, `HH:MM` times and non-empty
//! agenda/tag lists.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::common::ValidationError;

lazy_static! {
    static ref SLUG_DISALLOWED: Regex = Regex::new(r"[^a-z0-9\s-]").unwrap();
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
    static ref DASH_RUN: Regex = Regex::new(r"-+").unwrap();
    static ref CLOCK_TIME: Regex = Regex::new(r"^([0-9]{1,2}):([0-9]{2})$").unwrap();
}

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%MZ",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B %Y",
];

/// URL slug for a title: lowercase, trimmed, only `[a-z0-9-]`, single dashes.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = SLUG_DISALLOWED.replace_all(lowered.trim(), "");
    let dashed = WHITESPACE_RUN.replace_all(&stripped, "-");
    DASH_RUN.replace_all(&dashed, "-").into_owned()
}

/// Form used for slug lookups.
pub fn canonical_slug(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Parse a calendar date or timestamp and keep its UTC date as `YYYY-MM-DD`.
pub fn normalize_date(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();

    let date = DateTime::parse_from_rfc3339(trimmed)
        .or_else(|_| DateTime::parse_from_rfc2822(trimmed))
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .ok()
        .or_else(|| {
            NAIVE_DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        })
        .ok_or(ValidationError::InvalidDate)?;

    Ok(date.format("%Y-%m-%d").to_string())
}

/// Accept `H:MM` or `HH:MM` and return zero-padded 24-hour `HH:MM`.
pub fn normalize_time(input: &str) -> Result<String, ValidationError> {
    let captures = CLOCK_TIME
        .captures(input.trim())
        .ok_or(ValidationError::InvalidTime)?;

    let hours: u32 = captures[1].parse().map_err(|_| ValidationError::InvalidTime)?;
    let minutes: u32 = captures[2].parse().map_err(|_| ValidationError::InvalidTime)?;
    if hours > 23 || minutes > 59 {
        return Err(ValidationError::InvalidTime);
    }

    Ok(format!("{:02}:{:02}", hours, minutes))
}

fn require(field: &'static str, value: String) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

fn non_empty_list(
    field: &'static str,
    items: Vec<String>,
    dedupe: bool,
) -> Result<Vec<String>, ValidationError> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let item = item.trim();
        if item.is_empty() || (dedupe && out.iter().any(|seen| seen == item)) {
            continue;
        }
        out.push(item.to_string());
    }
    if out.is_empty() {
        return Err(ValidationError::EmptyList(field));
    }
    Ok(out)
}

/// Raw authoring input for an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub mode: String,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
}

/// A canonical draft plus the slug derived from its title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEvent {
    pub slug: String,
    pub fields: EventDraft,
}

impl EventDraft {
    /// Canonicalize every field and derive the slug. Used on create.
    pub fn normalize(self) -> Result<NormalizedEvent, ValidationError> {
        let fields = self.canonicalize()?;
        let slug = slugify(&fields.title);
        if slug.trim_matches('-').is_empty() {
            return Err(ValidationError::InvalidTitle);
        }
        Ok(NormalizedEvent { slug, fields })
    }

    /// Canonicalize every field without touching the slug. Used on update.
    pub fn canonicalize(self) -> Result<EventDraft, ValidationError> {
        let title = require("title", self.title)?;
        let description = require("description", self.description)?;
        let overview = require("overview", self.overview)?;
        let image = require("image", self.image)?;
        let venue = require("venue", self.venue)?;
        let location = require("location", self.location)?;
        let mode = require("mode", self.mode)?;
        let audience = require("audience", self.audience)?;
        let organizer = require("organizer", self.organizer)?;

        Ok(EventDraft {
            title,
            description,
            overview,
            image,
            venue,
            location,
            date: normalize_date(&self.date)?,
            time: normalize_time(&self.time)?,
            mode,
            audience,
            agenda: non_empty_list("agenda", self.agenda, false)?,
            organizer,
            tags: non_empty_list("tags", self.tags, true)?,
        })
    }
}

/// Partial update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub overview: Option<String>,
    pub image: Option<String>,
    pub venue: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub mode: Option<String>,
    pub audience: Option<String>,
    pub agenda: Option<Vec<String>>,
    pub organizer: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.overview.is_none()
            && self.image.is_none()
            && self.venue.is_none()
            && self.location.is_none()
            && self.date.is_none()
            && self.time.is_none()
            && self.mode.is_none()
            && self.audience.is_none()
            && self.agenda.is_none()
            && self.organizer.is_none()
            && self.tags.is_none()
    }

    /// Overlay the patch on `current` and canonicalize the result.
    pub fn apply(self, current: EventDraft) -> Result<EventDraft, ValidationError> {
        EventDraft {
            title: self.title.unwrap_or(current.title),
            description: self.description.unwrap_or(current.description),
            overview: self.overview.unwrap_or(current.overview),
            image: self.image.unwrap_or(current.image),
            venue: self.venue.unwrap_or(current.venue),
            location: self.location.unwrap_or(current.location),
            date: self.date.unwrap_or(current.date),
            time: self.time.unwrap_or(current.time),
            mode: self.mode.unwrap_or(current.mode),
            audience: self.audience.unwrap_or(current.audience),
            agenda: self.agenda.unwrap_or(current.agenda),
            organizer: self.organizer.unwrap_or(current.organizer),
            tags: self.tags.unwrap_or(current.tags),
        }
        .canonicalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> EventDraft {
        EventDraft {
            title: "  React Summit 2026! ".to_string(),
            description: "A large gathering of React developers".to_string(),
            overview: "Talks, workshops, and networking".to_string(),
            image: "https://images.test/event1.png".to_string(),
            venue: "RAI".to_string(),
            location: "Amsterdam, Netherlands".to_string(),
            date: "2026-04-15".to_string(),
            time: "9:00".to_string(),
            mode: "hybrid".to_string(),
            audience: "Developers".to_string(),
            agenda: vec!["Keynote".to_string(), " ".to_string(), "Workshops".to_string()],
            organizer: "GitNation".to_string(),
            tags: vec!["react".to_string(), "frontend".to_string(), "react".to_string()],
        }
    }

    #[test]
    fn slugify_examples() {
        assert_eq!(slugify("React Summit 2026!"), "react-summit-2026");
        assert_eq!(
            slugify("Google I/O Extended — Nairobi"),
            "google-io-extended-nairobi"
        );
        assert_eq!(
            slugify("Full-Stack Hackathon — Remote (48h)"),
            "full-stack-hackathon-remote-48h"
        );
        assert_eq!(slugify("  Next.js   Conf  "), "nextjs-conf");
        assert_eq!(slugify("a -- b"), "a-b");
    }

    #[test]
    fn slugify_is_idempotent() {
        let titles = [
            "React Summit 2026!",
            "  PyCon US 2026 ",
            "JSConf EU — 2026",
            "Ünïcödé Tïtle",
            "---dash---heavy---",
            "tabs\tand\nnewlines",
            "",
        ];
        for title in titles {
            let once = slugify(title);
            assert_eq!(slugify(&once), once, "not idempotent for {title:?}");
        }
    }

    #[test]
    fn date_accepts_common_inputs() {
        assert_eq!(normalize_date("2026-04-15").unwrap(), "2026-04-15");
        assert_eq!(normalize_date(" 2026/04/05 ").unwrap(), "2026-04-05");
        assert_eq!(normalize_date("2026-04-15T09:00:00").unwrap(), "2026-04-15");
        assert_eq!(normalize_date("April 15, 2026").unwrap(), "2026-04-15");
        assert_eq!(normalize_date("15 April 2026").unwrap(), "2026-04-15");
    }

    #[test]
    fn date_accepts_browser_and_header_forms() {
        assert_eq!(normalize_date("2026-04-15T09:00Z").unwrap(), "2026-04-15");
        assert_eq!(
            normalize_date("Wed, 15 Apr 2026 09:00:00 GMT").unwrap(),
            "2026-04-15"
        );
        assert_eq!(
            normalize_date("Wed, 15 Apr 2026 23:30:00 -0500").unwrap(),
            "2026-04-16"
        );
        assert_eq!(normalize_date("Apr 15 2026").unwrap(), "2026-04-15");
        assert_eq!(normalize_date("April 15 2026").unwrap(), "2026-04-15");
    }

    #[test]
    fn date_takes_utc_calendar_day() {
        assert_eq!(
            normalize_date("2026-04-15T01:00:00+05:00").unwrap(),
            "2026-04-14"
        );
        assert_eq!(
            normalize_date("2026-04-15T23:30:00-02:00").unwrap(),
            "2026-04-16"
        );
    }

    #[test]
    fn canonical_dates_round_trip() {
        for date in ["2026-01-01", "2026-02-28", "2028-02-29", "2026-12-31"] {
            assert_eq!(normalize_date(date).unwrap(), date);
        }
    }

    #[test]
    fn invalid_dates_rejected() {
        for input in ["", "tomorrow", "2026-13-01", "2026-02-30", "15/04/2026x"] {
            assert_eq!(normalize_date(input), Err(ValidationError::InvalidDate), "{input:?}");
        }
    }

    #[test]
    fn time_is_zero_padded() {
        assert_eq!(normalize_time("9:00").unwrap(), "09:00");
        assert_eq!(normalize_time(" 21:30 ").unwrap(), "21:30");
        assert_eq!(normalize_time("00:00").unwrap(), "00:00");
        assert_eq!(normalize_time("23:59").unwrap(), "23:59");
    }

    #[test]
    fn invalid_times_rejected() {
        for input in ["24:00", "12:60", "9:5", "123:00", "9am", "09:00:00", "", "٩:٠٠"] {
            assert_eq!(normalize_time(input), Err(ValidationError::InvalidTime), "{input:?}");
        }
    }

    #[test]
    fn normalize_canonicalizes_every_field() {
        let normalized = draft().normalize().unwrap();
        assert_eq!(normalized.slug, "react-summit-2026");
        assert_eq!(normalized.fields.title, "React Summit 2026!");
        assert_eq!(normalized.fields.time, "09:00");
        assert_eq!(normalized.fields.agenda, vec!["Keynote", "Workshops"]);
        assert_eq!(normalized.fields.tags, vec!["react", "frontend"]);
    }

    #[test]
    fn blank_required_field_is_named() {
        let mut input = draft();
        input.venue = "   ".to_string();
        assert_eq!(
            input.normalize(),
            Err(ValidationError::MissingField("venue"))
        );
    }

    #[test]
    fn empty_lists_rejected() {
        let mut input = draft();
        input.tags = vec![" ".to_string()];
        assert_eq!(input.normalize(), Err(ValidationError::EmptyList("tags")));

        let mut input = draft();
        input.agenda.clear();
        assert_eq!(input.normalize(), Err(ValidationError::EmptyList("agenda")));
    }

    #[test]
    fn title_without_slug_characters_rejected() {
        let mut input = draft();
        input.title = "!!! ???".to_string();
        assert_eq!(input.normalize(), Err(ValidationError::InvalidTitle));
    }

    #[test]
    fn patch_overlays_and_revalidates() {
        let current = draft().normalize().unwrap().fields;
        let patch = EventPatch {
            time: Some("7:05".to_string()),
            venue: Some("  Online ".to_string()),
            ..Default::default()
        };
        let updated = patch.apply(current.clone()).unwrap();
        assert_eq!(updated.time, "07:05");
        assert_eq!(updated.venue, "Online");
        assert_eq!(updated.title, current.title);

        let bad = EventPatch {
            date: Some("someday".to_string()),
            ..Default::default()
        };
        assert_eq!(bad.apply(current), Err(ValidationError::InvalidDate));
    }

    #[test]
    fn canonical_slug_trims_and_lowercases() {
        assert_eq!(canonical_slug("  React-Summit-2026 "), "react-summit-2026");
    }
}
