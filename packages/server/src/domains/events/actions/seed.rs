//! Sample catalogue for local development and demos.

use sqlx::PgPool;
use tracing::{debug, info};

use crate::common::{AppError, AppResult};
use crate::domains::events::actions::create_event;
use crate::domains::events::normalize::EventDraft;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub created: usize,
    pub skipped: usize,
}

struct Sample {
    title: &'static str,
    description: &'static str,
    venue: &'static str,
    location: &'static str,
    date: &'static str,
    time: &'static str,
    mode: &'static str,
    image: &'static str,
    organizer: &'static str,
    tags: &'static [&'static str],
}

const SAMPLES: &[Sample] = &[
    Sample {
        title: "React Summit 2026",
        description: "A large gathering of React developers, maintainers, and companies with talks, workshops, and networking.",
        venue: "Kromhouthal",
        location: "Amsterdam, Netherlands",
        date: "2026-04-15",
        time: "09:00",
        mode: "offline",
        image: "/images/event1.png",
        organizer: "GitNation",
        tags: &["react", "javascript", "frontend"],
    },
    Sample {
        title: "Google I/O Extended Nairobi",
        description: "Community-led extended event with livestream sessions, a local speaker line-up and hands-on codelabs.",
        venue: "iHub",
        location: "Nairobi, Kenya",
        date: "2026-05-20",
        time: "10:00",
        mode: "hybrid",
        image: "/images/event2.png",
        organizer: "GDG Nairobi",
        tags: &["google", "android", "cloud"],
    },
    Sample {
        title: "PyCon US 2026",
        description: "Annual conference for the Python community featuring talks, tutorials and sprints.",
        venue: "Salt Palace Convention Center",
        location: "Salt Lake City, USA",
        date: "2026-04-22",
        time: "08:30",
        mode: "offline",
        image: "/images/event3.png",
        organizer: "Python Software Foundation",
        tags: &["python", "backend", "community"],
    },
    Sample {
        title: "Next.js Conf 2026",
        description: "Official Next.js conference with product updates, workshops and community demos.",
        venue: "Online",
        location: "Online",
        date: "2026-03-10",
        time: "11:00",
        mode: "online",
        image: "/images/event4.png",
        organizer: "Vercel",
        tags: &["nextjs", "react", "frontend"],
    },
    Sample {
        title: "Full-Stack Hackathon Remote 48h",
        description: "48-hour online hackathon focused on building full-stack projects with mentorship and prizes.",
        venue: "Online",
        location: "Remote",
        date: "2026-02-14",
        time: "16:00",
        mode: "online",
        image: "/images/event5.png",
        organizer: "Dev Events",
        tags: &["hackathon", "fullstack", "javascript"],
    },
    Sample {
        title: "JSConf EU 2026",
        description: "Community-driven JavaScript conference with diverse talks and deep technical sessions.",
        venue: "LX Factory",
        location: "Lisbon, Portugal",
        date: "2026-06-05",
        time: "09:30",
        mode: "offline",
        image: "/images/event6.png",
        organizer: "JSConf EU",
        tags: &["javascript", "web", "community"],
    },
];

/// Drafts for the bundled sample conferences.
pub fn sample_events() -> Vec<EventDraft> {
    SAMPLES
        .iter()
        .map(|s| EventDraft {
            title: s.title.to_string(),
            description: s.description.to_string(),
            overview: format!("{} in {}. {}", s.title, s.location, s.description),
            image: s.image.to_string(),
            venue: s.venue.to_string(),
            location: s.location.to_string(),
            date: s.date.to_string(),
            time: s.time.to_string(),
            mode: s.mode.to_string(),
            audience: "Developers".to_string(),
            agenda: vec![
                "Registration and welcome".to_string(),
                "Keynote".to_string(),
                "Sessions and workshops".to_string(),
                "Networking".to_string(),
            ],
            organizer: s.organizer.to_string(),
            tags: s.tags.iter().map(|t| t.to_string()).collect(),
        })
        .collect()
}

/// Insert the sample catalogue through the normal create path.
///
/// Events whose slug already exists are skipped, so reseeding is harmless.
pub async fn seed_sample_events(pool: &PgPool) -> AppResult<SeedReport> {
    let mut report = SeedReport::default();
    for draft in sample_events() {
        let title = draft.title.clone();
        match create_event(draft, pool).await {
            Ok(_) => report.created += 1,
            Err(AppError::Conflict(_)) => {
                debug!(title = %title, "Sample event already present");
                report.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }
    info!(created = report.created, skipped = report.skipped, "Seeded sample events");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_sample_normalizes() {
        let drafts = sample_events();
        assert_eq!(drafts.len(), 6);
        for draft in drafts {
            let title = draft.title.clone();
            assert!(draft.normalize().is_ok(), "{title} failed to normalize");
        }
    }

    #[test]
    fn sample_slugs_are_distinct() {
        let mut slugs: Vec<String> = sample_events()
            .into_iter()
            .map(|d| d.normalize().unwrap().slug)
            .collect();
        slugs.sort();
        slugs.dedup();
        assert_eq!(slugs.len(), 6);
    }
}
