//! Genre label normalization
//!
//! Optional pre-processing applied to song records before they reach the
//! selection controller. Genre strings are cleaned up and checked against an
//! allow-list of curated buckets; anything else becomes [`OTHER_GENRE`].

use std::collections::HashSet;

use tracing::debug;

use crate::songs::{FieldValue, SongRecord, TRACK_GENRE};

/// Bucket for genres outside the allow-list
pub const OTHER_GENRE: &str = "Other";

/// Curated genre buckets
pub const DEFAULT_ALLOWED_GENRES: &[&str] = &[
    "Acoustic / Folk",
    "African & Afro-Fusion",
    "Rock – Alternative / Indie",
    "Electronic – Ambient / Chill / Sleep",
    "Asian – Japan",
    "Metal",
    "Blues",
    "Latin – Brazil",
    "Electronic – Bass / DnB / Dub",
    "Asian – Chinese / HK / Taiwan",
    "Electronic – House",
    "Children / Kids",
    "Classical / Opera",
    "Electronic – EDM / Dance",
    "Musical Theatre / Show Tunes",
    "Latin – Dance / Caribbean",
    "Electronic – Techno / Trance",
    "Rock – Core / Punk",
    "Mood / Miscellaneous",
    "Hip-Hop / R&B",
    "Rock – Classic / Mainstream",
    "South Asia / Middle East",
    "Jazz",
    "Asian – Korea",
    "Latin – General",
];

/// Maps raw genre strings onto an allow-list
#[derive(Debug, Clone)]
pub struct GenreNormalizer {
    allowed: HashSet<String>,
}

impl Default for GenreNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_GENRES.iter().copied())
    }
}

impl GenreNormalizer {
    /// Build a normalizer from an allow-list; entries are cleaned the same
    /// way as incoming genres.
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed: allowed.into_iter().map(|g| clean(g.as_ref())).collect(),
        }
    }

    /// Normalize one genre value; `None` means the record had no genre
    pub fn normalize(&self, raw: Option<&str>) -> String {
        let cleaned = clean(raw.unwrap_or(OTHER_GENRE));
        if self.allowed.contains(&cleaned) {
            cleaned
        } else {
            OTHER_GENRE.to_string()
        }
    }

    /// Rewrite `track_genre` on every record; returns how many became "Other"
    pub fn apply(&self, records: &mut [SongRecord]) -> usize {
        let mut other = 0;
        for record in records.iter_mut() {
            let genre = self.normalize(record.genre());
            if genre == OTHER_GENRE {
                other += 1;
            }
            record.set(TRACK_GENRE, FieldValue::Text(genre));
        }
        debug!(
            "Normalized genres for {} records ({} mapped to {})",
            records.len(),
            other,
            OTHER_GENRE
        );
        other
    }
}

// Collapse whitespace runs, unify en/em dashes, trim
fn clean(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('—', "–")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_genre_passes_through() {
        let normalizer = GenreNormalizer::default();
        assert_eq!(normalizer.normalize(Some("Jazz")), "Jazz");
        assert_eq!(
            normalizer.normalize(Some("Rock – Core / Punk")),
            "Rock – Core / Punk"
        );
    }

    #[test]
    fn test_whitespace_and_dash_cleanup() {
        let normalizer = GenreNormalizer::default();
        assert_eq!(
            normalizer.normalize(Some("  Electronic  —   House ")),
            "Electronic – House"
        );
        assert_eq!(
            normalizer.normalize(Some("Hip-Hop\t/ R&B")),
            "Hip-Hop / R&B"
        );
    }

    #[test]
    fn test_unknown_and_missing_become_other() {
        let normalizer = GenreNormalizer::default();
        assert_eq!(normalizer.normalize(Some("k-pop")), OTHER_GENRE);
        assert_eq!(normalizer.normalize(Some("")), OTHER_GENRE);
        assert_eq!(normalizer.normalize(None), OTHER_GENRE);
    }

    #[test]
    fn test_custom_allow_list() {
        let normalizer = GenreNormalizer::new(["pop", "rock"]);
        assert_eq!(normalizer.normalize(Some("pop")), "pop");
        assert_eq!(normalizer.normalize(Some("Jazz")), OTHER_GENRE);
    }

    #[test]
    fn test_apply_rewrites_records() {
        let normalizer = GenreNormalizer::default();
        let mut records = vec![
            SongRecord::new().with(TRACK_GENRE, FieldValue::Text("Metal".to_string())),
            SongRecord::new().with(TRACK_GENRE, FieldValue::Text("polka".to_string())),
            SongRecord::new().with(TRACK_GENRE, FieldValue::Null),
        ];

        let other = normalizer.apply(&mut records);

        assert_eq!(other, 2);
        assert_eq!(records[0].genre(), Some("Metal"));
        assert_eq!(records[1].genre(), Some(OTHER_GENRE));
        assert_eq!(records[2].genre(), Some(OTHER_GENRE));
    }
}
