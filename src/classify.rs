use serde::{Deserialize, Serialize};

/// What kind of publication a venue string describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Kind {
    #[serde(rename = "journal")]
    Journal,
    #[serde(rename = "conference")]
    Conference,
    #[serde(rename = "book-chapter")]
    BookChapter,
}

/// Keyword rules for classifying a venue, checked in order.
///
/// NOTE: Ordering is important here, as it signifies priority. A venue that
/// matches keywords from more than one rule gets the kind of the first rule
/// listed, so conference terms are checked before book terms.
static RULES: &[(&[&str], Kind)] = &[
    (
        &["conference", "proceedings", "workshop", "symposium"],
        Kind::Conference,
    ),
    (&["chapter", "book"], Kind::BookChapter),
];

/// Classify a venue string by case-insensitive keyword matching.
///
/// Venues that match no rule default to [`Kind::Journal`].
pub fn classify(venue: &str) -> Kind {
    let venue = venue.to_lowercase();
    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| venue.contains(k)))
        .map(|(_, kind)| *kind)
        .unwrap_or(Kind::Journal)
}
