use serde::{Deserialize, Serialize};

use crate::classify::{self, Kind};
use crate::provider::{RawAuthors, RawPublication};

/// Title used when the provider omits one.
pub const UNTITLED: &str = "Untitled";
/// Venue used when neither a venue nor a journal field is present.
pub const UNKNOWN_VENUE: &str = "Unknown";
/// Abstracts are cut to this many characters, with no word-boundary
/// awareness.
pub const ABSTRACT_LIMIT: usize = 300;

/// One publication as stored in `publications.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    /// Sequential 1-based index, assigned after sorting at export time. Not
    /// stable across re-fetches.
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub venue: String,
    pub year: i32,
    pub citations: u32,
    pub pdf: String,
    /// Always empty; the provider does not expose DOIs.
    pub doi: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    #[serde(rename = "type")]
    pub kind: Kind,
}

/// Map raw provider fields into the fixed record shape.
///
/// Every field has an explicit fallback, so this mapping is total; fetch
/// errors are handled before a raw record ever reaches it. The `id` is left
/// empty until [`assign_ids`] runs over the sorted sequence.
pub fn normalize(raw: &RawPublication) -> Publication {
    let title = raw
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(UNTITLED)
        .to_string();

    let authors = match &raw.authors {
        Some(RawAuthors::Joined(s)) => split_authors(s),
        Some(RawAuthors::List(list)) => list.clone(),
        None => Vec::new(),
    };

    // Blank values fall through each link of the venue -> journal -> Unknown
    // chain, not just the last one.
    let venue = raw
        .venue
        .clone()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| raw.journal.clone().filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(|| UNKNOWN_VENUE.to_string());

    let year = raw
        .pub_year
        .as_deref()
        .and_then(|y| y.trim().parse::<i32>().ok())
        .unwrap_or(0);

    let abstract_text = raw
        .abstract_text
        .as_deref()
        .map(|a| truncate_chars(a, ABSTRACT_LIMIT))
        .unwrap_or_default();

    let kind = classify::classify(&venue);

    Publication {
        id: String::new(),
        title,
        authors,
        venue,
        year,
        citations: raw.citations,
        pdf: raw.eprint_url.clone().unwrap_or_default(),
        doi: String::new(),
        abstract_text,
        kind,
    }
}

/// Split a joined author string on `" and "` and `","`, trimming each name.
pub fn split_authors(raw: &str) -> Vec<String> {
    raw.replace(" and ", ",")
        .split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect()
}

fn truncate_chars(s: &str, limit: usize) -> String {
    s.chars().take(limit).collect()
}

/// Sort records by year descending, then citations descending, stable
/// otherwise.
pub fn sort_records(records: &mut [Publication]) {
    records.sort_by(|a, b| b.year.cmp(&a.year).then(b.citations.cmp(&a.citations)));
}

/// Assign export-time ids `"1"..="n"` over an already-sorted sequence.
pub fn assign_ids(records: &mut [Publication]) {
    for (idx, record) in records.iter_mut().enumerate() {
        record.id = (idx + 1).to_string();
    }
}
