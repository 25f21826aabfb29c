pub mod scholar;

/// Narrow fetch interface over the scholarly-data provider.
///
/// Record normalization only ever sees the raw types below, so it can be
/// tested without a live network dependency; the ureq-backed implementation
/// lives in [`scholar`].
pub trait Provider {
    /// Look up an author profile by its provider-side identifier.
    fn author(&self, id: &str) -> anyhow::Result<AuthorProfile>;

    /// Resolve a publication stub from the profile listing into its full
    /// bibliographic record.
    fn publication(&self, stub: &PubStub) -> anyhow::Result<RawPublication>;
}

/// Author-level data from the provider's profile page.
#[derive(Debug, Clone, Default)]
pub struct AuthorProfile {
    pub name: String,
    /// Total citation count across all publications.
    pub citations: u32,
    pub h_index: u32,
    pub i10_index: u32,
    pub publications: Vec<PubStub>,
}

/// A publication reference from the profile listing, enough to fetch the
/// detail record later.
#[derive(Debug, Clone)]
pub struct PubStub {
    /// The author identifier the stub was listed under.
    pub author_id: String,
    /// Provider-side citation token (the `citation_for_view` value).
    pub citation_id: String,
    pub title: String,
    /// Citation count from the listing row; used when the detail page omits
    /// its own count.
    pub citations: u32,
}

/// Raw bibliographic fields for one publication, before normalization.
#[derive(Debug, Clone, Default)]
pub struct RawPublication {
    pub title: Option<String>,
    pub authors: Option<RawAuthors>,
    pub venue: Option<String>,
    pub journal: Option<String>,
    pub pub_year: Option<String>,
    pub citations: u32,
    pub eprint_url: Option<String>,
    pub abstract_text: Option<String>,
}

/// Author fields arrive either as one joined string or as an explicit list,
/// depending on where the provider surfaced them.
#[derive(Debug, Clone)]
pub enum RawAuthors {
    Joined(String),
    List(Vec<String>),
}
