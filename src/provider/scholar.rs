use anyhow::{Context, anyhow};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::provider::{AuthorProfile, Provider, PubStub, RawAuthors, RawPublication};

const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.10 Safari/605.1.1";

const BASE: &str = "https://scholar.google.com/citations";

/// Largest page the profile listing serves in one request.
const PAGE_SIZE: &str = "100";

/// Google Scholar client scraping the public profile and citation pages.
///
/// Scholar has no JSON API for profiles, so fields are pulled out of the
/// served HTML with conservative regex extraction.
pub struct ScholarClient {
    agent: ureq::Agent,
}

impl ScholarClient {
    /// Client using the default configuration, which picks up proxy settings
    /// from the environment when present.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Client routing every request through the given proxy.
    pub fn with_proxy(proxy: &str) -> anyhow::Result<Self> {
        let proxy = ureq::Proxy::new(proxy)
            .with_context(|| format!("invalid proxy URL: {proxy}"))?;
        Ok(Self::build(Some(proxy)))
    }

    /// Client that connects directly, ignoring any proxy configured in the
    /// environment. Used as the fallback retrieval path.
    pub fn direct() -> Self {
        let cfg = ureq::Agent::config_builder()
            .timeout_connect(Some(std::time::Duration::from_secs(5)))
            .timeout_global(Some(std::time::Duration::from_secs(20)))
            .proxy(None)
            .build();
        ScholarClient {
            agent: ureq::Agent::new_with_config(cfg),
        }
    }

    fn build(proxy: Option<ureq::Proxy>) -> Self {
        let builder = ureq::Agent::config_builder()
            .timeout_connect(Some(std::time::Duration::from_secs(5)))
            .timeout_global(Some(std::time::Duration::from_secs(20)));
        let builder = match proxy {
            Some(p) => builder.proxy(Some(p)),
            None => builder,
        };
        ScholarClient {
            agent: ureq::Agent::new_with_config(builder.build()),
        }
    }

    fn get(&self, url: &Url) -> anyhow::Result<String> {
        let body = self
            .agent
            .get(url.as_str())
            .header("User-Agent", USER_AGENT)
            .header("Accept-Language", "en")
            .call()
            .with_context(|| format!("failed request for {url}"))?
            .into_body()
            .read_to_string()
            .context("failed to read response body")?;
        Ok(body)
    }
}

impl Provider for ScholarClient {
    fn author(&self, id: &str) -> anyhow::Result<AuthorProfile> {
        let url = profile_url(id)?;
        let html = self.get(&url)?;
        parse_profile(&html, id)
    }

    fn publication(&self, stub: &PubStub) -> anyhow::Result<RawPublication> {
        let url = citation_url(stub)?;
        let html = self.get(&url)?;
        Ok(parse_citation(&html, stub))
    }
}

fn profile_url(id: &str) -> anyhow::Result<Url> {
    let mut url = Url::parse(BASE)?;
    url.query_pairs_mut()
        .append_pair("user", id)
        .append_pair("hl", "en")
        .append_pair("cstart", "0")
        .append_pair("pagesize", PAGE_SIZE);
    Ok(url)
}

fn citation_url(stub: &PubStub) -> anyhow::Result<Url> {
    let mut url = Url::parse(BASE)?;
    url.query_pairs_mut()
        .append_pair("view_op", "view_citation")
        .append_pair("hl", "en")
        .append_pair("user", &stub.author_id)
        .append_pair("citation_for_view", &stub.citation_id);
    Ok(url)
}

// ----------------------------
// Profile page extraction
// ----------------------------

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<div\b[^>]*id="gsc_prf_in"[^>]*>(.*?)</div>"#).unwrap());
static STAT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<td\b[^>]*class="gsc_rsb_std"[^>]*>\s*(\d+)\s*</td>"#).unwrap());
static ROW_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<tr\b[^>]*class="gsc_a_tr"[^>]*>(.*?)</tr>"#).unwrap());
static ROW_TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<a\b[^>]*class="gsc_a_at"[^>]*>(.*?)</a>"#).unwrap());
static CITATION_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"citation_for_view=([^&"'\s]+)"#).unwrap());
static ROW_CITED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<a\b[^>]*class="gsc_a_ac[^"]*"[^>]*>\s*(\d*)\s*</a>"#).unwrap());

fn parse_profile(html: &str, id: &str) -> anyhow::Result<AuthorProfile> {
    let name = NAME_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| normalize_ws(&strip_tags(m.as_str())))
        .ok_or_else(|| anyhow!("no profile found for author id {id}"))?;

    // The sidebar table interleaves "all" and "since" columns:
    // citations, citations-recent, h-index, h-recent, i10-index, i10-recent.
    let stats: Vec<u32> = STAT_RE
        .captures_iter(html)
        .filter_map(|c| c.get(1).and_then(|m| m.as_str().parse().ok()))
        .collect();
    let citations = stats.first().copied().unwrap_or(0);
    let h_index = stats.get(2).copied().unwrap_or(0);
    let i10_index = stats.get(4).copied().unwrap_or(0);

    let mut publications = Vec::new();
    for row in ROW_RE.captures_iter(html) {
        let Some(row) = row.get(1).map(|m| m.as_str()) else {
            continue;
        };
        let Some(citation_id) = CITATION_TOKEN_RE
            .captures(row)
            .and_then(|c| c.get(1))
            .map(|m| unescape(m.as_str()))
        else {
            continue;
        };
        let title = ROW_TITLE_RE
            .captures(row)
            .and_then(|c| c.get(1))
            .map(|m| normalize_ws(&strip_tags(m.as_str())))
            .unwrap_or_default();
        let citations = ROW_CITED_RE
            .captures(row)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0);
        publications.push(PubStub {
            author_id: id.to_string(),
            citation_id,
            title,
            citations,
        });
    }

    Ok(AuthorProfile {
        name,
        citations,
        h_index,
        i10_index,
        publications,
    })
}

// ----------------------------
// Citation detail extraction
// ----------------------------

static FIELD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?is)<div\b[^>]*class="gsc_oci_field"[^>]*>(.*?)</div>\s*<div\b[^>]*class="gsc_oci_value"[^>]*>(.*?)</div>"#,
    )
    .unwrap()
});
static DETAIL_TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<div\b[^>]*id="gsc_oci_title"[^>]*>(.*?)</div>"#).unwrap());
static TITLE_LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*class="gsc_oci_title_link"[^>]*href\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .unwrap()
});
static CITED_BY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Cited by (\d+)").unwrap());

fn parse_citation(html: &str, stub: &PubStub) -> RawPublication {
    let mut raw = RawPublication {
        citations: stub.citations,
        ..RawPublication::default()
    };

    raw.title = DETAIL_TITLE_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| normalize_ws(&strip_tags(m.as_str())))
        .filter(|t| !t.is_empty())
        .or_else(|| {
            if stub.title.is_empty() {
                None
            } else {
                Some(stub.title.clone())
            }
        });

    raw.eprint_url = TITLE_LINK_RE
        .captures(html)
        .and_then(|c| c.get(1).or_else(|| c.get(2)))
        .map(|m| unescape(m.as_str()))
        .filter(|u| !u.is_empty());

    for cap in FIELD_RE.captures_iter(html) {
        let (Some(field), Some(value)) = (cap.get(1), cap.get(2)) else {
            continue;
        };
        let field = normalize_ws(&strip_tags(field.as_str()));
        let value = normalize_ws(&strip_tags(value.as_str()));
        if value.is_empty() {
            continue;
        }
        match field.to_lowercase().as_str() {
            "authors" | "inventors" => raw.authors = Some(RawAuthors::Joined(value)),
            // Scholar renders dates as YYYY/M/D; only the year survives
            // normalization anyway.
            "publication date" => {
                raw.pub_year = value.split('/').next().map(|y| y.trim().to_string())
            }
            "journal" => raw.journal = Some(value),
            "conference" | "book" | "source" => raw.venue = Some(value),
            "description" => raw.abstract_text = Some(value),
            "total citations" => {
                if let Some(n) = CITED_BY_RE
                    .captures(&value)
                    .and_then(|c| c.get(1))
                    .and_then(|m| m.as_str().parse().ok())
                {
                    raw.citations = n;
                }
            }
            _ => {}
        }
    }

    raw
}

// ----------------------------
// HTML helpers
// ----------------------------

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<[^>]*>").unwrap());

fn strip_tags(html: &str) -> String {
    unescape(&TAG_RE.replace_all(html, " "))
}

fn unescape(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&hellip;", "…")
}

fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE_HTML: &str = r##"
        <div id="gsc_prf_in">Ada Lovelace</div>
        <table id="gsc_rsb_st">
          <tr><td class="gsc_rsb_std">1234</td><td class="gsc_rsb_std">567</td></tr>
          <tr><td class="gsc_rsb_std">17</td><td class="gsc_rsb_std">12</td></tr>
          <tr><td class="gsc_rsb_std">25</td><td class="gsc_rsb_std">19</td></tr>
        </table>
        <tr class="gsc_a_tr">
          <td class="gsc_a_t">
            <a href="/citations?view_op=view_citation&amp;hl=en&amp;user=AbCdEfG&amp;citation_for_view=AbCdEfG:u5HHmVD_uO8C"
               class="gsc_a_at">Notes on the <i>Analytical Engine</i></a>
          </td>
          <td class="gsc_a_c"><a href="#" class="gsc_a_ac gs_ibl">890</a></td>
        </tr>
        <tr class="gsc_a_tr">
          <td class="gsc_a_t">
            <a href="/citations?view_op=view_citation&amp;hl=en&amp;user=AbCdEfG&amp;citation_for_view=AbCdEfG:d1gkVwhDpl0C"
               class="gsc_a_at">Sketch of a flying machine</a>
          </td>
          <td class="gsc_a_c"><a href="#" class="gsc_a_ac gs_ibl"></a></td>
        </tr>
    "##;

    const CITATION_HTML: &str = r##"
        <div id="gsc_oci_title">
          <a class="gsc_oci_title_link" href="https://example.org/notes.pdf">Notes on the Analytical Engine</a>
        </div>
        <div class="gs_scl">
          <div class="gsc_oci_field">Authors</div>
          <div class="gsc_oci_value">Ada Lovelace, Charles Babbage</div>
        </div>
        <div class="gs_scl">
          <div class="gsc_oci_field">Publication date</div>
          <div class="gsc_oci_value">1843/9/1</div>
        </div>
        <div class="gs_scl">
          <div class="gsc_oci_field">Journal</div>
          <div class="gsc_oci_value">Scientific Memoirs</div>
        </div>
        <div class="gs_scl">
          <div class="gsc_oci_field">Description</div>
          <div class="gsc_oci_value">The first published computer program.</div>
        </div>
        <div class="gs_scl">
          <div class="gsc_oci_field">Total citations</div>
          <div class="gsc_oci_value"><a href="#">Cited by 890</a></div>
        </div>
    "##;

    fn stub() -> PubStub {
        PubStub {
            author_id: "AbCdEfG".to_string(),
            citation_id: "AbCdEfG:u5HHmVD_uO8C".to_string(),
            title: "Notes on the Analytical Engine".to_string(),
            citations: 3,
        }
    }

    #[test]
    fn parse_profile_extracts_name_stats_and_rows() {
        let author = parse_profile(PROFILE_HTML, "AbCdEfG").unwrap();
        assert_eq!(author.name, "Ada Lovelace");
        assert_eq!(author.citations, 1234);
        assert_eq!(author.h_index, 17);
        assert_eq!(author.i10_index, 25);
        assert_eq!(author.publications.len(), 2);

        let first = &author.publications[0];
        assert_eq!(first.author_id, "AbCdEfG");
        assert_eq!(first.citation_id, "AbCdEfG:u5HHmVD_uO8C");
        assert_eq!(first.title, "Notes on the Analytical Engine");
        assert_eq!(first.citations, 890);

        // Empty citation cell parses as zero.
        assert_eq!(author.publications[1].citations, 0);
    }

    #[test]
    fn parse_profile_without_name_is_an_error() {
        let err = parse_profile("<html></html>", "nobody").unwrap_err();
        assert!(err.to_string().contains("no profile found"));
    }

    #[test]
    fn parse_citation_extracts_bibliographic_fields() {
        let raw = parse_citation(CITATION_HTML, &stub());
        assert_eq!(raw.title.as_deref(), Some("Notes on the Analytical Engine"));
        assert_eq!(raw.eprint_url.as_deref(), Some("https://example.org/notes.pdf"));
        assert_eq!(raw.journal.as_deref(), Some("Scientific Memoirs"));
        assert!(raw.venue.is_none());
        assert_eq!(raw.pub_year.as_deref(), Some("1843"));
        assert_eq!(
            raw.abstract_text.as_deref(),
            Some("The first published computer program.")
        );
        assert_eq!(raw.citations, 890);
        match raw.authors {
            Some(RawAuthors::Joined(ref s)) => {
                assert_eq!(s, "Ada Lovelace, Charles Babbage")
            }
            ref other => panic!("expected joined authors, got {other:?}"),
        }
    }

    #[test]
    fn parse_citation_falls_back_to_stub_data() {
        let raw = parse_citation("<html></html>", &stub());
        assert_eq!(raw.title.as_deref(), Some("Notes on the Analytical Engine"));
        assert_eq!(raw.citations, 3);
        assert!(raw.journal.is_none());
        assert!(raw.eprint_url.is_none());
    }

    #[test]
    fn conference_field_lands_in_venue() {
        let html = r#"
            <div class="gs_scl">
              <div class="gsc_oci_field">Conference</div>
              <div class="gsc_oci_value">Proceedings of the 1st Engine Workshop</div>
            </div>
        "#;
        let raw = parse_citation(html, &stub());
        assert_eq!(
            raw.venue.as_deref(),
            Some("Proceedings of the 1st Engine Workshop")
        );
    }

    #[test]
    fn strip_tags_and_unescape() {
        assert_eq!(
            normalize_ws(&strip_tags("a <b>bold</b> &amp; <i>brave</i> claim")),
            "a bold & brave claim"
        );
    }
}
