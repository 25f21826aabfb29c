use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};

use crate::provider::AuthorProfile;
use crate::record::{self, Publication};

pub const PUBLICATIONS_FILE: &str = "publications.json";
pub const PROFILE_FILE: &str = "profile.json";

/// Sentinel the site template ships with; a profile name is only overwritten
/// while it still holds this value.
pub const PLACEHOLDER_NAME: &str = "Your Name";

/// Citation statistics written under `"stats"` in `profile.json`,
/// overwritten wholesale on each run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileStats {
    pub publications: usize,
    pub citations: u32,
    #[serde(rename = "hIndex")]
    pub h_index: u32,
    #[serde(rename = "i10Index")]
    pub i10_index: u32,
}

impl ProfileStats {
    pub fn of(author: &AuthorProfile) -> Self {
        ProfileStats {
            publications: author.publications.len(),
            citations: author.citations,
            h_index: author.h_index,
            i10_index: author.i10_index,
        }
    }
}

/// Sort the records, assign export-time ids, and overwrite
/// `publications.json` in `out_dir`. Returns the path written.
pub fn save_publications(
    records: &mut Vec<Publication>,
    out_dir: &Path,
) -> anyhow::Result<PathBuf> {
    record::sort_records(records);
    record::assign_ids(records);

    let path = out_dir.join(PUBLICATIONS_FILE);
    let json = serde_json::to_string_pretty(records).context("serializing publications")?;
    fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// Merge fresh stats into `profile.json`, preserving every other field.
///
/// The `name` field is only replaced while it still holds
/// [`PLACEHOLDER_NAME`]; a customized name is never touched. Returns the
/// stats that were written, for the run summary.
pub fn update_profile(author: &AuthorProfile, out_dir: &Path) -> anyhow::Result<ProfileStats> {
    let path = out_dir.join(PROFILE_FILE);
    let text =
        fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    let mut profile: serde_json::Value =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;

    let obj = profile
        .as_object_mut()
        .ok_or_else(|| anyhow!("{} is not a JSON object", path.display()))?;

    let stats = ProfileStats::of(author);
    obj.insert(
        "stats".to_string(),
        serde_json::to_value(&stats).context("serializing stats")?,
    );

    if obj.get("name").and_then(|n| n.as_str()) == Some(PLACEHOLDER_NAME) && !author.name.is_empty()
    {
        obj.insert(
            "name".to_string(),
            serde_json::Value::String(author.name.clone()),
        );
    }

    let json = serde_json::to_string_pretty(&profile).context("serializing profile")?;
    fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(stats)
}
