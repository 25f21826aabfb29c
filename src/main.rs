use std::path::Path;
use std::time::Duration;

use clap::Parser;
use indicatif::ProgressBar;
use owo_colors::OwoColorize;

use scholar_sync::provider::{AuthorProfile, Provider, scholar::ScholarClient};
use scholar_sync::record::{self, Publication};
use scholar_sync::store;

mod cli;

/// Unconditional pause between detail fetches; the provider rate-limits
/// faster clients.
const FETCH_DELAY: Duration = Duration::from_secs(1);

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    if !args.output_dir.exists() {
        println!(
            "{} Output directory not found: {}",
            "✗".red(),
            args.output_dir.display()
        );
        return Ok(());
    }

    println!("\n🔍 Fetching Google Scholar profile: {}", args.scholar_id);
    println!("{}", "=".repeat(60));

    let Some((client, author)) = fetch_author(&args.scholar_id, args.proxy.as_deref()) else {
        println!("{} Failed to fetch profile", "✗".red());
        return Ok(());
    };

    println!("{} Found profile: {}", "✓".green(), author.name);
    println!("\n📚 Fetching publications...");
    println!("{}", "-".repeat(60));

    let mut publications = fetch_publications(&client, &author);

    if publications.is_empty() {
        println!("\n{} No publications found", "✗".red());
        return Ok(());
    }

    save_all(&author, &mut publications, &args.output_dir);

    println!("\n{}", "=".repeat(60));
    println!("✅ Successfully updated all data!");
    println!("\nNext steps:");
    println!("1. Review the updated files in {}", args.output_dir.display());
    println!(
        "2. Commit changes: git add {} && git commit -m 'Update publications'",
        args.output_dir.display()
    );
    println!("3. Deploy: git push");
    Ok(())
}

/// Persist both data files, each step reporting its own failure.
///
/// A failed publications write must not block the stats update; the two
/// files are independent and the run carries on to the closing summary
/// either way.
fn save_all(author: &AuthorProfile, publications: &mut Vec<Publication>, out_dir: &Path) {
    match store::save_publications(publications, out_dir) {
        Ok(path) => println!(
            "\n{} Saved {} publications to {}",
            "✓".green(),
            publications.len(),
            path.display()
        ),
        Err(e) => println!("{} Error saving publications: {e:#}", "✗".red()),
    }

    match store::update_profile(author, out_dir) {
        Ok(stats) => {
            println!("\n{} Updated profile stats:", "✓".green());
            println!("  Publications: {}", stats.publications);
            println!("  Citations: {}", stats.citations);
            println!("  h-index: {}", stats.h_index);
            println!("  i10-index: {}", stats.i10_index);
        }
        Err(e) => println!("{} Error updating profile: {e:#}", "✗".red()),
    }
}

/// Fetch the author profile, trying the configured route first and falling
/// back once to a direct connection.
///
/// The fallback deliberately drops the proxy layer and says so; a silent
/// degradation would make proxy problems look like provider problems.
/// Returns the client that succeeded so the per-publication fetches reuse
/// the same route.
fn fetch_author(id: &str, proxy: Option<&str>) -> Option<(ScholarClient, AuthorProfile)> {
    let primary = match proxy {
        Some(p) => {
            println!("Routing requests through proxy {p}...");
            match ScholarClient::with_proxy(p) {
                Ok(client) => client,
                Err(e) => {
                    println!("{} {e:#}", "✗".red());
                    return None;
                }
            }
        }
        None => ScholarClient::new(),
    };

    println!("Searching for author ID: {id}");
    match primary.author(id) {
        Ok(author) => Some((primary, author)),
        Err(e) => {
            println!("{} Error fetching profile: {e:#}", "✗".red());
            println!("\nRetrying with a direct connection...");
            let direct = ScholarClient::direct();
            match direct.author(id) {
                Ok(author) => Some((direct, author)),
                Err(e2) => {
                    println!("{} Error fetching profile (direct): {e2:#}", "✗".red());
                    None
                }
            }
        }
    }
}

/// Resolve every publication stub to a normalized record.
///
/// A failed detail fetch is reported and skipped; the batch carries on, and
/// the run counts as a success if at least one record comes back.
fn fetch_publications(client: &impl Provider, author: &AuthorProfile) -> Vec<Publication> {
    println!("Found {} publications...", author.publications.len());

    let pb = ProgressBar::new(author.publications.len() as u64);
    let mut records = Vec::new();
    for (idx, stub) in author.publications.iter().enumerate() {
        std::thread::sleep(FETCH_DELAY);
        match client.publication(stub) {
            Ok(raw) => {
                let record = record::normalize(&raw);
                pb.println(format!(
                    "  {} Fetched: {}",
                    "✓".green(),
                    ellipsize(&record.title, 60)
                ));
                records.push(record);
            }
            Err(e) => pb.println(format!(
                "  {} Error fetching publication {}: {e:#}",
                "✗".red(),
                idx + 1
            )),
        }
        pb.inc(1);
    }
    pb.finish_and_clear();
    records
}

fn ellipsize(s: &str, limit: usize) -> String {
    if s.chars().count() <= limit {
        s.to_string()
    } else {
        let cut: String = s.chars().take(limit).collect();
        format!("{cut}...")
    }
}
