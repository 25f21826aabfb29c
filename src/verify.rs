//! Read-only diagnostics over the portfolio project tree.
//!
//! Every check prints one line and feeds an accumulated all-good flag;
//! nothing here writes to the tree.

use std::fs;
use std::path::Path;

use owo_colors::OwoColorize;

use crate::store::PLACEHOLDER_NAME;

/// Build and configuration files the site cannot run without.
const PROJECT_FILES: &[&str] = &[
    "package.json",
    "tsconfig.json",
    "tailwind.config.ts",
    "next.config.mjs",
    "src/app/page.tsx",
    "src/app/layout.tsx",
];

/// Data files that must exist and parse as JSON.
const DATA_FILES: &[(&str, &str)] = &[
    ("src/data/profile.json", "Profile data"),
    ("src/data/publications.json", "Publications data"),
    ("src/data/projects.json", "Projects data"),
];

const COMPONENTS: &[&str] = &[
    "Hero.tsx",
    "Publications.tsx",
    "Projects.tsx",
    "About.tsx",
    "Contact.tsx",
    "Navigation.tsx",
    "ThemeToggle.tsx",
];

const PROFILE_PHOTO: &str = "public/profile.jpg";

/// Check that a file exists, printing one diagnostic line.
pub fn check_file(path: &Path, name: &str) -> bool {
    if path.exists() {
        println!("{} {name} exists", "✓".green());
        true
    } else {
        println!("{} {name} missing - {}", "✗".red(), path.display());
        false
    }
}

/// Check that a file parses as JSON, printing one diagnostic line.
pub fn check_json(path: &Path, name: &str) -> bool {
    let parsed = fs::read_to_string(path)
        .map_err(anyhow::Error::from)
        .and_then(|text| {
            serde_json::from_str::<serde_json::Value>(&text).map_err(anyhow::Error::from)
        });
    match parsed {
        Ok(_) => {
            println!("{} {name} is valid JSON", "✓".green());
            true
        }
        Err(e) => {
            println!("{} {name} has invalid JSON: {e}", "✗".red());
            false
        }
    }
}

/// Walk every check against `root` and print the final summary. Returns the
/// accumulated all-good flag.
pub fn run(root: &Path) -> bool {
    let mut all_good = true;

    println!("\n📁 Checking project files...");
    for file in PROJECT_FILES {
        if !check_file(&root.join(file), file) {
            all_good = false;
        }
    }

    println!("\n📊 Checking data files...");
    for (file, name) in DATA_FILES {
        let path = root.join(file);
        if check_file(&path, name) {
            if !check_json(&path, name) {
                all_good = false;
            }
        } else {
            all_good = false;
        }
    }

    println!("\n🧩 Checking components...");
    for component in COMPONENTS {
        let path = root.join("src/components").join(component);
        if !check_file(&path, &format!("components/{component}")) {
            all_good = false;
        }
    }

    // The photo is recommended, never required.
    println!("\n📸 Checking assets...");
    if root.join(PROFILE_PHOTO).exists() {
        println!("{} Profile photo exists", "✓".green());
    } else {
        println!(
            "{} Profile photo missing - add your photo as {PROFILE_PHOTO}",
            "⚠".yellow()
        );
        println!("  (This is optional but recommended)");
    }

    println!("\n⚙️ Checking customization...");
    if let Some(name) = profile_name(&root.join("src/data/profile.json")) {
        if name == PLACEHOLDER_NAME {
            println!(
                "{} Profile not customized - edit src/data/profile.json",
                "⚠".yellow()
            );
        } else {
            println!("{} Profile customized for: {name}", "✓".green());
        }
    }

    println!("\n{}", "=".repeat(60));
    if all_good {
        println!("✅ All critical files are in place!");
        println!("\nNext steps:");
        println!("1. Install Node.js if not already installed");
        println!("2. Run: npm install");
        println!("3. Customize src/data/ files");
        println!("4. Run: npm run dev");
    } else {
        println!("⚠️  Some files are missing or invalid");
        println!("Please check the errors above");
    }
    println!("{}", "=".repeat(60));

    all_good
}

fn profile_name(path: &Path) -> Option<String> {
    let text = fs::read_to_string(path).ok()?;
    let profile: serde_json::Value = serde_json::from_str(&text).ok()?;
    profile
        .get("name")
        .and_then(|n| n.as_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Lay out a complete synthetic project tree.
    fn full_tree(root: &Path) {
        for file in PROJECT_FILES {
            let path = root.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "ok").unwrap();
        }
        fs::create_dir_all(root.join("src/data")).unwrap();
        fs::write(
            root.join("src/data/profile.json"),
            r#"{"name": "Ada Lovelace"}"#,
        )
        .unwrap();
        fs::write(root.join("src/data/publications.json"), "[]").unwrap();
        fs::write(root.join("src/data/projects.json"), "[]").unwrap();
        fs::create_dir_all(root.join("src/components")).unwrap();
        for component in COMPONENTS {
            fs::write(root.join("src/components").join(component), "ok").unwrap();
        }
    }

    #[test]
    fn complete_tree_passes() {
        let dir = tempfile::tempdir().unwrap();
        full_tree(dir.path());
        assert!(run(dir.path()));
    }

    #[test]
    fn missing_required_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        full_tree(dir.path());
        fs::remove_file(dir.path().join("package.json")).unwrap();
        assert!(!run(dir.path()));
    }

    #[test]
    fn malformed_data_json_fails_even_though_it_exists() {
        let dir = tempfile::tempdir().unwrap();
        full_tree(dir.path());
        fs::write(dir.path().join("src/data/publications.json"), "{oops").unwrap();
        assert!(!run(dir.path()));
    }

    #[test]
    fn missing_photo_does_not_fail_the_run() {
        let dir = tempfile::tempdir().unwrap();
        full_tree(dir.path());
        assert!(!dir.path().join(PROFILE_PHOTO).exists());
        assert!(run(dir.path()));
    }

    #[test]
    fn check_json_accepts_valid_and_rejects_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.json");
        fs::write(&good, r#"{"a": [1, 2]}"#).unwrap();
        assert!(check_json(&good, "good"));

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{").unwrap();
        assert!(!check_json(&bad, "bad"));

        assert!(!check_json(&dir.path().join("absent.json"), "absent"));
    }

    #[test]
    fn check_file_reports_existence() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("here.txt");
        fs::write(&present, "x").unwrap();
        assert!(check_file(&present, "here.txt"));
        assert!(!check_file(&dir.path().join("gone.txt"), "gone.txt"));
    }
}
