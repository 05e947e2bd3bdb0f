use anyhow::{Context, Result};
use blog_kit_core::config::{CONTENT_DIR, PUBLIC_DIR, SITE_TOML, write_site_toml};
use blog_kit_core::{SiteConfig, produce_configuration};
use blog_kit_validator::link_route;
use std::fs;
use std::path::{Path, PathBuf};

/// Initialize a new site directory from the built-in configuration.
///
/// This command:
/// - Writes site.toml from the blog's built-in settings
/// - Creates docs/ with a stub page behind every internal nav link
/// - Creates public/ for the favicon and logo
///
/// Existing pages are left untouched.
///
/// # Errors
///
/// Returns an error if site.toml already exists in the directory or a
/// file operation fails.
pub async fn run(path: PathBuf) -> Result<()> {
    println!("Initializing site directory: {}", path.display());

    let site_toml_path = path.join(SITE_TOML);
    if site_toml_path.exists() {
        anyhow::bail!(
            "{} already exists at {}\nHint: Delete it first or use a different directory",
            SITE_TOML,
            site_toml_path.display()
        );
    }

    fs::create_dir_all(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let config = produce_configuration();
    write_site_toml(&path, &config).context("Failed to write site.toml")?;
    println!("✓ Wrote {}", SITE_TOML);

    fs::create_dir_all(path.join(PUBLIC_DIR)).context("Failed to create public directory")?;
    let created = create_stub_pages(&path, &config)?;
    println!("✓ Created {} stub page(s) in {}/", created.len(), CONTENT_DIR);

    println!("\n✓ Initialization complete!");
    println!("\nGenerated structure:");
    println!("  {}/", path.display());
    println!("  ├── {}            ← Edit this to change title, nav, labels", SITE_TOML);
    println!("  ├── {}/", CONTENT_DIR);
    for page in &created {
        println!("  │   └── {}", page.display());
    }
    println!("  └── {}/              ← Add favicon.ico and logo.jpg here", PUBLIC_DIR);

    println!("\nNext steps:");
    println!("  1. Copy the favicon and logo into {}/", PUBLIC_DIR);
    println!("  2. Validate: blog-kit validate {}", path.display());
    println!("  3. Preview: blog-kit preview {}", path.display());

    Ok(())
}

/// Write a placeholder page for every internal nav link without one.
///
/// Returns the created pages relative to the content directory.
fn create_stub_pages(base: &Path, config: &SiteConfig) -> Result<Vec<PathBuf>> {
    let content_dir = base.join(CONTENT_DIR);
    fs::create_dir_all(&content_dir).context("Failed to create content directory")?;

    let mut created = Vec::new();
    for link in config.nav_links().filter(|l| !l.is_external() && !l.link.is_empty()) {
        let relative = PathBuf::from(format!("{}.md", link_route(&link.link).trim_start_matches('/')));
        let page = content_dir.join(&relative);
        if page.exists() {
            continue;
        }

        if let Some(parent) = page.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&page, format!("# {}\n", link.text))
            .with_context(|| format!("Failed to write {}", page.display()))?;
        created.push(relative);
    }

    Ok(created)
}
